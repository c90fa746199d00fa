//! Controllers for the list + create/edit workflow and the account flows.

pub mod auth;
pub mod board;
pub mod create;
pub mod edit;
pub mod error;
pub mod loader;
pub mod notice;
pub mod profile;
pub mod resources;
