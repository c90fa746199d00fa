//! Client-side administration of an Entradas blog.
//!
//! The admin screens follow one pattern: a [`application::loader::ListLoader`]
//! fetches a collection, create and edit controllers validate and submit
//! forms, and every successful mutation asks the owning loader to reload in
//! full.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod session;
