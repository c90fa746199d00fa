//! Domain layer types and invariants.

pub mod error;
pub mod forms;
pub mod lookup;
pub mod uploads;
pub mod validation;

pub use entradas_api_types::{Category, Entrada, Perfil, TokenPair, Usuario};
