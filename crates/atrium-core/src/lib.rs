//! # atrium-core
//!
//! Core types, traits, and abstractions for the Atrium console.
//!
//! This crate provides the domain models, error taxonomy, and façade trait
//! contracts that the other Atrium crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
