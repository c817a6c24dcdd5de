//! # msclone-core
//!
//! Core types, traits, and abstractions for the msclone tenant clone engine.
//!
//! This crate provides the domain model (tenants, table ownership, clone
//! requests and outcomes), the error taxonomy, and the collaborator traits
//! that the database layer and the engine build on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
