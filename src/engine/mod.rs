//! Interface to the local inference engine.
//!
//! The engine itself (model loading, tokenization, sampling, context
//! window management) lives behind these traits. This crate only opens
//! bounded computation contexts and runs schema-constrained completions
//! against a handle injected at duty construction.

pub mod interface;
pub mod schema;

pub use interface::*;
pub use schema::*;

use thiserror::Error;

/// Engine-originated failures.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Model, context or session could not be created
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// The completion call failed or was aborted by the engine
    #[error("completion failed: {0}")]
    Completion(String),

    /// Raw output did not decode against the declared schema
    #[error("schema violation: {0}")]
    SchemaViolation(String),
}
