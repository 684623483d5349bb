use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duty::input_types::DutyData;
use crate::duty::interface::DutyKind;
use crate::engine::EngineError;

/// Result of one successful duty execution. Constructed at most once per
/// `execute()` call; never persisted by this crate.
#[derive(Debug, Clone, Serialize)]
pub struct DutyResult {
    pub kind: DutyKind,
    /// Instruction actually given to the model
    pub system_prompt: String,
    /// Rendered user-turn text submitted to the engine
    pub input: String,
    /// Schema-validated structured output
    pub output: serde_json::Value,
    /// Echo of the structured parameters supplied at construction
    pub data: DutyData,
}

impl DutyResult {
    /// Combine the pieces of one finished execution into a result record
    pub fn assemble(
        kind: DutyKind,
        system_prompt: &str,
        input: String,
        output: serde_json::Value,
        data: DutyData,
    ) -> Self {
        Self {
            kind,
            system_prompt: system_prompt.to_string(),
            input,
            output,
            data,
        }
    }
}

/// Output shape of a translation duty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationOutput {
    pub translation: String,
}

/// Output shape of a summarization duty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryOutput {
    pub summary: String,
}

/// Failure of a duty, branchable by cause
#[derive(Error, Debug)]
pub enum DutyError {
    /// Parameters were rejected at construction
    #[error("invalid duty parameters: {0}")]
    InvalidParameters(String),

    /// The inference engine failed while executing the duty
    #[error(transparent)]
    Engine(#[from] EngineError),
}
