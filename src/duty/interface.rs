use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::duty::output_types::{DutyError, DutyResult};

/// Kinds of duties this crate can execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DutyKind {
    Translation,
    Summarization,
}

impl std::fmt::Display for DutyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Translation => write!(f, "translation"),
            Self::Summarization => write!(f, "summarization"),
        }
    }
}

/// Base interface for all duty implementations
#[async_trait]
pub trait Duty: Send + Sync {
    /// Which duty kind this instance executes
    fn kind(&self) -> DutyKind;

    /// Duty name used in log lines
    fn name(&self) -> &str;

    /// The system prompt fixed at construction
    fn system_prompt(&self) -> &str;

    /// Run the duty once: a single schema-constrained completion against
    /// the inference engine. Engine failures are logged and returned as
    /// [`DutyError`]; they are never propagated as panics.
    async fn execute(&self) -> Result<DutyResult, DutyError>;
}

/// Rendered user-turn text submitted to the engine
pub(crate) fn rendered_input(input: Option<&str>) -> String {
    format!("Text: {}", input.unwrap_or_default())
}
