use serde::{Deserialize, Serialize};

/// Structured, duty-kind-specific parameters. Each kind carries its own
/// fixed field set; kinds are never mixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DutyData {
    Translation(TranslationData),
    Summarization,
}

/// Structured parameters of a translation duty
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationData {
    /// Source language, absent when auto-detection is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Target language
    #[serde(default)]
    pub target: Option<String>,
    /// Ask the model to detect the source language itself
    #[serde(default)]
    pub auto_detect_language: bool,
}

/// Immutable input to a duty: a free-text payload plus structured data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyParams {
    /// Free-text payload to be processed
    pub input: Option<String>,
    /// Duty-kind-specific structured fields
    pub data: DutyData,
}

impl DutyParams {
    pub fn new(input: Option<String>, data: DutyData) -> Self {
        Self { input, data }
    }
}
