//! LLM duties: single-shot, schema-constrained units of work against a
//! local language-model inference engine.
//!
//! A duty binds its parameters and system prompt at construction, then
//! `execute()` runs exactly one constrained completion and returns a
//! typed result. The inference engine itself lives behind the traits in
//! [`engine`] and is injected at construction.

pub mod config;
pub mod duty;
pub mod engine;

pub use config::{Config, InferenceConfig};
pub use duty::{
    Duty, DutyData, DutyError, DutyKind, DutyParams, DutyResult, InferenceSession,
    SummarizationDuty, SummaryOutput, TranslationData, TranslationDuty, TranslationOutput,
};
pub use engine::{
    CompletionOptions, ContextOptions, EngineError, FieldKind, InferenceContext, ModelHandle,
    SchemaDescriptor, SchemaGrammar,
};
