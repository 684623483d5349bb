use async_trait::async_trait;

use super::schema::SchemaDescriptor;
use super::EngineError;

/// Sizing for a computation context opened against a loaded model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextOptions {
    pub context_size: usize,
    pub threads: usize,
}

/// Options for a single constrained completion call
pub struct CompletionOptions<'a> {
    /// Grammar restricting generation to the declared output shape
    pub grammar: &'a dyn SchemaGrammar,
    /// Token budget for the completion
    pub max_tokens: usize,
}

/// Handle to a model already loaded into the inference engine.
///
/// Implementations wrap a concrete engine binding. The handle is shared,
/// read-only state; duties never load or unload models through it.
#[async_trait]
pub trait ModelHandle: Send + Sync {
    /// Open a bounded computation context against the loaded model.
    ///
    /// # Arguments
    /// * `options` - Context size and thread count for this context
    async fn create_context(
        &self,
        options: ContextOptions,
    ) -> Result<Box<dyn InferenceContext>, EngineError>;

    /// Build a grammar that constrains generation to `schema`
    fn schema_grammar(
        &self,
        schema: &SchemaDescriptor,
    ) -> Result<Box<dyn SchemaGrammar>, EngineError>;
}

/// A bounded computation context able to run completions.
#[async_trait]
pub trait InferenceContext: Send + Sync {
    /// Size of this context in tokens
    fn context_size(&self) -> usize;

    /// Run one completion. The system prompt is submitted separately from
    /// the user-turn prompt; generation is restricted by the grammar in
    /// `options`.
    async fn generate_completion(
        &mut self,
        prompt: &str,
        system: Option<&str>,
        options: CompletionOptions<'_>,
    ) -> Result<String, EngineError>;
}

/// Schema-bound decoder for raw completion text.
pub trait SchemaGrammar: Send + Sync {
    /// Decode raw text into a structured value. Fails with
    /// [`EngineError::SchemaViolation`] if the text does not conform.
    fn parse(&self, raw: &str) -> Result<serde_json::Value, EngineError>;
}
