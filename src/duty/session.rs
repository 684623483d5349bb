use std::sync::Arc;
use tracing::debug;

use crate::config::InferenceConfig;
use crate::engine::{
    CompletionOptions, ContextOptions, EngineError, ModelHandle, SchemaDescriptor,
};

/// Runs one schema-constrained completion per call against an injected
/// model handle. Each call opens an independent computation context; the
/// session holds no state between calls.
pub struct InferenceSession {
    model: Arc<dyn ModelHandle>,
    options: ContextOptions,
}

impl std::fmt::Debug for InferenceSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceSession")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl InferenceSession {
    pub fn new(model: Arc<dyn ModelHandle>, config: &InferenceConfig) -> Self {
        Self {
            model,
            options: ContextOptions {
                context_size: config.context_size,
                threads: config.threads,
            },
        }
    }

    /// Open a context, bind a grammar built from `schema`, submit `prompt`
    /// with a token budget equal to the context size, and decode the raw
    /// text. Exactly one completion call; no retry, no streaming.
    pub async fn run(
        &self,
        prompt: &str,
        system_prompt: &str,
        schema: &SchemaDescriptor,
    ) -> Result<serde_json::Value, EngineError> {
        let mut context = self.model.create_context(self.options).await?;
        let grammar = self.model.schema_grammar(schema)?;
        let max_tokens = context.context_size();

        debug!(
            "Opened inference context: size={}, threads={}",
            self.options.context_size, self.options.threads
        );

        let raw = context
            .generate_completion(
                prompt,
                Some(system_prompt),
                CompletionOptions {
                    grammar: grammar.as_ref(),
                    max_tokens,
                },
            )
            .await?;

        grammar.parse(&raw)
    }
}
