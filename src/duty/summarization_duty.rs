use std::sync::Arc;
use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::InferenceConfig;
use crate::duty::input_types::{DutyData, DutyParams};
use crate::duty::interface::{rendered_input, Duty, DutyKind};
use crate::duty::output_types::{DutyError, DutyResult, SummaryOutput};
use crate::duty::session::InferenceSession;
use crate::engine::{EngineError, FieldKind, ModelHandle, SchemaDescriptor};

const NAME: &str = "Summarization LLM Duty";

const SYSTEM_PROMPT: &str =
    "You are an AI system that summarizes a given text in a few sentences. \
     The summary must be written in the same language as the given text.";

/// Duty that summarizes a given text through a single schema-constrained
/// completion. Carries no structured parameters beyond the input text.
pub struct SummarizationDuty {
    instance_id: String,
    input: Option<String>,
    schema: SchemaDescriptor,
    session: InferenceSession,
}

impl SummarizationDuty {
    /// Create the duty.
    ///
    /// # Arguments
    /// * `params` - Free-text input; `data` must be the summarization kind
    /// * `model` - Handle to the already-loaded model
    /// * `config` - Process-wide inference configuration
    pub fn new(
        params: DutyParams,
        model: Arc<dyn ModelHandle>,
        config: &InferenceConfig,
    ) -> Result<Self, DutyError> {
        let DutyParams { input, data } = params;
        if data != DutyData::Summarization {
            return Err(DutyError::InvalidParameters(
                "expected summarization data".to_string(),
            ));
        }

        let instance_id = Uuid::new_v4().to_string();
        info!("{} [{}]: New instance", NAME, instance_id);

        Ok(Self {
            instance_id,
            input,
            schema: SchemaDescriptor::object(&[("summary", FieldKind::String)]),
            session: InferenceSession::new(model, config),
        })
    }
}

#[async_trait]
impl Duty for SummarizationDuty {
    fn kind(&self) -> DutyKind {
        DutyKind::Summarization
    }

    fn name(&self) -> &str {
        NAME
    }

    fn system_prompt(&self) -> &str {
        SYSTEM_PROMPT
    }

    async fn execute(&self) -> Result<DutyResult, DutyError> {
        info!("{} [{}]: Executing...", NAME, self.instance_id);

        let prompt = rendered_input(self.input.as_deref());

        let output = match self.session.run(&prompt, SYSTEM_PROMPT, &self.schema).await {
            Ok(output) => output,
            Err(e) => {
                error!("{} [{}]: Failed to execute: {}", NAME, self.instance_id, e);
                return Err(e.into());
            }
        };

        if let Err(e) = serde_json::from_value::<SummaryOutput>(output.clone()) {
            error!("{} [{}]: Failed to execute: {}", NAME, self.instance_id, e);
            return Err(DutyError::Engine(EngineError::SchemaViolation(
                e.to_string(),
            )));
        }

        let result = DutyResult::assemble(
            DutyKind::Summarization,
            SYSTEM_PROMPT,
            prompt,
            output,
            DutyData::Summarization,
        );

        info!(
            "{} [{}]: Duty executed: {}",
            NAME,
            self.instance_id,
            serde_json::to_string(&result).unwrap_or_default()
        );

        Ok(result)
    }
}
