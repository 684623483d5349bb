use std::sync::Arc;
use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::InferenceConfig;
use crate::duty::input_types::{DutyData, DutyParams, TranslationData};
use crate::duty::interface::{rendered_input, Duty, DutyKind};
use crate::duty::output_types::{DutyError, DutyResult, TranslationOutput};
use crate::duty::session::InferenceSession;
use crate::engine::{EngineError, FieldKind, ModelHandle, SchemaDescriptor};

const NAME: &str = "Translation LLM Duty";

/// Duty that translates a given text into a target language through a
/// single schema-constrained completion.
#[derive(Debug)]
pub struct TranslationDuty {
    instance_id: String,
    input: Option<String>,
    data: TranslationData,
    system_prompt: String,
    schema: SchemaDescriptor,
    session: InferenceSession,
}

/// Select the system prompt for the given translation parameters. The
/// auto-detect template applies only when the source language is truly
/// absent.
fn select_system_prompt(data: &TranslationData) -> String {
    let target = data.target.as_deref().unwrap_or_default();

    if data.auto_detect_language && data.source.is_none() {
        format!(
            "You are an AI system that can translate a given text to \"{}\" by auto-detecting the source language.",
            target
        )
    } else {
        format!(
            "You are an AI system that can translate a given text from \"{}\" to \"{}\".",
            data.source.as_deref().unwrap_or_default(),
            target
        )
    }
}

impl TranslationDuty {
    /// Create the duty and fix its system prompt.
    ///
    /// # Arguments
    /// * `params` - Free-text input plus translation data
    /// * `model` - Handle to the already-loaded model
    /// * `config` - Process-wide inference configuration
    pub fn new(
        params: DutyParams,
        model: Arc<dyn ModelHandle>,
        config: &InferenceConfig,
    ) -> Result<Self, DutyError> {
        let DutyParams { input, data } = params;
        let data = match data {
            DutyData::Translation(data) => data,
            _ => {
                return Err(DutyError::InvalidParameters(
                    "expected translation data".to_string(),
                ))
            }
        };

        if data.target.as_deref().unwrap_or_default().is_empty() {
            return Err(DutyError::InvalidParameters(
                "target language is required".to_string(),
            ));
        }
        if !data.auto_detect_language && data.source.is_none() {
            return Err(DutyError::InvalidParameters(
                "source language is required unless auto-detection is enabled".to_string(),
            ));
        }

        let instance_id = Uuid::new_v4().to_string();
        let system_prompt = select_system_prompt(&data);

        info!("{} [{}]: New instance", NAME, instance_id);

        Ok(Self {
            instance_id,
            input,
            data,
            system_prompt,
            schema: SchemaDescriptor::object(&[("translation", FieldKind::String)]),
            session: InferenceSession::new(model, config),
        })
    }
}

#[async_trait]
impl Duty for TranslationDuty {
    fn kind(&self) -> DutyKind {
        DutyKind::Translation
    }

    fn name(&self) -> &str {
        NAME
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    async fn execute(&self) -> Result<DutyResult, DutyError> {
        info!("{} [{}]: Executing...", NAME, self.instance_id);

        let prompt = rendered_input(self.input.as_deref());

        let output = match self
            .session
            .run(&prompt, &self.system_prompt, &self.schema)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                error!("{} [{}]: Failed to execute: {}", NAME, self.instance_id, e);
                return Err(e.into());
            }
        };

        // Constrained decoding is not assumed infallible; the key set is
        // checked again on decode
        if let Err(e) = serde_json::from_value::<TranslationOutput>(output.clone()) {
            error!("{} [{}]: Failed to execute: {}", NAME, self.instance_id, e);
            return Err(DutyError::Engine(EngineError::SchemaViolation(
                e.to_string(),
            )));
        }

        let result = DutyResult::assemble(
            DutyKind::Translation,
            &self.system_prompt,
            prompt,
            output,
            DutyData::Translation(self.data.clone()),
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
