use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use llm_duties::config::InferenceConfig;
use llm_duties::duty::{
    Duty, DutyData, DutyError, DutyKind, DutyParams, SummarizationDuty, TranslationData,
    TranslationDuty,
};
use llm_duties::engine::{
    CompletionOptions, ContextOptions, EngineError, InferenceContext, ModelHandle,
    SchemaDescriptor, SchemaGrammar,
};

/// Scriptable in-memory engine: returns a fixed raw completion, or fails
/// at a chosen step.
#[derive(Clone)]
struct StubEngine {
    raw_response: String,
    fail_context: bool,
    fail_completion: bool,
    completion_calls: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
    last_system: Arc<Mutex<Option<String>>>,
}

impl StubEngine {
    fn returning(raw_response: &str) -> Self {
        Self {
            raw_response: raw_response.to_string(),
            fail_context: false,
            fail_completion: false,
            completion_calls: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
            last_system: Arc::new(Mutex::new(None)),
        }
    }

    fn failing_context() -> Self {
        Self {
            fail_context: true,
            ..Self::returning("")
        }
    }

    fn failing_completion() -> Self {
        Self {
            fail_completion: true,
            ..Self::returning("")
        }
    }

    fn completion_calls(&self) -> usize {
        self.completion_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelHandle for StubEngine {
    async fn create_context(
        &self,
        options: ContextOptions,
    ) -> Result<Box<dyn InferenceContext>, EngineError> {
        if self.fail_context {
            return Err(EngineError::Unavailable("model not loaded".to_string()));
        }
        Ok(Box::new(StubContext {
            engine: self.clone(),
            context_size: options.context_size,
        }))
    }

    fn schema_grammar(
        &self,
        _schema: &SchemaDescriptor,
    ) -> Result<Box<dyn SchemaGrammar>, EngineError> {
        Ok(Box::new(StubGrammar))
    }
}

struct StubContext {
    engine: StubEngine,
    context_size: usize,
}

#[async_trait]
impl InferenceContext for StubContext {
    fn context_size(&self) -> usize {
        self.context_size
    }

    async fn generate_completion(
        &mut self,
        prompt: &str,
        system: Option<&str>,
        options: CompletionOptions<'_>,
    ) -> Result<String, EngineError> {
        self.engine.completion_calls.fetch_add(1, Ordering::SeqCst);
        *self.engine.last_prompt.lock().unwrap() = Some(prompt.to_string());
        *self.engine.last_system.lock().unwrap() = system.map(|s| s.to_string());
        assert_eq!(options.max_tokens, self.context_size);

        if self.engine.fail_completion {
            return Err(EngineError::Completion("engine aborted".to_string()));
        }
        Ok(self.engine.raw_response.clone())
    }
}

struct StubGrammar;

impl SchemaGrammar for StubGrammar {
    fn parse(&self, raw: &str) -> Result<serde_json::Value, EngineError> {
        serde_json::from_str(raw).map_err(|e| EngineError::SchemaViolation(e.to_string()))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("llm_duties=debug")
        .try_init();
}

fn translation_params(
    input: &str,
    source: Option<&str>,
    target: Option<&str>,
    auto_detect_language: bool,
) -> DutyParams {
    DutyParams::new(
        Some(input.to_string()),
        DutyData::Translation(TranslationData {
            source: source.map(|s| s.to_string()),
            target: target.map(|s| s.to_string()),
            auto_detect_language,
        }),
    )
}

#[tokio::test]
async fn translation_duty_end_to_end() {
    init_tracing();
    let engine = StubEngine::returning(r#"{"translation":"Bonjour"}"#);
    let config = InferenceConfig::default();

    let duty = TranslationDuty::new(
        translation_params("Hello", Some("en"), Some("fr"), false),
        Arc::new(engine.clone()),
        &config,
    )
    .unwrap();

    let result = duty.execute().await.unwrap();

    assert_eq!(result.kind, DutyKind::Translation);
    assert_eq!(result.output["translation"], "Bonjour");
    assert_eq!(result.input, "Text: Hello");
    assert!(result.system_prompt.contains("\"en\""));
    assert!(result.system_prompt.contains("\"fr\""));
    assert_eq!(engine.completion_calls(), 1);

    // The system prompt reaches the engine separately from the user turn
    assert_eq!(
        engine.last_system.lock().unwrap().as_deref(),
        Some(duty.system_prompt())
    );
    assert_eq!(
        engine.last_prompt.lock().unwrap().as_deref(),
        Some("Text: Hello")
    );
}

#[tokio::test]
async fn result_echoes_construction_data() {
    let engine = StubEngine::returning(r#"{"translation":"Hallo"}"#);
    let config = InferenceConfig::default();
    let data = DutyData::Translation(TranslationData {
        source: Some("en".to_string()),
        target: Some("de".to_string()),
        auto_detect_language: false,
    });

    let duty = TranslationDuty::new(
        DutyParams::new(Some("Hello".to_string()), data.clone()),
        Arc::new(engine),
        &config,
    )
    .unwrap();

    let result = duty.execute().await.unwrap();
    assert_eq!(result.data, data);
}

#[tokio::test]
async fn completion_failure_is_contained_and_branchable() {
    init_tracing();
    let engine = StubEngine::failing_completion();
    let config = InferenceConfig::default();

    let duty = TranslationDuty::new(
        translation_params("Hello", Some("en"), Some("fr"), false),
        Arc::new(engine.clone()),
        &config,
    )
    .unwrap();

    let err = duty.execute().await.unwrap_err();
    assert!(matches!(
        err,
        DutyError::Engine(EngineError::Completion(_))
    ));
    // No retry on failure
    assert_eq!(engine.completion_calls(), 1);
}

#[tokio::test]
async fn context_failure_prevents_completion() {
    let engine = StubEngine::failing_context();
    let config = InferenceConfig::default();

    let duty = TranslationDuty::new(
        translation_params("Hello", Some("en"), Some("fr"), false),
        Arc::new(engine.clone()),
        &config,
    )
    .unwrap();

    let err = duty.execute().await.unwrap_err();
    assert!(matches!(
        err,
        DutyError::Engine(EngineError::Unavailable(_))
    ));
    assert_eq!(engine.completion_calls(), 0);
}

#[tokio::test]
async fn malformed_raw_output_is_a_schema_violation() {
    let engine = StubEngine::returning("not json");
    let config = InferenceConfig::default();

    let duty = TranslationDuty::new(
        translation_params("Hello", Some("en"), Some("fr"), false),
        Arc::new(engine),
        &config,
    )
    .unwrap();

    let err = duty.execute().await.unwrap_err();
    assert!(matches!(
        err,
        DutyError::Engine(EngineError::SchemaViolation(_))
    ));
}

#[tokio::test]
async fn unexpected_output_keys_are_rejected() {
    let engine = StubEngine::returning(r#"{"translation":"Bonjour","note":"extra"}"#);
    let config = InferenceConfig::default();

    let duty = TranslationDuty::new(
        translation_params("Hello", Some("en"), Some("fr"), false),
        Arc::new(engine),
        &config,
    )
    .unwrap();

    let err = duty.execute().await.unwrap_err();
    assert!(matches!(
        err,
        DutyError::Engine(EngineError::SchemaViolation(_))
    ));
}

#[tokio::test]
async fn each_execute_opens_an_independent_session() {
    let engine = StubEngine::returning(r#"{"translation":"Bonjour"}"#);
    let config = InferenceConfig::default();

    let duty = TranslationDuty::new(
        translation_params("Hello", Some("en"), Some("fr"), false),
        Arc::new(engine.clone()),
        &config,
    )
    .unwrap();

    duty.execute().await.unwrap();
    duty.execute().await.unwrap();
    assert_eq!(engine.completion_calls(), 2);
}

#[test]
fn missing_target_is_rejected_at_construction() {
    let engine = StubEngine::returning("");
    let config = InferenceConfig::default();

    let err = TranslationDuty::new(
        translation_params("Hello", Some("en"), None, false),
        Arc::new(engine),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, DutyError::InvalidParameters(_)));
}

#[test]
fn missing_source_without_auto_detect_is_rejected() {
    let engine = StubEngine::returning("");
    let config = InferenceConfig::default();

    let err = TranslationDuty::new(
        translation_params("Hello", None, Some("fr"), false),
        Arc::new(engine),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, DutyError::InvalidParameters(_)));
}

#[test]
fn mismatched_data_kind_is_rejected() {
    let engine = StubEngine::returning("");
    let config = InferenceConfig::default();

    let err = TranslationDuty::new(
        DutyParams::new(Some("Hello".to_string()), DutyData::Summarization),
        Arc::new(engine),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, DutyError::InvalidParameters(_)));
}

#[tokio::test]
async fn summarization_duty_end_to_end() {
    init_tracing();
    let engine = StubEngine::returning(r#"{"summary":"A short greeting."}"#);
    let config = InferenceConfig::default();

    let duty = SummarizationDuty::new(
        DutyParams::new(
            Some("Hello there, how are you today?".to_string()),
            DutyData::Summarization,
        ),
        Arc::new(engine.clone()),
        &config,
    )
    .unwrap();

    let result = duty.execute().await.unwrap();
    assert_eq!(result.kind, DutyKind::Summarization);
    assert_eq!(result.output["summary"], "A short greeting.");
    assert_eq!(result.data, DutyData::Summarization);
    assert_eq!(engine.completion_calls(), 1);
}
