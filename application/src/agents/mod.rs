//! Stage agents
//!
//! Each agent builds its prompt, calls the shared [`ModelInvoker`], normalizes
//! the raw text and runs the entity's validate-and-enhance step. Shape
//! problems in the response never surface as errors: only an exhausted
//! invoker does.
//!
//! | Agent | Temperature | Max tokens |
//! |-------|-------------|------------|
//! | [`PlannerAgent`] | 0.3 | 4096 |
//! | [`ThinkerAgent`] | 1.1 | 4096 |
//! | [`CriticAgent`] | 0.5 | 4096 |
//! | [`RefinerAgent`] | 0.2 | 4096 |
//! | [`MetaRefinerAgent`] | 0.8 | 6144 |
//!
//! [`ResearchAgent`] talks to the search provider instead of the model.
//!
//! [`ModelInvoker`]: crate::invoker::ModelInvoker

pub mod critic;
pub mod meta_refiner;
pub mod planner;
pub mod refiner;
pub mod researcher;
pub mod thinker;

pub use critic::CriticAgent;
pub use meta_refiner::MetaRefinerAgent;
pub use planner::PlannerAgent;
pub use refiner::RefinerAgent;
pub use researcher::{ResearchAgent, ResearchOutcome};
pub use thinker::ThinkerAgent;

use deepthink_domain::core::string::preview;
use deepthink_domain::{Recovery, Stage, normalize};
use serde_json::Value;
use tracing::{debug, warn};

/// Sampling settings for one stage
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSettings {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

pub const PLANNER_SETTINGS: StageSettings = StageSettings {
    temperature: 0.3,
    max_output_tokens: 4096,
};

pub const THINKER_SETTINGS: StageSettings = StageSettings {
    temperature: 1.1,
    max_output_tokens: 4096,
};

pub const CRITIC_SETTINGS: StageSettings = StageSettings {
    temperature: 0.5,
    max_output_tokens: 4096,
};

pub const REFINER_SETTINGS: StageSettings = StageSettings {
    temperature: 0.2,
    max_output_tokens: 4096,
};

pub const META_REFINER_SETTINGS: StageSettings = StageSettings {
    temperature: 0.8,
    max_output_tokens: 6144,
};

/// A validated stage record plus how its raw response was recovered
#[derive(Debug, Clone)]
pub struct AgentOutput<T> {
    pub value: T,
    pub recovery: Recovery,
}

impl<T> AgentOutput<T> {
    pub fn used_fallback(&self) -> bool {
        self.recovery.is_fallback()
    }
}

/// Normalize `raw` and build the stage record.
///
/// `validate` runs on any recovered object; `fallback` runs only when
/// nothing could be recovered.
pub(crate) fn resolve<T>(
    stage: Stage,
    label: &str,
    raw: &str,
    validate: impl FnOnce(&Value) -> T,
    fallback: impl FnOnce() -> T,
) -> AgentOutput<T> {
    let normalized = normalize(raw, Value::Null);

    let value = match normalized.recovery {
        Recovery::Fallback => {
            warn!(
                stage = stage.as_str(),
                agent = label,
                raw_len = raw.len(),
                preview = %preview(raw, 120),
                "Response could not be parsed, using fallback record"
            );
            fallback()
        }
        Recovery::Direct => validate(&normalized.value),
        recovery => {
            debug!(
                stage = stage.as_str(),
                agent = label,
                recovery = %recovery,
                "Recovered malformed response"
            );
            validate(&normalized.value)
        }
    };

    AgentOutput {
        value,
        recovery: normalized.recovery,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Scripted gateway shared by agent and use case tests.

    use crate::ports::llm_gateway::{GatewayError, GenerationRequest, LlmGateway};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses in order and records every request
    pub struct QueueGateway {
        responses: Mutex<VecDeque<Result<String, GatewayError>>>,
        pub requests: Mutex<Vec<GenerationRequest>>,
    }

    impl QueueGateway {
        pub fn new(responses: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn replies(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
        }

        pub fn last_prompt(&self) -> String {
            self.requests
                .lock()
                .unwrap()
                .last()
                .map(|r| r.prompt.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmGateway for QueueGateway {
        async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_validates_recovered_object() {
        let out = resolve(
            Stage::Planning,
            "planner",
            "Sure! {\"a\": 1} hope it helps",
            |v| v["a"].as_i64().unwrap_or(-1),
            || -2,
        );
        assert_eq!(out.value, 1);
        assert_eq!(out.recovery, Recovery::EmbeddedBlock);
        assert!(!out.used_fallback());
    }

    #[test]
    fn test_resolve_uses_fallback() {
        let out = resolve(Stage::Planning, "planner", "no json", |_| 1, || 2);
        assert_eq!(out.value, 2);
        assert!(out.used_fallback());
    }

    #[test]
    fn test_resolve_direct() {
        let out = resolve(Stage::Critique, "critic", &json!({"x": true}).to_string(), |v| v["x"] == true, || false);
        assert!(out.value);
        assert_eq!(out.recovery, Recovery::Direct);
    }
}
