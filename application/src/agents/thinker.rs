use super::{AgentOutput, THINKER_SETTINGS, resolve};
use crate::invoker::{InvokeError, ModelInvoker};
use crate::ports::llm_gateway::LlmGateway;
use deepthink_domain::prompt::schema::think_schema;
use deepthink_domain::{Candidate, Plan, PromptTemplate, Stage};

/// One independently seeded reasoning path
pub struct ThinkerAgent<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
    seed: u32,
}

impl<G: LlmGateway + 'static> ThinkerAgent<G> {
    pub fn new(invoker: ModelInvoker<G>, seed: u32) -> Self {
        Self { invoker, seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn label(&self) -> String {
        format!("thinker-{}", self.seed)
    }

    pub async fn think(
        &self,
        plan: &Plan,
        research_context: Option<&str>,
    ) -> Result<AgentOutput<Candidate>, InvokeError> {
        let prompt = PromptTemplate::thinker(plan, self.seed, research_context);
        let raw = self
            .invoker
            .invoke(
                &prompt,
                THINKER_SETTINGS.temperature,
                THINKER_SETTINGS.max_output_tokens,
                Some(think_schema()),
            )
            .await?;

        let max_thoughts = plan.max_thoughts();
        Ok(resolve(
            Stage::Thinking,
            &self.label(),
            &raw,
            |value| Candidate::from_json(value, self.seed, max_thoughts),
            || Candidate::fallback_from_raw(self.seed, &raw, max_thoughts),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::QueueGateway;
    use deepthink_domain::Confidence;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_candidate_carries_seed() {
        let gateway = Arc::new(QueueGateway::replies(&[
            r#"{"agent_id": 42, "approach": "direct", "thoughts": ["a", "b"], "answer": "4", "confidence": 0.9}"#,
        ]));
        let agent = ThinkerAgent::new(ModelInvoker::new(Arc::clone(&gateway)), 3);

        let output = agent.think(&Plan::fallback("2+2"), None).await.unwrap();
        assert_eq!(output.value.agent_id, 3);
        assert_eq!(output.value.answer, "4");
        assert_eq!(output.value.confidence, Confidence::High);

        let request = gateway.requests.lock().unwrap()[0].clone();
        assert_eq!(request.temperature, 1.1);
        assert!(request.prompt.contains("thinker #3"));
    }

    #[tokio::test]
    async fn test_research_context_in_prompt() {
        let gateway = Arc::new(QueueGateway::replies(&[r#"{"answer": "x"}"#]));
        let agent = ThinkerAgent::new(ModelInvoker::new(Arc::clone(&gateway)), 0);
        agent
            .think(&Plan::fallback("q"), Some("### topic\n- finding"))
            .await
            .unwrap();
        assert!(gateway.last_prompt().contains("Research findings:\n### topic"));
    }

    #[tokio::test]
    async fn test_unparseable_response_extracts_answer() {
        let gateway = Arc::new(QueueGateway::replies(&[
            "Let me think.\nThe final answer: it is definitely four\n",
        ]));
        let agent = ThinkerAgent::new(ModelInvoker::new(gateway), 1);

        let output = agent.think(&Plan::fallback("2+2"), None).await.unwrap();
        assert!(output.used_fallback());
        assert_eq!(output.value.agent_id, 1);
        assert_eq!(output.value.answer, "it is definitely four");
        assert_eq!(output.value.confidence, Confidence::Low);
    }
}
