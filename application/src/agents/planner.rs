use super::{AgentOutput, PLANNER_SETTINGS, resolve};
use crate::invoker::{InvokeError, ModelInvoker};
use crate::ports::llm_gateway::LlmGateway;
use deepthink_domain::prompt::schema::plan_schema;
use deepthink_domain::{Plan, PromptTemplate, Stage};
use tracing::debug;

/// Produces the plan every later stage works from
pub struct PlannerAgent<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
}

impl<G: LlmGateway + 'static> PlannerAgent<G> {
    pub fn new(invoker: ModelInvoker<G>) -> Self {
        Self { invoker }
    }

    pub async fn plan(&self, query: &str) -> Result<AgentOutput<Plan>, InvokeError> {
        let prompt = PromptTemplate::planner(query);
        let raw = self
            .invoker
            .invoke(
                &prompt,
                PLANNER_SETTINGS.temperature,
                PLANNER_SETTINGS.max_output_tokens,
                Some(plan_schema()),
            )
            .await?;

        let output = resolve(
            Stage::Planning,
            "planner",
            &raw,
            |value| Plan::from_json(value, query),
            || Plan::fallback(query),
        );

        debug!(
            reasoning_type = %output.value.reasoning_type,
            thinking_budget = output.value.thinking_budget,
            research_steps = output.value.research_steps.len(),
            "Plan ready"
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::test_support::QueueGateway;
    use crate::ports::llm_gateway::GatewayError;
    use deepthink_domain::ReasoningType;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_plan_from_valid_response() {
        let gateway = Arc::new(QueueGateway::replies(&[
            r#"{"task": "Add numbers", "reasoning_type": "mathematical", "thinking_budget": "7 steps"}"#,
        ]));
        let agent = PlannerAgent::new(ModelInvoker::new(Arc::clone(&gateway)));

        let output = agent.plan("What is 2+2?").await.unwrap();
        assert_eq!(output.value.task, "Add numbers");
        assert_eq!(output.value.reasoning_type, ReasoningType::Mathematical);
        assert_eq!(output.value.thinking_budget, 7);
        assert!(!output.used_fallback());

        let request = gateway.requests.lock().unwrap()[0].clone();
        assert_eq!(request.temperature, 0.3);
        assert_eq!(request.max_output_tokens, 4096);
        assert!(request.response_schema.is_some());
        assert!(request.prompt.contains("What is 2+2?"));
    }

    #[tokio::test]
    async fn test_unparseable_response_uses_fallback_plan() {
        let gateway = Arc::new(QueueGateway::replies(&["I'd rather chat about the weather."]));
        let agent = PlannerAgent::new(ModelInvoker::new(gateway));

        let output = agent.plan("Why?").await.unwrap();
        assert!(output.used_fallback());
        assert_eq!(output.value, Plan::fallback("Why?"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invoker_failure_propagates() {
        let gateway = Arc::new(QueueGateway::new(vec![
            Err(GatewayError::Connection("down".to_string())),
            Err(GatewayError::Connection("down".to_string())),
            Err(GatewayError::Connection("down".to_string())),
        ]));
        let agent = PlannerAgent::new(ModelInvoker::new(gateway));
        assert!(matches!(
            agent.plan("Why?").await,
            Err(InvokeError::Exhausted { attempts: 3, .. })
        ));
    }
}
