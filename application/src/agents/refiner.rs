use super::{AgentOutput, REFINER_SETTINGS, resolve};
use crate::invoker::{InvokeError, ModelInvoker};
use crate::ports::llm_gateway::LlmGateway;
use deepthink_domain::prompt::schema::refine_schema;
use deepthink_domain::{Critique, PromptTemplate, RefinementResult, Stage, TopCandidate};

/// Synthesizes the top-ranked candidates into one answer
pub struct RefinerAgent<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
}

impl<G: LlmGateway + 'static> RefinerAgent<G> {
    pub fn new(invoker: ModelInvoker<G>) -> Self {
        Self { invoker }
    }

    pub async fn refine(
        &self,
        query: &str,
        top: &[TopCandidate],
        critique: &Critique,
    ) -> Result<AgentOutput<RefinementResult>, InvokeError> {
        let prompt = PromptTemplate::refiner(query, top, critique);
        let raw = self
            .invoker
            .invoke(
                &prompt,
                REFINER_SETTINGS.temperature,
                REFINER_SETTINGS.max_output_tokens,
                Some(refine_schema()),
            )
            .await?;

        Ok(resolve(
            Stage::Refinement,
            "refiner",
            &raw,
            |value| RefinementResult::from_json(value, top),
            || RefinementResult::fallback(top),
        ))
    }
}
