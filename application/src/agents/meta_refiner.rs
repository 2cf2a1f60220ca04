use super::{AgentOutput, META_REFINER_SETTINGS, resolve};
use crate::invoker::{InvokeError, ModelInvoker};
use crate::ports::llm_gateway::LlmGateway;
use deepthink_domain::prompt::schema::meta_schema;
use deepthink_domain::{MetaRefinementResult, PromptTemplate, Stage};

/// Second-order pass over the refined answer
pub struct MetaRefinerAgent<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
}

impl<G: LlmGateway + 'static> MetaRefinerAgent<G> {
    pub fn new(invoker: ModelInvoker<G>) -> Self {
        Self { invoker }
    }

    pub async fn meta_refine(
        &self,
        query: &str,
        refined_answer: &str,
    ) -> Result<AgentOutput<MetaRefinementResult>, InvokeError> {
        let prompt = PromptTemplate::meta_refiner(query, refined_answer);
        let raw = self
            .invoker
            .invoke(
                &prompt,
                META_REFINER_SETTINGS.temperature,
                META_REFINER_SETTINGS.max_output_tokens,
                Some(meta_schema()),
            )
            .await?;

        Ok(resolve(
            Stage::MetaRefinement,
            "meta-refiner",
            &raw,
            |value| MetaRefinementResult::from_json(value, refined_answer),
            || MetaRefinementResult::fallback(refined_answer),
        ))
    }
}
