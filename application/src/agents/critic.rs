use super::{AgentOutput, CRITIC_SETTINGS, resolve};
use crate::invoker::{InvokeError, ModelInvoker};
use crate::ports::llm_gateway::LlmGateway;
use deepthink_domain::prompt::schema::critique_schema;
use deepthink_domain::{Candidate, Critique, PromptTemplate, Stage};
use tracing::debug;

/// Scores and ranks every candidate
pub struct CriticAgent<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
}

impl<G: LlmGateway + 'static> CriticAgent<G> {
    pub fn new(invoker: ModelInvoker<G>) -> Self {
        Self { invoker }
    }

    /// The returned critique always holds exactly one evaluation per candidate.
    pub async fn critique(
        &self,
        query: &str,
        candidates: &[Candidate],
    ) -> Result<AgentOutput<Critique>, InvokeError> {
        let prompt = PromptTemplate::critic(query, candidates);
        let raw = self
            .invoker
            .invoke(
                &prompt,
                CRITIC_SETTINGS.temperature,
                CRITIC_SETTINGS.max_output_tokens,
                Some(critique_schema()),
            )
            .await?;

        let output = resolve(
            Stage::Critique,
            "critic",
            &raw,
            |value| Critique::from_json(value, candidates),
            || Critique::fallback(candidates),
        );

        if let Some(top) = output.value.ranking.first() {
            debug!(
                top_agent = top.agent_id,
                top_score = top.weighted_total_score,
                "Candidates ranked"
            );
        }
        Ok(output)
    }
}
