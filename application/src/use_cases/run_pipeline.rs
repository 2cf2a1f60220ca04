//! Run Pipeline use case
//!
//! Orchestrates the full reasoning flow:
//! `Plan → [Research] → Think×N → Critique → Refine → Meta-Refine`.
//!
//! # Failure policy
//!
//! | Stage | On failure |
//! |-------|------------|
//! | Planning | fatal |
//! | Research | continue without research context |
//! | Thinking | continue with the successful paths; fatal only if all fail |
//! | Critique | fatal |
//! | Refinement | fatal |
//! | Meta-Refinement | fall back to the refined answer |
//!
//! The whole run is bounded by the request's deadline. Hitting it drops
//! every in-flight call, including all thinking tasks.

use crate::agents::{
    AgentOutput, CriticAgent, MetaRefinerAgent, PlannerAgent, RefinerAgent, ResearchAgent,
    ThinkerAgent,
};
use crate::config::PipelineParams;
use crate::invoker::{InvokeError, ModelInvoker};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::search::SearchProvider;
use chrono::Utc;
use deepthink_domain::pipeline::result::round_seconds;
use deepthink_domain::{
    Candidate, DetailedResults, DomainError, PipelineMetadata, PipelineResult, Plan,
    ResearchFindings, Stage, ThinkRequest, select_top_candidates,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a pipeline run
#[derive(Error, Debug)]
pub enum RunPipelineError {
    #[error("Invalid request: {0}")]
    Validation(#[from] DomainError),

    #[error("Planning failed: {0}")]
    PlanningFailed(#[source] InvokeError),

    #[error("All {attempted} thinking paths failed")]
    AllPathsFailed { attempted: usize },

    #[error("Critique failed: {0}")]
    CritiqueFailed(#[source] InvokeError),

    #[error("Refinement failed: {0}")]
    RefinementFailed(#[source] InvokeError),

    #[error("Pipeline timed out after {timeout_secs}s")]
    PipelineTimeout { timeout_secs: u64 },

    #[error("Pipeline cancelled")]
    Cancelled,
}

impl RunPipelineError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, RunPipelineError::PipelineTimeout { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunPipelineError::Cancelled)
    }
}

/// Input for the RunPipeline use case
#[derive(Debug, Clone)]
pub struct RunPipelineInput {
    pub request: ThinkRequest,
    /// Attach every intermediate record to the result
    pub include_details: bool,
}

impl RunPipelineInput {
    pub fn new(request: ThinkRequest) -> Self {
        Self {
            request,
            include_details: false,
        }
    }

    /// Validate raw caller input
    pub fn try_new(
        query: impl Into<String>,
        n_paths: usize,
        top_k: usize,
        timeout: Duration,
    ) -> Result<Self, RunPipelineError> {
        Ok(Self::new(ThinkRequest::new(query, n_paths, top_k, timeout)?))
    }

    pub fn with_details(mut self, include: bool) -> Self {
        self.include_details = include;
        self
    }
}

/// Stages completed so far and fallback count
#[derive(Debug, Default)]
struct RunTrace {
    stages: Vec<Stage>,
    fallbacks: usize,
}

impl RunTrace {
    fn take<T>(&mut self, output: AgentOutput<T>) -> T {
        if output.used_fallback() {
            self.fallbacks += 1;
        }
        output.value
    }
}

/// Use case for running the reasoning pipeline
pub struct RunPipelineUseCase<G: LlmGateway + 'static, S: SearchProvider + ?Sized + 'static> {
    invoker: ModelInvoker<G>,
    search: Arc<S>,
    cancellation: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static, S: SearchProvider + ?Sized + 'static> RunPipelineUseCase<G, S> {
    pub fn new(gateway: Arc<G>, search: Arc<S>) -> Self {
        Self::with_params(gateway, search, &PipelineParams::default())
    }

    pub fn with_params(gateway: Arc<G>, search: Arc<S>, params: &PipelineParams) -> Self {
        let invoker = ModelInvoker::new(gateway)
            .with_retry_policy(params.retry)
            .with_call_timeout(params.call_timeout);
        Self {
            invoker,
            search,
            cancellation: None,
        }
    }

    /// Abort the run when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunPipelineInput,
    ) -> Result<PipelineResult, RunPipelineError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunPipelineInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<PipelineResult, RunPipelineError> {
        let request = &input.request;
        let deadline = request.timeout();

        if request.top_k_adjusted() {
            warn!(
                requested = request.requested_top_k(),
                n_paths = request.n_paths(),
                "top_k exceeds n_paths, lowering to n_paths"
            );
        }

        info!(
            n_paths = request.n_paths(),
            top_k = request.top_k(),
            timeout_secs = deadline.as_secs(),
            "Starting pipeline"
        );

        let started = Instant::now();
        let run = tokio::time::timeout(deadline, self.run_stages(&input, progress));

        let outcome = match &self.cancellation {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(RunPipelineError::Cancelled);
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        warn!("Pipeline cancelled, dropping in-flight calls");
                        return Err(RunPipelineError::Cancelled);
                    }
                    outcome = run => outcome,
                }
            }
            None => run.await,
        };

        let mut result = match outcome {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    timeout_secs = deadline.as_secs(),
                    "Pipeline deadline exceeded, dropping in-flight calls"
                );
                return Err(RunPipelineError::PipelineTimeout {
                    timeout_secs: deadline.as_secs(),
                });
            }
        };

        result.metadata.execution_time_seconds = round_seconds(started.elapsed());
        info!(
            execution_time_seconds = result.metadata.execution_time_seconds,
            candidates = result.metadata.candidates_generated,
            meta_refinement_applied = result.metadata.meta_refinement_applied,
            "Pipeline complete"
        );
        Ok(result)
    }

    async fn run_stages(
        &self,
        input: &RunPipelineInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<PipelineResult, RunPipelineError> {
        let request = &input.request;
        let query = request.query().content();
        let mut trace = RunTrace::default();

        // Stage 1: Planning
        let plan = Arc::new(self.stage_planning(query, &mut trace, progress).await?);

        // Stage 2: Research (optional)
        let research = if plan.needs_research() {
            Some(self.stage_research(&plan, &mut trace, progress).await)
        } else {
            debug!("Skipping research stage");
            None
        };
        let research_context: Option<Arc<str>> = research
            .as_ref()
            .filter(|findings| !findings.is_empty())
            .map(|findings| Arc::from(findings.summary()));

        // Stage 3: Parallel Thinking
        let candidates = self
            .stage_thinking(
                Arc::clone(&plan),
                research_context,
                request.n_paths(),
                &mut trace,
                progress,
            )
            .await?;

        // Stage 4: Critique
        info!("Stage 4: Critique");
        progress.on_stage_start(&Stage::Critique, 1);
        let critique = match CriticAgent::new(self.invoker.clone())
            .critique(query, &candidates)
            .await
        {
            Ok(output) => {
                progress.on_task_complete(&Stage::Critique, "critic", true);
                trace.take(output)
            }
            Err(e) => {
                progress.on_task_complete(&Stage::Critique, "critic", false);
                return Err(RunPipelineError::CritiqueFailed(e));
            }
        };
        progress.on_stage_complete(&Stage::Critique);
        trace.stages.push(Stage::Critique);

        // Stage 5: Refinement
        info!("Stage 5: Refinement");
        let top = select_top_candidates(&critique, &candidates, request.top_k());
        progress.on_stage_start(&Stage::Refinement, 1);
        let refinement = match RefinerAgent::new(self.invoker.clone())
            .refine(query, &top, &critique)
            .await
        {
            Ok(output) => {
                progress.on_task_complete(&Stage::Refinement, "refiner", true);
                trace.take(output)
            }
            Err(e) => {
                progress.on_task_complete(&Stage::Refinement, "refiner", false);
                return Err(RunPipelineError::RefinementFailed(e));
            }
        };
        progress.on_stage_complete(&Stage::Refinement);
        trace.stages.push(Stage::Refinement);

        // Stage 6: Meta-Refinement (non-fatal)
        info!("Stage 6: Meta-Refinement");
        progress.on_stage_start(&Stage::MetaRefinement, 1);
        let meta_refinement = match MetaRefinerAgent::new(self.invoker.clone())
            .meta_refine(query, &refinement.final_answer)
            .await
        {
            Ok(output) => {
                progress.on_task_complete(&Stage::MetaRefinement, "meta-refiner", true);
                trace.stages.push(Stage::MetaRefinement);
                Some(trace.take(output))
            }
            Err(e) => {
                warn!(error = %e, "Meta-refinement failed, using refined answer");
                progress.on_task_complete(&Stage::MetaRefinement, "meta-refiner", false);
                None
            }
        };
        progress.on_stage_complete(&Stage::MetaRefinement);

        let answer = meta_refinement
            .as_ref()
            .map(|meta| meta.meta_refined_answer.clone())
            .unwrap_or_else(|| refinement.final_answer.clone());

        let metadata = PipelineMetadata {
            n_paths: request.n_paths(),
            candidates_generated: candidates.len(),
            candidates_failed: request.n_paths() - candidates.len(),
            top_k_used: top.len(),
            synthesis_approach: refinement.synthesis_approach.clone(),
            confidence_level: refinement.confidence_level,
            execution_time_seconds: 0.0,
            pipeline_stages: trace.stages,
            meta_refinement_applied: meta_refinement.is_some(),
            research_performed: research.is_some(),
            normalization_fallbacks: trace.fallbacks,
        };

        let detailed_results = input.include_details.then(|| DetailedResults {
            plan: Plan::clone(&plan),
            research,
            candidates,
            critique,
            refinement,
            meta_refinement,
        });

        Ok(PipelineResult {
            query: query.to_string(),
            answer,
            metadata,
            detailed_results,
            timestamp: Utc::now(),
        })
    }

    /// Stage 1: build the plan
    async fn stage_planning(
        &self,
        query: &str,
        trace: &mut RunTrace,
        progress: &dyn ProgressNotifier,
    ) -> Result<Plan, RunPipelineError> {
        info!("Stage 1: Planning");
        progress.on_stage_start(&Stage::Planning, 1);

        let plan = match PlannerAgent::new(self.invoker.clone()).plan(query).await {
            Ok(output) => {
                progress.on_task_complete(&Stage::Planning, "planner", true);
                trace.take(output)
            }
            Err(e) => {
                progress.on_task_complete(&Stage::Planning, "planner", false);
                return Err(RunPipelineError::PlanningFailed(e));
            }
        };

        progress.on_stage_complete(&Stage::Planning);
        trace.stages.push(Stage::Planning);
        Ok(plan)
    }

    /// Stage 2: run the plan's research steps. Never fails.
    async fn stage_research(
        &self,
        plan: &Plan,
        trace: &mut RunTrace,
        progress: &dyn ProgressNotifier,
    ) -> ResearchFindings {
        info!(steps = plan.research_steps.len(), "Stage 2: Research");
        progress.on_stage_start(&Stage::Research, plan.research_steps.len());

        let outcome = ResearchAgent::new(Arc::clone(&self.search))
            .research(plan)
            .await;

        for step in &outcome.findings.steps {
            let ok = !outcome.failed_steps.contains(&step.step_id);
            progress.on_task_complete(&Stage::Research, &step.step_id, ok);
        }

        progress.on_stage_complete(&Stage::Research);
        trace.stages.push(Stage::Research);
        outcome.findings
    }

    /// Stage 3: fan out N seeded thinkers and collect them in seed order
    async fn stage_thinking(
        &self,
        plan: Arc<Plan>,
        research_context: Option<Arc<str>>,
        n_paths: usize,
        trace: &mut RunTrace,
        progress: &dyn ProgressNotifier,
    ) -> Result<Vec<Candidate>, RunPipelineError> {
        info!(n_paths, "Stage 3: Parallel Thinking");
        progress.on_stage_start(&Stage::Thinking, n_paths);

        let mut join_set = JoinSet::new();

        for seed in 0..n_paths as u32 {
            let agent = ThinkerAgent::new(self.invoker.clone(), seed);
            let plan = Arc::clone(&plan);
            let context = research_context.clone();

            join_set.spawn(async move {
                let result = agent.think(&plan, context.as_deref()).await;
                (seed, result)
            });
        }

        let mut slots: Vec<Option<Candidate>> = vec![None; n_paths];

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((seed, Ok(output))) => {
                    debug!(seed, recovery = %output.recovery, "Thinking path completed");
                    progress.on_task_complete(&Stage::Thinking, &format!("thinker-{seed}"), true);
                    slots[seed as usize] = Some(trace.take(output));
                }
                Ok((seed, Err(e))) => {
                    warn!(seed, error = %e, "Thinking path failed");
                    progress.on_task_complete(&Stage::Thinking, &format!("thinker-{seed}"), false);
                }
                Err(e) => {
                    warn!(error = %e, "Thinking task join error");
                    progress.on_task_complete(&Stage::Thinking, "thinker", false);
                }
            }
        }

        progress.on_stage_complete(&Stage::Thinking);

        let candidates: Vec<Candidate> = slots.into_iter().flatten().collect();
        if candidates.is_empty() {
            return Err(RunPipelineError::AllPathsFailed { attempted: n_paths });
        }

        info!(
            succeeded = candidates.len(),
            failed = n_paths - candidates.len(),
            "Thinking complete"
        );
        trace.stages.push(Stage::Thinking);
        Ok(candidates)
    }
}
