//! Application layer for deep-think
//!
//! This crate contains the pipeline use case, the stage agents, the model
//! invoker and port definitions. It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod invoker;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use agents::AgentOutput;
pub use config::PipelineParams;
pub use invoker::{InvokeError, ModelInvoker, RetryPolicy};
pub use ports::{
    llm_gateway::{GatewayError, GenerationRequest, LlmGateway},
    progress::{NoProgress, ProgressNotifier},
    search::{SearchError, SearchProvider},
};
pub use use_cases::run_pipeline::{RunPipelineError, RunPipelineInput, RunPipelineUseCase};
