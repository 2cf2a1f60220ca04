//! Search provider adapters
//!
//! | Provider | When |
//! |----------|------|
//! | [`TavilySearch`] | a Tavily API key resolves |
//! | [`SimulatedSearch`] | otherwise; no network access |

mod simulated;
mod tavily;

pub use simulated::SimulatedSearch;
pub use tavily::TavilySearch;

use crate::config::FileSearchConfig;
use deepthink_application::ports::search::SearchProvider;
use std::sync::Arc;
use tracing::{info, warn};

/// Pick the search provider for the research stage
pub fn search_provider_from_config(config: &FileSearchConfig) -> Arc<dyn SearchProvider> {
    let Some(api_key) = config.resolve_api_key() else {
        warn!(
            env = %config.api_key_env,
            "No search API key found, using simulated search"
        );
        return Arc::new(SimulatedSearch::new());
    };

    match TavilySearch::from_config(config, api_key) {
        Ok(provider) => {
            info!(max_results = config.max_results, "Using Tavily search");
            Arc::new(provider)
        }
        Err(e) => {
            warn!(error = %e, "Could not build Tavily client, using simulated search");
            Arc::new(SimulatedSearch::new())
        }
    }
}
