use crate::ports::search::SearchProvider;
use deepthink_domain::{Plan, ResearchFindings, ResearchStep, StepFindings};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Result of running every research step
#[derive(Debug, Clone, Default)]
pub struct ResearchOutcome {
    pub findings: ResearchFindings,
    /// Ids of steps whose search failed
    pub failed_steps: Vec<String>,
}

/// Runs the plan's research steps against the search provider
pub struct ResearchAgent<S: SearchProvider + ?Sized> {
    provider: Arc<S>,
}

impl<S: SearchProvider + ?Sized> ResearchAgent<S> {
    pub fn new(provider: Arc<S>) -> Self {
        Self { provider }
    }

    /// Run all steps concurrently.
    ///
    /// A failing step contributes an empty result list; it never fails the
    /// other steps.
    pub async fn research(&self, plan: &Plan) -> ResearchOutcome {
        let outcomes = join_all(plan.research_steps.iter().map(|step| self.run_step(step))).await;

        let mut findings = ResearchFindings::default();
        let mut failed_steps = Vec::new();
        for (step_findings, ok) in outcomes {
            if !ok {
                failed_steps.push(step_findings.step_id.clone());
            }
            findings.steps.push(step_findings);
        }

        debug!(
            provider = self.provider.name(),
            steps = findings.steps.len(),
            results = findings.total_results(),
            failed = failed_steps.len(),
            "Research finished"
        );

        ResearchOutcome {
            findings,
            failed_steps,
        }
    }

    async fn run_step(&self, step: &ResearchStep) -> (StepFindings, bool) {
        let (results, ok) = match self.provider.search(&step.query).await {
            Ok(results) => (results, true),
            Err(e) => {
                warn!(
                    step = %step.id,
                    query = %step.query,
                    error = %e,
                    "Research step failed, continuing without its results"
                );
                (Vec::new(), false)
            }
        };

        (
            StepFindings {
                step_id: step.id.clone(),
                query: step.query.clone(),
                purpose: step.purpose.clone(),
                results,
            },
            ok,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::search::SearchError;
    use async_trait::async_trait;
    use deepthink_domain::SearchResult;
    use serde_json::json;
    use std::sync::Mutex;

    struct MockSearch {
        failing_query: &'static str,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for MockSearch {
        async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
            self.queries.lock().unwrap().push(query.to_string());
            if query == self.failing_query {
                return Err(SearchError::Request("boom".to_string()));
            }
            Ok(vec![SearchResult {
                title: format!("About {query}"),
                content: "content".to_string(),
                url: "https://example.com".to_string(),
                score: 0.8,
            }])
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    #[tokio::test]
    async fn test_failed_step_is_empty_not_fatal() {
        let plan = Plan::from_json(
            &json!({
                "research_needed": true,
                "research_steps": [
                    {"id": "a", "query": "first"},
                    {"id": "b", "query": "broken"},
                    {"id": "c", "query": "third"}
                ]
            }),
            "q",
        );
        let search = Arc::new(MockSearch {
            failing_query: "broken",
            queries: Mutex::new(Vec::new()),
        });
        let agent = ResearchAgent::new(Arc::clone(&search));

        let outcome = agent.research(&plan).await;

        assert_eq!(search.queries.lock().unwrap().len(), 3);
        assert_eq!(outcome.failed_steps, vec!["b"]);
        let ids: Vec<&str> = outcome
            .findings
            .steps
            .iter()
            .map(|s| s.step_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(outcome.findings.steps[1].results.is_empty());
        assert_eq!(outcome.findings.total_results(), 2);
    }

    #[tokio::test]
    async fn test_works_through_trait_object() {
        let plan = Plan::from_json(
            &json!({"research_needed": true, "research_steps": [{"query": "x"}]}),
            "q",
        );
        let search: Arc<dyn SearchProvider> = Arc::new(MockSearch {
            failing_query: "",
            queries: Mutex::new(Vec::new()),
        });
        let outcome = ResearchAgent::new(search).research(&plan).await;
        assert!(outcome.failed_steps.is_empty());
        assert_eq!(outcome.findings.steps[0].results[0].title, "About x");
    }
}
