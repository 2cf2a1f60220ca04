//! Console output formatter for pipeline results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use deepthink_domain::core::string::preview;
use deepthink_domain::{DetailedResults, MAX_WEIGHTED_TOTAL, PipelineMetadata, PipelineResult};

const PREVIEW_CHARS: usize = 160;

/// Formats pipeline results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result
    pub fn format(result: &PipelineResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Deep Think Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Query:".cyan().bold(), result.query));

        output.push_str(&Self::section_header("Answer"));
        output.push_str(&format!("\n{}\n", result.answer));

        output.push_str(&Self::section_header("Run"));
        output.push_str(&Self::metadata(&result.metadata));

        if let Some(details) = &result.detailed_results {
            output.push_str(&Self::details(details));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(result: &PipelineResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the answer only (concise output)
    pub fn format_answer_only(result: &PipelineResult) -> String {
        format!("{}\n", result.answer)
    }

    fn metadata(metadata: &PipelineMetadata) -> String {
        let stages = metadata
            .pipeline_stages
            .iter()
            .map(|s| s.display_name())
            .collect::<Vec<_>>()
            .join(" -> ");

        let mut lines = vec![
            format!(
                "{} {}/{} succeeded",
                "Paths:".bold(),
                metadata.candidates_generated,
                metadata.n_paths
            ),
            format!("{} {}", "Top-k used:".bold(), metadata.top_k_used),
            format!("{} {}", "Stages:".bold(), stages),
            format!(
                "{} {}",
                "Confidence:".bold(),
                metadata.confidence_level.as_str()
            ),
            format!("{} {}", "Synthesis:".bold(), metadata.synthesis_approach),
            format!(
                "{} {:.2}s",
                "Time:".bold(),
                metadata.execution_time_seconds
            ),
        ];

        if metadata.candidates_failed > 0 {
            lines.push(format!(
                "{} {} thinking path(s) failed",
                "Warning:".yellow().bold(),
                metadata.candidates_failed
            ));
        }
        if !metadata.meta_refinement_applied {
            lines.push(format!(
                "{} meta-refinement unavailable, showing the refined answer",
                "Note:".yellow().bold()
            ));
        }
        if metadata.normalization_fallbacks > 0 {
            lines.push(format!(
                "{} {} stage output(s) replaced by defaults",
                "Note:".yellow().bold(),
                metadata.normalization_fallbacks
            ));
        }

        format!("\n{}\n", lines.join("\n"))
    }

    fn details(details: &DetailedResults) -> String {
        let mut output = String::new();

        let plan = &details.plan;
        output.push_str(&Self::section_header("Plan"));
        output.push_str(&format!(
            "\n{} {}\n{} {} ({}, budget {})\n",
            "Task:".bold(),
            plan.task,
            "Reasoning:".bold(),
            plan.reasoning_type,
            plan.complexity_level.as_str(),
            plan.thinking_budget
        ));
        for aspect in &plan.key_aspects {
            output.push_str(&format!("  * {}\n", aspect));
        }

        if let Some(research) = &details.research {
            output.push_str(&Self::section_header("Research"));
            output.push('\n');
            for step in &research.steps {
                output.push_str(&format!(
                    "  {} {} ({} results)\n",
                    "*".cyan(),
                    step.query,
                    step.results.len()
                ));
            }
        }

        output.push_str(&Self::section_header("Candidates"));
        for candidate in &details.candidates {
            output.push_str(&format!(
                "\n{}\n{} {}\n{} {}\n",
                format!(
                    "── Thinker {} ({} confidence) ──",
                    candidate.agent_id,
                    candidate.confidence.as_str()
                )
                .yellow()
                .bold(),
                "Approach:".bold(),
                candidate.approach,
                "Answer:".bold(),
                preview(&candidate.answer, PREVIEW_CHARS)
            ));
        }

        output.push_str(&Self::section_header("Ranking"));
        output.push('\n');
        for entry in &details.critique.ranking {
            output.push_str(&format!(
                "  #{} thinker {} {:.2}/{:.1}  {}\n",
                entry.rank,
                entry.agent_id,
                entry.weighted_total_score,
                MAX_WEIGHTED_TOTAL,
                entry.rationale.dimmed()
            ));
        }

        let refinement = &details.refinement;
        output.push_str(&Self::section_header("Refinement"));
        output.push_str(&format!(
            "\n{} {}\n",
            "Approach:".bold(),
            refinement.synthesis_approach
        ));
        for source in &refinement.sources_used {
            output.push_str(&format!(
                "  * thinker {} ({} weight)\n",
                source.agent_id,
                source.contribution_weight.as_str()
            ));
        }

        if let Some(meta) = &details.meta_refinement {
            output.push_str(&Self::section_header("Meta-Refinement"));
            output.push_str(&format!(
                "\n{} {}, elegance {}/10, {} depth\n",
                "Synthesis:".bold(),
                meta.synthesis_type.as_str(),
                meta.elegance_score,
                meta.intellectual_depth.as_str()
            ));
            for insight in &meta.key_insights_added {
                output.push_str(&format!("  * {}\n", insight));
            }
        }

        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &PipelineResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &PipelineResult) -> String {
        Self::format_json(result)
    }

    fn format_answer_only(&self, result: &PipelineResult) -> String {
        Self::format_answer_only(result)
    }
}
