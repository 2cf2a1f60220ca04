//! Output formatter trait

use deepthink_domain::PipelineResult;

/// Trait for formatting pipeline results
pub trait OutputFormatter {
    /// Format the complete result
    fn format(&self, result: &PipelineResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &PipelineResult) -> String;

    /// Format the answer only (concise output)
    fn format_answer_only(&self, result: &PipelineResult) -> String;
}
