//! Candidate: one thinking path's answer.

use crate::normalize::coerce::{confidence_from_value, string_list_or, text_or};
use crate::reasoning::level::Confidence;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_THOUGHTS: &[&str] = &["Analyzing the problem..."];
const DEFAULT_ANSWER: &str = "Unable to generate answer";
const UNPARSED_ANSWER: &str = "Unable to parse response";
const MIN_EXTRACTED_ANSWER_CHARS: usize = 10;
const MAX_FALLBACK_THOUGHTS: usize = 5;

/// Answer patterns tried in order against raw text that couldn't be parsed.
const ANSWER_PATTERNS: &[&str] = &[
    r#"(?i)"answer"\s*:\s*"([^"]*)""#,
    r#"(?i)"answer"\s*:\s*"((?:[^"\\]|\\.)*)"#,
    r#"(?im)\banswer\b[^:\n]*:\s*(.+)$"#,
];

/// Output of one thinking path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub agent_id: u32,
    pub approach: String,
    pub thoughts: Vec<String>,
    pub answer: String,
    pub confidence: Confidence,
    pub reasoning_quality: String,
    pub potential_issues: Vec<String>,
}

impl Candidate {
    /// Validate and enhance a normalized thinker response.
    ///
    /// `agent_id` is always the seed, whatever the model claims.
    pub fn from_json(value: &Value, seed: u32, max_thoughts: usize) -> Self {
        let mut thoughts = string_list_or(value.get("thoughts"), DEFAULT_THOUGHTS);
        thoughts.truncate(max_thoughts);

        Self {
            agent_id: seed,
            approach: text_or(value.get("approach"), &format!("Thinker {} approach", seed)),
            thoughts,
            answer: text_or(value.get("answer"), DEFAULT_ANSWER),
            confidence: confidence_from_value(value.get("confidence")),
            reasoning_quality: text_or(
                value.get("reasoning_quality"),
                "Standard reasoning process",
            ),
            potential_issues: string_list_or(value.get("potential_issues"), &[]),
        }
    }

    /// Best-effort candidate built from raw text that couldn't be normalized.
    pub fn fallback_from_raw(seed: u32, raw: &str, max_thoughts: usize) -> Self {
        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('{') && !line.starts_with('"'))
            .collect();

        let mut thoughts: Vec<String> = lines
            .iter()
            .take(MAX_FALLBACK_THOUGHTS)
            .map(|s| s.to_string())
            .collect();
        if thoughts.is_empty() {
            thoughts = DEFAULT_THOUGHTS.iter().map(|s| s.to_string()).collect();
        }
        thoughts.truncate(max_thoughts);

        let answer = extract_answer(raw)
            .or_else(|| lines.last().map(|s| s.to_string()))
            .unwrap_or_else(|| UNPARSED_ANSWER.to_string());

        Self {
            agent_id: seed,
            approach: format!("Fallback approach for Thinker {}", seed),
            thoughts,
            answer,
            confidence: Confidence::Low,
            reasoning_quality: "Fallback parsing - may be incomplete".to_string(),
            potential_issues: vec![
                "JSON parsing failed".to_string(),
                "May contain formatting issues".to_string(),
            ],
        }
    }

    /// First thought, or the approach when there are none
    pub fn summary_line(&self) -> &str {
        self.thoughts.first().unwrap_or(&self.approach)
    }
}

/// Pull an answer-like field out of unstructured text.
fn extract_answer(raw: &str) -> Option<String> {
    for pattern in ANSWER_PATTERNS {
        let Ok(re) = Regex::new(pattern) else {
            continue;
        };
        let Some(captured) = re.captures(raw).and_then(|caps| caps.get(1)) else {
            continue;
        };

        let candidate = unescape(captured.as_str());
        let candidate = candidate.trim().trim_end_matches([',', '"']).trim();
        if candidate.chars().count() > MIN_EXTRACTED_ANSWER_CHARS {
            return Some(candidate.to_string());
        }
    }
    None
}

/// Decode JSON string escapes when the captured text is a valid JSON string body
fn unescape(text: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", text)).unwrap_or_else(|_| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_agent_id_is_seed() {
        let value = json!({"agent_id": 99, "answer": "4"});
        let candidate = Candidate::from_json(&value, 2, 12);
        assert_eq!(candidate.agent_id, 2);
        assert_eq!(candidate.answer, "4");
    }

    #[test]
    fn test_defaults() {
        let candidate = Candidate::from_json(&json!({}), 3, 12);
        assert_eq!(candidate.approach, "Thinker 3 approach");
        assert_eq!(candidate.thoughts, vec!["Analyzing the problem..."]);
        assert_eq!(candidate.answer, "Unable to generate answer");
        assert_eq!(candidate.confidence, Confidence::Medium);
        assert_eq!(candidate.reasoning_quality, "Standard reasoning process");
        assert!(candidate.potential_issues.is_empty());
    }

    #[test]
    fn test_thoughts_truncated_to_budget() {
        let thoughts: Vec<String> = (0..20).map(|i| format!("t{i}")).collect();
        let candidate = Candidate::from_json(&json!({"thoughts": thoughts}), 0, 7);
        assert_eq!(candidate.thoughts.len(), 7);
        assert_eq!(candidate.thoughts[6], "t6");
    }

    #[test]
    fn test_numeric_confidence() {
        let candidate = Candidate::from_json(&json!({"confidence": 0.85}), 0, 12);
        assert_eq!(candidate.confidence, Confidence::High);
    }

    #[test]
    fn test_fallback_extracts_quoted_answer() {
        let raw = "I thought about it.\n\"answer\": \"The capital of France is Paris\", broken";
        let candidate = Candidate::fallback_from_raw(1, raw, 12);
        assert_eq!(candidate.answer, "The capital of France is Paris");
        assert_eq!(candidate.confidence, Confidence::Low);
        assert_eq!(candidate.approach, "Fallback approach for Thinker 1");
        assert_eq!(candidate.thoughts, vec!["I thought about it."]);
        assert_eq!(
            candidate.potential_issues,
            vec!["JSON parsing failed", "May contain formatting issues"]
        );
    }

    #[test]
    fn test_fallback_extracts_escaped_answer() {
        let raw = r#"{"answer": "He said \"yes\" to the proposal and left"#;
        let candidate = Candidate::fallback_from_raw(0, raw, 12);
        assert_eq!(candidate.answer, "He said \"yes\" to the proposal and left");
    }

    #[test]
    fn test_fallback_extracts_answer_line() {
        let raw = "Step one\nStep two\nFinal Answer: roughly forty-two units\nThanks";
        let candidate = Candidate::fallback_from_raw(0, raw, 12);
        assert_eq!(candidate.answer, "roughly forty-two units");
    }

    #[test]
    fn test_fallback_uses_last_line() {
        let raw = "first idea\nsecond idea\nconclusion: short";
        let candidate = Candidate::fallback_from_raw(0, raw, 12);
        // No answer-like field anywhere
        assert_eq!(candidate.answer, "conclusion: short");
        assert_eq!(candidate.thoughts.len(), 3);
    }

    #[test]
    fn test_fallback_placeholder() {
        let candidate = Candidate::fallback_from_raw(0, "{\n\"\n", 12);
        assert_eq!(candidate.answer, "Unable to parse response");
        assert_eq!(candidate.thoughts, vec!["Analyzing the problem..."]);
    }
}
