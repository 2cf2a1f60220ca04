//! Response normalization for untrusted model output.
//!
//! Model responses are requested as JSON objects, but providers routinely
//! wrap them in prose, cut them off mid-string when the token budget runs
//! out, or emit a second object after the first. [`normalize`] turns any
//! such text into a JSON object, or hands back the caller's fallback record.
//!
//! # Strategies
//!
//! | Order | Strategy | Recovers |
//! |-------|----------|----------|
//! | 1 | Direct parse | Well-formed output |
//! | 2 | Balanced prefix | Trailing junk after a complete object |
//! | 3 | String closing | Output truncated inside a string or structure |
//! | 4 | Embedded block | Object wrapped in prose or code fences |
//! | 5 | Fallback | Anything else |
//!
//! Only objects count as success. A parse that yields a scalar or an array
//! falls through to the next strategy.

pub mod coerce;

use serde::Serialize;
use serde_json::Value;

/// How many completed strings the truncation variant walks back over
/// before giving up.
const MAX_TRUNCATION_ATTEMPTS: usize = 16;

/// Which strategy produced a normalized value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Recovery {
    Direct,
    BalancedPrefix,
    ClosedString,
    EmbeddedBlock,
    Fallback,
}

impl Recovery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recovery::Direct => "direct",
            Recovery::BalancedPrefix => "balanced_prefix",
            Recovery::ClosedString => "closed_string",
            Recovery::EmbeddedBlock => "embedded_block",
            Recovery::Fallback => "fallback",
        }
    }

    /// Whether the caller's fallback record was substituted
    pub fn is_fallback(&self) -> bool {
        matches!(self, Recovery::Fallback)
    }
}

impl std::fmt::Display for Recovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of [`normalize`]: always an object, plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub value: Value,
    pub recovery: Recovery,
}

/// Turn raw model text into a JSON object.
///
/// Never fails: when every recovery strategy is exhausted the `fallback`
/// value is returned unchanged with [`Recovery::Fallback`].
pub fn normalize(raw: &str, fallback: Value) -> Normalized {
    if let Some(value) = parse_object(raw.trim()) {
        return Normalized {
            value,
            recovery: Recovery::Direct,
        };
    }

    if let Some(start) = raw.find('{') {
        let body = &raw[start..];

        if let Some(value) = balanced_prefix(body) {
            return Normalized {
                value,
                recovery: Recovery::BalancedPrefix,
            };
        }

        if let Some(value) = close_strings(body) {
            return Normalized {
                value,
                recovery: Recovery::ClosedString,
            };
        }
    }

    if let Some(value) = embedded_block(raw) {
        return Normalized {
            value,
            recovery: Recovery::EmbeddedBlock,
        };
    }

    Normalized {
        value: fallback,
        recovery: Recovery::Fallback,
    }
}

fn parse_object(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(Value::is_object)
}

/// String-aware structural scanner.
///
/// Tracks which `{` / `[` are still open and whether the cursor sits inside
/// a quoted string, so braces inside string values are never counted.
#[derive(Debug, Default)]
struct Scanner {
    open: Vec<char>,
    in_string: bool,
    escaped: bool,
    offset: usize,
    /// Byte offsets just past each closing quote, in order
    string_ends: Vec<usize>,
}

impl Scanner {
    fn scan(text: &str) -> Self {
        let mut scanner = Self::default();
        scanner.feed(text);
        scanner
    }

    fn feed(&mut self, chunk: &str) {
        for (idx, c) in chunk.char_indices() {
            if self.in_string {
                if self.escaped {
                    self.escaped = false;
                } else if c == '\\' {
                    self.escaped = true;
                } else if c == '"' {
                    self.in_string = false;
                    self.string_ends.push(self.offset + idx + 1);
                }
                continue;
            }

            match c {
                '"' => self.in_string = true,
                '{' | '[' => self.open.push(c),
                '}' | ']' => {
                    self.open.pop();
                }
                _ => {}
            }
        }
        self.offset += chunk.len();
    }

    fn depth(&self) -> usize {
        self.open.len()
    }

    /// Closing tokens for every structure still open, innermost first
    fn closers(&self) -> String {
        self.open
            .iter()
            .rev()
            .map(|c| if *c == '{' { '}' } else { ']' })
            .collect()
    }
}

/// Strategy 2: accumulate line by line and try to parse whenever the
/// top-level object closes.
fn balanced_prefix(text: &str) -> Option<Value> {
    let mut scanner = Scanner::default();
    for line in text.split_inclusive('\n') {
        scanner.feed(line);
        if scanner.depth() == 0
            && !scanner.in_string
            && line.trim_end().ends_with('}')
            && let Some(value) = parse_object(&text[..scanner.offset])
        {
            return Some(value);
        }
    }
    None
}

/// Strategy 3: repair output that was cut off mid-value.
fn close_strings(text: &str) -> Option<Value> {
    if !text.contains('"') {
        return None;
    }

    let scanner = Scanner::scan(text);
    if !scanner.in_string && scanner.depth() == 0 {
        return None;
    }

    let trimmed = text.trim_end();
    let closers = scanner.closers();

    if scanner.in_string {
        if let Some(value) = parse_object(&format!("{text}\"{closers}")) {
            return Some(value);
        }
    } else if let Some(value) = parse_object(&format!("{trimmed}{closers}")) {
        return Some(value);
    }

    // Walk back over completed strings: the last one is often a key or a
    // value whose sibling was truncated.
    for &end in scanner
        .string_ends
        .iter()
        .rev()
        .take(MAX_TRUNCATION_ATTEMPTS)
    {
        let prefix = &text[..end];
        let closers = Scanner::scan(prefix).closers();
        if let Some(value) = parse_object(&format!("{prefix}{closers}")) {
            return Some(value);
        }
    }

    None
}

/// Strategy 4: greedy first `{` to last `}`.
fn embedded_block(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    parse_object(&text[start..=end])
}
