//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for pipeline results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Answer, run metadata and any detailed stage records
    Full,
    /// Only the final answer
    Answer,
    /// JSON output
    Json,
}

impl From<OutputFormat> for deepthink_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => Self::Full,
            OutputFormat::Answer => Self::Answer,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// CLI arguments for deep-think
#[derive(Parser, Debug)]
#[command(name = "deep-think")]
#[command(author, version, about = "Parallel reasoning pipeline: plan, think in parallel, critique, refine")]
#[command(long_about = r#"
deep-think answers a query by running it through a multi-stage reasoning pipeline:

1. Planning: a planner decomposes the query and decides whether research helps
2. Research: optional web searches feed the thinkers (Tavily, or simulated)
3. Parallel Thinking: N independent thinkers each produce a candidate answer
4. Critique: a critic scores every candidate on a weighted rubric
5. Refinement: the top-k candidates are synthesized into one answer
6. Meta-Refinement: the synthesis is reviewed from a higher vantage point

Configuration files are loaded from (in priority order):
1. DEEPTHINK_* environment variables, e.g. DEEPTHINK_PIPELINE__N_PATHS=4
2. --config <path>         Explicit config file
3. ./deep-think.toml       Project-level config
4. ~/.config/deep-think/config.toml   Global config

Example:
  deep-think "Why does ice float on water?"
  deep-think -n 4 -k 2 --details -o full "Compare B-trees and LSM-trees"
"#)]
pub struct Cli {
    /// The query to reason about
    #[arg(required_unless_present = "show_config")]
    pub query: Option<String>,

    /// Number of parallel thinking paths (1-32)
    #[arg(short = 'n', long = "paths", value_name = "N")]
    pub paths: Option<usize>,

    /// Candidates carried into refinement (1-10, lowered to the path count)
    #[arg(short = 'k', long, value_name = "K")]
    pub top_k: Option<usize>,

    /// Deadline for the whole run, in seconds
    #[arg(short, long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Include every intermediate stage record in the result
    #[arg(long)]
    pub details: bool,

    /// Output format (defaults to the config file value, then "full")
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
