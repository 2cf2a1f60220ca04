//! CLI entrypoint for deep-think
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use deepthink_application::{RunPipelineInput, RunPipelineUseCase};
use deepthink_domain::{OutputFormat, ThinkRequest};
use deepthink_infrastructure::{
    ConfigLoader, GeminiConfig, GeminiGateway, search_provider_from_config,
};
use deepthink_presentation::{Cli, ConsoleFormatter, ProgressReporter};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins over `-v`; logs go to stderr so stdout stays parseable.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    let query = cli.query.clone().context("A query is required")?;
    let params = config.pipeline_params();
    let request = ThinkRequest::new(
        query,
        cli.paths.unwrap_or(params.n_paths),
        cli.top_k.unwrap_or(params.top_k),
        cli.timeout
            .map(Duration::from_secs)
            .unwrap_or(params.pipeline_timeout),
    )?;
    let format = config
        .output
        .resolve_format(cli.output.map(OutputFormat::from));

    // === Dependency Injection ===
    let api_key = config.gemini.resolve_api_key().with_context(|| {
        format!(
            "No Gemini API key found. Set {} or gemini.api_key in the config file",
            config.gemini.api_key_env
        )
    })?;
    let gateway = Arc::new(GeminiGateway::new(GeminiConfig::from_file(
        &config.gemini,
        api_key,
    ))?);
    let search = search_provider_from_config(&config.search);

    info!(model = gateway.model(), search = search.name(), "Starting deep-think");

    let cancellation = CancellationToken::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling run");
            on_interrupt.cancel();
        }
    });

    let use_case =
        RunPipelineUseCase::with_params(gateway, search, &params).with_cancellation(cancellation);
    let input = RunPipelineInput::new(request).with_details(cli.details || params.include_details);

    let show_progress = !cli.quiet && format != OutputFormat::Json;
    if show_progress {
        println!();
        println!("Query: {}", input.request.query());
        println!(
            "Paths: {}  Top-k: {}  Deadline: {}s",
            input.request.n_paths(),
            input.request.top_k(),
            input.request.timeout().as_secs()
        );
        println!();
    }

    let result = if show_progress {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        use_case.execute(input).await?
    };

    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Answer => ConsoleFormatter::format_answer_only(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(())
}
