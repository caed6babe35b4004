//! `cla-check`: runs the CLA gate for one GitHub Actions event.
//!
//! Inputs come from the environment the runner provides (`GITHUB_*` and
//! `INPUT_*` variables) or the equivalent flags. A failed check is reported
//! with an `::error::` workflow command and a non-zero exit status.

use anyhow::{Context, Result};
use cla_classifier::HttpRegistry;
use cla_gate::{screen_event, EventContext, Gate, GateConfig, RunReport};
use cla_github::{Repo, RestClient, DEFAULT_API_URL};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

mod workflow;

pub use workflow::{error_command, escape_data};

#[derive(Parser, Debug)]
#[command(name = "cla-check")]
#[command(about = "Gate pull requests on contributors having signed the CLA", long_about = None)]
#[command(version)]
struct Cli {
    /// Token for the GitHub REST API
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Token for the CLA registry
    #[arg(long, env = "INPUT_CLA-TOKEN", hide_env_values = true)]
    cla_token: Option<String>,

    /// TOML file overriding labels, messages, registry and comment settings
    #[arg(long, env = "INPUT_CONFIG-PATH")]
    config: Option<PathBuf>,

    /// Name of the event that triggered the workflow
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    event_name: String,

    /// Path to the JSON event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Name of the running workflow
    #[arg(long, env = "GITHUB_WORKFLOW", default_value = "")]
    workflow: String,

    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, conflicts_with = "verbose")]
    quiet: bool,
}

pub async fn main_entry() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let failure = match run(cli).await {
        Ok(report) => report.failure_message().map(str::to_string),
        Err(err) => Some(format!("{err:#}")),
    };

    match failure {
        Some(message) => {
            println!("{}", error_command(&message));
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    // HTTP client internals stay quiet unless verbose
    if !verbose {
        builder.filter_module("hyper_util", log::LevelFilter::Warn);
        builder.filter_module("reqwest", log::LevelFilter::Warn);
    }
    builder.target(env_logger::Target::Stderr).init();
}

async fn run(cli: Cli) -> Result<RunReport> {
    let config = match &cli.config {
        Some(path) => GateConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GateConfig::default(),
    };

    let payload = read_payload(cli.event_path.as_deref())?;
    let ctx = EventContext::from_json(&cli.event_name, &cli.workflow, &payload)
        .context("Failed to parse event payload")?;
    log::debug!("CLA: Event {} for workflow '{}'", ctx.qualified_name(), ctx.workflow);

    // Irrelevant events finish before any credential is needed.
    let pattern = config
        .comment_pattern()
        .context("Invalid CLA comment pattern")?;
    if let Err(skipped) = screen_event(&ctx, &pattern) {
        return Ok(skipped);
    }

    let github_token = required_input(cli.github_token, "github-token")?;
    let cla_token = required_input(cli.cla_token, "cla-token")?;
    let repo = cli
        .repository
        .as_deref()
        .context("GITHUB_REPOSITORY is not set")?
        .parse::<Repo>()?;

    let host = RestClient::new(&cli.api_url, repo, github_token)
        .context("Failed to create GitHub client")?;
    let registry = HttpRegistry::new(config.registry_endpoint(), cla_token)
        .context("Failed to create CLA registry client")?;
    let gate = Gate::with_pattern(Arc::new(host), Arc::new(registry), config, pattern);

    let report = gate.run(&ctx).await?;
    log::debug!("CLA: {report:?}");
    Ok(report)
}

fn read_payload(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read event payload {}", path.display())),
        None => Ok(String::new()),
    }
}

fn required_input(value: Option<String>, name: &str) -> Result<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .with_context(|| format!("Input required and not supplied: {name}"))
}
