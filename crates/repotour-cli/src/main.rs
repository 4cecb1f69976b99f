//! Repo Tour CLI
//!
//! The `repotour` command turns a GitHub repository into an LLM-written
//! analysis.
//!
//! ## Modes
//!
//! - `review`: walk the repository, write the assembled context to
//!   `prompt.txt` and ask Groq for an architecture review
//! - `tour`: read the README and flat tree and ask Gemini for a guided
//!   developer tour
//!
//! `--context-only` stops before the model call and needs no API key.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use llm_gateway::{GeminiClient, GroqClient, LanguageModel};
use repotour_core::{
    write_report_json, Config, GitHubClient, Pipeline, RepositoryRef, TourError, TourReport,
};
use tracing::{info, Level};

const DEFAULT_PROMPT_OUT: &str = "prompt.txt";
const BANNER_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Guided developer tour (Gemini)
    Tour,
    /// Architecture review (Groq)
    Review,
}

#[derive(Parser, Debug)]
#[command(name = "repotour")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Guided tours and architecture reviews of GitHub repositories",
    long_about = None
)]
struct Cli {
    /// Repository as owner/repo (prompted for when omitted)
    repo: Option<String>,

    /// Which analysis to produce
    #[arg(short, long, value_enum, default_value_t = Mode::Review)]
    mode: Mode,

    /// Where the review context is written (review mode)
    #[arg(long, default_value = DEFAULT_PROMPT_OUT)]
    prompt_out: PathBuf,

    /// Write a JSON run report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Override the provider's default model
    #[arg(long)]
    model: Option<String>,

    /// Build the context without calling the model
    #[arg(long, conflicts_with_all = ["report", "model"])]
    context_only: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    repotour_core::init_tracing(cli.json, level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    // Keys are checked before the user is asked for anything.
    let model = if cli.context_only {
        None
    } else {
        Some(build_model(cli.mode, cli.model.as_deref(), &config)?)
    };

    let input = match cli.repo {
        Some(repo) => repo,
        None => prompt_for_repository()?,
    };
    let repo: RepositoryRef = input.parse()?;

    let host = GitHubClient::new(config.github.clone())?;
    let mut pipeline = Pipeline::new(Arc::new(host)).with_branches(config.branches.clone());
    if cli.mode == Mode::Review {
        pipeline = pipeline.with_prompt_artifact(&cli.prompt_out);
    }

    let Some(model) = model else {
        return cmd_context_only(&pipeline, &repo, cli.mode).await;
    };

    let report = match cli.mode {
        Mode::Tour => pipeline.guided_tour(&repo, model.as_ref()).await?,
        Mode::Review => pipeline.architecture_review(&repo, model.as_ref()).await?,
    };
    print_analysis(&report);

    if let Some(path) = &cli.report {
        write_report_json(path, &report)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn build_model(
    mode: Mode,
    model_override: Option<&str>,
    config: &Config,
) -> Result<Box<dyn LanguageModel>> {
    let model: Box<dyn LanguageModel> = match mode {
        Mode::Tour => {
            let mut provider = config.gemini()?;
            if let Some(name) = model_override {
                provider = provider.with_model(name);
            }
            Box::new(GeminiClient::with_config(provider)?)
        }
        Mode::Review => {
            let mut provider = config.groq()?;
            if let Some(name) = model_override {
                provider = provider.with_model(name);
            }
            Box::new(GroqClient::with_config(provider)?)
        }
    };
    Ok(model)
}

async fn cmd_context_only(pipeline: &Pipeline, repo: &RepositoryRef, mode: Mode) -> Result<()> {
    match mode {
        Mode::Tour => {
            let context = pipeline.tour_context(repo).await?;
            println!("{}", context.prompt);
        }
        Mode::Review => {
            let context = pipeline.review_context(repo).await?;
            let stats = context.walk.stats;
            let target = pipeline
                .prompt_artifact()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            println!(
                "Context written to {target}: {} files, {} skipped, {} characters",
                stats.files_included,
                stats.files_skipped,
                context.document.char_len()
            );
        }
    }
    Ok(())
}

fn prompt_for_repository() -> Result<String> {
    print!("Enter GitHub repo (owner/repo): ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read repository from stdin")?;
    Ok(line)
}

fn print_analysis(report: &TourReport) {
    let rule = "=".repeat(BANNER_WIDTH);
    println!("\n{rule}");
    println!("{}", report.mode.title());
    println!("{rule}\n");
    println!("{}", report.analysis);
}

/// Remote failures are reported as GitHub errors, everything else plainly.
fn render_error(err: &anyhow::Error) -> String {
    let remote = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<TourError>())
        .any(TourError::is_remote);
    if remote {
        format!("GitHub error: {err:#}")
    } else {
        format!("Error: {err:#}")
    }
}
