//! Command-line entry point for the Recollect pipeline.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{debug, info, warn};
use recollect_rs::config::{LayeredConfigOptions, RecollectConfig};
use recollect_rs::core::{Mode, PipelineRequest};
use std::path::PathBuf;

/// Command-line options for the Recollect CLI.
#[derive(Parser)]
#[command(name = "recollect", version)]
struct Cli {
    /// Optional path to a recollect.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer a query and remember the exchange
    Ask(RequestArgs),
    /// Show the memory a query would retrieve, without answering
    Recall {
        #[command(flatten)]
        request: RequestArgs,
        /// Override the configured recall limit
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Args)]
struct RequestArgs {
    /// Requester identifier (required for episodic mode)
    #[arg(long, default_value = "")]
    requester: String,
    /// Memory scope: episodic or semantic
    #[arg(long, default_value = "episodic")]
    mode: Mode,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
    /// Query text
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,
}

impl RequestArgs {
    fn to_request(&self) -> PipelineRequest {
        PipelineRequest::new(self.requester.clone(), self.query.join(" "), self.mode)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    recollect_rs::init_logging();

    let cli = Cli::parse();
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = cli.config.as_ref() {
        options = options.with_runtime_path(path);
    }
    let layered = RecollectConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    let config = layered.config;

    let api_key = std::env::var(&config.model.api_key_env).ok();
    let pipeline = recollect_rs::build_pipeline(&config, &cwd, api_key.clone())
        .context("failed to build pipeline")?;

    match cli.command {
        Command::Ask(args) => {
            if api_key.is_none() {
                warn!(
                    "{} is not set; sending requests without authorization",
                    config.model.api_key_env
                );
            }
            let response = pipeline.handle(args.to_request()).await?;
            info!(
                "answered (history_count={}, had_prior_history={:?})",
                response.history_count,
                response.had_prior_history()
            );
            if args.json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.response);
            }
        }
        Command::Recall { request, limit } => {
            let items = pipeline.recall(&request.to_request(), limit).await?;
            if request.json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else if items.is_empty() {
                println!("{}", recollect_rs::core::NO_CONTEXT_SENTINEL);
            } else {
                for item in items {
                    println!("[{}] {}", item.created_at.to_rfc3339(), item.content);
                }
            }
        }
    }
    Ok(())
}
