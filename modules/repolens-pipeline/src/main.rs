use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use github_client::GitHubClient;
use repolens_common::{Config, RepoRef};
use repolens_pipeline::{PipelineSettings, RepoPipeline};

#[derive(Parser)]
#[command(name = "repolens")]
#[command(about = "Aggregate contributor and change activity for a GitHub repository")]
struct Cli {
    /// Repository URL or owner/name shorthand
    repo: String,

    /// GitHub token (overrides GITHUB_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Print the report as single-line JSON
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("repolens=info".parse()?)
                .add_directive("github_client=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    // Load config
    let mut config = Config::from_env()?;
    if let Some(token) = cli.token.filter(|t| !t.trim().is_empty()) {
        config.github_token = Some(token);
    }
    config.log_redacted();

    let repo = RepoRef::parse(&cli.repo)?;
    info!(repo = %repo, "RepoLens starting...");

    let client = GitHubClient::new(config.github_token.clone(), config.request_timeout)?
        .with_base_url(&config.github_api_url);
    if !client.has_token() {
        info!("No GitHub token set, unauthenticated rate limits apply");
    }

    let pipeline = RepoPipeline::new(Arc::new(client), PipelineSettings::from(&config));

    match pipeline.run(&repo).await {
        Ok(report) => {
            let json = if cli.compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(repo = %repo, error = %e, status = ?e.status(), "Analysis failed");
            eprintln!("{}", e.user_message());
            Ok(ExitCode::FAILURE)
        }
    }
}
