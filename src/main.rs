use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};

use moddoc_mcp_rs::config::Config;
use moddoc_mcp_rs::provider::{DocProvider, NeoforgeProvider};
use moddoc_mcp_rs::server::DocServer;

#[cfg(feature = "trace")]
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
struct Cli {
    /// Enable verbose logging
    #[clap(long, short)]
    verbose: bool,
    /// Directory to store the mirrored documentation repository
    #[clap(long)]
    repo_dir: Option<PathBuf>,
    /// Branch of the documentation repository to track
    #[clap(long)]
    branch: Option<String>,
}

/// You can inspect the server using the Model Context Protocol Inspector.
/// npx @modelcontextprotocol/inspector cargo run -p moddoc-mcp-rs

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let config = Config::resolve(args.branch, args.repo_dir, args.verbose)?;

    // Log to a file: stdout belongs to the protocol stream.
    #[cfg(feature = "trace")]
    {
        let level = if config.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
            .with_writer(std::fs::File::create("server.log")?)
            .with_ansi(false)
            .init();
    }

    tracing::info!("starting mod documentation MCP server");

    let provider = build_neoforge_provider(&config)?;

    let mut providers: HashMap<String, Box<dyn DocProvider>> = HashMap::new();
    providers.insert("neoforge".to_string(), Box::new(provider));

    let service = DocServer::new(providers)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })?;

    service.waiting().await?;
    Ok(())
}

/// Construct the Neoforge provider, probing it once and retrying with the
/// alternate of {"main", "master"} if the configured branch does not work.
fn build_neoforge_provider(config: &Config) -> Result<NeoforgeProvider> {
    tracing::info!("initializing Neoforge provider with branch: {}", config.branch);
    let provider = NeoforgeProvider::new(&config.repo_url, &config.branch, config.repo_dir.clone())?;

    if !provider.get_versions().starts_with("Error") {
        return Ok(provider);
    }

    let alternate = if config.branch == "main" { "master" } else { "main" };
    tracing::warn!(
        "failed to list versions on branch {}, retrying with {}",
        config.branch,
        alternate
    );
    NeoforgeProvider::new(&config.repo_url, alternate, config.repo_dir.clone())
}
