use std::env;
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Remote documentation repository mirrored by the Neoforge provider.
pub const DEFAULT_REPO_URL: &str = "https://github.com/neoforged/Documentation";

const DEFAULT_BRANCH: &str = "main";

/// Environment overrides, applied when the matching flag is absent.
const ENV_BRANCH: &str = "MODDOC_BRANCH";
const ENV_REPO_DIR: &str = "MODDOC_REPO_DIR";

/// Final server configuration.
///
/// Resolved once before anything is constructed, so the provider is built
/// exactly once from settled values. Precedence per field: command-line
/// flag, then environment variable, then default.
#[derive(Debug, Clone)]
pub struct Config {
    pub repo_url: String,
    pub branch: String,
    pub repo_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    pub fn resolve(
        branch: Option<String>,
        repo_dir: Option<PathBuf>,
        verbose: bool,
    ) -> Result<Self> {
        let branch = branch
            .or_else(|| env::var(ENV_BRANCH).ok())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        let repo_dir = match repo_dir.or_else(|| env::var(ENV_REPO_DIR).ok().map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_repo_dir()?,
        };

        Ok(Self {
            repo_url: DEFAULT_REPO_URL.to_string(),
            branch,
            repo_dir,
            verbose,
        })
    }
}

fn default_repo_dir() -> Result<PathBuf> {
    let Some(home) = home_dir() else {
        bail!("HOME is not set; pass --repo-dir or set {ENV_REPO_DIR}");
    };
    Ok(home
        .join(".local")
        .join("share")
        .join("moddoc-mcp")
        .join("neoforge"))
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").map(PathBuf::from)
}
