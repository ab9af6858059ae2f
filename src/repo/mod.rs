use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};

/// A mirror older than this is refreshed on the next call.
pub const STALE_AFTER_SECS: u64 = 86_400;

/// Subdirectory of the mirror directory holding the working copy.
const CHECKOUT_DIR: &str = "Documentation";

/// File holding the epoch-seconds timestamp of the last successful sync.
const TIMESTAMP_FILE: &str = "last_update.txt";

/// Local git mirror of a remote documentation repository.
///
/// The working copy lives under `repo_dir` next to a timestamp file that
/// rate-limits network traffic: a sync is only attempted when the checkout
/// is missing or older than [`STALE_AFTER_SECS`]. Git itself is invoked as
/// a subprocess; its protocol is not reimplemented here.
pub struct RepoMirror {
    repo_url: String,
    // Permanently switched if the configured branch cannot be checked out.
    branch: Mutex<String>,
    repo_dir: PathBuf,
    timestamp_file: PathBuf,
}

impl RepoMirror {
    /// Create a mirror handle, creating `repo_dir` if needed. The working
    /// copy itself is only materialized by [`ensure_fresh`](Self::ensure_fresh).
    pub fn new(repo_url: &str, branch: &str, repo_dir: impl Into<PathBuf>) -> Result<Self> {
        let repo_dir = repo_dir.into();
        fs::create_dir_all(&repo_dir)
            .with_context(|| format!("failed to create mirror directory {repo_dir:?}"))?;
        tracing::info!("repository directory: {:?}", repo_dir);

        let timestamp_file = repo_dir.join(TIMESTAMP_FILE);
        Ok(Self {
            repo_url: repo_url.to_string(),
            branch: Mutex::new(branch.to_string()),
            repo_dir,
            timestamp_file,
        })
    }

    /// Path of the git working copy.
    pub fn checkout_path(&self) -> PathBuf {
        self.repo_dir.join(CHECKOUT_DIR)
    }

    /// The branch currently in effect (may differ from the configured one
    /// after a checkout fallback).
    pub fn current_branch(&self) -> String {
        self.branch.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Whether the mirror needs a sync: missing working copy, missing or
    /// unreadable timestamp, or a timestamp past the staleness threshold.
    pub fn is_stale(&self) -> bool {
        if !self.checkout_path().exists() {
            tracing::info!("working copy does not exist, will clone it");
            return true;
        }

        let raw = match fs::read_to_string(&self.timestamp_file) {
            Ok(raw) => raw,
            Err(_) => {
                tracing::info!("no timestamp file found, will update repository");
                return true;
            }
        };
        let last_update = match raw.trim().parse::<f64>() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("unreadable timestamp file ({}), will update repository", e);
                return true;
            }
        };

        let age = now_epoch_secs() - last_update;
        if age > STALE_AFTER_SECS as f64 {
            tracing::info!("repository last updated {:.1} hours ago, will update", age / 3600.0);
            true
        } else {
            tracing::debug!("repository updated {:.1} hours ago, skipping update", age / 3600.0);
            false
        }
    }

    /// Bring the mirror up to date if it is stale.
    ///
    /// Returns true when the working copy is usable afterwards. On failure
    /// the timestamp is left untouched so the next call retries, and the
    /// working copy stays in whatever state the failed operation left it.
    pub fn ensure_fresh(&self) -> bool {
        match self.sync_if_stale() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("repository sync failed: {e:#}");
                false
            }
        }
    }

    fn sync_if_stale(&self) -> Result<()> {
        if !self.is_stale() {
            return Ok(());
        }

        if self.checkout_path().exists() {
            self.update()?;
        } else {
            self.clone_repo()?;
        }

        self.write_timestamp()
    }

    fn clone_repo(&self) -> Result<()> {
        let branch = self.current_branch();
        let checkout = self.checkout_path();
        tracing::info!("cloning {} (branch {}) into {:?}", self.repo_url, branch, checkout);

        let checkout = checkout.to_string_lossy().into_owned();
        run_git(&["clone", "--branch", &branch, &self.repo_url, &checkout])
    }

    fn update(&self) -> Result<()> {
        let checkout = self.checkout_path();
        let checkout = checkout.to_string_lossy().into_owned();
        let branch = self.current_branch();
        tracing::info!("updating repository at {}", checkout);

        if let Err(e) = run_git(&["-C", &checkout, "checkout", &branch]) {
            let fallback = alternate_branch(&branch);
            tracing::warn!(
                "failed to checkout branch {} ({e:#}), trying {}",
                branch,
                fallback
            );
            run_git(&["-C", &checkout, "checkout", fallback])
                .with_context(|| format!("failed to checkout fallback branch {fallback}"))?;
            // The fallback sticks for the lifetime of the mirror.
            *self.branch.lock().unwrap_or_else(|e| e.into_inner()) = fallback.to_string();
        }

        run_git(&["-C", &checkout, "pull"])
    }

    fn write_timestamp(&self) -> Result<()> {
        fs::write(&self.timestamp_file, now_epoch_secs().to_string())
            .with_context(|| format!("failed to write timestamp file {:?}", self.timestamp_file))?;
        tracing::info!("updated repository timestamp file");
        Ok(())
    }
}

/// The other member of {"main", "master"}.
fn alternate_branch(branch: &str) -> &'static str {
    if branch == "main" { "master" } else { "main" }
}

fn now_epoch_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Run a git subcommand, failing with git's stderr on a non-zero exit.
fn run_git(args: &[&str]) -> Result<()> {
    let output = Command::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed to spawn git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git {} failed: {}", args.join(" "), stderr.trim());
    }

    tracing::debug!("git {} output: {}", args.join(" "), String::from_utf8_lossy(&output.stdout).trim());
    Ok(())
}
