use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use moddoc_mcp_rs::repo::RepoMirror;

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs_f64()
}

/// Run git in a directory, panicking on failure.
fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Create a local git repository with one committed markdown file.
fn seed_remote(dir: &Path, branch: &str) {
    git(dir, &["init", "-b", branch]);
    fs::write(dir.join("index.md"), "# Home\n\nWelcome.").unwrap();
    git(dir, &["add", "."]);
    git(
        dir,
        &[
            "-c",
            "user.name=test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "-m",
            "initial",
        ],
    );
}

#[test]
fn test_missing_checkout_is_stale() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mirror = RepoMirror::new("https://example.invalid/docs", "main", temp_dir.path()).unwrap();

    assert!(mirror.is_stale());
}

#[test]
fn test_missing_timestamp_is_stale() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mirror = RepoMirror::new("https://example.invalid/docs", "main", temp_dir.path()).unwrap();
    fs::create_dir(mirror.checkout_path()).unwrap();

    assert!(mirror.is_stale());
}

#[test]
fn test_fresh_timestamp_skips_sync() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mirror = RepoMirror::new("https://example.invalid/docs", "main", temp_dir.path()).unwrap();
    fs::create_dir(mirror.checkout_path()).unwrap();
    fs::write(temp_dir.path().join("last_update.txt"), now_secs().to_string()).unwrap();

    assert!(!mirror.is_stale());
    // No network, no git: the fresh mirror short-circuits
    assert!(mirror.ensure_fresh());
}

#[test]
fn test_old_timestamp_is_stale() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mirror = RepoMirror::new("https://example.invalid/docs", "main", temp_dir.path()).unwrap();
    fs::create_dir(mirror.checkout_path()).unwrap();
    // 25 hours old
    let old = now_secs() - 90_000.0;
    fs::write(temp_dir.path().join("last_update.txt"), old.to_string()).unwrap();

    assert!(mirror.is_stale());
}

#[test]
fn test_unparseable_timestamp_is_stale() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mirror = RepoMirror::new("https://example.invalid/docs", "main", temp_dir.path()).unwrap();
    fs::create_dir(mirror.checkout_path()).unwrap();
    fs::write(temp_dir.path().join("last_update.txt"), "not a number").unwrap();

    assert!(mirror.is_stale());
}

#[test]
fn test_failed_clone_leaves_no_timestamp() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing_remote = temp_dir.path().join("no-such-remote");
    let mirror_dir = temp_dir.path().join("mirror");

    let mirror =
        RepoMirror::new(missing_remote.to_str().unwrap(), "main", &mirror_dir).unwrap();

    assert!(!mirror.ensure_fresh());
    assert!(!mirror_dir.join("last_update.txt").exists());
}

#[test]
fn test_clone_from_local_repository() {
    let temp_dir = tempfile::tempdir().unwrap();
    let remote = temp_dir.path().join("remote");
    fs::create_dir(&remote).unwrap();
    seed_remote(&remote, "main");

    let mirror_dir = temp_dir.path().join("mirror");
    let mirror = RepoMirror::new(remote.to_str().unwrap(), "main", &mirror_dir).unwrap();

    assert!(mirror.ensure_fresh());
    assert!(mirror.checkout_path().join("index.md").exists());

    // The timestamp file holds a parseable epoch-seconds value
    let raw = fs::read_to_string(mirror_dir.join("last_update.txt")).unwrap();
    let stamp: f64 = raw.trim().parse().unwrap();
    assert!(stamp > 0.0);

    // A second call inside the staleness window is a no-op
    assert!(mirror.ensure_fresh());
}

#[test]
fn test_update_falls_back_to_alternate_branch() {
    let temp_dir = tempfile::tempdir().unwrap();
    let remote = temp_dir.path().join("remote");
    fs::create_dir(&remote).unwrap();
    // The remote only has a master branch
    seed_remote(&remote, "master");

    // Seed an existing checkout so the stale sync takes the update path
    let mirror_dir = temp_dir.path().join("mirror");
    fs::create_dir(&mirror_dir).unwrap();
    let checkout = mirror_dir.join("Documentation");
    git(
        &mirror_dir,
        &["clone", remote.to_str().unwrap(), checkout.to_str().unwrap()],
    );

    let mirror = RepoMirror::new(remote.to_str().unwrap(), "main", &mirror_dir).unwrap();
    assert_eq!(mirror.current_branch(), "main");

    // Checkout of main fails, the fallback to master sticks
    assert!(mirror.ensure_fresh());
    assert_eq!(mirror.current_branch(), "master");
}
