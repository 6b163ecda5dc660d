//! Integration tests for the reposweep CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Command with HOME, the config dir and the working directory pointed at
/// a sandbox so no real user configuration leaks in.
fn reposweep(sandbox: &Path) -> Command {
    let mut cmd = Command::cargo_bin("reposweep").unwrap();
    cmd.current_dir(sandbox)
        .env("HOME", sandbox)
        .env("XDG_CONFIG_HOME", sandbox.join(".config"))
        .env_remove("RUST_LOG");
    cmd
}

/// Builds `workspace/` under the sandbox with two repositories, one
/// repository inside a hidden directory and one plain directory.
fn repo_tree(sandbox: &Path) -> PathBuf {
    let root = sandbox.join("workspace");
    for repo in ["alpha", "beta", ".hidden/gamma"] {
        fs::create_dir_all(root.join(repo).join(".git")).unwrap();
    }
    fs::create_dir_all(root.join("notes")).unwrap();
    fs::canonicalize(root).unwrap()
}

fn write_config(sandbox: &Path, program: &str) -> PathBuf {
    let path = sandbox.join("custom.toml");
    fs::write(
        &path,
        format!("[run]\nprogram = \"{program}\"\nargs = []\nparallel = 2\n"),
    )
    .unwrap();
    path
}

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let sandbox = TempDir::new().unwrap();
    reposweep(sandbox.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("git gc"))
        .stdout(predicate::str::contains("--parallel"))
        .stdout(predicate::str::contains("--on-interrupt"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let sandbox = TempDir::new().unwrap();
    reposweep(sandbox.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("reposweep"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let sandbox = TempDir::new().unwrap();
    reposweep(sandbox.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_root_is_fatal() {
    let sandbox = TempDir::new().unwrap();
    reposweep(sandbox.path())
        .args(["list", "--root"])
        .arg(sandbox.path().join("nowhere"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_root_that_is_a_file_is_fatal() {
    let sandbox = TempDir::new().unwrap();
    let file = sandbox.path().join("file.txt");
    fs::write(&file, "not a directory").unwrap();

    reposweep(sandbox.path())
        .arg("--root")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn test_list_skips_hidden_directories() {
    let sandbox = TempDir::new().unwrap();
    let root = repo_tree(sandbox.path());

    let expected = format!(
        "{}\n{}\n",
        root.join("alpha").display(),
        root.join("beta").display()
    );
    reposweep(sandbox.path())
        .arg("list")
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::eq(expected));
}

#[test]
fn test_list_expands_tilde_root() {
    let sandbox = TempDir::new().unwrap();
    let root = repo_tree(sandbox.path());

    reposweep(sandbox.path())
        .args(["list", "--root", "~/workspace"])
        .assert()
        .success()
        .stdout(predicate::str::contains(root.join("alpha").display().to_string()));
}

#[cfg(unix)]
#[test]
fn test_run_reports_every_repository() {
    let sandbox = TempDir::new().unwrap();
    let root = repo_tree(sandbox.path());
    let config = write_config(sandbox.path(), "true");

    reposweep(sandbox.path())
        .arg("--config")
        .arg(&config)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "✓ {}",
            root.join("alpha").display()
        )))
        .stdout(predicate::str::contains(format!(
            "✓ {}",
            root.join("beta").display()
        )))
        .stdout(predicate::str::contains("Done! Ran 'true' on 2 repos"))
        .stdout(predicate::str::contains("gamma").not());
}

#[cfg(unix)]
#[test]
fn test_failing_repositories_do_not_fail_the_run() {
    let sandbox = TempDir::new().unwrap();
    let root = repo_tree(sandbox.path());
    let config = write_config(sandbox.path(), "false");

    reposweep(sandbox.path())
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("✗"))
        .stdout(predicate::str::contains("Done!"))
        .stderr(predicate::str::contains("2 repos failed"))
        .stderr(predicate::str::contains("exited with status 1"));
}

#[cfg(unix)]
#[test]
fn test_unknown_program_is_reported_per_repository() {
    let sandbox = TempDir::new().unwrap();
    let root = repo_tree(sandbox.path());
    let config = write_config(sandbox.path(), "reposweep-definitely-missing");

    reposweep(sandbox.path())
        .arg("--config")
        .arg(&config)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stderr(predicate::str::contains("not found on PATH"))
        .stderr(predicate::str::contains("failed to start"));
}

#[cfg(unix)]
#[test]
fn test_quiet_run_prints_nothing() {
    let sandbox = TempDir::new().unwrap();
    let root = repo_tree(sandbox.path());
    let config = write_config(sandbox.path(), "true");

    reposweep(sandbox.path())
        .arg("-q")
        .arg("--config")
        .arg(&config)
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_empty_tree_completes_immediately() {
    let sandbox = TempDir::new().unwrap();
    let root = sandbox.path().join("empty");
    fs::create_dir(&root).unwrap();

    reposweep(sandbox.path())
        .arg("--root")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::contains("on 0 repos"));
}

#[test]
fn test_config_show_merges_flags_and_environment() {
    let sandbox = TempDir::new().unwrap();

    reposweep(sandbox.path())
        .env("REPOSWEEP_SCAN__MARKER", ".hg")
        .args(["config", "show", "-p", "3", "--on-interrupt", "drain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marker = \".hg\""))
        .stdout(predicate::str::contains("parallel = 3"))
        .stdout(predicate::str::contains("on_interrupt = \"drain\""))
        .stdout(predicate::str::contains("program = \"git\""));
}

#[test]
fn test_local_config_file_is_picked_up() {
    let sandbox = TempDir::new().unwrap();
    fs::write(
        sandbox.path().join("reposweep.toml"),
        "[scan]\nfollow_symlinks = true\n",
    )
    .unwrap();

    reposweep(sandbox.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("follow_symlinks = true"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let sandbox = TempDir::new().unwrap();
    let config = sandbox.path().join("bad.toml");
    fs::write(&config, "[run]\nthread_percentage = 0\n").unwrap();

    reposweep(sandbox.path())
        .args(["config", "validate", "--config"])
        .arg(&config)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("thread_percentage"));
}

#[test]
fn test_missing_config_file_is_rejected() {
    let sandbox = TempDir::new().unwrap();

    reposweep(sandbox.path())
        .args(["config", "show", "--config", "missing.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
