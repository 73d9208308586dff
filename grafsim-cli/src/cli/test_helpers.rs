//! Small helpers shared across CLI tests.

use std::fs;
use std::path::PathBuf;

use grafsim_core::ModelSelection;
use grafsim_test_support::fixtures::EdgeList;
use tempfile::TempDir;

use super::commands::run_command;
use super::{CliError, NetworkArgs, NetworkEntry, RunCommand};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    if let Err(err) = fs::write(&path, contents) {
        panic!("failed to write `{}`: {err}", path.display());
    }
    path
}

pub(super) fn write_network(dir: &TempDir, name: &str, edges: &EdgeList) -> NetworkEntry {
    let path = write_file(dir, &format!("out.{name}"), &edges.to_text());
    NetworkEntry {
        name: name.to_owned(),
        path,
    }
}

/// Seeded `run` command over `networks` writing into `dir`.
pub(super) fn run_args(
    model: ModelSelection,
    dir: &TempDir,
    networks: Vec<NetworkEntry>,
) -> RunCommand {
    RunCommand {
        model,
        trials: Some(3),
        workers: Some(2),
        fixed_seed: false,
        seed: Some(7),
        seed_scope: None,
        output_dir: Some(dir.path().join("out")),
        metrics: Vec::new(),
        networks: NetworkArgs {
            config: None,
            networks,
            comment: None,
        },
    }
}

pub(super) fn run_command_expecting_error(cmd: RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
