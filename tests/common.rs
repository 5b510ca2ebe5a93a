#![allow(dead_code)]
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

const ASSIGNMENT_VARS: [&str; 10] = [
    "WORKER_ID",
    "WORKER_INDEX",
    "TOTAL_WORKERS",
    "PROJECT",
    "BUCKET",
    "DATA_SOURCE",
    "WORKER_CONFIG",
    "OUTPUT_PATH",
    "BATCH_START",
    "BATCH_END",
];

/// Scratch directory holding a `.batch-worker.toml` without delays
pub struct WorkerTestConfig {
    path: TempDir,
}

impl Default for WorkerTestConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkerTestConfig {
    pub fn new() -> Self {
        Self::with_config(
            r#"
            [simulation]
            step_delay_secs = 0
            startup_delay_secs = 0
            "#,
        )
    }

    pub fn with_config(contents: &str) -> Self {
        let path = TempDir::with_prefix("batch-worker").unwrap();
        std::fs::write(path.path().join(".batch-worker.toml"), contents).unwrap();

        WorkerTestConfig { path }
    }

    pub fn path(&self) -> &Path {
        self.path.path()
    }

    pub fn subdir(&self, name: &str) -> PathBuf {
        let dir = self.path.path().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Worker command with a clean assignment environment plus `envs`
    pub fn run(&self, envs: &[(&str, &str)]) -> Command {
        self.run_in(self.path.path(), envs)
    }

    pub fn run_in(&self, dir: &Path, envs: &[(&str, &str)]) -> Command {
        let mut cmd = Command::cargo_bin("batch-worker").unwrap();
        cmd.current_dir(dir).env_remove("RUST_LOG");

        for var in ASSIGNMENT_VARS {
            cmd.env_remove(var);
        }
        cmd.envs(envs.iter().copied());

        cmd
    }
}

pub fn progress_lines(stdout: &[u8]) -> Vec<String> {
    std::str::from_utf8(stdout)
        .unwrap()
        .lines()
        .filter(|line| line.contains(": Processing step "))
        .map(str::to_string)
        .collect()
}
