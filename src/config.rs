use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

const CONFIG_FILE: &str = ".batch-worker.toml";

/// Settings deserialized from `.batch-worker.toml`. A missing file means defaults.
#[derive(Deserialize, Debug, Default, Clone, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub simulation: Simulation,
}

/// Timing of the simulated workload
#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Simulation {
    pub step_delay_secs: u64,
    pub startup_delay_secs: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            step_delay_secs: 2,
            startup_delay_secs: 0,
        }
    }
}

impl Simulation {
    pub fn step_delay(&self) -> Duration {
        Duration::from_secs(self.step_delay_secs)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }
}

impl FromStr for Config {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl Config {
    /// Load `path` if given, otherwise the nearest config file above the current directory
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match find_config_dir()? {
                Some(dir) => dir.join(CONFIG_FILE),
                None => return Ok(Self::default()),
            },
        };

        let config_string = std::fs::read_to_string(&path)
            .with_context(|| format!("Couldn't read config file {}", path.display()))?;

        config_string
            .parse()
            .with_context(|| format!("Couldn't parse config file {}", path.display()))
    }
}

// Scan root directories until we hopefully find the config file
fn find_config_dir() -> Result<Option<PathBuf>, anyhow::Error> {
    let mut dir = std::env::current_dir()?;
    loop {
        if dir.join(CONFIG_FILE).exists() {
            return Ok(Some(dir));
        }
        if let Some(parent) = dir.parent() {
            dir = parent.to_path_buf();
        } else {
            return Ok(None);
        }
    }
}
