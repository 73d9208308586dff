//! Run configuration: an optional TOML file layered under command-line flags.
//!
//! ```toml
//! [run]
//! trials = 10
//! workers = 5
//! fixed_seed = true
//! seed = 42
//! seed_scope = "run"
//! output_dir = "resultados"
//! metrics = ["grau_medio", "diametro"]
//! comment = "%"
//!
//! [[network]]
//! name = "youtube"
//! path = "redes/com-youtube/out.com-youtube"
//! ```
//!
//! Relative paths in the file resolve against the file's own directory.

use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use grafsim_core::{DEFAULT_MAX_WORKERS, DEFAULT_TRIALS, SeedPolicy, SeedScope, UnknownSeedScope};
use grafsim_providers_edgelist::{DEFAULT_COMMENT, EdgeListSource};
use serde::Deserialize;
use thiserror::Error;

/// Seed used when fixed seeding is enabled without an explicit value.
pub const DEFAULT_SEED: u64 = 42;

/// Errors raised while loading or resolving run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config `{path}`: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config `{path}`: {source}")]
    Parse {
        /// File that was parsed.
        path: PathBuf,
        /// Underlying TOML failure.
        #[source]
        source: Box<toml::de::Error>,
    },
    /// `seed_scope` in the file is not `run` or `trial`.
    #[error(transparent)]
    SeedScope(#[from] UnknownSeedScope),
    /// Neither the file nor the command line named a network.
    #[error("no networks configured; pass --network NAME=PATH or list [[network]] entries")]
    NoNetworks,
}

/// `NAME=PATH` pair naming one edge-list network.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkEntry {
    /// Network identifier used in the `Rede Social` column.
    pub name: String,
    /// Edge-list file.
    pub path: PathBuf,
}

/// Error returned for a `--network` value that is not `NAME=PATH`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid network `{provided}`; expected NAME=PATH")]
pub struct InvalidNetworkEntry {
    /// Rejected input.
    pub provided: String,
}

impl FromStr for NetworkEntry {
    type Err = InvalidNetworkEntry;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.split_once('=') {
            Some((name, path)) if !name.trim().is_empty() && !path.trim().is_empty() => {
                Ok(Self {
                    name: name.trim().to_owned(),
                    path: PathBuf::from(path.trim()),
                })
            }
            _ => Err(InvalidNetworkEntry {
                provided: raw.to_owned(),
            }),
        }
    }
}

/// `[run]` table. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunTable {
    /// Trials per network.
    pub trials: Option<usize>,
    /// Worker threads.
    pub workers: Option<usize>,
    /// Enables fixed seeding.
    pub fixed_seed: Option<bool>,
    /// Base seed.
    pub seed: Option<u64>,
    /// `run` or `trial`.
    pub seed_scope: Option<String>,
    /// Directory receiving `Modelo_<id>.csv`.
    pub output_dir: Option<PathBuf>,
    /// Metric ids to compute, in any order.
    pub metrics: Option<Vec<String>>,
    /// Edge-list comment marker.
    pub comment: Option<String>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Run parameters.
    #[serde(default)]
    pub run: RunTable,
    /// Target networks.
    #[serde(default, rename = "network")]
    pub networks: Vec<NetworkEntry>,
}

impl ConfigFile {
    /// Reads and parses `path`, rebasing relative paths onto its directory.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&text, base).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })
    }

    /// Parses TOML `text`, rebasing relative paths onto `base`.
    ///
    /// # Errors
    /// Returns the TOML error when `text` does not match the schema.
    pub fn parse(text: &str, base: &Path) -> Result<Self, toml::de::Error> {
        let mut file: Self = toml::from_str(text)?;
        for network in &mut file.networks {
            network.path = rebase(base, &network.path);
        }
        if let Some(dir) = file.run.output_dir.as_mut() {
            *dir = rebase(base, dir);
        }
        Ok(file)
    }
}

fn rebase(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Values given on the command line; each one beats the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// `--trials`.
    pub trials: Option<usize>,
    /// `--workers`.
    pub workers: Option<usize>,
    /// `--fixed-seed`.
    pub fixed_seed: bool,
    /// `--seed`; implies fixed seeding.
    pub seed: Option<u64>,
    /// `--seed-scope`.
    pub seed_scope: Option<SeedScope>,
    /// `--output-dir`.
    pub output_dir: Option<PathBuf>,
    /// `--metric`, repeatable.
    pub metrics: Vec<String>,
    /// `--comment`.
    pub comment: Option<String>,
    /// `--network`, repeatable. Replaces the file's network list when present.
    pub networks: Vec<NetworkEntry>,
}

/// Fully resolved settings for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Trials per network.
    pub trials: usize,
    /// Worker threads.
    pub workers: usize,
    /// RNG seeding.
    pub seed_policy: SeedPolicy,
    /// Output directory.
    pub output_dir: PathBuf,
    /// Metric selection; `None` keeps the full battery.
    pub metrics: Option<Vec<String>>,
    /// Edge-list comment marker.
    pub comment: String,
    /// Target networks in run order.
    pub networks: Vec<NetworkEntry>,
}

impl Settings {
    /// Layers `overrides` over `file` and fills the remaining defaults.
    ///
    /// # Errors
    /// Returns [`ConfigError::SeedScope`] for an unknown `seed_scope` in the
    /// file and [`ConfigError::NoNetworks`] when no network is configured.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self, ConfigError> {
        let ConfigFile { run, networks } = file;
        let networks = if overrides.networks.is_empty() {
            networks
        } else {
            overrides.networks
        };
        if networks.is_empty() {
            return Err(ConfigError::NoNetworks);
        }

        let file_scope = run.seed_scope.as_deref().map(str::parse::<SeedScope>).transpose()?;
        let fixed = overrides.fixed_seed
            || overrides.seed.is_some()
            || overrides.seed_scope.is_some()
            || run.fixed_seed.unwrap_or(false);
        let seed_policy = if fixed {
            SeedPolicy::Fixed {
                seed: overrides.seed.or(run.seed).unwrap_or(DEFAULT_SEED),
                scope: overrides.seed_scope.or(file_scope).unwrap_or_default(),
            }
        } else {
            SeedPolicy::Entropy
        };

        let metrics = if overrides.metrics.is_empty() {
            run.metrics
        } else {
            Some(overrides.metrics)
        };

        Ok(Self {
            trials: overrides.trials.or(run.trials).unwrap_or(DEFAULT_TRIALS),
            workers: overrides
                .workers
                .or(run.workers)
                .unwrap_or(DEFAULT_MAX_WORKERS),
            seed_policy,
            output_dir: overrides
                .output_dir
                .or(run.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            metrics,
            comment: overrides
                .comment
                .or(run.comment)
                .unwrap_or_else(|| DEFAULT_COMMENT.to_owned()),
            networks,
        })
    }

    /// Edge-list sources for the configured networks.
    #[must_use]
    pub fn sources(&self) -> Vec<EdgeListSource> {
        self.networks
            .iter()
            .map(|entry| {
                EdgeListSource::new(entry.name.as_str(), entry.path.as_path())
                    .with_comment(self.comment.as_str())
            })
            .collect()
    }
}
