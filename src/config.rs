use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_DB_NAME: &str = "bizcoach.db";
pub const DB_ENV_VAR: &str = "BIZCOACH_DB";
pub const LOG_ENV_VAR: &str = "BIZCOACH_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub json: bool,
    pub verbose: bool,
    /// Keep progress in memory only; nothing is written to disk.
    pub ephemeral: bool,
}

impl Config {
    /// Resolves settings from flags, then the environment, then defaults.
    pub fn load(db_flag: Option<PathBuf>, json: bool, verbose: bool, ephemeral: bool) -> Self {
        let db_path = resolve_db_path(db_flag, std::env::var(DB_ENV_VAR).ok(), dirs::config_dir());
        Self {
            db_path,
            json,
            verbose,
            ephemeral,
        }
    }

    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| default_filter(self.verbose))
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("bizcoach=debug")
    } else {
        EnvFilter::new("bizcoach=warn")
    }
}

// Flag beats env var beats `<config_dir>/bizcoach/bizcoach.db`.
fn resolve_db_path(
    flag: Option<PathBuf>,
    env_value: Option<String>,
    config_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Some(path) = env_value.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(path);
    }

    config_dir
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bizcoach")
        .join(DEFAULT_DB_NAME)
}
