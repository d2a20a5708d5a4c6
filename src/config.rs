//! Runtime configuration from `AYURDX_*` environment variables.

use std::path::PathBuf;

use crate::adapters::tree::DEFAULT_SEED;

pub const DEFAULT_DATASET_PATH: &str = "data/prescriptions.csv";
pub const DEFAULT_DB_PATH: &str = "ayurdx.db";
pub const DEFAULT_REPORT_DIR: &str = "reports";
pub const DEFAULT_LOG_FILE: &str = "ayurdx.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    File,
    Stdout,
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    Auto,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub db_path: PathBuf,
    pub split_seed: u64,
    pub report_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    /// Problems found while reading the environment. Logging is not set up
    /// yet at that point, so they are held until [`AppConfig::log_warnings`].
    pub warnings: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            split_seed: DEFAULT_SEED,
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            warnings: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// missing or empty values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let split_seed = match get("AYURDX_SPLIT_SEED") {
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                warnings.push(format!("Invalid AYURDX_SPLIT_SEED {raw:?}, using {DEFAULT_SEED}"));
                DEFAULT_SEED
            }),
            None => defaults.split_seed,
        };

        Self {
            dataset_path: get("AYURDX_DATASET_PATH").map_or(defaults.dataset_path, PathBuf::from),
            db_path: get("AYURDX_DB_PATH").map_or(defaults.db_path, PathBuf::from),
            split_seed,
            report_dir: get("AYURDX_REPORT_DIR").map_or(defaults.report_dir, PathBuf::from),
            log_mode: get("AYURDX_LOG_MODE").map_or(defaults.log_mode, |v| LogMode::parse(&v)),
            log_file: get("AYURDX_LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            warnings,
        }
    }

    /// Emit the collected warnings. Call once the subscriber is installed.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            tracing::warn!("{}", warning);
        }
    }
}
