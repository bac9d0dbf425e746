//! Runtime configuration.
//!
//! Values come from the environment (a `.env` file is loaded first by the
//! binary) and can be overridden by command-line flags.

use std::path::PathBuf;

/// Default listing file, as published by the original dataset.
pub const DEFAULT_DATA_PATH: &str = "zomato_chennai.csv";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

pub const DATA_ENV: &str = "DINEVIEW_DATA";
pub const PORT_ENV: &str = "DINEVIEW_PORT";

/// Number of cell warnings printed before summarising the rest.
pub const MAX_REPORTED_WARNINGS: usize = 5;

/// Message shown instead of charts when no restaurant is selected.
pub const SELECT_PROMPT: &str = "Select at least one restaurant to view analysis.";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_path: PathBuf,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or invalid values keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            data_path: lookup(DATA_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            port: lookup(PORT_ENV)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, data_path: Option<PathBuf>, port: Option<u16>) -> Self {
        if let Some(path) = data_path {
            self.data_path = path;
        }
        if let Some(port) = port {
            self.port = port;
        }
        self
    }
}
