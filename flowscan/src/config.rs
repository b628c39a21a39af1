//! Configuration loading.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::constants::CONFIG_FILENAME;
use crate::resolve::ResolverOptions;
use crate::taint::TrackerOptions;

#[derive(Debug, Deserialize, Default, Clone)]
/// Top-level configuration struct.
pub struct Config {
    #[serde(default)]
    /// The main configuration section for flowscan.
    pub flowscan: FlowscanConfig,
    /// The path to the configuration file this was loaded from.
    /// Set during `load_from_path`, `None` if using defaults or programmatic config.
    #[serde(skip)]
    pub config_file_path: Option<std::path::PathBuf>,
}

#[derive(Debug, Deserialize, Default, Clone)]
/// Configuration options for flowscan.
pub struct FlowscanConfig {
    /// Minimum length of a bare, extension-less dependency spec before
    /// suffix matching is attempted.
    pub min_spec_len: Option<usize>,
    /// Extension (without the dot) appended to extension-less specs.
    pub default_extension: Option<String>,
    /// Taint source patterns (variable and call names).
    pub sources: Option<Vec<String>>,
    /// Taint sink-call patterns.
    pub sinks: Option<Vec<String>>,
    /// List of folders to exclude when walking trees and fixtures.
    pub exclude_folders: Option<Vec<String>>,
}

impl Config {
    /// Loads configuration from default locations (.flowscan.toml in current dir or above).
    #[must_use]
    pub fn load() -> Self {
        Self::load_from_path(Path::new("."))
    }

    /// Loads configuration starting from a specific path and traversing up.
    #[must_use]
    pub fn load_from_path(path: &Path) -> Self {
        let mut current = path.to_path_buf();
        if current.is_file() {
            current.pop();
        }

        loop {
            let config_toml = current.join(CONFIG_FILENAME);
            if config_toml.exists() {
                if let Ok(content) = fs::read_to_string(&config_toml) {
                    if let Ok(mut config) = toml::from_str::<Config>(&content) {
                        config.config_file_path = Some(config_toml);
                        return config;
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        Config::default()
    }

    /// Resolver thresholds, with config values overriding defaults.
    #[must_use]
    pub fn resolver_options(&self) -> ResolverOptions {
        let defaults = ResolverOptions::default();
        ResolverOptions {
            min_spec_len: self.flowscan.min_spec_len.unwrap_or(defaults.min_spec_len),
            default_extension: self
                .flowscan
                .default_extension
                .clone()
                .unwrap_or(defaults.default_extension),
        }
    }

    /// Tracker patterns, with config values overriding defaults.
    #[must_use]
    pub fn tracker_options(&self) -> TrackerOptions {
        let defaults = TrackerOptions::default();
        TrackerOptions {
            sources: self.flowscan.sources.clone().unwrap_or(defaults.sources),
            sinks: self.flowscan.sinks.clone().unwrap_or(defaults.sinks),
        }
    }

    /// Exclude folders from the config, empty when unset.
    #[must_use]
    pub fn exclude_folders(&self) -> Vec<String> {
        self.flowscan.exclude_folders.clone().unwrap_or_default()
    }
}
