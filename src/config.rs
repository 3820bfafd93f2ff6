//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/algotrace/algotrace.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `ALGOTRACE_*` prefix, `__` between sections

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::tree::TreeKind;

/// How traces are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TreeSettings {
    /// Tree flavour used when `--kind` is not given
    pub kind: TreeKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Render the tree or matrix carried by every step
    pub show_snapshots: bool,
    /// Prefix steps with their reference line number
    pub show_code_lines: bool,
    /// Print a summary report after graph runs
    pub report: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_snapshots: false,
            show_code_lines: true,
            report: false,
        }
    }
}

/// Unified configuration for algotrace.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub tree: TreeSettings,
    pub output: OutputSettings,
}

/// Raw settings for intermediate parsing: `None` means "not specified, inherit".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub tree: RawTreeSettings,
    pub output: RawOutputSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawTreeSettings {
    pub kind: Option<TreeKind>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOutputSettings {
    pub format: Option<OutputFormat>,
    pub show_snapshots: Option<bool>,
    pub show_code_lines: Option<bool>,
    pub report: Option<bool>,
}

/// Get the XDG config directory for algotrace.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "algotrace").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("algotrace.toml"))
}

/// Expands `~`, `$VAR` and `${VAR}`; returns the input unchanged if expansion fails.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            tree: TreeSettings {
                kind: overlay.tree.kind.unwrap_or(self.tree.kind),
            },
            output: OutputSettings {
                format: overlay.output.format.unwrap_or(self.output.format),
                show_snapshots: overlay
                    .output
                    .show_snapshots
                    .unwrap_or(self.output.show_snapshots),
                show_code_lines: overlay
                    .output
                    .show_code_lines
                    .unwrap_or(self.output.show_code_lines),
                report: overlay.output.report.unwrap_or(self.output.report),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file; unlike the global file it must exist
    pub fn load(explicit: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_layers(global_config_path().as_deref(), explicit)
    }

    /// [`Settings::load`] with the global config location supplied by the caller.
    #[instrument(level = "debug")]
    pub fn load_layers(global: Option<&Path>, explicit: Option<&Path>) -> ApplicationResult<Self> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, skipped when absent
        if let Some(global_path) = global.filter(|p| p.exists()) {
            debug!(path = %global_path.display(), "loading global config");
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            let path = expand_path(path);
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            debug!(path = %path.display(), "loading explicit config");
            current = current.merge_with(&load_raw_settings(&path)?);
        }

        // 4. Environment variables
        Self::apply_env_overrides(current)
    }

    /// Apply ALGOTRACE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("ALGOTRACE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Some(kind) = lookup(&config, "tree.kind")? {
            settings.tree.kind = kind;
        }
        if let Some(format) = lookup(&config, "output.format")? {
            settings.output.format = format;
        }
        if let Some(flag) = lookup(&config, "output.show_snapshots")? {
            settings.output.show_snapshots = flag;
        }
        if let Some(flag) = lookup(&config, "output.show_code_lines")? {
            settings.output.show_code_lines = flag;
        }
        if let Some(flag) = lookup(&config, "output.report")? {
            settings.output.report = flag;
        }
        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# algotrace configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/algotrace/algotrace.toml
#   Explicit: algotrace --config <file>
#   Env:      ALGOTRACE_* environment variables, e.g. ALGOTRACE_OUTPUT__FORMAT=json

[tree]
# Tree flavour for `algotrace tree` when --kind is not given: "bst" or "avl"
# kind = "bst"

[output]
# "text" (colored, one line per step) or "json" (full step records)
# format = "text"

# Render the tree or adjacency matrix carried by every step
# show_snapshots = false

# Prefix every step with its reference line number
# show_code_lines = true

# Print a summary report after graph algorithm runs
# report = false
"#
        .to_string()
    }
}

/// A missing key is `None`; a present but malformed one is an error.
fn lookup<T: DeserializeOwned>(config: &Config, key: &str) -> ApplicationResult<Option<T>> {
    match config.get::<T>(key) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
