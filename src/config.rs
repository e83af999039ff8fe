//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treewalk/treewalk.toml`
//! 3. Explicit config file: `--config <file>`
//! 4. Environment variables: `TREEWALK_*` prefix
//! 5. Command-line flags (applied by the CLI via [`Overrides`])

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{Strategy, TreeBuilder};

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid setting '{key}': {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Benchmark and tree-shape settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Levels below the root of the generated tree
    pub depth: u32,
    /// Children per inner node
    pub arity: u32,
    /// Value stored in every node
    pub value: f64,
    /// Measurements per strategy
    pub repeat: u32,
    /// Refuse to build trees larger than this
    pub max_nodes: u64,
    /// Strategies measured by `bench`, in order
    pub strategies: Vec<Strategy>,
}

impl Default for Settings {
    fn default() -> Self {
        let builder = TreeBuilder::default();
        Self {
            depth: builder.depth,
            arity: builder.arity,
            value: builder.value,
            repeat: 1,
            max_nodes: builder.max_nodes,
            strategies: Strategy::ALL.to_vec(),
        }
    }
}

/// Values given on the command line; `None`/empty means "keep the loaded value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub depth: Option<u32>,
    pub arity: Option<u32>,
    pub value: Option<f64>,
    pub repeat: Option<u32>,
    pub strategies: Vec<Strategy>,
}

/// Get the XDG config directory for treewalk.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treewalk").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treewalk.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}` in a path given by the user.
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Load settings from the global config, an optional explicit file and
    /// the process environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        Self::load_layers(global_config_path().as_deref(), config_file, None)
    }

    /// Load settings from explicit layers.
    ///
    /// A missing `global` file is skipped, a missing `local` file is an error.
    /// `env` replaces the process environment as the source of `TREEWALK_*`
    /// variables when given.
    #[instrument(level = "debug", skip(env))]
    pub fn load_layers(
        global: Option<&Path>,
        local: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, SettingsError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("depth", defaults.depth)?
            .set_default("arity", defaults.arity)?
            .set_default("value", defaults.value)?
            .set_default("repeat", defaults.repeat)?
            .set_default("max_nodes", defaults.max_nodes)?
            .set_default(
                "strategies",
                defaults
                    .strategies
                    .iter()
                    .map(|s| s.name().to_string())
                    .collect::<Vec<_>>(),
            )?;

        if let Some(global) = global {
            if global.exists() {
                debug!("global config: {}", global.display());
                builder = builder.add_source(File::from(global).required(false));
            }
        }

        if let Some(local) = local {
            let local = expand_path(local);
            if !local.exists() {
                return Err(SettingsError::NotFound(local));
            }
            debug!("config file: {}", local.display());
            builder = builder.add_source(File::from(local).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("TREEWALK")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("strategies")
                .try_parsing(true)
                .source(env),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Apply command-line overrides, then re-validate.
    pub fn with_overrides(mut self, overrides: &Overrides) -> Result<Self, SettingsError> {
        if let Some(depth) = overrides.depth {
            self.depth = depth;
        }
        if let Some(arity) = overrides.arity {
            self.arity = arity;
        }
        if let Some(value) = overrides.value {
            self.value = value;
        }
        if let Some(repeat) = overrides.repeat {
            self.repeat = repeat;
        }
        if !overrides.strategies.is_empty() {
            self.strategies = overrides.strategies.clone();
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.repeat == 0 {
            return Err(SettingsError::Invalid {
                key: "repeat",
                reason: "must be at least 1".into(),
            });
        }
        if self.strategies.is_empty() {
            return Err(SettingsError::Invalid {
                key: "strategies",
                reason: "at least one strategy is required".into(),
            });
        }
        if !self.value.is_finite() {
            return Err(SettingsError::Invalid {
                key: "value",
                reason: format!("{} is not a finite number", self.value),
            });
        }
        Ok(())
    }

    /// Builder for the tree these settings describe.
    pub fn tree_builder(&self) -> TreeBuilder {
        TreeBuilder::new(self.depth, self.arity)
            .with_value(self.value)
            .with_max_nodes(self.max_nodes)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# treewalk configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/treewalk/treewalk.toml
#   File:   --config <file>
#   Env:    TREEWALK_* environment variables (TREEWALK_STRATEGIES=bottom-up,top-down)
#   Flags:  --depth, --arity, --strategy, ...

# Levels below the root of the generated tree
# depth = 11

# Children per inner node
# arity = 4

# Value stored in every node
# value = 1.0

# Measurements per strategy
# repeat = 1

# Refuse to build trees larger than this many nodes
# max_nodes = 50000000

# Strategies measured by `treewalk bench`
# strategies = ["recursive", "bottom-up", "top-down", "guaranteed-bottom-up", "arena-bottom-up"]
"#
        .to_string()
    }
}
