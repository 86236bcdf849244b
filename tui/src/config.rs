//! Layered configuration: defaults, then a TOML file, then `PHOTOTERM_*`
//! environment variables.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use config::Config;
use config::Environment;
use config::File;
use phototerm_preview::DEFAULT_LIST_WIDTH;
use phototerm_preview::DEFAULT_RENDERER_PROGRAM;
use phototerm_preview::MAX_LIST_WIDTH;
use phototerm_preview::MIN_LIST_WIDTH;
use serde::Deserialize;
use thiserror::Error;

const ENV_PREFIX: &str = "PHOTOTERM";
const APP_DIR: &str = "phototerm";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found at path: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub renderer: RendererConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RendererConfig {
    /// Name or path of the viu-compatible renderer.
    #[serde(default = "default_program")]
    pub program: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LayoutConfig {
    /// Preferred file list width in columns; clamped on load.
    #[serde(default = "default_list_width")]
    pub list_width: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    /// Directory for `phototerm.log`. Defaults to the platform cache dir.
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_program() -> String {
    DEFAULT_RENDERER_PROGRAM.to_string()
}

fn default_list_width() -> u16 {
    DEFAULT_LIST_WIDTH
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            list_width: default_list_width(),
        }
    }
}

impl AppConfig {
    /// Load from `explicit` (which must exist) or the default location
    /// (which may be absent), then the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_with_env(explicit, None)
    }

    /// Like [`AppConfig::load`], reading environment overrides from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        explicit: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("renderer.program", default_program())?
            .set_default("layout.list_width", i64::from(default_list_width()))?;

        match explicit {
            Some(path) if !path.exists() => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Some(path) => builder = builder.add_source(File::from(path).required(true)),
            None => {
                if let Some(path) = default_path() {
                    builder = builder.add_source(File::from(path).required(false));
                }
            }
        }

        // PHOTOTERM_LAYOUT__LIST_WIDTH=30 sets layout.list_width.
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env.map(|vars| vars.into_iter().collect())),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()
    }

    fn validate(mut self) -> Result<Self> {
        if self.renderer.program.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "renderer.program must not be empty".to_string(),
            ));
        }
        self.layout.list_width = self.layout.list_width.clamp(MIN_LIST_WIDTH, MAX_LIST_WIDTH);
        Ok(self)
    }

    /// Where the log file goes.
    pub fn log_dir(&self) -> PathBuf {
        self.log.dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
        })
    }
}

/// `$XDG_CONFIG_HOME/phototerm/config.toml` or the platform equivalent.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
