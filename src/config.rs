use std::path::Path;

use serde::{Deserialize, Serialize};

/// Inputs longer than this many bytes are rejected by the checked entry point
const MAX_INPUT_LEN: usize = 4096;
const MAX_BOOST: f64 = 10.0;
const DEFAULT_BOOST: f64 = 1.0;
const MAX_FUZZY: f64 = 2.0;
const DEFAULT_FUZZY: f64 = 2.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("config is malformed: {0}")]
    Yaml(#[from] serde_yml::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "max_input_len")]
    pub max_input_len: usize,

    /// Upper clamp for `^n`
    #[serde(default = "max_boost")]
    pub max_boost: f64,
    /// Used when `^` is not followed by a number
    #[serde(default = "default_boost")]
    pub default_boost: f64,

    /// Upper clamp for `~n`
    #[serde(default = "max_fuzzy")]
    pub max_fuzzy: f64,
    /// Used when `~` is not followed by a number
    #[serde(default = "default_fuzzy")]
    pub default_fuzzy: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_input_len: MAX_INPUT_LEN,
            max_boost: MAX_BOOST,
            default_boost: DEFAULT_BOOST,
            max_fuzzy: MAX_FUZZY,
            default_fuzzy: DEFAULT_FUZZY,
        }
    }
}

fn max_input_len() -> usize {
    MAX_INPUT_LEN
}

fn max_boost() -> f64 {
    MAX_BOOST
}

fn default_boost() -> f64 {
    DEFAULT_BOOST
}

fn max_fuzzy() -> f64 {
    MAX_FUZZY
}

fn default_fuzzy() -> f64 {
    DEFAULT_FUZZY
}

/// Replaces a negative or non-finite limit with `fallback`.
fn sane_limit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        fallback
    }
}

impl Config {
    pub fn validate(&mut self) {
        if self.max_input_len == 0 {
            self.max_input_len = MAX_INPUT_LEN
        }

        self.max_boost = sane_limit(self.max_boost, MAX_BOOST);
        self.max_fuzzy = sane_limit(self.max_fuzzy, MAX_FUZZY);

        // defaults must lie inside [0, max]
        self.default_boost = sane_limit(self.default_boost, DEFAULT_BOOST).min(self.max_boost);
        self.default_fuzzy = sane_limit(self.default_fuzzy, DEFAULT_FUZZY).min(self.max_fuzzy);
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        // an empty document is a valid, all-defaults config
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };

        config.validate();
        log::debug!("loaded config: {config:?}");

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml_str(&yaml)
    }
}
