use dataset::split::{DEFAULT_SEED, DEFAULT_SUBFOLDER};
use dataset::{ConflictPolicy, SplitRatios};
use log::LevelFilter;
use serde::Deserialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use utils::{ExtensionSet, DEFAULT_VIDEO_EXTENSIONS};

#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to read config: {}", e),
            ConfigError::Yaml(e) => write!(f, "Failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Yaml(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Yaml(e)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "spark")]
    pub logging: Option<LoggingConfig>,
    pub split: SplitConfig,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub logging_path: PathBuf,
    #[serde(default = "default_level")]
    pub level: String,
}

impl LoggingConfig {
    pub fn level_filter(&self) -> io::Result<LevelFilter> {
        LevelFilter::from_str(&self.level).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Unknown log level '{}'", self.level),
            )
        })
    }
}

fn default_level() -> String {
    "info".to_string()
}

/// Defaults for the `split` command; CLI flags take precedence.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub train: f64,
    pub val: f64,
    pub test: f64,
    pub seed: u64,
    pub subfolder: String,
    pub extensions: Vec<String>,
    pub on_conflict: ConflictPolicy,
}

impl Default for SplitConfig {
    fn default() -> Self {
        let ratios = SplitRatios::default();
        Self {
            train: ratios.train,
            val: ratios.val,
            test: ratios.test,
            seed: DEFAULT_SEED,
            subfolder: DEFAULT_SUBFOLDER.to_string(),
            extensions: DEFAULT_VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            on_conflict: ConflictPolicy::Fail,
        }
    }
}

impl SplitConfig {
    pub fn ratios(&self) -> SplitRatios {
        SplitRatios::new(self.train, self.val, self.test)
    }

    pub fn extensions(&self) -> ExtensionSet {
        ExtensionSet::new(&self.extensions)
    }
}
