use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::PoolError;
use crate::pools::{ContentPools, SupportedLanguage};

/// Persisted preferences, stored as JSON
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub language: String,
    pub bell: bool,
    pub pools_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "english".to_string(),
            bell: true,
            pools_path: None,
        }
    }
}

impl From<&Settings> for Config {
    fn from(s: &Settings) -> Self {
        Self {
            language: s.language.to_string().to_lowercase(),
            bell: s.bell,
            pools_path: s.pools_path.clone(),
        }
    }
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub language: Option<SupportedLanguage>,
    pub pools_path: Option<PathBuf>,
    pub quiet: bool,
    pub seed: Option<u64>,
}

/// Effective settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub language: SupportedLanguage,
    pub bell: bool,
    pub pools_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(&Config::default(), &Overrides::default())
    }
}

impl Settings {
    pub fn resolve(config: &Config, overrides: &Overrides) -> Self {
        let language = overrides.language.unwrap_or_else(|| {
            SupportedLanguage::from_name(&config.language).unwrap_or_else(|| {
                tracing::warn!(language = %config.language, "unknown language in config, using default");
                SupportedLanguage::default()
            })
        });

        Self {
            language,
            bell: config.bell && !overrides.quiet,
            pools_path: overrides
                .pools_path
                .clone()
                .or_else(|| config.pools_path.clone()),
            seed: overrides.seed,
        }
    }

    /// Custom pools file when configured, built-in pools otherwise
    pub fn load_pools(&self) -> Result<ContentPools, PoolError> {
        match &self.pools_path {
            Some(path) => ContentPools::from_file(path),
            None => ContentPools::builtin(self.language),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring invalid config file");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
