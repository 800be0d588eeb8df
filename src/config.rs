use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::Result;
use crate::session::{SessionConfig, DEFAULT_SESSION_SECS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "default_session_secs")]
    pub session_secs: u32,
    #[serde(default = "default_show_example_words")]
    pub show_example_words: bool,
}

fn default_session_secs() -> u32 {
    DEFAULT_SESSION_SECS
}

fn default_show_example_words() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session_secs: default_session_secs(),
            show_example_words: default_show_example_words(),
        }
    }
}

impl Config {
    /// Replace values a hand-edited file may carry but a session cannot run with.
    pub fn normalize(&mut self) {
        if self.session_secs == 0 {
            warn!(
                default = DEFAULT_SESSION_SECS,
                "session_secs must be at least 1, using the default"
            );
            self.session_secs = default_session_secs();
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_secs: self.session_secs,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
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
    /// Missing file means defaults; an unreadable one is logged and also means defaults.
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };

        match serde_json::from_slice::<Config>(&bytes) {
            Ok(mut cfg) => {
                cfg.normalize();
                cfg
            }
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config file");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
