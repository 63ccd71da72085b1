use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use getset::CopyGetters;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    Result,
    fs::{config_dir, state_dir},
    schedule::LeapDayPolicy,
};

const CURRENT_CONFIG_VERSION: u16 = 1;
const FILE_NAME: &str = "core.toml";
const DATABASE_FILE_NAME: &str = "birthdays.db";

/// Handle to the core configuration
pub type Cfg = Arc<parking_lot::RwLock<CoreConfig>>;

/// The core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, CopyGetters)]
#[serde(default)]
pub struct CoreConfig {
    version: u16,
    /// Where February 29 birthdays are observed in common years
    #[getset(get_copy = "pub")]
    leap_day: LeapDayPolicy,
    /// Database file. Defaults to a file in the state directory.
    database: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            leap_day: LeapDayPolicy::default(),
            database: None,
        }
    }
}

impl CoreConfig {
    /// Load the configuration from the configuration directory, writing the defaults there if
    /// no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            debug!("Wrote default configuration to {}", path.display());
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    /// Location of the configuration file
    pub fn path() -> Result<PathBuf> {
        Ok(config_dir()?.join(FILE_NAME))
    }

    pub fn set_leap_day(&mut self, leap_day: LeapDayPolicy) {
        self.leap_day = leap_day;
    }

    /// The database file, falling back to the state directory
    pub fn database_path(&self) -> Result<PathBuf> {
        match &self.database {
            Some(path) => Ok(path.clone()),
            None => Ok(state_dir()?.join(DATABASE_FILE_NAME)),
        }
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self {
            database: Some(PathBuf::from("/nonexistent/birthdays.db")),
            ..Self::default()
        }
    }
}
