use std::{fs, path::Path, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{Error, Result, fs::config_dir};

mod theme;

pub use theme::{AccentColor, Theme};

const FILE_NAME: &str = "store.toml";

/// Shared handle to the panel's preferences
pub type Cfg = Arc<RwLock<StoreConfig>>;

/// Preferences of the mod panel, serialized to TOML.
///
/// Only the independent scalar cells of the store live here. Mods, versions and the
/// search query are never persisted.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub theme: Theme,
    pub accent_color: AccentColor,
    pub active_tab: usize,
}

impl StoreConfig {
    /// Load the configuration from the Modlunky configuration directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(FILE_NAME))
    }

    /// Load the configuration at `path`. A missing file is created with the defaults, an
    /// unreadable one is replaced by the defaults in memory only.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            match Self::from_toml(&contents) {
                Ok(cfg) => Ok(cfg),
                Err(err) => {
                    warn!("Ignoring invalid configuration at {}: {err}", path.display());
                    Ok(Self::default())
                }
            }
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(Error::from)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_dir()?.join(FILE_NAME))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;

        debug!("Saved configuration to {}", path.display());

        Ok(())
    }

    pub fn into_handle(self) -> Cfg {
        Arc::new(RwLock::new(self))
    }
}
