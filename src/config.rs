use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spitroast_core::SmeltingTable;
use spitroast_world::{SpitSettings, DEFAULT_SPIT_DELAY};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/spitroast.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpitroastConfig {
    /// Seconds over a burning campfire before food is cooked.
    pub campfire_spit_delay: u32,
    /// Ticks to run when no script or `--max-ticks` says otherwise.
    pub ticks: u64,
    /// Where spits are saved. Nothing is saved when unset.
    pub save_path: Option<PathBuf>,
    /// JSON recipe list replacing the built-in smelting table.
    pub recipes: Option<PathBuf>,
}

impl Default for SpitroastConfig {
    fn default() -> Self {
        Self {
            campfire_spit_delay: DEFAULT_SPIT_DELAY,
            ticks: 1200,
            save_path: None,
            recipes: None,
        }
    }
}

impl SpitroastConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SpitroastConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SpitroastConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                SpitroastConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }

    pub fn spit_settings(&self) -> SpitSettings {
        SpitSettings {
            campfire_spit_delay: self.campfire_spit_delay,
        }
    }

    /// Smelting table from `recipes`, or the built-in one.
    pub fn smelting_table(&self) -> SmeltingTable {
        match self.recipes.as_deref() {
            Some(path) => load_recipes(path).unwrap_or_else(|err| {
                warn!("{err:#}. Using built-in recipes");
                SmeltingTable::default()
            }),
            None => SmeltingTable::default(),
        }
    }
}

/// Load a JSON recipe list, returning errors to the caller.
pub fn load_recipes(path: &Path) -> Result<SmeltingTable> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read recipes {}", path.display()))?;
    SmeltingTable::from_json_str(&contents)
        .with_context(|| format!("Invalid recipes {}", path.display()))
}
