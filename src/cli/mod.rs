//! CLI command implementations

pub mod badges;
pub mod init;
pub mod record;
pub mod status;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use progression::ProgressionEngine;
use progression::config::EngineConfig;
use progression::store::StateStore;

/// Everything a command needs: validated config, engine and store
pub struct Host {
    pub config: EngineConfig,
    pub engine: ProgressionEngine,
    pub store: StateStore,
}

impl Host {
    pub fn load(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let config = EngineConfig::load(config_path)?;
        let engine = config
            .build_engine()
            .with_context(|| "Invalid progression configuration")?;
        let store = StateStore::new(data_dir.unwrap_or_else(StateStore::default_dir));

        Ok(Self {
            config,
            engine,
            store,
        })
    }

    /// `date` if given, otherwise today in the configured clock reference
    pub fn today(&self, date: Option<NaiveDate>) -> NaiveDate {
        date.unwrap_or_else(|| self.config.clock.reference.today())
    }
}
