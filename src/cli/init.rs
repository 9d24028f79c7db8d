//! Init command implementation

use anyhow::{Result, bail};
use std::path::PathBuf;

use progression::config::{EngineConfig, write_default_config};

/// Write the default configuration
/// By default creates the global config at ~/.progression/config.toml
/// Use --config to specify a custom path
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(EngineConfig::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    write_default_config(&config_path)?;
    println!("Created: {}", config_path.display());

    Ok(())
}
