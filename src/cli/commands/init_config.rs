//! Write a default configuration file.

use algotrader_config::{to_toml, AppConfig};
use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use crate::cli::InitConfigArgs;

pub fn run(args: InitConfigArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            config_path.display()
        );
    }

    if let Some(dir) = config_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let rendered = to_toml(&AppConfig::default())?;
    std::fs::write(config_path, rendered)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    info!(path = %config_path.display(), "Default configuration written");
    println!("Wrote {}", config_path.display());
    Ok(())
}
