use super::config::{default_config_path, ConcordConfig};
use std::path::PathBuf;
use tracing::info;

/// Write a commented default configuration file
pub async fn execute(
    config: Option<String>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.map(PathBuf::from).unwrap_or_else(default_config_path);

    if path.exists() && !force {
        return Err(format!(
            "config file already exists at {} (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    ConcordConfig::create_default(&path)?;
    info!(path = %path.display(), "wrote default config");

    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
