//! Init command - initialize configuration file.

use std::path::Path;

use fleetwatch::config::ConfigFile;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Run the init command.
///
/// Existing values are preserved; missing keys are filled with defaults.
pub fn run(config_path: Option<&Path>) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    let config = write_config(&path)?;

    println!("Configuration file: {}", path.display());
    println!();
    println!("Gateway address: ws://{}", config.server.listen);
    println!("Edit this file to customize FleetWatch settings.");
    println!("CLI arguments override config file values when specified.");
    Ok(())
}

fn write_config(path: &Path) -> Result<ConfigFile, CliError> {
    let config = ConfigFile::load_from(path)?;
    config.save_to(path)?;
    Ok(config)
}
