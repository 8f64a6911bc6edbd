//! CLI subcommand implementations.

pub mod batch;
pub mod config;
pub mod extract;
pub mod metrics;
pub mod validate;

use std::fs;
use std::io::Read;
use std::path::Path;

use recoup_core::models::RecoupConfig;

/// Load the configuration from an explicit path, or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RecoupConfig> {
    if let Some(path) = config_path {
        Ok(RecoupConfig::from_file(Path::new(path))?)
    } else {
        Ok(RecoupConfig::default())
    }
}

/// Read a text input; `-` reads standard input.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    Ok(fs::read_to_string(path)?)
}
