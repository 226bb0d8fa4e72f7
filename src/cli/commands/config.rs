//! Config Command
//!
//! Inspect sitewarden configuration.
//!
//! Usage:
//!   sitewarden config show [-f json]
//!   sitewarden config path

use crate::config::ConfigLoader;
use crate::types::{Result, WardenError};

/// Show the merged effective configuration
pub fn show(format: &str) -> Result<()> {
    let config = ConfigLoader::load()?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&config)?),
        _ => {
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| WardenError::Config(format!("Cannot render config: {}", e)))?;
            println!("{}", rendered);
        }
    }
    Ok(())
}

/// Show configuration file paths and whether each exists
pub fn path() -> Result<()> {
    if let Some(global) = ConfigLoader::global_config_path() {
        let marker = if global.exists() { "(present)" } else { "(absent)" };
        println!("Global:  {} {}", global.display(), marker);
    }
    let project = ConfigLoader::project_config_path();
    let marker = if project.exists() { "(present)" } else { "(absent)" };
    println!("Project: {} {}", project.display(), marker);
    println!("Env:     SITEWARDEN_* variables override both");
    Ok(())
}
