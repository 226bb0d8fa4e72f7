//! Adapt Command
//!
//! Normalizes a stored report document of any known producer generation
//! into the canonical shape.
//!
//! Usage:
//!   sitewarden adapt report-v1.json [-o report.json]

use std::path::{Path, PathBuf};

use crate::adapter::VersionAdapter;
use crate::cli::Output;
use crate::report;
use crate::types::Result;

pub fn run(input: &Path, output: Option<PathBuf>) -> Result<()> {
    let out = Output::new();

    let raw = std::fs::read_to_string(input)?;
    let document: serde_json::Value = serde_json::from_str(&raw)?;
    let adapted = VersionAdapter::adapt(document)?;
    let rendered = report::to_json(&adapted)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            out.success(&format!(
                "Adapted {} -> {}",
                input.display(),
                path.display()
            ));
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
