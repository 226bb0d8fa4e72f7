//! Report Command
//!
//! Retrieves a previously stored report by id and renders it.
//!
//! Usage:
//!   sitewarden report <REPORT_ID> [-f json]

use crate::cli::Output;
use crate::config::ConfigLoader;
use crate::report;
use crate::services::{AnalysisStore, HttpAnalysisStore};
use crate::types::Result;

pub async fn run(report_id: &str, format: &str) -> Result<()> {
    let out = Output::new();
    let config = ConfigLoader::load()?;
    let store = HttpAnalysisStore::new(&config.services)?;

    match store.fetch_report(report_id).await? {
        Some(stored) => {
            let rendered = match format {
                "json" => report::to_json(&stored)?,
                _ => report::to_text(&stored),
            };
            println!("{}", rendered);
            Ok(())
        }
        None => {
            out.warning(&format!("No report found with id {}", report_id));
            Ok(())
        }
    }
}
