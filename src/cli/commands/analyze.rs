//! Analyze Command
//!
//! Runs the full four-stage pipeline for one site and prints or writes the
//! resulting report.
//!
//! Usage:
//!   sitewarden analyze <SITE_ID> [--provider mock] [-f json] [-o report.json]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::Output;
use crate::collect::ContextCollector;
use crate::config::{Config, ConfigLoader};
use crate::llm::create_provider;
use crate::pipeline::{AnalysisPipeline, StageExecutor};
use crate::report;
use crate::services::{
    HttpAnalysisStore, HttpIncidentHistoryService, HttpSiteInfoService, HttpTaskScheduleService,
    HttpWeatherService, init_shared_store,
};
use crate::types::{Result, SafetyReport};

pub struct AnalyzeOptions {
    pub site_id: String,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub format: String,
    pub output: Option<PathBuf>,
}

pub async fn run(opts: AnalyzeOptions) -> Result<()> {
    let out = Output::new();

    let mut config = ConfigLoader::load()?;
    if let Some(provider) = opts.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = opts.model {
        config.llm.model = Some(model);
    }
    config.validate()?;

    out.header("Site Safety Analysis");
    out.info(&format!(
        "Site {} via {} provider",
        opts.site_id, config.llm.provider
    ));

    let pipeline = build_pipeline(&config)?;

    match pipeline.run(&opts.site_id).await {
        Ok(report) => {
            render(&out, &report, &opts.format, opts.output.as_deref())?;
            out.decision(report.synthesis.decision.decision);
            out.success(&format!(
                "Report {} generated in {}ms",
                report.metadata.report_id, report.pipeline.execution_time_ms
            ));
            Ok(())
        }
        Err(failure) => {
            out.error(&format!(
                "Analysis failed at {} ({:?}): {}",
                failure.stage, failure.kind, failure.error
            ));
            Err(failure.error)
        }
    }
}

fn build_pipeline(config: &Config) -> Result<AnalysisPipeline> {
    init_shared_store(Arc::new(HttpAnalysisStore::new(&config.services)?));

    let collector = ContextCollector::new(
        Arc::new(HttpWeatherService::new(&config.services)?),
        Arc::new(HttpSiteInfoService::new(&config.services)?),
        Arc::new(HttpTaskScheduleService::new(&config.services)?),
        Arc::new(HttpIncidentHistoryService::new(&config.services)?),
        &config.collection,
    );

    let executor = StageExecutor::new(
        create_provider(&config.llm)?,
        config.retry.clone(),
        Duration::from_secs(config.llm.timeout_secs),
    );

    Ok(AnalysisPipeline::new(
        collector,
        executor,
        config.llm.max_output_tokens,
    ))
}

fn render(
    out: &Output,
    report: &SafetyReport,
    format: &str,
    output: Option<&std::path::Path>,
) -> Result<()> {
    let rendered = match format {
        "json" => report::to_json(report)?,
        _ => report::to_text(report),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            out.info(&format!("Report written to {}", path.display()));
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
