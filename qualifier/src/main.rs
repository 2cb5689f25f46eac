//! Qualifier binary entry point

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use qualifier::pipeline::RunReport;
use qualifier::{HttpProfileFetcher, Pipeline, RunConfig, ScoringEngine};
use shared::logging;
use shared::ScoredLead;

#[derive(Parser)]
#[command(name = "qualifier")]
#[command(about = "Scores professional profiles against qualification criteria and emits ranked leads")]
struct Args {
    /// Input configuration document (JSON)
    #[arg(long)]
    input: PathBuf,

    /// Write the result document here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pretty-print the result document
    #[arg(long)]
    pretty: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Override the minimum qualification score
    #[arg(long)]
    min_score: Option<f64>,

    /// Override the fetch concurrency limit
    #[arg(long)]
    concurrency: Option<usize>,

    /// Override the cap on qualified leads
    #[arg(long)]
    max_results: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init_tracing(Some(&args.log_level));

    let mut config = RunConfig::load(&args.input)
        .with_context(|| format!("loading configuration from {}", args.input.display()))?;

    if let Some(min_score) = args.min_score {
        config.minimum_score = min_score;
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(max_results) = args.max_results {
        config.max_results = Some(max_results);
    }

    if !config.scoring_weights.validate() {
        warn!("⚠️ Scoring weights do not sum to 1.0, normalizing");
        config.scoring_weights.normalize();
    }
    config.validate()?;

    let criteria = &config.qualification_criteria;
    info!(
        "Qualification criteria: {} job titles, {} industries, {} locations",
        criteria.target_job_titles.len(),
        criteria.target_industries.len(),
        criteria.target_locations.len()
    );
    info!("Minimum score threshold: {}", config.minimum_score);
    info!(
        "Processing with concurrency {} and {}ms request delay",
        config.concurrency, config.request_delay_ms
    );

    let auth_token = env::var("PROFILE_API_TOKEN").ok();
    if auth_token.is_none() {
        warn!("⚠️ PROFILE_API_TOKEN not set - restricted profiles may be denied");
    }

    let fetcher = HttpProfileFetcher::new(auth_token);
    let engine = ScoringEngine::new(config.qualification_criteria.clone(), config.scoring_weights)?;
    let pipeline = Pipeline::new(fetcher, engine, config.pipeline_settings());

    let report = pipeline.run(config.profile_urls.clone()).await?;

    if report.qualified_leads.is_empty() {
        warn!("No leads met the qualification criteria");
    }

    let document = render_output(&report, config.include_score_breakdown, args.pretty)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &document)
                .with_context(|| format!("writing results to {}", path.display()))?;
            info!(
                "💾 Saved {} qualified leads to {}",
                report.qualified_leads.len(),
                path.display()
            );
        }
        None => println!("{document}"),
    }

    Ok(())
}

/// Result document: qualified leads (full or summary shape) plus statistics.
fn render_output(
    report: &RunReport,
    include_breakdown: bool,
    pretty: bool,
) -> anyhow::Result<String> {
    let leads = if include_breakdown {
        serde_json::to_value(&report.qualified_leads)?
    } else {
        let summaries: Vec<_> = report
            .qualified_leads
            .iter()
            .map(ScoredLead::summary)
            .collect();
        serde_json::to_value(summaries)?
    };

    let document = serde_json::json!({
        "qualified_leads": leads,
        "stats": report.stats,
    });

    let rendered = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    Ok(rendered)
}
