use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;

use verdict_classifiers::pipeline;
use verdict_classifiers::report::ComparisonReport;
use verdict_cli::input;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or(
            "VERDICT_LOG",
            "error,verdict=info,verdict_cli=info,verdict_classifiers=info",
        ))
        .init();

    let matches = input::command().get_matches();
    let config = input::config_from_arguments(&matches)?;

    log::info!("Training {} model(s) on {}", config.models.len(), config.source);

    let report = match pipeline::run(&config) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Pipeline failed: {:#}", e);
            std::process::exit(1);
        }
    };

    let format = matches.get_one::<String>("format").map(String::as_str).unwrap_or("text");
    let rendered = render(&report, format)?;

    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            log::info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}

fn render(report: &ComparisonReport, format: &str) -> Result<String> {
    match format {
        "json" => {
            let mut json = serde_json::to_string_pretty(report)
                .context("Failed to serialize the report")?;
            json.push('\n');
            Ok(json)
        }
        _ => Ok(report.to_string()),
    }
}
