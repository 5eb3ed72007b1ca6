//! Argument surface and configuration assembly for the `verdict` binary.
//!
//! Precedence is defaults, then the JSON config file, then individual flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};

use verdict_classifiers::config::{ModelConfig, PipelineConfig};
use verdict_classifiers::io::loader::DataSource;

pub fn command() -> Command {
    Command::new("verdict")
        .version(clap::crate_version!())
        .about("Train and compare diagnosis classifiers on WDBC-style tabular data")
        .arg_required_else_help(true)
        .arg(
            Arg::new("data")
                .help("Dataset locator: a local CSV path or an http(s) URL")
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to a JSON pipeline configuration file")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("train_fraction")
                .short('f')
                .long("train-fraction")
                .help("Fraction of records assigned to the training partition, in (0, 1)")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("seed")
                .short('s')
                .long("seed")
                .help("Pins the stratified split and every model's RNG")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("threshold")
                .short('t')
                .long("threshold")
                .help("Probability above which a record is called malignant")
                .value_parser(clap::value_parser!(f64)),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .help("Model to train; repeat the flag to compare several")
                .value_parser(["neural-net", "nn", "random-forest", "rf"])
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("Write the report to this file instead of stdout")
                .value_parser(clap::value_parser!(PathBuf))
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .help("Report rendering")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
}

/// Assemble the pipeline configuration from the parsed arguments.
pub fn config_from_arguments(matches: &ArgMatches) -> Result<PipelineConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(data) = matches.get_one::<String>("data") {
        config.source = data.clone();
    }
    if let Some(fraction) = matches.get_one::<f64>("train_fraction") {
        config.train_fraction = *fraction;
    }
    if let Some(threshold) = matches.get_one::<f64>("threshold") {
        config.threshold = *threshold;
    }
    if let Some(models) = matches.get_many::<String>("model") {
        config.models = models
            .map(|name| ModelConfig::from_str(name).map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()?;
    }
    if let Some(seed) = matches.get_one::<u64>("seed") {
        config.seed = *seed;
        for model in &mut config.models {
            model.set_seed(*seed);
        }
    }

    validate_source(&config.source)?;
    Ok(config)
}

/// Load a pipeline configuration from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: PipelineConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}

/// Local sources must exist before the pipeline starts; URLs are resolved
/// later by the loader.
pub fn validate_source(source: &str) -> Result<()> {
    if source.is_empty() {
        anyhow::bail!("No dataset source: pass a DATA argument or set \"source\" in the config");
    }
    if let DataSource::LocalPath(path) = DataSource::parse(source) {
        if !path.exists() {
            anyhow::bail!("Dataset file does not exist: {}", source);
        }
    }
    Ok(())
}
