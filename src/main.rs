use anyhow::{anyhow, Result};
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

use restrs::config::AppConfig;
use restrs::error::RestRsError;
use restrs::estimator::BedtimeEstimator;
use restrs::logging::{init_logging, LogConfig, LogLevel};
use restrs::model::LinearSleepModel;
use restrs::models::{ClockFormat, SleepHabits};

/// RestRS - Bedtime Estimation CLI
///
/// A Rust-based tool that estimates the ideal bedtime from a desired
/// wake-up time, desired sleep duration, and daily caffeine intake,
/// using a pre-trained sleep regression model.
#[derive(Parser)]
#[command(name = "restrs")]
#[command(author = "RestRS Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Bedtime Estimation CLI", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the ideal bedtime from your habits
    Estimate {
        /// Desired wake-up time (HH:MM, 24-hour)
        #[arg(short, long)]
        wake: Option<String>,

        /// Desired amount of sleep in hours (4.0-12.0, 0.25 steps)
        #[arg(short, long)]
        sleep: Option<f64>,

        /// Daily coffee intake in cups (1-20)
        #[arg(short = 'k', long)]
        coffee: Option<u8>,

        /// Clock format for the result (24h, 12h)
        #[arg(short = 'f', long)]
        format: Option<String>,
    },

    /// Show details of the active sleep model
    Model {
        /// Inspect a specific artifact file instead of the active model
        #[arg(short, long)]
        artifact: Option<PathBuf>,
    },

    /// Configure application settings
    Config {
        /// List all configuration options
        #[arg(short, long)]
        list: bool,

        /// Set a configuration value (key=value)
        #[arg(short, long)]
        set: Option<String>,

        /// Get a configuration value
        #[arg(short, long)]
        get: Option<String>,
    },
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Input")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_or_default(),
    };

    // CLI verbosity wins over the configured level
    let level = if cli.verbose > 0 {
        LogLevel::from_verbosity(cli.verbose)
    } else {
        config.logging.level
    };
    init_logging(&LogConfig {
        level,
        format: config.logging.format,
        file_path: config.logging.file_path.clone(),
        include_spans: false,
    })?;

    match cli.command {
        Commands::Estimate {
            wake,
            sleep,
            coffee,
            format,
        } => run_estimate(&config, wake, sleep, coffee, format),

        Commands::Model { artifact } => run_model_info(&config, artifact),

        Commands::Config { list, set, get } => run_config(cli.config, list, set, get),
    }
}

fn run_estimate(
    config: &AppConfig,
    wake: Option<String>,
    sleep: Option<f64>,
    coffee: Option<u8>,
    format: Option<String>,
) -> Result<()> {
    let wake_time = match wake {
        Some(raw) => parse_wake_time(&raw)?,
        None => config.defaults.wake_time,
    };
    let habits = SleepHabits::new(
        wake_time,
        sleep.unwrap_or(config.defaults.sleep_hours),
        coffee.unwrap_or(config.defaults.coffee_cups),
    );

    if let Err(err) = habits.validate() {
        eprintln!("{}", err.user_message().red());
        std::process::exit(1);
    }

    let clock_format = match format {
        Some(raw) => raw.parse::<ClockFormat>().map_err(|e| anyhow!(e))?,
        None => config.display.clock_format,
    };

    let estimator = build_estimator(config)?;

    match estimator.estimate(habits.wake_time, habits.desired_sleep_hours, habits.coffee_cups) {
        Ok(estimate) => {
            let bedtime = estimate.format_bedtime(clock_format);
            let suffix = if estimate.crosses_midnight {
                " (previous day)"
            } else {
                ""
            };
            println!(
                "{} {}{}",
                "Your ideal bedtime is...".green().bold(),
                bedtime.green().bold(),
                suffix.dimmed()
            );

            let rows = vec![
                SummaryRow {
                    name: "Wake-up time".to_string(),
                    value: clock_format.format_time(habits.wake_time),
                },
                SummaryRow {
                    name: "Desired sleep".to_string(),
                    value: format!("{} h", habits.desired_sleep_hours),
                },
                SummaryRow {
                    name: "Predicted sleep need".to_string(),
                    value: format!("{:.2} h", estimate.actual_sleep_hours),
                },
                SummaryRow {
                    name: "Coffee intake".to_string(),
                    value: if habits.coffee_cups == 1 {
                        "1 cup".to_string()
                    } else {
                        format!("{} cups", habits.coffee_cups)
                    },
                },
                SummaryRow {
                    name: "Bedtime".to_string(),
                    value: format!("{}{}", bedtime, suffix),
                },
            ];
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
            Ok(())
        }
        Err(err) => {
            tracing::error!(error = %err, "Estimation failed");
            eprintln!("{}", err.user_message().red());
            std::process::exit(1);
        }
    }
}

fn run_model_info(config: &AppConfig, artifact: Option<PathBuf>) -> Result<()> {
    let (model, source) = match artifact.or_else(|| config.model.artifact_path.clone()) {
        Some(path) => {
            let model = LinearSleepModel::from_file(&path).map_err(RestRsError::from)?;
            (model, path.display().to_string())
        }
        None => {
            let model = LinearSleepModel::bundled().map_err(RestRsError::from)?;
            (model, "(bundled)".to_string())
        }
    };

    let artifact = model.artifact();
    println!("{}", "Active sleep model".blue().bold());
    println!("  Artifact: {}", source);
    println!("  Name:    {}", artifact.name);
    println!("  Version: {}", artifact.version);
    println!("  Inputs:  {}", artifact.inputs.join(", "));
    println!("  Output:  {}", artifact.output);
    println!("  Intercept: {}", artifact.intercept);
    println!(
        "  Weights:   wake={} estimatedSleep={} coffee={}",
        artifact.weights.wake, artifact.weights.estimated_sleep, artifact.weights.coffee
    );
    Ok(())
}

fn run_config(
    config_path: Option<PathBuf>,
    list: bool,
    set: Option<String>,
    get: Option<String>,
) -> Result<()> {
    let path = config_path.unwrap_or_else(AppConfig::default_config_path);
    let mut config = if path.exists() {
        AppConfig::load_from_file(&path)?
    } else {
        AppConfig::default()
    };

    if list {
        println!("{}", "Configuration".white().bold());
        for (key, value) in config.list_values() {
            println!("  {} = {}", key, value);
        }
    } else if let Some(key_value) = set {
        let (key, value) = key_value
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected key=value, got: {}", key_value))?;
        config.set_value(key.trim(), value.trim())?;
        config.save_to_file(&path)?;
        println!("{}", format!("✓ Set {}", key.trim()).green());
    } else if let Some(key) = get {
        match config.get_value(&key) {
            Some(value) => println!("{}", value),
            None => {
                eprintln!("{}", format!("Unknown configuration key: {}", key).red());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn build_estimator(config: &AppConfig) -> Result<BedtimeEstimator> {
    let estimator = match &config.model.artifact_path {
        Some(path) => {
            let model = LinearSleepModel::from_file(path).map_err(RestRsError::from)?;
            BedtimeEstimator::new(Box::new(model))
        }
        None => BedtimeEstimator::with_default_model()?,
    };
    tracing::debug!(model = estimator.model_name(), "Estimator ready");
    Ok(estimator)
}

fn parse_wake_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| anyhow!("Invalid wake time {:?}, expected HH:MM (24-hour)", raw))
}
