//! Trip planner - destination to map-ready itinerary
//!
//! CLI entry point for serving the HTTP API and running one-off plans.

use std::fs;
use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use eyre::{Context, Result};
use tracing::info;

use tripplanner::cli::{Cli, Command, OutputFormat};
use tripplanner::config::Config;
use tripplanner::geocode::create_geocoder;
use tripplanner::plan::{PlanInput, PlanOrchestrator, PlanResponse, parse_interests};
use tripplanner::server;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripplanner")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("tripplanner.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Trip planner loaded config: model={}", config.llm.model);

    match cli.command {
        Some(Command::Serve { bind, port }) => cmd_serve(config, bind, port).await,
        Some(Command::Plan {
            destination,
            interests,
            start_date,
            end_date,
            format,
        }) => cmd_plan(&config, destination, interests, start_date, end_date, format).await,
        Some(Command::Geocode { query }) => cmd_geocode(&config, &query).await,
        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Run the HTTP API
async fn cmd_serve(mut config: Config, bind: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()?;

    let orchestrator = PlanOrchestrator::from_config(&config)?;
    server::serve(&config, orchestrator).await
}

/// Generate one plan and print it
async fn cmd_plan(
    config: &Config,
    destination: String,
    interests: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let interests = interests
        .map(|s| parse_interests(&serde_json::Value::String(s)))
        .unwrap_or_default();
    let input = PlanInput::new(destination)
        .with_dates(start_date, end_date)
        .with_interests(interests);

    let orchestrator = PlanOrchestrator::from_config(config)?;
    let response = orchestrator.plan(input).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&response)?),
        OutputFormat::Text => print_plan(&response),
    }
    Ok(())
}

fn print_plan(plan: &PlanResponse) {
    println!("{}", plan.destination);
    if !plan.best_time_to_visit.is_empty() {
        println!("Best time to visit: {}", plan.best_time_to_visit);
    }
    if let Some(center) = &plan.center {
        println!("Map center: {} ({:.5}, {:.5})", center.label, center.lat, center.lng);
    }
    println!();

    for poi in &plan.pois {
        let pin = match poi.location {
            Some(loc) => format!("({:.5}, {:.5})", loc.lat, loc.lng),
            None => "(no pin)".to_string(),
        };
        println!("{}. {} [{}] {}", poi.id, poi.name, poi.category, pin);
        println!("   {}", poi.summary);
        for highlight in &poi.highlights {
            println!("   - {}", highlight);
        }
        if !poi.tags.is_empty() {
            println!("   tags: {}", poi.tags.join(", "));
        }
    }

    println!();
    println!("Generated by {} at {}", plan.meta.model, plan.meta.generated_at.to_rfc3339());
}

/// Resolve a place through the configured geocoder
async fn cmd_geocode(config: &Config, query: &str) -> Result<()> {
    let geocoder = create_geocoder(&config.geocoder)?;
    match geocoder.geocode(query, query).await {
        Some(geocode) => println!("{:.6}, {:.6}  {}", geocode.lat, geocode.lng, geocode.label),
        None => println!("No match for: {}", query),
    }
    Ok(())
}
