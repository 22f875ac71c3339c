//! Causeway Main Binary
//!
//! Single entry point for the incident analysis engine:
//! - Serve: REST API server exposing analysis and triage endpoints
//! - Analyze: one-shot recurring-problem analysis over an incidents file
//! - Root-cause: one-shot root-cause analysis over an incidents file
//! - Triage: one-shot assessment of a single incident file

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use causeway_api::{create_router, ApiState};
use causeway_core::{Config, IncidentRecord};
use causeway_engine::{IncidentTriage, ProblemAnalyzer};

/// Causeway CLI arguments
#[derive(Debug, Parser)]
#[clap(name = "causeway", version, about = "Incident correlation and root-cause ranking")]
struct Cli {
    /// Configuration file path
    #[clap(short, long, default_value = "config/causeway.yaml", global = true)]
    config: PathBuf,

    /// Log filter (trace, debug, info, warn, error, or a directive)
    #[clap(long, env = "CAUSEWAY_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Enable JSON logging
    #[clap(long, env = "CAUSEWAY_LOG_JSON", global = true)]
    log_json: bool,

    /// Subcommand to execute
    #[clap(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the analysis service (default if no subcommand given)
    Serve {
        /// Bind host override
        #[clap(long)]
        host: Option<String>,

        /// Bind port override
        #[clap(long)]
        port: Option<u16>,
    },
    /// Analyze an incidents file for recurring problems
    Analyze {
        /// Incidents file path (JSON array of incidents)
        #[clap(long)]
        incidents: PathBuf,

        /// Lookback window override (days)
        #[clap(long)]
        timeframe_days: Option<i64>,

        /// Output the full analysis as JSON
        #[clap(long)]
        json: bool,
    },
    /// Find the root cause of one related incident set
    RootCause {
        /// Incidents file path (JSON array of incidents)
        #[clap(long)]
        incidents: PathBuf,

        /// Output the full analysis as JSON
        #[clap(long)]
        json: bool,
    },
    /// Triage a single incident
    Triage {
        /// Incident file path (JSON object)
        #[clap(long)]
        incident: PathBuf,

        /// Output the full assessment as JSON
        #[clap(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration before logging so the file's logging section applies
    let config = Config::load_or_default(&cli.config).context("Failed to load configuration")?;

    init_logging(&cli, &config)?;

    info!("Starting Causeway v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Some(Commands::Analyze {
            incidents,
            timeframe_days,
            json,
        }) => run_analyze_command(&config, &incidents, timeframe_days, json),
        Some(Commands::RootCause { incidents, json }) => {
            run_root_cause_command(&config, &incidents, json)
        }
        Some(Commands::Triage { incident, json }) => run_triage_command(&incident, json),
        Some(Commands::Serve { host, port }) => run_serve_command(config, host, port).await,
        None => run_serve_command(config, None, None).await,
    }
}

/// Run the serve subcommand (default behavior)
async fn run_serve_command(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let analyzer = ProblemAnalyzer::new(config.analysis.clone())
        .context("Failed to construct the analyzer")?;
    let state = ApiState::new(analyzer);
    let app = create_router(&config.server, state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server bind address")?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("API server listening on {}", addr);

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            result.context("API server failed")?;
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("API server shut down gracefully");
    Ok(())
}

/// Run the analyze subcommand
fn run_analyze_command(
    config: &Config,
    incidents_file: &Path,
    timeframe_days: Option<i64>,
    json_output: bool,
) -> Result<()> {
    let incidents = load_incidents(incidents_file)?;
    info!(
        incident_count = incidents.len(),
        "Analyzing incidents for recurring problems"
    );

    let analyzer = ProblemAnalyzer::new(config.analysis.clone())
        .context("Failed to construct the analyzer")?;
    let analysis = analyzer.analyze_recurring_problems(&incidents, timeframe_days)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("Causeway Problem Analysis");
    println!("{}", "=".repeat(80));
    println!("Analysis ID:     {}", analysis.analysis_id);
    println!("Timeframe:       {} days", analysis.timeframe_days);
    println!(
        "Incidents:       {} in window ({} submitted)",
        analysis.total_incidents, analysis.metadata.incidents_submitted
    );
    println!("Problem groups:  {}", analysis.problem_groups.len());
    println!("Processing:      {}ms", analysis.metadata.processing_ms);
    println!();

    if analysis.problem_groups.is_empty() {
        println!("  (no recurring problems found)");
    } else {
        println!(
            "{:<8} {:<10} {:<10} {:<48}",
            "Group", "Incidents", "Frequency", "Common Symptoms"
        );
        println!("{}", "-".repeat(80));
        for group in &analysis.problem_groups {
            println!(
                "{:<8} {:<10} {:<10.2} {:<48}",
                group.group_id.to_string(),
                group.incident_count,
                group.frequency,
                group.common_symptoms.join(", ")
            );
        }
    }

    for group_causes in &analysis.ranked_causes {
        if group_causes.ranked_causes.is_empty() {
            continue;
        }
        println!();
        println!("ROOT CAUSES FOR {}:", group_causes.group_id);
        for cause in &group_causes.ranked_causes {
            println!(
                "  {}. [{}] {} (confidence {:.2})",
                cause.rank,
                cause.likelihood.as_str(),
                cause.description,
                cause.confidence
            );
        }
    }

    if !analysis.recommendations.is_empty() {
        println!();
        println!("RECOMMENDATIONS:");
        for recommendation in &analysis.recommendations {
            println!(
                "  [{:?}] {}",
                recommendation.priority, recommendation.description
            );
            println!("         {}", recommendation.action);
        }
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Run the root-cause subcommand
fn run_root_cause_command(config: &Config, incidents_file: &Path, json_output: bool) -> Result<()> {
    let incidents = load_incidents(incidents_file)?;
    info!(
        incident_count = incidents.len(),
        "Analyzing incident set for a root cause"
    );

    let analyzer = ProblemAnalyzer::new(config.analysis.clone())
        .context("Failed to construct the analyzer")?;
    let analysis = analyzer.find_root_cause(&incidents);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("Causeway Root Cause Analysis");
    println!("{}", "=".repeat(80));
    println!("Analysis ID:     {}", analysis.root_cause_analysis_id);
    println!("Incidents:       {}", analysis.incident_count);
    println!(
        "Timeline:        {:?} over {:.1} hours",
        analysis.timeline_analysis.pattern_type, analysis.timeline_analysis.time_span_hours
    );
    println!("Confidence:      {:.2}", analysis.confidence_score);
    println!();

    if analysis.ranked_causes.is_empty() {
        println!("  (no root cause candidates identified)");
    } else {
        println!(
            "{:<6} {:<24} {:<12} {:<12} {:<24}",
            "Rank", "Type", "Confidence", "Likelihood", "Evidence"
        );
        println!("{}", "-".repeat(80));
        for cause in &analysis.ranked_causes {
            println!(
                "{:<6} {:<24} {:<12.2} {:<12} {:<24}",
                cause.rank,
                cause.kind.to_string(),
                cause.confidence,
                cause.likelihood.as_str(),
                cause.evidence
            );
        }
    }

    if !analysis.common_factors.common_systems.is_empty() {
        println!();
        println!(
            "Common systems:  {}",
            analysis.common_factors.common_systems.join(", ")
        );
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Run the triage subcommand
fn run_triage_command(incident_file: &Path, json_output: bool) -> Result<()> {
    let raw = std::fs::read_to_string(incident_file).context("Failed to read incident file")?;
    let incident: IncidentRecord =
        serde_json::from_str(&raw).context("Failed to parse incident JSON")?;

    info!(incident_id = %incident.id, "Triaging incident");

    let assessment = IncidentTriage::new().assess(&incident, Utc::now());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(80));
    println!("Causeway Incident Triage");
    println!("{}", "=".repeat(80));
    println!("Incident:        {}", assessment.incident_id);
    println!("Category:        {}", assessment.category);
    println!(
        "Classification:  {:.2} confidence",
        assessment.classification_confidence
    );
    println!("Priority score:  {}", assessment.priority_score);
    println!(
        "Escalation:      {}",
        if assessment.escalation_required {
            "required"
        } else {
            "not required"
        }
    );
    println!(
        "Resolution:      {:.1}h predicted ({:.2} confidence)",
        assessment.predicted_resolution.predicted_hours, assessment.predicted_resolution.confidence
    );

    if !assessment.recommendations.is_empty() {
        println!();
        println!("RECOMMENDED STEPS:");
        for step in &assessment.recommendations {
            println!("  - {}", step);
        }
    }

    if !assessment.automated_actions.is_empty() {
        println!();
        println!("AUTOMATED ACTIONS:");
        for action in &assessment.automated_actions {
            println!("  - {}", action);
        }
    }
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Read a JSON array of incidents from disk.
fn load_incidents(path: &Path) -> Result<Vec<IncidentRecord>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read incidents file {}", path.display()))?;
    let incidents: Vec<IncidentRecord> =
        serde_json::from_str(&raw).context("Failed to parse incidents JSON")?;
    Ok(incidents)
}

/// Wait for shutdown signal (SIGTERM or CTRL+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => { info!("Received Ctrl+C, shutting down..."); },
        _ = terminate => { info!("Received SIGTERM, shutting down..."); },
    }
}

/// Initialize logging from CLI arguments with the config file as fallback
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let json = cli.log_json || config.logging.json;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&level))
        .context("Invalid log filter")?;

    if json {
        // JSON structured logging
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .with(filter)
            .init();
    } else {
        // Human-readable logging
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true),
            )
            .with(filter)
            .init();
    }

    info!("Logging initialized at level: {}", level);

    Ok(())
}
