//! Knowledge Assistant CLI

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use knowledge_assistant::config::AssistantConfig;
use knowledge_assistant::error::{AssistantError, EndpointFailure, FixSuggestion};
use knowledge_assistant::panel::{QueryPanel, RequestStatus};
use knowledge_assistant::render::{render_panel, DEFAULT_WIDTH};
use knowledge_assistant::transport::{create_transport, TransportKind};

#[derive(Parser)]
#[command(name = "knowledge-assistant")]
#[command(about = "Ask questions about your documents and get AI-powered answers")]
#[command(version)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (e.g. http://localhost:5000)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Offline mode: canned answers, no network
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the answer
    Ask {
        /// The question (words are joined with spaces)
        question: Vec<String>,

        /// Expand the source citations
        #[arg(short, long)]
        sources: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive query panel
    Tui,

    /// Check whether the backend is up
    Health,

    /// List documents known to the backend
    Documents,

    /// Upload a document to the backend
    Upload {
        /// File to upload (txt, pdf, md, html, csv, json, docx)
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The TUI owns the terminal; keep logs off it unless explicitly asked for
    let default_filter = match cli.command {
        Commands::Tui => "off",
        _ => "warn",
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AssistantError> {
    let config = AssistantConfig::load(cli.config.as_deref())?
        .with_env()?
        .with_overrides(cli.endpoint, cli.mock);

    match cli.command {
        Commands::Ask {
            question,
            sources,
            json,
        } => ask(&config, &question.join(" "), sources, json).await,
        Commands::Tui => {
            let transport = Arc::from(create_transport(&config)?);
            knowledge_assistant::tui::run(transport, config.result_policy)
                .await
                .map_err(|e| AssistantError::Terminal(e.to_string()))
        }
        Commands::Health => health(&config).await,
        Commands::Documents => documents(&config).await,
        Commands::Upload { file } => upload(&config, &file).await,
        Commands::Config => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn describe_target(config: &AssistantConfig) -> String {
    match config.transport {
        TransportKind::Http => config.endpoint.clone(),
        TransportKind::Mock => "offline mock".to_string(),
    }
}

async fn ask(
    config: &AssistantConfig,
    question: &str,
    show_sources: bool,
    json: bool,
) -> Result<(), AssistantError> {
    let transport = create_transport(config)?;
    let mut panel = QueryPanel::with_policy(config.result_policy);
    panel.set_query(question);
    if show_sources {
        panel.toggle_sources_visible();
    }

    if !json {
        eprintln!("{} Asking {}", "→".cyan(), describe_target(config).cyan());
    }

    let status = panel
        .run(transport.as_ref())
        .await
        .ok_or(AssistantError::EmptyQuery)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&panel.snapshot())?);
    }

    if status == RequestStatus::Failed {
        let message = panel.error().unwrap_or_default();
        return Err(EndpointFailure::with_message(message).into());
    }

    if !json {
        let stdout = std::io::stdout();
        let styled = stdout.is_terminal();
        let width = if styled {
            crossterm::terminal::size()
                .map(|(w, _)| w as usize)
                .unwrap_or(DEFAULT_WIDTH)
        } else {
            DEFAULT_WIDTH
        };
        print!("{}", render_panel(&panel, width, styled));
    }
    Ok(())
}

async fn health(config: &AssistantConfig) -> Result<(), AssistantError> {
    let transport = create_transport(config)?;
    let health = transport.health().await?;

    let mark = if health.is_healthy() {
        "✓".green()
    } else {
        "!".yellow()
    };
    println!("{} Backend {} ({})", mark, health.status, describe_target(config));
    println!("  Index: {}", health.index_status);
    println!(
        "  Documents: {}",
        if health.documents { "present" } else { "none" }
    );
    if !health.timestamp.is_empty() {
        println!("  Checked: {}", health.timestamp);
    }
    Ok(())
}

async fn documents(config: &AssistantConfig) -> Result<(), AssistantError> {
    let transport = create_transport(config)?;
    let documents = transport.documents().await?;

    if documents.is_empty() {
        println!("No documents found");
        return Ok(());
    }

    println!("{} {} documents", "→".cyan(), documents.len());
    for doc in &documents {
        println!(
            "  {:<32} {:>6} {:>10}  {}",
            doc.filename,
            doc.kind,
            format_size(doc.size),
            doc.last_modified.dimmed()
        );
    }
    Ok(())
}

async fn upload(config: &AssistantConfig, file: &Path) -> Result<(), AssistantError> {
    let transport = create_transport(config)?;
    let receipt = transport.upload(file).await?;

    println!("{} {}: {}", "✓".green(), receipt.message, receipt.filename);
    if let Some(note) = receipt.note {
        println!("  {}", note.dimmed());
    }
    Ok(())
}

fn format_size(bytes: u64) -> String {
    match bytes {
        b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
        b if b >= 1024 => format!("{:.1} KB", b as f64 / 1024.0),
        b => format!("{} B", b),
    }
}
