//! Condense CLI

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use condense_config::{load_config, Config, LogFormat, LoggingConfig, MarkupKind};
use condense_core::response::body_bytes;
use condense_filter::{FilterConfig, FilterOutcome};
use http::{header, Response};
use http_body_util::Full;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "condense")]
#[command(about = "Compress XML and HTML the way the response filter does", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a document through the filter and print the result
    Compress {
        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Use the HTML compressor
        #[arg(long)]
        html: bool,

        /// Content type of the document
        #[arg(short = 't', long, default_value = "application/xml")]
        content_type: String,

        /// Print filter counters to stderr when done
        #[arg(long)]
        stats: bool,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, env = "CONDENSE_LOG")]
        log_level: Option<String>,

        /// Input file (stdin when omitted)
        input: Option<PathBuf>,
    },

    /// Validate configuration file
    Validate {
        /// Path to configuration file
        #[arg(short, long, default_value = "condense.yaml")]
        config: PathBuf,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compress {
            config,
            html,
            content_type,
            stats,
            log_level,
            input,
        } => {
            let mut cfg = match &config {
                Some(path) => load_config(path)?,
                None => Config::default(),
            };
            if html {
                cfg.markup = MarkupKind::Html;
                if config.is_none() {
                    cfg.filter = FilterConfig::html();
                }
            }
            if let Some(level) = log_level {
                cfg.logging.level = level;
            }

            init_tracing(&cfg.logging)?;

            let body = read_input(input.as_deref())?;
            let filter = cfg.build_filter()?;

            let response = Response::builder()
                .header(header::CONTENT_TYPE, content_type.as_str())
                .header(header::CONTENT_LENGTH, body.len())
                .body(Full::new(body))?;

            let (response, outcome) = filter.apply_with_outcome(response).await;
            match &outcome {
                FilterOutcome::Compressed {
                    original_len,
                    compressed_len,
                } => tracing::info!(original_len, compressed_len, "Document compressed"),
                FilterOutcome::PassThrough(reason) => {
                    tracing::info!(?reason, content_type = %content_type, "Document left unchanged")
                }
                FilterOutcome::Recovered(e) => {
                    tracing::warn!(error = %e, "Document could not be compressed")
                }
            }

            let output = body_bytes(response.into_body()).await;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&output)?;
            stdout.flush()?;

            if stats {
                eprintln!("{}", serde_json::to_string_pretty(&filter.stats().snapshot())?);
            }
            Ok(())
        }

        Commands::Validate { config } => {
            tracing_subscriber::fmt().with_target(false).init();

            tracing::info!("Validating configuration: {}", config.display());

            match load_config(&config) {
                Ok(cfg) => {
                    tracing::info!("✓ Configuration is valid");
                    tracing::info!("  Markup: {:?}", cfg.markup);
                    tracing::info!("  Enabled: {}", cfg.filter.enabled);
                    tracing::info!("  Content types: {}", cfg.filter.content_types.join(", "));
                    tracing::info!("  Remove comments: {}", cfg.filter.remove_comments);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!("✗ Configuration validation failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Version => {
            println!("Condense");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<Bytes> {
    let data = match path {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    Ok(Bytes::from(data))
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&logging.level))?;
    let registry = tracing_subscriber::registry().with(filter);

    // stdout carries the document
    match logging.format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}
