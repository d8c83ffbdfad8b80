//! MDPDF license key issuer
//!
//! Generates and checks `MDPDF-XXXX-XXXX-XXXX-XXXX` license keys offline,
//! and can serve the same operations over HTTP.
//!
//! Usage:
//!   mdpdf-keygen generate --count 10
//!   mdpdf-keygen validate MDPDF-IEQH-524Y-NG5B-Y1AC
//!   mdpdf-keygen serve --port 8080

use std::{path::PathBuf, process::ExitCode, sync::Arc};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mdpdf_keygen::{build_router, load_scheme, KeyService};
use mdpdf_license::{KeyGenerator, KeyScheme, KeyValidator, LicenseKey};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "mdpdf-keygen")]
#[command(about = "MD to PDF Converter license key issuer")]
struct Args {
    /// Path to a JSON key scheme (defaults to the production scheme)
    #[arg(short, long, global = true)]
    scheme: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate new license keys
    Generate {
        /// Number of keys to generate
        #[arg(short, long, default_value = "1")]
        count: usize,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// Print keys as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Check whether license keys are valid
    Validate {
        /// Keys to check
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Show the active scheme and its retry characteristics
    Inspect,
    /// Serve the HTTP key API
    Serve {
        /// HTTP port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

fn generate(scheme: KeyScheme, count: usize, seed: Option<u64>, json: bool) -> Result<()> {
    let keys: Vec<LicenseKey> = match seed {
        Some(seed) => KeyGenerator::seeded(scheme, seed)?.generate_many(count)?,
        None => KeyGenerator::with_scheme(scheme)?.generate_many(count)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&keys)?);
    } else {
        for key in &keys {
            println!("{key}");
        }
    }
    Ok(())
}

fn validate(scheme: KeyScheme, keys: &[String]) -> Result<bool> {
    let validator = KeyValidator::new(scheme)?;
    let mut all_valid = true;
    for key in keys {
        match validator.check(key) {
            Ok(_) => println!("{key}: valid"),
            Err(e) => {
                all_valid = false;
                println!("{key}: invalid: {e}");
            }
        }
    }
    Ok(all_valid)
}

fn inspect(scheme: &KeyScheme) -> Result<()> {
    let reachable = scheme.reachable_residues()?;
    println!("{}", serde_json::to_string_pretty(scheme)?);
    println!();
    println!("  Solved position:      {}", scheme.solved_position());
    println!("  Reachable residues:   {}/{}", reachable.len(), scheme.modulus);
    println!("  Solve probability:    {:.4}", scheme.solve_probability()?);
    println!("  Exhaustion chance:    {:.3e}", scheme.exhaustion_probability()?);
    Ok(())
}

async fn serve(scheme: KeyScheme, port: u16) -> Result<()> {
    let service = Arc::new(KeyService::new(scheme)?);
    let app = build_router(service);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("failed to bind HTTP port {port}"))?;
    info!("HTTP key API listening on port {}", port);
    axum::serve(listener, app).await.context("HTTP server failed")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let scheme = load_scheme(args.scheme.as_deref())?;
    debug!(?scheme, "Key scheme loaded");

    match args.command {
        Command::Generate { count, seed, json } => generate(scheme, count, seed, json)?,
        Command::Validate { keys } => {
            if !validate(scheme, &keys)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Inspect => inspect(&scheme)?,
        Command::Serve { port } => serve(scheme, port).await?,
    }
    Ok(ExitCode::SUCCESS)
}
