//! Offline code generator and sync client for the verification server.
//!
//! # Usage
//!
//! ```bash
//! # Generate 50 codes into the local ledger
//! cargo run -p scoreqr-cli -- generate --count 50
//!
//! # Push every unsynced ledger entry to the server
//! SCOREQR_SERVER_URL=https://verify.example.com SCOREQR_API_KEY=... cargo run -p scoreqr-cli -- sync
//!
//! # Show server status and store statistics
//! cargo run -p scoreqr-cli -- status
//!
//! # Derive the sync API key for provisioning
//! cargo run -p scoreqr-cli -- api-key --secret-key change-me
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use scoreqr_core::{apikey, code, config::Config};

mod client;
mod ledger;

use client::ServerClient;
use ledger::LedgerEntry;

#[derive(Parser)]
#[command(about = "Generate authenticity codes and sync them to the verification server")]
struct Args {
    /// Server base URL; overrides the SCOREQR_SERVER_URL env var
    #[arg(long)]
    server_url: Option<String>,

    /// Sync API key; overrides the SCOREQR_API_KEY env var
    #[arg(long)]
    api_key: Option<String>,

    /// Ledger file holding generated codes
    #[arg(long, default_value = "data/codes.json")]
    ledger: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate new codes into the local ledger
    Generate {
        #[arg(long, default_value_t = 50)]
        count: usize,
    },
    /// Push unsynced ledger entries to the server
    Sync,
    /// Show server status and store statistics
    Status,
    /// Derive the sync API key from a secret and salt
    ApiKey {
        #[arg(long)]
        secret_key: String,
        #[arg(long, default_value = "scoreqr_api_salt")]
        salt: String,
    },
}

#[derive(Deserialize)]
struct CliConfig {
    #[serde(default = "default_server_url")]
    server_url: String,
    #[serde(default)]
    api_key: Option<String>,
}

impl Config for CliConfig {
    fn from_env() -> Self {
        envy::prefixed("SCOREQR_")
            .from_env()
            .expect("failed to load config from environment")
    }
}

fn default_server_url() -> String {
    "http://localhost:3500".to_owned()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = CliConfig::from_env();

    let server_url = args.server_url.unwrap_or(config.server_url);
    let api_key = args.api_key.or(config.api_key);

    match args.command {
        Command::Generate { count } => generate(&args.ledger, &server_url, count),
        Command::Sync => sync(&args.ledger, &server_url, api_key.as_deref()).await,
        Command::Status => status(&server_url).await,
        Command::ApiKey { secret_key, salt } => {
            println!("{}", apikey::derive(&secret_key, &salt));
            Ok(())
        }
    }
}

fn generate(ledger_path: &Path, server_url: &str, count: usize) -> Result<()> {
    if count == 0 {
        bail!("--count must be at least 1");
    }

    let mut entries = ledger::load(ledger_path)?;
    let mut exclusion = ledger::known_codes(&entries);
    println!(
        "ledger holds {} code(s), generating {count} more",
        entries.len()
    );

    let now = Utc::now();
    for i in 0..count {
        let new_code = code::generate_unique(code::CODE_LEN, &exclusion)
            .context("could not draw a code absent from the ledger")?;
        exclusion.insert(new_code.clone());
        println!("  [{}/{count}] {new_code}", i + 1);
        entries.push(LedgerEntry {
            verify_url: format!("{server_url}/?code={new_code}"),
            code: new_code,
            created_date: now,
            synced: false,
            sync_date: None,
        });
    }

    ledger::save(ledger_path, &entries)?;
    println!("saved {} code(s) to {}", entries.len(), ledger_path.display());
    Ok(())
}

async fn sync(ledger_path: &Path, server_url: &str, api_key: Option<&str>) -> Result<()> {
    let Some(api_key) = api_key else {
        bail!("no API key configured; pass --api-key or set SCOREQR_API_KEY");
    };

    let mut entries = ledger::load(ledger_path)?;
    let unsynced: Vec<(String, chrono::DateTime<Utc>)> = entries
        .iter()
        .filter(|e| !e.synced)
        .map(|e| (e.code.clone(), e.created_date))
        .collect();

    if unsynced.is_empty() {
        println!("all {} ledger code(s) already synced", entries.len());
        return Ok(());
    }

    println!("syncing {} code(s) to {server_url}", unsynced.len());
    let pushed: HashSet<String> = unsynced.iter().map(|(c, _)| c.clone()).collect();
    let stats = ServerClient::new(server_url)
        .sync_codes(unsynced, api_key)
        .await?;

    ledger::mark_synced(&mut entries, &pushed, Utc::now());
    ledger::save(ledger_path, &entries)?;

    println!(
        "sync complete: added {}, skipped {}, errors {} (of {})",
        stats.added, stats.skipped, stats.errors, stats.total
    );
    Ok(())
}

async fn status(server_url: &str) -> Result<()> {
    let resp = ServerClient::new(server_url).status().await?;
    println!("server:          {} ({})", resp.status, resp.timestamp);
    println!("total codes:     {}", resp.stats.total_codes);
    println!("activated:       {}", resp.stats.activated_codes);
    println!("activation rate: {}%", resp.stats.activation_rate);
    println!("queries today:   {}", resp.stats.today_queries);
    Ok(())
}
