//! Callscribe CLI
//!
//! Triggers call processing on a Callscribe server and prints the result.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Input, Password};
use tracing_subscriber::EnvFilter;

use api::{CallscribeClient, ProcessedCall};
use config::Config;

#[derive(Parser)]
#[command(name = "callscribe")]
#[command(about = "Callscribe CLI - transcribe calls and answer campaign questions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store server URL and API key
    Login {
        /// API key (will prompt if not provided)
        #[arg(short, long)]
        key: Option<String>,
        /// Server URL (will prompt if not provided)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Check that the server is reachable
    Health,

    /// Transcribe a call and answer its campaign questions
    Process {
        /// Call log ID
        call_id: String,
        /// Print the raw JSON response
        #[arg(long)]
        json: bool,
    },

    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login { key, url } => cmd_login(key, url).await,
        Commands::Health => cmd_health().await,
        Commands::Process { call_id, json } => cmd_process(call_id, json).await,
        Commands::Config => cmd_config(),
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(key: Option<String>, url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let base_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Server URL")
            .default(config.base_url.clone())
            .interact_text()
            .context("Failed to read server URL")?,
    };

    let api_key = match key {
        Some(k) => k,
        None => Password::new()
            .with_prompt("API Key")
            .interact()
            .context("Failed to read API key")?,
    };

    // Test connection
    let client = CallscribeClient::new(&base_url, Some(&api_key));
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not reach Callscribe API at {}", base_url);
        }
    }

    config.base_url = base_url;
    config.set_api_key(api_key);
    config.save()?;

    println!("{} Settings saved to {:?}", "✓".green(), Config::config_path()?);
    Ok(())
}

async fn cmd_health() -> Result<()> {
    let config = Config::load_effective()?;
    let client = CallscribeClient::new(&config.base_url, config.api_key.as_deref());

    match client.health().await {
        Ok(true) => println!("{} {}", "✓".green(), config.base_url),
        Ok(false) => bail!("Server at {} reported unhealthy", config.base_url),
        Err(e) => bail!("Could not reach {}: {}", config.base_url, e),
    }
    Ok(())
}

async fn cmd_process(call_id: String, json: bool) -> Result<()> {
    let call_id = call_id.trim();
    if call_id.is_empty() {
        bail!("Call ID must not be empty");
    }

    let config = Config::load_effective()?;
    if config.api_key.is_none() {
        tracing::debug!("No API key configured, sending unauthenticated request");
    }
    let client = CallscribeClient::new(&config.base_url, config.api_key.as_deref());

    if !json {
        eprintln!("{} {}", "Processing call".dimmed(), call_id.cyan());
    }
    let processed = client.process(call_id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&processed.raw)?);
    } else {
        print_processed(&processed);
    }
    Ok(())
}

fn print_processed(processed: &ProcessedCall) {
    let r = &processed.response;

    println!("{} {}", "Call".bold(), r.call_logs_id.cyan());
    println!("  Campaign: {}", r.campaign_id);
    println!("  Processed at: {}", r.processed_at);

    println!("\n{}", "Transcription:".bold());
    if r.transcription.is_empty() {
        println!("  {}", "(empty)".yellow());
    } else {
        for line in r.transcription.lines() {
            println!("  {}", line);
        }
    }

    println!("\n{} ({})", "Answers:".bold(), r.answers.len());
    if r.answers.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for (question_id, answer) in &r.answers {
        println!("  {} {}", format!("{}:", question_id).cyan(), answer);
    }
}

fn cmd_config() -> Result<()> {
    let file = Config::load()?;
    let config = Config::load_effective()?;

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    if config.base_url != file.base_url {
        println!("    {}", format!("(from {})", config::URL_ENV).dimmed());
    }
    println!(
        "  API Key: {}",
        if config.api_key.is_some() { "Set".green() } else { "Not set".red() }
    );

    Ok(())
}
