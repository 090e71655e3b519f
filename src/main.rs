//! Bounty Bridge CLI
//!
//! One-shot operations against the configured upstream and state file.

use anyhow::Result;
use bounty_bridge::{BountyClient, BountyFilter, Config, Poller, StateStore};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "bounty-bridge")]
#[command(about = "Bridge bounty marketplace updates to webhooks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single poll cycle (dispatches webhooks and saves state)
    Poll,

    /// Fetch bounties and show which pass the filter, without side effects
    Check {
        /// Maximum number of bounties to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show the persisted bounty statuses
    State,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    // Load configuration
    let config = Config::from_env();

    match cli.command {
        Commands::Poll => run_poll(&config).await?,
        Commands::Check { limit } => check_bounties(&config, limit).await?,
        Commands::State => show_state(&config).await,
    }

    Ok(())
}

async fn run_poll(config: &Config) -> Result<()> {
    println!("\n{}", "=".repeat(70));
    println!("  POLL CYCLE");
    println!("  Upstream: {} | Webhooks: {}", config.api_url, config.webhook_urls.len());
    println!("{}\n", "=".repeat(70));

    let poller = Poller::from_config(config);
    let summary = poller.poll().await;

    println!(
        "\nCreated: {} | Changed: {} | Errors: {}",
        summary.created, summary.changed, summary.errors
    );

    if summary.errors > 0 {
        anyhow::bail!("Poll finished with {} error(s)", summary.errors);
    }

    Ok(())
}

async fn check_bounties(config: &Config, limit: usize) -> Result<()> {
    println!("\n{}", "=".repeat(70));
    println!("  BOUNTY CHECK");
    let tags = if config.filter_tags.is_empty() {
        "ANY".to_string()
    } else {
        config.filter_tags.join(",")
    };
    println!("  Tags: {} | Min Reward: {}", tags, config.min_reward);
    println!("{}\n", "=".repeat(70));

    let client = BountyClient::new(config);
    let filter = BountyFilter::from_config(config);
    let state = StateStore::new(&config.state_file).load().await;

    let bounties = client.fetch_all().await?;
    let matching: Vec<_> = bounties.iter().filter(|b| filter.matches(b)).collect();

    println!(
        "Fetched {} bounties, {} pass the filter\n",
        bounties.len(),
        matching.len()
    );

    for (i, bounty) in matching.iter().take(limit).enumerate() {
        let tracked = match state.status_of(&bounty.id) {
            None => "NEW".to_string(),
            Some(previous) if *previous == bounty.status => "unchanged".to_string(),
            Some(previous) => format!("was {}", previous),
        };

        println!("{}. \"{}\" [{}]", i + 1, bounty.short_title(60), bounty.id);
        let reward = if bounty.reward_formatted.is_empty() {
            &bounty.reward
        } else {
            &bounty.reward_formatted
        };
        println!("   {} | Reward: {} | {}", bounty.status, reward, tracked);
        if !bounty.tags.is_empty() {
            println!("   Tags: {}", bounty.tags.join(", "));
        }
    }

    if matching.len() > limit {
        println!("\n   ... and {} more", matching.len() - limit);
    }

    println!();
    Ok(())
}

async fn show_state(config: &Config) {
    let store = StateStore::new(&config.state_file);
    let state = store.load().await;

    println!("\n{}", "=".repeat(70));
    println!("  STORED STATE ({})", store.path().display());
    println!("{}\n", "=".repeat(70));

    if state.is_empty() {
        println!("No bounties tracked yet.\n");
        return;
    }

    for (id, status) in &state.bounties {
        println!("  {:<40} {}", id, status);
    }

    println!("\nTotal: {} bounties", state.len());
}
