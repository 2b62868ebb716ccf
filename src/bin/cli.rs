//! Availability CLI
//!
//! Local execution entry point. For AWS Lambda, use `availability-lambda`.

use std::path::PathBuf;

use availability::{
    AvailabilityResolver,
    error::Result,
    models::{Config, FeedRegistry},
};
use clap::{Parser, Subcommand};

/// availability - blocked dates for bookable rooms
#[derive(Parser, Debug)]
#[command(
    name = "availability",
    version,
    about = "Resolves blocked dates for rooms from their iCalendar feeds"
)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "data/config.toml")]
    config: PathBuf,

    /// IANA time zone for date conversion (overrides config)
    #[arg(long, global = true)]
    time_zone: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the blocked dates of a room as a JSON array
    Blocked {
        /// Room identifier (e.g. stanza1)
        room: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// List configured rooms
    Rooms,

    /// Validate configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool, default_level: &str) {
    let level = if verbose { "debug" } else { default_level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging depends on the config, so report load failures after init.
    let loaded = Config::load(&cli.config);
    let level = loaded
        .as_ref()
        .map_or_else(|_| "info".to_string(), |c| c.logging.level.clone());
    init_logging(cli.verbose, &level);

    let mut config = loaded.unwrap_or_else(|e| {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
        Config::default()
    });
    config.apply_env_overrides(std::env::vars());
    if let Some(zone) = cli.time_zone {
        config.time_zone = zone;
    }
    log::debug!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Blocked { room, pretty } => {
            let resolver = AvailabilityResolver::from_config(&config)?;
            let dates = resolver.blocked_dates(&room).await;

            let json = if pretty {
                serde_json::to_string_pretty(&dates)?
            } else {
                serde_json::to_string(&dates)?
            };
            println!("{json}");
        }

        Command::Rooms => {
            for (room, url) in FeedRegistry::from_config(&config).rooms() {
                if url.is_empty() {
                    println!("{room}\t(no feed)");
                } else {
                    println!("{room}\t{url}");
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }

            let configured = config
                .rooms
                .values()
                .filter(|url| !url.trim().is_empty())
                .count();
            if configured == 0 {
                log::warn!("No room has a feed URL; every lookup will return no blocked dates");
            }
            log::info!(
                "✓ Config OK ({} rooms, {} with feeds, time zone {})",
                config.rooms.len(),
                configured,
                config.time_zone
            );
        }
    }

    Ok(())
}
