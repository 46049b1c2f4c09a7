mod cli;
mod server;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use kliniki::config::KlinikiConfig;
use kliniki::facility::region::RegionFilter;

#[derive(Parser)]
#[command(
    name = "kliniki",
    version,
    about = "Location resolution and facility referral MCP server"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio transport unless configured otherwise)
    Serve {
        /// Serve over Streamable HTTP at server.host:server.port
        #[arg(long)]
        http: bool,
    },
    /// Resolve a free-text location to coordinates
    Geocode {
        location: String,
    },
    /// Find clinics near a point
    Nearby {
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
        /// Search radius in km (1-50)
        #[arg(long)]
        radius: Option<f64>,
    },
    /// Search the hospital referral registry
    Referrals(ReferralArgs),
    /// Show registry statistics
    Stats {
        #[arg(long)]
        county: Option<String>,
    },
    /// Load a JSON registry snapshot ({"clinics": [...], "hospitals": [...]})
    Import {
        file: PathBuf,
        /// Empty both registries before loading
        #[arg(long)]
        replace: bool,
    },
    /// Check database health
    Doctor,
}

#[derive(clap::Args)]
struct ReferralArgs {
    /// Matched against every administrative level
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    county: Option<String>,
    #[arg(long)]
    sub_county: Option<String>,
    #[arg(long)]
    constituency: Option<String>,
    #[arg(long)]
    ward: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long = "type")]
    facility_type: Option<String>,
    #[arg(long)]
    keph_level: Option<String>,
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    limit: Option<usize>,
}

impl From<ReferralArgs> for RegionFilter {
    fn from(a: ReferralArgs) -> Self {
        RegionFilter {
            county: a.county,
            sub_county: a.sub_county,
            constituency: a.constituency,
            ward: a.ward,
            location: a.location,
            facility_name: a.name,
            facility_type: a.facility_type,
            keph_level: a.keph_level,
            owner: a.owner,
            limit: a.limit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = KlinikiConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { http } => {
            if http || config.server.transport == "http" {
                server::serve_http(config).await?;
            } else {
                server::serve_stdio(config).await?;
            }
        }
        Command::Geocode { location } => {
            cli::geocode::geocode(&config, &location).await?;
        }
        Command::Nearby {
            latitude,
            longitude,
            radius,
        } => {
            cli::nearby::nearby(&config, latitude, longitude, radius).await?;
        }
        Command::Referrals(args) => {
            cli::referrals::referrals(&config, args.into()).await?;
        }
        Command::Stats { county } => {
            cli::stats::stats(&config, county.as_deref())?;
        }
        Command::Import { file, replace } => {
            cli::import::import(&config, &file, replace)?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
    }

    Ok(())
}
