//! FleetWatch CLI - Command-line interface
//!
//! This binary runs the tracking service and provides a few observer-side
//! utilities on top of the FleetWatch library.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fleetwatch::geo::Coordinate;
use fleetwatch::proximity::DEFAULT_AVERAGE_SPEED_KMH;

mod commands;
mod error;
mod runner;

use commands::eta::{parse_coordinate, EtaArgs};
use commands::serve::ServeArgs;
use commands::watch::WatchArgs;

#[derive(Parser)]
#[command(name = "fleetwatch")]
#[command(version, about = "Live vehicle tracking with trip statistics and arrival estimates", long_about = None)]
struct Cli {
    /// Config file (default: ~/.fleetwatch/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracking service and its WebSocket gateway
    Serve {
        /// Listen address, overrides [server] listen
        #[arg(long)]
        listen: Option<SocketAddr>,

        /// Register a vehicle id at startup (repeatable)
        #[arg(long = "vehicle", value_name = "ID")]
        vehicles: Vec<String>,
    },

    /// Estimate arrival time between two coordinates
    Eta {
        /// Start position as LAT,LON
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,

        /// Destination as LAT,LON
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,

        /// Average speed in km/h
        #[arg(long, default_value_t = DEFAULT_AVERAGE_SPEED_KMH)]
        speed: f64,
    },

    /// Follow vehicles through a running gateway with local proximity alerts
    Watch {
        /// Gateway URL
        #[arg(long, default_value = "ws://127.0.0.1:8787")]
        url: String,

        /// Vehicle id to follow (repeatable)
        #[arg(long = "vehicle", value_name = "ID", required = true)]
        vehicles: Vec<String>,

        /// JSON file with a list of points of interest
        #[arg(long)]
        points: Option<PathBuf>,

        /// Approach radius in km, overrides [proximity] approach_radius_km
        #[arg(long)]
        radius_km: Option<f64>,
    },

    /// Create or refresh the configuration file
    Init,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { listen, vehicles } => commands::serve::run(ServeArgs {
            config: cli.config,
            listen,
            vehicles,
        }),
        Commands::Eta { from, to, speed } => commands::eta::run(EtaArgs { from, to, speed }),
        Commands::Watch {
            url,
            vehicles,
            points,
            radius_km,
        } => commands::watch::run(WatchArgs {
            config: cli.config,
            url,
            vehicles,
            points,
            radius_km,
        }),
        Commands::Init => commands::init::run(cli.config.as_deref()),
    };

    if let Err(e) = result {
        e.exit();
    }
}
