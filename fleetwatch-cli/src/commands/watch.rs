//! Watch command - follow vehicles over the gateway and compute proximity
//! locally, the way an observer app would.

use std::path::{Path, PathBuf};

use fleetwatch::config::ConfigFile;
use fleetwatch::proximity::{PointOfInterest, ProximityConfig, ProximityEngine, ProximityUpdate};
use fleetwatch::transport::{GatewayClient, ServerMessage, TransportError};
use fleetwatch::trip::{UpdateEvent, VehicleId};
use tokio_util::sync::CancellationToken;

use crate::error::CliError;
use crate::runner::{build_runtime, resolve_config_path};

/// Arguments for the watch command.
pub struct WatchArgs {
    pub config: Option<PathBuf>,
    pub url: String,
    pub vehicles: Vec<String>,
    /// JSON array of points of interest.
    pub points: Option<PathBuf>,
    pub radius_km: Option<f64>,
}

/// Run the watch command until Ctrl+C or the gateway hangs up.
pub fn run(args: WatchArgs) -> Result<(), CliError> {
    let config = ConfigFile::load_from(&resolve_config_path(args.config.as_deref()))?;
    let proximity = proximity_config(&config, args.radius_km)?;

    let points = match &args.points {
        Some(path) => load_points(path)?,
        None => Vec::new(),
    };
    let mut engine = ProximityEngine::new(points, proximity);

    let cancellation = CancellationToken::new();
    let shutdown = cancellation.clone();
    ctrlc::set_handler(move || shutdown.cancel()).map_err(|e| CliError::Signal(e.to_string()))?;

    let runtime = build_runtime()?;
    runtime.block_on(async move {
        let mut client = GatewayClient::connect(&args.url).await?;
        for id in &args.vehicles {
            client.join(VehicleId::new(id.as_str())).await?;
        }

        loop {
            let message = tokio::select! {
                _ = cancellation.cancelled() => break,
                message = client.next_message() => message,
            };

            match message {
                Ok(ServerMessage::Update(event)) => {
                    if let Some(update) = engine.on_update(&event) {
                        println!("{}", format_update(&event, &update));
                        for alert in &update.alerts {
                            println!(
                                "  >> {} approaching {} ({:.2} km)",
                                alert.vehicle_id, alert.point.label, alert.distance_km
                            );
                        }
                    }
                }
                Ok(ServerMessage::Joined { vehicle_id }) => println!("Watching {}", vehicle_id),
                Ok(ServerMessage::Left { vehicle_id }) => {
                    engine.forget(&vehicle_id);
                    println!("Stopped watching {}", vehicle_id);
                }
                Ok(ServerMessage::Error { message }) => eprintln!("Gateway error: {}", message),
                Err(TransportError::Closed) => {
                    println!("Gateway closed the connection");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }

        let _ = client.close().await;
        Ok::<(), CliError>(())
    })
}

/// Read a JSON array of points of interest.
/// Proximity settings from the config file, with `--radius-km` applied.
fn proximity_config(config: &ConfigFile, radius_km: Option<f64>) -> Result<ProximityConfig, CliError> {
    let mut proximity = ProximityConfig::from(&config.proximity);
    if let Some(radius) = radius_km {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CliError::InvalidArgument(format!(
                "radius must be a positive number of km, got {}",
                radius
            )));
        }
        proximity.approach_radius_km = radius;
    }
    Ok(proximity)
}

fn load_points(path: &Path) -> Result<Vec<PointOfInterest>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|e| CliError::FileRead {
        path: path.display().to_string(),
        error: e,
    })?;
    serde_json::from_str(&content).map_err(|e| {
        CliError::InvalidArgument(format!("{}: not a list of points: {}", path.display(), e))
    })
}

/// One status line per update.
fn format_update(event: &UpdateEvent, update: &ProximityUpdate) -> String {
    let mut line = format!(
        "{} {} @ {} {:.1} km/h, {:.2} km today",
        event.timestamp.format("%H:%M:%S"),
        event.vehicle_id,
        event.coordinate,
        event.speed,
        event.trip.distance_today
    );
    if let (Some((point, distance)), Some(eta)) = (&update.nearest, &update.eta) {
        line.push_str(&format!(
            " | {} {:.2} km, {}",
            point.label, distance, eta.text
        ));
    }
    line
}
