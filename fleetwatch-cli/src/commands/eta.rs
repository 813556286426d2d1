//! ETA command - one-off arrival estimate between two coordinates.

use fleetwatch::geo::{self, Coordinate};
use fleetwatch::proximity;

use crate::error::CliError;

/// Arguments for the eta command.
pub struct EtaArgs {
    pub from: Coordinate,
    pub to: Coordinate,
    pub speed: f64,
}

/// Run the eta command.
pub fn run(args: EtaArgs) -> Result<(), CliError> {
    if !(args.speed.is_finite() && args.speed > 0.0) {
        return Err(CliError::InvalidArgument(format!(
            "speed must be a positive number of km/h, got {}",
            args.speed
        )));
    }

    let estimate = proximity::eta(args.from, args.to, args.speed);
    let bearing = geo::bearing(args.from, args.to);

    println!("From:     {}", args.from);
    println!("To:       {}", args.to);
    println!("Distance: {:.2} km", estimate.distance_km);
    println!("Bearing:  {:.0}°", bearing);
    println!("Speed:    {} km/h", args.speed);
    println!("ETA:      {} ({} min)", estimate.text, estimate.minutes);
    Ok(())
}

/// Parse `lat,lon` into a validated coordinate (for clap).
pub fn parse_coordinate(s: &str) -> Result<Coordinate, String> {
    let (lat, lon) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got '{}'", s))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude '{}'", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude '{}'", lon.trim()))?;
    Coordinate::validated(lat, lon).map_err(|e| e.to_string())
}
