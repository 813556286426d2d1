//! Configuration structs, one per INI section, with their defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono::NaiveTime;

use crate::proximity::{ProximityConfig, DEFAULT_APPROACH_RADIUS_KM, DEFAULT_AVERAGE_SPEED_KMH};
use crate::registry::DEFAULT_OBSERVER_QUEUE_CAPACITY;

/// Default WebSocket listen port.
pub const DEFAULT_LISTEN_PORT: u16 = 8787;

/// Default log directory, relative to the working directory.
pub const DEFAULT_LOG_DIRECTORY: &str = "logs";

/// Default log file name.
pub const DEFAULT_LOG_FILE: &str = "fleetwatch.log";

/// Full configuration file contents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub broadcast: BroadcastSettings,
    pub proximity: ProximitySettings,
    pub trip: TripSettings,
    pub logging: LoggingSettings,
}

/// `[server]`
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub listen: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), DEFAULT_LISTEN_PORT),
        }
    }
}

/// `[broadcast]`
#[derive(Debug, Clone, PartialEq)]
pub struct BroadcastSettings {
    /// Events buffered per observer before further deliveries are dropped.
    pub observer_queue_capacity: usize,
}

impl Default for BroadcastSettings {
    fn default() -> Self {
        Self {
            observer_queue_capacity: DEFAULT_OBSERVER_QUEUE_CAPACITY,
        }
    }
}

/// `[proximity]`
#[derive(Debug, Clone, PartialEq)]
pub struct ProximitySettings {
    pub approach_radius_km: f64,
    pub average_speed_kmh: f64,
}

impl Default for ProximitySettings {
    fn default() -> Self {
        Self {
            approach_radius_km: DEFAULT_APPROACH_RADIUS_KM,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

impl From<&ProximitySettings> for ProximityConfig {
    fn from(settings: &ProximitySettings) -> Self {
        Self {
            approach_radius_km: settings.approach_radius_km,
            average_speed_kmh: settings.average_speed_kmh,
        }
    }
}

/// `[trip]`
#[derive(Debug, Clone, PartialEq)]
pub struct TripSettings {
    /// UTC time of day at which daily distances are reset.
    pub daily_reset_utc: NaiveTime,
}

impl Default for TripSettings {
    fn default() -> Self {
        Self {
            daily_reset_utc: NaiveTime::MIN,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIRECTORY),
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}
