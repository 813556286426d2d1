//! Configuration for FleetWatch.
//!
//! Settings are read from `~/.fleetwatch/config.ini`. Every key is optional;
//! missing keys keep their defaults and invalid values are reported with the
//! section and key that failed.
//!
//! # Example
//!
//! ```
//! use fleetwatch::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.broadcast.observer_queue_capacity, 64);
//! ```

mod file;
mod parser;
mod settings;
mod writer;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    BroadcastSettings, ConfigFile, LoggingSettings, ProximitySettings, ServerSettings,
    TripSettings, DEFAULT_LISTEN_PORT, DEFAULT_LOG_DIRECTORY, DEFAULT_LOG_FILE,
};
