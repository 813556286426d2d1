//! INI serialization logic for converting `ConfigFile` → INI string.

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[server]
; Address the WebSocket gateway listens on
listen = {}

[broadcast]
; Update events buffered per observer; further updates are dropped for that
; observer until it catches up (default: 64)
observer_queue_capacity = {}

[proximity]
; Radius in km inside which a vehicle counts as approaching a point (default: 0.5)
approach_radius_km = {}
; Average speed in km/h used for arrival estimates (default: 30)
average_speed_kmh = {}

[trip]
; UTC time of day (HH:MM) at which daily distances reset (default: 00:00)
daily_reset_utc = {}

[logging]
; Log directory, relative to the working directory unless absolute
directory = {}
file = {}
"#,
        config.server.listen,
        config.broadcast.observer_queue_capacity,
        config.proximity.approach_radius_km,
        config.proximity.average_speed_kmh,
        config.trip.daily_reset_utc.format("%H:%M"),
        config.logging.directory.display(),
        config.logging.file,
    )
}
