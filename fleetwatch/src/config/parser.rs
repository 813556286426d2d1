//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use std::path::PathBuf;

use chrono::NaiveTime;
use ini::Ini;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("listen") {
            config.server.listen = v.trim().parse().map_err(|_| {
                invalid("server", "listen", v, "expected host:port, e.g. 127.0.0.1:8787")
            })?;
        }
    }

    // [broadcast] section
    if let Some(section) = ini.section(Some("broadcast")) {
        if let Some(v) = section.get("observer_queue_capacity") {
            let capacity: usize = v.trim().parse().map_err(|_| {
                invalid("broadcast", "observer_queue_capacity", v, "must be a positive integer")
            })?;
            if capacity == 0 {
                return Err(invalid(
                    "broadcast",
                    "observer_queue_capacity",
                    v,
                    "must be a positive integer",
                ));
            }
            config.broadcast.observer_queue_capacity = capacity;
        }
    }

    // [proximity] section
    if let Some(section) = ini.section(Some("proximity")) {
        if let Some(v) = section.get("approach_radius_km") {
            config.proximity.approach_radius_km = parse_positive("proximity", "approach_radius_km", v)?;
        }
        if let Some(v) = section.get("average_speed_kmh") {
            config.proximity.average_speed_kmh = parse_positive("proximity", "average_speed_kmh", v)?;
        }
    }

    // [trip] section
    if let Some(section) = ini.section(Some("trip")) {
        if let Some(v) = section.get("daily_reset_utc") {
            config.trip.daily_reset_utc = NaiveTime::parse_from_str(v.trim(), "%H:%M")
                .map_err(|_| invalid("trip", "daily_reset_utc", v, "expected HH:MM (UTC)"))?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn parse_positive(section: &str, key: &str, value: &str) -> Result<f64, ConfigFileError> {
    match value.trim().parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(n),
        _ => Err(invalid(section, key, value, "must be a positive number")),
    }
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Expand a leading `~` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let ini = Ini::load_from_str(content).unwrap();
        parse_ini(&ini)
    }

    #[test]
    fn test_empty_ini_is_default() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_overlays_values() {
        let config = parse(
            "[server]\nlisten = 0.0.0.0:9100\n\
             [proximity]\napproach_radius_km = 1.25\naverage_speed_kmh = 45\n\
             [trip]\ndaily_reset_utc = 04:15\n\
             [logging]\nfile = custom.log\n",
        )
        .unwrap();

        assert_eq!(config.server.listen.port(), 9100);
        assert_eq!(config.proximity.approach_radius_km, 1.25);
        assert_eq!(config.proximity.average_speed_kmh, 45.0);
        assert_eq!(
            config.trip.daily_reset_utc,
            NaiveTime::from_hms_opt(4, 15, 0).unwrap()
        );
        assert_eq!(config.logging.file, "custom.log");
        // untouched sections keep defaults
        assert_eq!(config.broadcast.observer_queue_capacity, 64);
    }

    #[test]
    fn test_invalid_listen() {
        let err = parse("[server]\nlisten = nowhere\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref section, ref key, .. }
                if section == "server" && key == "listen"
        ));
    }

    #[test]
    fn test_zero_queue_capacity_rejected() {
        assert!(parse("[broadcast]\nobserver_queue_capacity = 0\n").is_err());
        assert!(parse("[broadcast]\nobserver_queue_capacity = -3\n").is_err());
    }

    #[test]
    fn test_non_positive_speed_rejected() {
        let err = parse("[proximity]\naverage_speed_kmh = 0\n").unwrap_err();
        assert!(err.to_string().contains("proximity.average_speed_kmh"));
        assert!(parse("[proximity]\napproach_radius_km = abc\n").is_err());
    }

    #[test]
    fn test_invalid_reset_time() {
        assert!(parse("[trip]\ndaily_reset_utc = 25:00\n").is_err());
        assert!(parse("[trip]\ndaily_reset_utc = noon\n").is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let plain = expand_tilde("/var/log/fleetwatch");
        assert_eq!(plain, PathBuf::from("/var/log/fleetwatch"));

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/logs"), home.join("logs"));
        }
    }
}
