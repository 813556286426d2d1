//! Daily distance reset daemon.
//!
//! Sleeps until the configured UTC time of day, resets `distance_today` for
//! every vehicle, and repeats until cancelled.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::fleet::Fleet;

/// Next instant strictly after `now` whose UTC time of day is `at`.
pub fn next_reset_after(now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
    let today = Utc.from_utc_datetime(&now.date_naive().and_time(at));
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Spawns the daily reset loop.
///
/// Stops when `cancellation` is triggered.
pub fn spawn_daily_reset(
    fleet: Arc<Fleet>,
    at: NaiveTime,
    cancellation: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(at = %at.format("%H:%M"), "Daily reset scheduled (UTC)");

        let mut last_reset: Option<DateTime<Utc>> = None;

        loop {
            // Never schedule at or before the reset that just ran
            let now = match last_reset {
                Some(last) if last > Utc::now() => last,
                _ => Utc::now(),
            };
            let next = next_reset_after(now, at);
            let wait = (next - now).to_std().unwrap_or_default();
            debug!(next = %next, "Waiting for daily reset");

            tokio::select! {
                _ = cancellation.cancelled() => {
                    debug!("Daily reset daemon stopped");
                    break;
                }
                _ = tokio::time::sleep(wait) => {
                    fleet.reset_all_daily(next);
                    last_reset = Some(next);
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::{PublishReport, UpdatePublisher};
    use crate::telemetry::TrackingMetrics;
    use crate::trip::UpdateEvent;

    struct Discard;

    impl UpdatePublisher for Discard {
        fn publish(&self, _event: UpdateEvent) -> PublishReport {
            PublishReport::default()
        }
    }

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_next_reset_later_today() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap();
        assert_eq!(
            next_reset_after(now, at(3, 30)),
            Utc.with_ymd_and_hms(2024, 3, 1, 3, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_next_reset_tomorrow() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(
            next_reset_after(now, NaiveTime::MIN),
            Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_reset_exactly_now_rolls_over() {
        let now = Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap();
        assert_eq!(
            next_reset_after(now, NaiveTime::MIN),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_daemon_stops_on_cancel() {
        let fleet = Arc::new(Fleet::new(Arc::new(Discard), Arc::new(TrackingMetrics::new())));
        let cancellation = CancellationToken::new();
        let handle = spawn_daily_reset(fleet, NaiveTime::MIN, cancellation.clone());

        cancellation.cancel();
        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("daemon should stop")
            .unwrap();
    }
}
