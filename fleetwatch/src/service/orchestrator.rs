//! Tracking service orchestrator.
//!
//! `TrackingService` wires the tracking core together and owns its
//! background tasks:
//!
//! - **Fleet** - per-vehicle trip state and the ingestion entry point
//! - **Interest registry + broadcaster** - fan-out of update events
//! - **Daily reset daemon** - zeroes `distance_today` at a UTC time of day
//! - **WebSocket gateway** (optional) - observer connections
//!
//! # Startup Sequence
//!
//! 1. Metrics, registry and broadcaster are created
//! 2. The fleet is created on top of the broadcaster
//! 3. The daily reset daemon starts
//! 4. The gateway binds its listen socket, if one is configured
//!
//! # Example
//!
//! ```ignore
//! use fleetwatch::service::{TrackingService, TrackingServiceConfig};
//!
//! let config = TrackingServiceConfig::from_config_file(&config_file);
//! let service = TrackingService::start(config).await?;
//!
//! let snapshot = service.telemetry_snapshot();
//!
//! service.shutdown().await;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::NaiveTime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::daily_reset::spawn_daily_reset;
use super::error::ServiceError;
use crate::broadcast::Broadcaster;
use crate::config::ConfigFile;
use crate::fleet::Fleet;
use crate::registry::{InterestRegistry, DEFAULT_OBSERVER_QUEUE_CAPACITY};
use crate::telemetry::{TelemetrySnapshot, TrackingMetrics};
use crate::transport::{GatewayContext, WebSocketGateway};

/// Settings the service needs at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingServiceConfig {
    /// Gateway listen address; `None` runs without a network listener.
    pub listen: Option<SocketAddr>,
    pub observer_queue_capacity: usize,
    pub daily_reset_utc: NaiveTime,
}

impl Default for TrackingServiceConfig {
    fn default() -> Self {
        Self {
            listen: None,
            observer_queue_capacity: DEFAULT_OBSERVER_QUEUE_CAPACITY,
            daily_reset_utc: NaiveTime::MIN,
        }
    }
}

impl TrackingServiceConfig {
    /// Build from a loaded configuration file, with the gateway enabled.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self {
            listen: Some(config.server.listen),
            observer_queue_capacity: config.broadcast.observer_queue_capacity,
            daily_reset_utc: config.trip.daily_reset_utc,
        }
    }

    pub fn with_listen(mut self, addr: SocketAddr) -> Self {
        self.listen = Some(addr);
        self
    }
}

/// Running tracking core and its background tasks.
pub struct TrackingService {
    fleet: Arc<Fleet>,
    registry: Arc<InterestRegistry>,
    metrics: Arc<TrackingMetrics>,

    /// Bound gateway address, if the gateway is running.
    local_addr: Option<SocketAddr>,

    tasks: Vec<JoinHandle<()>>,

    /// Master cancellation token.
    cancellation: CancellationToken,

    config: TrackingServiceConfig,
}

impl TrackingService {
    /// Start the tracking core with the given configuration.
    pub async fn start(config: TrackingServiceConfig) -> Result<Self, ServiceError> {
        if config.observer_queue_capacity == 0 {
            return Err(ServiceError::ConfigError(
                "observer queue capacity must be positive".to_string(),
            ));
        }

        let cancellation = CancellationToken::new();
        let metrics = Arc::new(TrackingMetrics::new());
        let registry = Arc::new(InterestRegistry::new());
        let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&registry), Arc::clone(&metrics)));
        let fleet = Arc::new(Fleet::new(broadcaster, Arc::clone(&metrics)));

        let mut tasks = vec![spawn_daily_reset(
            Arc::clone(&fleet),
            config.daily_reset_utc,
            cancellation.child_token(),
        )];

        let mut local_addr = None;
        if let Some(listen) = config.listen {
            let ctx = GatewayContext {
                fleet: Arc::clone(&fleet),
                registry: Arc::clone(&registry),
                metrics: Arc::clone(&metrics),
                queue_capacity: config.observer_queue_capacity,
            };
            let gateway = match WebSocketGateway::bind(listen, ctx).await {
                Ok(gateway) => gateway,
                Err(e) => {
                    cancellation.cancel();
                    return Err(e.into());
                }
            };
            local_addr = Some(gateway.local_addr()?);
            tasks.push(tokio::spawn(gateway.run(cancellation.child_token())));
        }

        info!(
            gateway = ?local_addr,
            queue_capacity = config.observer_queue_capacity,
            "Tracking service started"
        );

        Ok(Self {
            fleet,
            registry,
            metrics,
            local_addr,
            tasks,
            cancellation,
            config,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn fleet(&self) -> &Arc<Fleet> {
        &self.fleet
    }

    pub fn registry(&self) -> &Arc<InterestRegistry> {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<TrackingMetrics> {
        &self.metrics
    }

    pub fn config(&self) -> &TrackingServiceConfig {
        &self.config
    }

    /// Address the gateway is bound to, if it is running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Get a clone of the cancellation token for external shutdown signalling.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.metrics.snapshot()
    }

    /// Wait until the service is cancelled from elsewhere.
    pub async fn cancelled(&self) {
        self.cancellation.cancelled().await
    }

    // =========================================================================
    // Shutdown
    // =========================================================================

    /// Stop all background tasks and wait for them to finish.
    pub async fn shutdown(self) {
        info!("Shutting down tracking service");
        self.cancellation.cancel();

        for task in self.tasks {
            if let Err(e) = task.await {
                warn!(error = %e, "Background task ended abnormally");
            }
        }

        info!(
            vehicles = self.fleet.len(),
            rooms = self.registry.room_count(),
            "Tracking service stopped"
        );
    }
}
