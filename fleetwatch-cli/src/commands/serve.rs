//! Serve command - run the tracking core with its WebSocket gateway.

use std::net::SocketAddr;
use std::path::PathBuf;

use fleetwatch::service::{TrackingService, TrackingServiceConfig};
use fleetwatch::trip::TrackedVehicle;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub config: Option<PathBuf>,
    pub listen: Option<SocketAddr>,
    /// Vehicles to register at startup.
    pub vehicles: Vec<String>,
}

/// Run the serve command until Ctrl+C.
pub fn run(args: ServeArgs) -> Result<(), CliError> {
    let mut runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("serve");

    // CLI takes precedence over config
    if let Some(listen) = args.listen {
        runner.config_mut().server.listen = listen;
    }
    let service_config = TrackingServiceConfig::from_config_file(runner.config());
    let runtime = runner.runtime()?;

    runtime.block_on(async move {
        let service = TrackingService::start(service_config).await?;

        for id in &args.vehicles {
            service
                .fleet()
                .register(TrackedVehicle::new(id.as_str()))
                .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
        }

        let shutdown = service.cancellation();
        ctrlc::set_handler(move || shutdown.cancel())
            .map_err(|e| CliError::Signal(e.to_string()))?;

        print_banner(&service);

        service.cancelled().await;
        println!();
        println!("{}", service.telemetry_snapshot());
        service.shutdown().await;
        info!("Serve command finished");
        Ok::<(), CliError>(())
    })
}

fn print_banner(service: &TrackingService) {
    let config = service.config();

    println!("FleetWatch v{}", fleetwatch::VERSION);
    println!("================================");
    println!();
    if let Some(addr) = service.local_addr() {
        println!("Gateway:     ws://{}", addr);
    }
    println!("Vehicles:    {}", service.fleet().len());
    println!("Queue size:  {} events per observer", config.observer_queue_capacity);
    println!(
        "Daily reset: {} UTC",
        config.daily_reset_utc.format("%H:%M")
    );
    println!();
    println!("Press Ctrl+C to stop.");
}
