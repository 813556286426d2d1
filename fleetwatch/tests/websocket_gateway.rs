//! WebSocket gateway end to end: real sockets, real JSON frames.

use std::time::Duration;

use chrono::{TimeZone, Utc};

use fleetwatch::geo::Coordinate;
use fleetwatch::service::{TrackingService, TrackingServiceConfig};
use fleetwatch::transport::{GatewayClient, ServerMessage, TransportError};
use fleetwatch::trip::{Sample, TrackedVehicle, VehicleId};

const TIMEOUT: Duration = Duration::from_secs(5);

async fn start_service() -> (TrackingService, String) {
    let config = TrackingServiceConfig::default().with_listen("127.0.0.1:0".parse().unwrap());
    let service = TrackingService::start(config).await.unwrap();
    let url = format!("ws://{}", service.local_addr().unwrap());
    (service, url)
}

async fn next(client: &mut GatewayClient) -> ServerMessage {
    tokio::time::timeout(TIMEOUT, client.next_message())
        .await
        .expect("timed out waiting for a frame")
        .unwrap()
}

#[tokio::test]
async fn test_join_sample_update_roundtrip() {
    let (service, url) = start_service().await;
    service.fleet().register(TrackedVehicle::new("bus-1")).unwrap();

    let mut watcher = GatewayClient::connect(&url).await.unwrap();
    let mut reporter = GatewayClient::connect(&url).await.unwrap();

    watcher.join(VehicleId::new("bus-1")).await.unwrap();
    assert_eq!(
        next(&mut watcher).await,
        ServerMessage::Joined {
            vehicle_id: VehicleId::new("bus-1")
        }
    );

    let at = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    reporter
        .send_sample(&Sample::new("bus-1", Coordinate::new(20.2961, 85.8245), at).with_speed(25.0))
        .await
        .unwrap();

    match next(&mut watcher).await {
        ServerMessage::Update(event) => {
            assert_eq!(event.vehicle_id, VehicleId::new("bus-1"));
            assert_eq!(event.timestamp, at);
            assert_eq!(event.speed, 25.0);
        }
        other => panic!("expected update, got {:?}", other),
    }

    watcher.close().await.unwrap();
    reporter.close().await.unwrap();
    service.shutdown().await;
}

#[tokio::test]
async fn test_invalid_samples_get_error_frames() {
    let (service, url) = start_service().await;
    let mut client = GatewayClient::connect(&url).await.unwrap();

    let at = Utc::now();
    client
        .send_sample(&Sample::new("ghost", Coordinate::new(1.0, 1.0), at))
        .await
        .unwrap();
    assert!(matches!(next(&mut client).await, ServerMessage::Error { .. }));

    service.fleet().register(TrackedVehicle::new("bus-1")).unwrap();
    client
        .send_sample(&Sample::new("bus-1", Coordinate::new(91.0, 1.0), at))
        .await
        .unwrap();
    match next(&mut client).await {
        ServerMessage::Error { message } => assert!(message.contains("latitude")),
        other => panic!("expected error, got {:?}", other),
    }

    assert_eq!(service.telemetry_snapshot().samples_rejected, 2);
    service.shutdown().await;
}

#[tokio::test]
async fn test_disconnect_leaves_all_rooms() {
    let (service, url) = start_service().await;
    let mut client = GatewayClient::connect(&url).await.unwrap();

    for id in ["bus-1", "bus-2", "bus-3"] {
        client.join(VehicleId::new(id)).await.unwrap();
        next(&mut client).await;
    }
    assert_eq!(service.registry().room_count(), 3);

    client.close().await.unwrap();

    // The server notices the close asynchronously
    let deadline = tokio::time::Instant::now() + TIMEOUT;
    while service.registry().room_count() > 0
        || service.telemetry_snapshot().observers_disconnected == 0
    {
        assert!(tokio::time::Instant::now() < deadline, "rooms not cleaned up");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(service.telemetry_snapshot().observers_disconnected, 1);

    service.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_closes_connections() {
    let (service, url) = start_service().await;
    let mut client = GatewayClient::connect(&url).await.unwrap();
    client.join(VehicleId::new("bus-1")).await.unwrap();
    next(&mut client).await;

    service.shutdown().await;

    let result = tokio::time::timeout(TIMEOUT, client.next_message())
        .await
        .expect("client should see the close");
    assert!(matches!(
        result,
        Err(TransportError::Closed) | Err(TransportError::WebSocket(_))
    ));
}
