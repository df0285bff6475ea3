use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_intake::clients::HttpCenterDirectory;
use booking_intake::services::{select, CenterDirectory, DirectoryError, SelectionPolicy};

fn directory(server: &MockServer, timeout: Duration) -> HttpCenterDirectory {
    HttpCenterDirectory::new(server.uri(), timeout).unwrap()
}

#[tokio::test]
async fn test_lists_centers_for_company() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-center-by-name/PQR"))
        .and(header("User-Agent", "BookingIntake/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "centerId": "PQR_NORTH",
                "name": "PQR North",
                "location": "Lille",
                "capacity": 4,
                "bookings": [{}, {}, {}],
                "is_active": true
            },
            {
                "_id": "PQR_SOUTH",
                "name": "PQR South",
                "capacity": 20,
                "bookings": [{}],
                "is_active": true
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let centers = directory(&server, Duration::from_secs(2))
        .list_candidates("PQR")
        .await
        .unwrap();

    assert_eq!(centers.len(), 2);
    assert_eq!(centers[0].id, "PQR_NORTH");
    assert_eq!(centers[0].current_bookings, 3);
    assert_eq!(centers[1].id, "PQR_SOUTH");
    assert_eq!(centers[1].location, "");

    assert_eq!(select(&centers, SelectionPolicy::LeastLoad).unwrap().id, "PQR_SOUTH");
    assert_eq!(select(&centers, SelectionPolicy::MaxFreeCapacity).unwrap().id, "PQR_SOUTH");
}

#[tokio::test]
async fn test_empty_list_is_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-center-by-name/XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let centers = directory(&server, Duration::from_secs(2))
        .list_candidates("XYZ")
        .await
        .unwrap();
    assert!(centers.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("cold start"))
        .mount(&server)
        .await;

    let result = directory(&server, Duration::from_secs(2)).list_candidates("PQR").await;
    assert!(matches!(result, Err(DirectoryError::Status(503))));
}

#[tokio::test]
async fn test_unexpected_payload_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "centers": "not-a-list" })))
        .mount(&server)
        .await;

    let result = directory(&server, Duration::from_secs(2)).list_candidates("PQR").await;
    assert!(matches!(result, Err(DirectoryError::Payload(_))));
}

#[tokio::test]
async fn test_slow_directory_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let limit = Duration::from_millis(50);
    let result = directory(&server, limit).list_candidates("PQR").await;
    match result {
        Err(DirectoryError::Timeout(elapsed)) => assert_eq!(elapsed, limit),
        other => panic!("expected timeout, got {:?}", other.map(|c| c.len())),
    }
}

#[tokio::test]
async fn test_unreachable_directory_is_transport_error() {
    // puerto 1: conexión rechazada
    let result = HttpCenterDirectory::new("http://127.0.0.1:1", Duration::from_secs(2))
        .unwrap()
        .list_candidates("PQR")
        .await;
    assert!(matches!(result, Err(DirectoryError::Transport(_))));
}
