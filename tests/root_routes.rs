use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt; // for `oneshot`

use salonbook_reminders::app;
use salonbook_reminders::models::GenericResponse;

async fn get(path: &str) -> (StatusCode, GenericResponse) {
    let req = Request::builder().uri(path).body(Body::empty()).unwrap();
    let res = app::router().oneshot(req).await.unwrap();
    let status = res.status();
    let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
    let response = serde_json::from_slice(&body).unwrap();
    (status, response)
}

#[tokio::test]
async fn test_default_route_reports_service_running() {
    let (status, res) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.success, true);
    assert_eq!(res.message, "Reminder service is running".to_owned());
}

#[tokio::test]
async fn test_ping_route() {
    let (status, res) = get("/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res.success, true);
    assert_eq!(res.message.as_str(), "Server running successfully!");
}

#[tokio::test]
async fn test_unknown_path_hits_the_404_fallback() {
    let (status, res) = get("/no-such-route").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res.success, false);
    assert_eq!(res.message, "Requested resource not found".to_owned());
}
