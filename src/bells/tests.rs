use crate::config::test_helpers::setup_test_app;
use crate::test_helpers::{empty_request, extract_response_body};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

fn json_put(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_default_bells_are_seeded() {
    let app = setup_test_app().await;

    let response = app.oneshot(empty_request("GET", "/api/bells")).await.unwrap();
    let (status, bells) = extract_response_body(response).await;

    assert_eq!(status, StatusCode::OK);
    let bells = bells.as_array().unwrap();
    assert_eq!(bells.len(), 7);
    assert_eq!(bells[0], json!({"lesson_number": 1, "start_time": "8:00", "end_time": "8:40"}));
    assert_eq!(bells[4]["start_time"], "11:25");
    assert_eq!(bells[6]["end_time"], "13:40");
}

#[tokio::test]
async fn test_update_bell() {
    let app = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(json_put(
            "/api/bells/3",
            &json!({"start_time": "09:45", "end_time": "10:25"}),
        ))
        .await
        .unwrap();
    let (status, bell) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::OK, "Update failed: {bell}");
    assert_eq!(bell["start_time"], "09:45");

    let response = app.oneshot(empty_request("GET", "/api/bells")).await.unwrap();
    let (_, bells) = extract_response_body(response).await;
    assert_eq!(bells[2]["end_time"], "10:25");
}

#[tokio::test]
async fn test_update_bell_rejects_bad_time() {
    let app = setup_test_app().await;

    let response = app
        .clone()
        .oneshot(json_put(
            "/api/bells/1",
            &json!({"start_time": "25:00", "end_time": "8:40"}),
        ))
        .await
        .unwrap();
    let (status, error) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error["error"]["message"].as_str().unwrap().contains("start_time"));

    // Nothing changed
    let response = app.oneshot(empty_request("GET", "/api/bells")).await.unwrap();
    let (_, bells) = extract_response_body(response).await;
    assert_eq!(bells[0]["start_time"], "8:00");
}

#[tokio::test]
async fn test_update_unknown_bell_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .oneshot(json_put(
            "/api/bells/9",
            &json!({"start_time": "15:00", "end_time": "15:40"}),
        ))
        .await
        .unwrap();
    let (status, error) = extract_response_body(response).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["code"], "RESOURCE_NOT_FOUND");
}
