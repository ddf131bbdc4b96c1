mod support;

use std::sync::Arc;

use availabilityGrid::config::GridSettings;
use availabilityGrid::handlers::http::routes;
use availabilityGrid::handlers::state::AppState;
use availabilityGrid::models::grid::HexColor;
use availabilityGrid::service::range_parser::MalformedRangePolicy;
use serde_json::{Value, json};
use support::{FakeProvider, record};
use warp::http::{Response, StatusCode};

fn state() -> AppState {
    let settings = GridSettings {
        fill_color: "ffa07a".parse::<HexColor>().unwrap(),
        policy: MalformedRangePolicy::Skip,
    };
    let provider = FakeProvider::with_records(vec![record(2, Some("6am-9am"))]);
    AppState::new(Arc::new(provider), settings)
}

fn json_body<B: AsRef<[u8]>>(response: &Response<B>) -> Value {
    serde_json::from_slice(response.body().as_ref()).unwrap()
}

fn content_type<B>(response: &Response<B>) -> Option<&str> {
    response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn health_reports_ok() {
    let filter = routes(state());

    let response = warp::test::request()
        .method("GET")
        .path("/health")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(&response), json!({ "status": "ok" }));
}

#[tokio::test]
async fn generate_returns_summary_json() {
    let filter = routes(state());

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .json(&json!({ "external_id": "170601496" }))
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(&response);
    assert_eq!(body["success"], true);
    assert_eq!(body["external_id"], "170601496");
    assert_eq!(body["message"], "Schedule generated for ID: 170601496");
    assert!(body["generation_id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn malformed_generate_bodies_are_json_bad_requests() {
    let filter = routes(state());

    for raw in ["", "not json", r#"{"external_id":42}"#] {
        let response = warp::test::request()
            .method("POST")
            .path("/generate")
            .header("content-type", "application/json")
            .body(raw)
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {raw:?}");
        assert_eq!(content_type(&response), Some("application/json"));
        let body = json_body(&response);
        assert_eq!(body["kind"], "malformed_input");
        assert!(body["error"].as_str().is_some());
    }
}

#[tokio::test]
async fn missing_external_id_is_rejected_by_the_handler() {
    let filter = routes(state());

    let response = warp::test::request()
        .method("POST")
        .path("/generate")
        .json(&json!({}))
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&response)["error"], "No external ID provided");
}

#[tokio::test]
async fn unknown_route_is_a_json_not_found() {
    let filter = routes(state());

    let response = warp::test::request()
        .method("GET")
        .path("/nowhere")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(content_type(&response), Some("application/json"));
    assert_eq!(json_body(&response)["kind"], "not_found");
}

#[tokio::test]
async fn download_serves_generated_grid_under_requested_name() {
    let filter = routes(state());

    let generated = warp::test::request()
        .method("POST")
        .path("/generate")
        .json(&json!({ "external_id": "170601496" }))
        .reply(&filter)
        .await;
    assert_eq!(generated.status(), StatusCode::OK);

    let response = warp::test::request()
        .method("GET")
        .path("/download/170601496?filename=week.json")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("Content-Disposition")
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"week.json\"")
    );
    let snapshot = json_body(&response);
    assert_eq!(snapshot["rows"][1]["day"], 2);
    assert_eq!(snapshot["rows"][1]["cells"][36], "FFA07A");
}

#[tokio::test]
async fn download_before_generate_is_not_found() {
    let filter = routes(state());

    let response = warp::test::request()
        .method("GET")
        .path("/download/170601496")
        .reply(&filter)
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(&response)["error"], "Grid not found");
}
