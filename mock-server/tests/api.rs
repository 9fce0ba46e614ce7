use axum::{
    body::Bytes,
    http::{self, Request, StatusCode},
    response::Response,
    Router,
};
use http_body_util::BodyExt;
use mock_server::{app, app_with_origin};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: Response) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

/// Routers share their state across clones, so each call sees earlier writes.
async fn send(app: &Router, request: Request<String>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

const SITE: &str = r#"{
    "apps": {
        "http": {
            "servers": {
                "srv0": {
                    "@id": "srv0",
                    "listen": [":443"],
                    "routes": [{"@id": "host", "host": ["example.com"]}]
                }
            }
        }
    }
}"#;

async fn loaded() -> Router {
    let app = app();
    let resp = send(&app, json_request("POST", "/config/", SITE)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    app
}

// --- read ---

#[tokio::test]
async fn empty_config_reads_as_null() {
    let resp = send(&app(), empty_request("GET", "/config/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, Value::Null);
}

#[tokio::test]
async fn read_nested_path() {
    let app = loaded().await;
    let resp = send(&app, empty_request("GET", "/config/apps/http/servers/srv0/listen")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([":443"]));
}

#[tokio::test]
async fn read_missing_path_returns_404() {
    let app = loaded().await;
    let resp = send(&app, empty_request("GET", "/config/apps/tls")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn read_by_id() {
    let app = loaded().await;
    let resp = send(&app, empty_request("GET", "/id/host/host/0")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!("example.com"));
}

#[tokio::test]
async fn unknown_id_returns_404() {
    let app = loaded().await;
    let resp = send(&app, empty_request("GET", "/id/nope")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- write ---

#[tokio::test]
async fn invalid_json_body_returns_400() {
    let app = loaded().await;
    let resp = send(&app, json_request("PUT", "/id/host/host/0", "test.example.com")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn put_existing_key_returns_409() {
    let app = loaded().await;
    let resp = send(&app, json_request("PUT", "/config/apps/http", "{}")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn patch_missing_value_returns_404() {
    let app = loaded().await;
    let resp = send(&app, json_request("PATCH", "/config/apps/tls", "{}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn post_appends_to_array() {
    let app = loaded().await;
    let resp = send(&app, json_request("POST", "/id/srv0/listen", r#"":80""#)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = send(&app, empty_request("GET", "/id/srv0/listen")).await;
    assert_eq!(body_json(resp).await, json!([":443", ":80"]));
}

#[tokio::test]
async fn unsupported_method_returns_405() {
    let resp = send(&app(), empty_request("HEAD", "/stop")).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- origin ---

#[tokio::test]
async fn origin_is_enforced_when_configured() {
    let app = app_with_origin(Some("http://localhost:2019".to_string()));

    let resp = send(&app, empty_request("GET", "/config/")).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = Request::builder()
        .uri("/config/")
        .header(http::header::ORIGIN, "http://localhost:2019")
        .body(String::new())
        .unwrap();
    let resp = send(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full lifecycle ---

#[tokio::test]
async fn config_lifecycle() {
    let app = loaded().await;

    // insert a host at the front of the array
    let resp = send(&app, json_request("PUT", "/id/host/host/0", r#""test.example.com""#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, empty_request("GET", "/id/host/host")).await;
    assert_eq!(body_json(resp).await, json!(["test.example.com", "example.com"]));

    // replace it
    let resp = send(&app, json_request("PATCH", "/id/host/host/0", r#""test2.example.com""#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, empty_request("GET", "/id/host/host/0")).await;
    assert_eq!(body_json(resp).await, json!("test2.example.com"));

    // delete it
    let resp = send(&app, empty_request("DELETE", "/config/apps/http/servers/srv0/routes/0/host/0")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
    let resp = send(&app, empty_request("GET", "/id/host/host")).await;
    assert_eq!(body_json(resp).await, json!(["example.com"]));

    // unload everything
    let resp = send(&app, empty_request("DELETE", "/config/")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let resp = send(&app, empty_request("GET", "/config/")).await;
    assert_eq!(body_json(resp).await, Value::Null);
}

#[tokio::test]
async fn stop_returns_200() {
    let resp = send(&app(), empty_request("POST", "/stop")).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
