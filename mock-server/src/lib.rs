use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, post},
    Json, Router,
};
use serde_json::Value;
use tokio::{
    net::TcpListener,
    sync::{Notify, RwLock},
};
use tracing::info;

type Reply = Result<Response, (StatusCode, String)>;

/// In-memory state of the admin API: the configuration document, the
/// `Origin` value requests must carry (if any), and the stop signal.
#[derive(Clone)]
pub struct AdminState {
    pub config: Arc<RwLock<Value>>,
    origin: Option<String>,
    shutdown: Arc<Notify>,
}

impl AdminState {
    pub fn new(origin: Option<String>) -> Self {
        Self {
            config: Arc::new(RwLock::new(Value::Null)),
            origin,
            shutdown: Arc::new(Notify::new()),
        }
    }
}

pub fn app() -> Router {
    app_with_origin(None)
}

/// Router that answers 403 to any request whose `Origin` header differs
/// from `origin`.
pub fn app_with_origin(origin: Option<String>) -> Router {
    router(AdminState::new(origin))
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/config", any(config_root))
        .route("/config/", any(config_root))
        .route("/config/{*path}", any(config_path))
        .route("/id/{id}", any(id_root))
        .route("/id/{id}/{*path}", any(id_path))
        .route("/stop", post(stop))
        .with_state(state)
}

/// Serve until a `POST /stop` arrives.
pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, AdminState::new(None)).await
}

pub async fn run_with_state(listener: TcpListener, state: AdminState) -> Result<(), std::io::Error> {
    let shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await
}

async fn config_root(State(state): State<AdminState>, method: Method, headers: HeaderMap, body: Bytes) -> Reply {
    dispatch(&state, method, None, "", &headers, &body).await
}

async fn config_path(
    State(state): State<AdminState>,
    Path(path): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    dispatch(&state, method, None, &path, &headers, &body).await
}

async fn id_root(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    dispatch(&state, method, Some(&id), "", &headers, &body).await
}

async fn id_path(
    State(state): State<AdminState>,
    Path((id, path)): Path<(String, String)>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Reply {
    dispatch(&state, method, Some(&id), &path, &headers, &body).await
}

async fn stop(State(state): State<AdminState>, headers: HeaderMap) -> Reply {
    check_origin(&state, &headers)?;
    info!("stop requested, shutting down");
    state.shutdown.notify_one();
    Ok(StatusCode::OK.into_response())
}

fn check_origin(state: &AdminState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let Some(expected) = &state.origin else {
        return Ok(());
    };
    let given = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    if given == Some(expected.as_str()) {
        Ok(())
    } else {
        Err((StatusCode::FORBIDDEN, format!("client is not allowed to access from origin '{}'", given.unwrap_or(""))))
    }
}

fn parse_body(body: &[u8]) -> Result<Value, (StatusCode, String)> {
    serde_json::from_slice(body).map_err(|e| (StatusCode::BAD_REQUEST, format!("decoding request body: {e}")))
}

fn not_found(path: &[String]) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("invalid traversal path at: /{}", path.join("/")))
}

async fn dispatch(
    state: &AdminState,
    method: Method,
    id: Option<&str>,
    path: &str,
    headers: &HeaderMap,
    body: &[u8],
) -> Reply {
    check_origin(state, headers)?;

    let mut doc = state.config.write().await;
    let mut target = match id {
        Some(id) => {
            let mut trail = Vec::new();
            if !find_id(&doc, id, &mut trail) {
                return Err((StatusCode::NOT_FOUND, format!("unknown object ID '{id}'")));
            }
            trail
        }
        None => Vec::new(),
    };
    target.extend(path.split('/').filter(|s| !s.is_empty()).map(str::to_string));

    match method {
        Method::GET => {
            let node = lookup(&doc, &target).ok_or_else(|| not_found(&target))?;
            Ok(Json(node.clone()).into_response())
        }
        Method::POST => {
            let value = parse_body(body)?;
            post_value(&mut doc, &target, value)?;
            info!(path = %target.join("/"), "config posted");
            Ok(StatusCode::OK.into_response())
        }
        Method::PUT => {
            let value = parse_body(body)?;
            put_value(&mut doc, &target, value)?;
            info!(path = %target.join("/"), "config created");
            Ok(StatusCode::OK.into_response())
        }
        Method::PATCH => {
            let value = parse_body(body)?;
            let node = lookup_mut(&mut doc, &target).ok_or_else(|| not_found(&target))?;
            *node = value;
            info!(path = %target.join("/"), "config patched");
            Ok(StatusCode::OK.into_response())
        }
        Method::DELETE => {
            delete_value(&mut doc, &target)?;
            info!(path = %target.join("/"), "config deleted");
            Ok(StatusCode::OK.into_response())
        }
        _ => Err((StatusCode::METHOD_NOT_ALLOWED, format!("method {method} not allowed"))),
    }
}

/// Record in `trail` the path to the first object tagged `"@id": id`.
fn find_id(value: &Value, id: &str, trail: &mut Vec<String>) -> bool {
    match value {
        Value::Object(map) => {
            if map.get("@id").and_then(Value::as_str) == Some(id) {
                return true;
            }
            for (key, child) in map {
                trail.push(key.clone());
                if find_id(child, id, trail) {
                    return true;
                }
                trail.pop();
            }
            false
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                trail.push(i.to_string());
                if find_id(child, id, trail) {
                    return true;
                }
                trail.pop();
            }
            false
        }
        _ => false,
    }
}

fn lookup<'a>(value: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, seg| match node {
        Value::Object(map) => map.get(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn lookup_mut<'a>(value: &'a mut Value, path: &[String]) -> Option<&'a mut Value> {
    path.iter().try_fold(value, |node, seg| match node {
        Value::Object(map) => map.get_mut(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(move |i| items.get_mut(i)),
        _ => None,
    })
}

/// Split `path` into its parent node and final segment.
fn parent_mut<'a>(doc: &'a mut Value, path: &'a [String]) -> Result<(&'a mut Value, &'a str), (StatusCode, String)> {
    let (last, parent_path) = path.split_last().ok_or_else(|| not_found(path))?;
    let parent = lookup_mut(doc, parent_path).ok_or_else(|| not_found(parent_path))?;
    Ok((parent, last.as_str()))
}

fn array_index(seg: &str) -> Result<usize, (StatusCode, String)> {
    seg.parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, format!("invalid array index '{seg}'")))
}

/// Append to an array target, otherwise set the value.
fn post_value(doc: &mut Value, path: &[String], value: Value) -> Result<(), (StatusCode, String)> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    if let Some(Value::Array(items)) = lookup_mut(doc, path) {
        items.push(value);
        return Ok(());
    }
    let (parent, last) = parent_mut(doc, path)?;
    match parent {
        Value::Object(map) => {
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let i = array_index(last)?;
            let slot = items.get_mut(i).ok_or_else(|| not_found(path))?;
            *slot = value;
            Ok(())
        }
        _ => Err(not_found(path)),
    }
}

/// Insert at an array position or strictly create a new key.
fn put_value(doc: &mut Value, path: &[String], value: Value) -> Result<(), (StatusCode, String)> {
    if path.is_empty() {
        if !doc.is_null() {
            return Err((StatusCode::CONFLICT, "config already exists".to_string()));
        }
        *doc = value;
        return Ok(());
    }
    let (parent, last) = parent_mut(doc, path)?;
    match parent {
        Value::Object(map) => {
            if map.contains_key(last) {
                return Err((StatusCode::CONFLICT, format!("key already exists: {last}")));
            }
            map.insert(last.to_string(), value);
            Ok(())
        }
        Value::Array(items) => {
            let i = array_index(last)?;
            if i > items.len() {
                return Err((StatusCode::BAD_REQUEST, format!("array index out of bounds: {i}")));
            }
            items.insert(i, value);
            Ok(())
        }
        _ => Err(not_found(path)),
    }
}

fn delete_value(doc: &mut Value, path: &[String]) -> Result<(), (StatusCode, String)> {
    if path.is_empty() {
        *doc = Value::Null;
        return Ok(());
    }
    let (parent, last) = parent_mut(doc, path)?;
    let removed = match parent {
        Value::Object(map) => map.remove(last).is_some(),
        Value::Array(items) => match last.parse::<usize>() {
            Ok(i) if i < items.len() => {
                items.remove(i);
                true
            }
            _ => false,
        },
        _ => false,
    };
    if removed {
        Ok(())
    } else {
        Err(not_found(path))
    }
}
