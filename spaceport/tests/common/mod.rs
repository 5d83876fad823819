//! In-process stand-in for the spaces and saved-objects APIs.
//!
//! Starts a real Axum server on a random port; tests drive it through the
//! production `KibanaClient` and inspect the requests it recorded.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use spaceport::{ClientOptions, Credentials, KibanaClient};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: String,
    pub authorized: bool,
    pub xsrf: bool,
}

#[derive(Default)]
pub struct MockState {
    pub spaces: Vec<Value>,
    /// Canned export responses by space id; default is a two-line bundle.
    pub exports: HashMap<String, (u16, String)>,
    /// Canned import responses by space id; default is a success.
    pub imports: HashMap<String, (u16, String)>,
    /// Canned failure for every space creation request.
    pub create_failure: Option<(u16, String)>,
    /// Canned failure for every single-space lookup.
    pub lookup_failure: Option<(u16, String)>,
    pub requests: Vec<Recorded>,
}

#[derive(Clone)]
pub struct MockKibana {
    pub base_url: String,
    state: Arc<Mutex<MockState>>,
}

impl MockKibana {
    pub async fn start(spaces: Vec<Value>) -> Self {
        let state = Arc::new(Mutex::new(MockState {
            spaces,
            ..Default::default()
        }));

        let router = Router::new()
            .route("/api/spaces/space", get(list_spaces).post(create_space))
            .route("/api/spaces/space/:id", get(get_space))
            .route("/s/:id/api/saved_objects/_export", post(export))
            .route("/s/:id/api/saved_objects/_import", post(import))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> KibanaClient {
        KibanaClient::new(
            &self.base_url,
            Credentials::new("elastic", "changeme"),
            &ClientOptions::default(),
        )
        .unwrap()
    }

    pub fn set_export(&self, space: &str, status: u16, body: &str) {
        let mut state = self.state.lock().unwrap();
        state.exports.insert(space.to_string(), (status, body.to_string()));
    }

    pub fn set_import(&self, space: &str, status: u16, body: &str) {
        let mut state = self.state.lock().unwrap();
        state.imports.insert(space.to_string(), (status, body.to_string()));
    }

    pub fn fail_creates(&self, status: u16, body: &str) {
        self.state.lock().unwrap().create_failure = Some((status, body.to_string()));
    }

    pub fn fail_lookups(&self, status: u16, body: &str) {
        self.state.lock().unwrap().lookup_failure = Some((status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Recorded requests matching a method and a path suffix.
    pub fn requests_to(&self, method: &str, path_suffix: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.ends_with(path_suffix))
            .collect()
    }

    pub fn space_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .spaces
            .iter()
            .filter_map(|s| s["id"].as_str().map(String::from))
            .collect()
    }
}

pub fn space(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

fn record(
    state: &Mutex<MockState>,
    method: &'static str,
    path: String,
    query: HashMap<String, String>,
    headers: &HeaderMap,
    body: String,
) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    let xsrf = headers.get("kbn-xsrf").is_some();
    state.lock().unwrap().requests.push(Recorded {
        method,
        path,
        query,
        body,
        authorized,
        xsrf,
    });
}

fn canned(status: u16, body: String) -> Response {
    let status = StatusCode::from_u16(status).unwrap();
    (status, body).into_response()
}

async fn list_spaces(State(state): State<Arc<Mutex<MockState>>>, headers: HeaderMap) -> Response {
    record(&state, "GET", "/api/spaces/space".into(), HashMap::new(), &headers, String::new());
    let spaces = state.lock().unwrap().spaces.clone();
    Json(spaces).into_response()
}

async fn get_space(
    State(state): State<Arc<Mutex<MockState>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, "GET", format!("/api/spaces/space/{}", id), HashMap::new(), &headers, String::new());
    let guard = state.lock().unwrap();
    if let Some((status, body)) = guard.lookup_failure.clone() {
        return canned(status, body);
    }
    let found = guard.spaces.iter().find(|s| s["id"] == id.as_str()).cloned();
    drop(guard);
    match found {
        Some(space) => Json(space).into_response(),
        None => canned(404, json!({"statusCode": 404, "error": "Not Found"}).to_string()),
    }
}

async fn create_space(
    State(state): State<Arc<Mutex<MockState>>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST", "/api/spaces/space".into(), HashMap::new(), &headers, body.to_string());
    let mut guard = state.lock().unwrap();
    if let Some((status, body)) = guard.create_failure.clone() {
        return canned(status, body);
    }
    if guard.spaces.iter().any(|s| s["id"] == body["id"]) {
        return canned(409, json!({"statusCode": 409, "message": "space already exists"}).to_string());
    }
    guard.spaces.push(body.clone());
    Json(body).into_response()
}

async fn export(
    State(state): State<Arc<Mutex<MockState>>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: String,
) -> Response {
    record(
        &state,
        "POST",
        format!("/s/{}/api/saved_objects/_export", id),
        HashMap::new(),
        &headers,
        body,
    );
    let canned_response = state.lock().unwrap().exports.get(&id).cloned();
    match canned_response {
        Some((status, body)) => canned(status, body),
        None => canned(
            200,
            format!(
                "{{\"id\":\"{id}-dash\",\"type\":\"dashboard\"}}\n{{\"exportedCount\":1,\"missingRefCount\":0}}\n"
            ),
        ),
    }
}

async fn import(
    State(state): State<Arc<Mutex<MockState>>>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    record(
        &state,
        "POST",
        format!("/s/{}/api/saved_objects/_import", id),
        query,
        &headers,
        String::from_utf8_lossy(&body).to_string(),
    );
    let canned_response = state.lock().unwrap().imports.get(&id).cloned();
    match canned_response {
        Some((status, body)) => canned(status, body),
        None => canned(
            200,
            json!({"success": true, "successCount": 1, "successResults": [], "warnings": []}).to_string(),
        ),
    }
}
