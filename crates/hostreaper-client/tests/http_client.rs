use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use hostreaper_api::{HostAction, HostFilter, HostState};
use hostreaper_client::{ClientError, ClientOpts, HostApi, RancherClient};

// In-process stand-in for the control plane
struct FakeApi {
    base: String,
    hosts: Vec<Value>,
    fail_list: bool,
    calls: Mutex<Vec<String>>,
    auth: Mutex<Vec<Option<String>>>,
}

impl FakeApi {
    fn record(&self, call: String, headers: &HeaderMap) {
        self.calls.lock().unwrap().push(call);
        self.auth.lock().unwrap().push(
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

async fn root(State(api): State<Arc<FakeApi>>, headers: HeaderMap) -> Json<Value> {
    api.record("GET /v1/".to_string(), &headers);
    Json(json!({
        "type": "apiVersion",
        "links": {
            "self": format!("{}/v1", api.base),
            "hosts": format!("{}/v1/hosts", api.base),
        }
    }))
}

async fn list_hosts(
    State(api): State<Arc<FakeApi>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let mut keys: Vec<_> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
    keys.sort();
    api.record(format!("GET /v1/hosts?{}", keys.join("&")), &headers);

    if api.fail_list {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"type": "error", "message": "database unavailable"})),
        );
    }

    let data: Vec<Value> = api
        .hosts
        .iter()
        .filter(|host| {
            query
                .iter()
                .all(|(field, value)| host.get(field).and_then(Value::as_str) == Some(value.as_str()))
        })
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(json!({"type": "collection", "resourceType": "host", "data": data})),
    )
}

async fn host_action(
    State(api): State<Arc<FakeApi>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let action = query.get("action").cloned().unwrap_or_default();
    api.record(format!("POST /v1/hosts/{id}?action={action}"), &headers);

    if id == "stuck" {
        return (
            StatusCode::CONFLICT,
            Json(json!({"type": "error", "code": "InvalidState"})),
        );
    }
    (StatusCode::ACCEPTED, Json(json!({"id": id, "type": "host"})))
}

fn host(base: &str, id: &str, state: &str, agent_state: &str, actions: &[&str]) -> Value {
    let actions: serde_json::Map<String, Value> = actions
        .iter()
        .map(|a| {
            (
                (*a).to_string(),
                json!(format!("{base}/v1/hosts/{id}?action={a}")),
            )
        })
        .collect();
    json!({
        "id": id,
        "type": "host",
        "state": state,
        "agentState": agent_state,
        "actions": actions,
    })
}

async fn spawn_fake(fail_list: bool) -> Arc<FakeApi> {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let hosts = vec![
        host(&base, "1h1", "active", "reconnecting", &["deactivate"]),
        host(&base, "1h2", "active", "active", &["deactivate"]),
        host(&base, "1h3", "inactive", "reconnecting", &["remove", "activate"]),
        host(&base, "stuck", "removed", "reconnecting", &["purge"]),
    ];

    let api = Arc::new(FakeApi {
        base,
        hosts,
        fail_list,
        calls: Mutex::new(Vec::new()),
        auth: Mutex::new(Vec::new()),
    });

    let router = Router::new()
        .route("/v1/", get(root))
        .route("/v1/hosts", get(list_hosts))
        .route("/v1/hosts/{id}", post(host_action))
        .with_state(api.clone());

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    api
}

fn opts(api: &FakeApi, access_key: &str) -> ClientOpts {
    ClientOpts {
        url: format!("{}/v1", api.base),
        access_key: access_key.to_string(),
        secret_key: "sk".to_string(),
        timeout: Some(Duration::from_secs(5)),
    }
}

#[tokio::test]
async fn test_connect_discovers_hosts_link() {
    let api = spawn_fake(false).await;
    let client = RancherClient::connect(opts(&api, "ak")).await.unwrap();

    assert_eq!(
        client.hosts_url().as_str(),
        format!("{}/v1/hosts", api.base)
    );
    assert_eq!(api.calls(), vec!["GET /v1/".to_string()]);
}

#[tokio::test]
async fn test_connect_fails_when_api_unreachable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = RancherClient::connect(ClientOpts {
        url: format!("http://{addr}/v1"),
        access_key: String::new(),
        secret_key: String::new(),
        timeout: Some(Duration::from_secs(2)),
    })
    .await;

    assert!(matches!(
        result,
        Err(ClientError::Http(_) | ClientError::Timeout)
    ));
}

#[tokio::test]
async fn test_list_hosts_sends_filter() {
    let api = spawn_fake(false).await;
    let client = RancherClient::connect(opts(&api, "ak")).await.unwrap();

    let hosts = client
        .list_hosts(&HostFilter::reconnecting(&HostState::Active))
        .await
        .unwrap();

    assert_eq!(hosts.len(), 1);
    assert_eq!(hosts[0].id, "1h1");
    assert_eq!(
        api.calls()[1],
        "GET /v1/hosts?agentState=reconnecting&state=active"
    );
}

#[tokio::test]
async fn test_basic_auth_header() {
    let api = spawn_fake(false).await;
    let client = RancherClient::connect(opts(&api, "ak")).await.unwrap();
    client.list_hosts(&HostFilter::new()).await.unwrap();

    let auth = api.auth.lock().unwrap().clone();
    assert_eq!(auth.len(), 2);
    // base64("ak:sk")
    assert!(auth.iter().all(|a| a.as_deref() == Some("Basic YWs6c2s=")));
}

#[tokio::test]
async fn test_no_auth_without_access_key() {
    let api = spawn_fake(false).await;
    let client = RancherClient::connect(opts(&api, "")).await.unwrap();
    client.list_hosts(&HostFilter::new()).await.unwrap();

    let auth = api.auth.lock().unwrap().clone();
    assert!(auth.iter().all(Option::is_none));
}

#[tokio::test]
async fn test_list_error_status() {
    let api = spawn_fake(true).await;
    let client = RancherClient::connect(opts(&api, "ak")).await.unwrap();

    let err = client
        .list_hosts(&HostFilter::reconnecting(&HostState::Removed))
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 503);
            assert!(message.contains("database unavailable"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_perform_posts_to_action_link() {
    let api = spawn_fake(false).await;
    let client = RancherClient::connect(opts(&api, "ak")).await.unwrap();

    let hosts = client
        .list_hosts(&HostFilter::reconnecting(&HostState::Inactive))
        .await
        .unwrap();
    assert_eq!(hosts.len(), 1);

    client.perform(&hosts[0], HostAction::Remove).await.unwrap();
    assert_eq!(
        api.calls().last().unwrap(),
        "POST /v1/hosts/1h3?action=remove"
    );
}

#[tokio::test]
async fn test_perform_error_status() {
    let api = spawn_fake(false).await;
    let client = RancherClient::connect(opts(&api, "ak")).await.unwrap();

    let hosts = client
        .list_hosts(&HostFilter::reconnecting(&HostState::Removed))
        .await
        .unwrap();

    let err = client.perform(&hosts[0], HostAction::Purge).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 409, .. }));
}

#[tokio::test]
async fn test_perform_unavailable_action() {
    let api = spawn_fake(false).await;
    let client = RancherClient::connect(opts(&api, "ak")).await.unwrap();

    let hosts = client
        .list_hosts(&HostFilter::reconnecting(&HostState::Active))
        .await
        .unwrap();
    let calls_before = api.calls().len();

    let err = client.perform(&hosts[0], HostAction::Purge).await.unwrap_err();
    assert!(matches!(err, ClientError::ActionUnavailable { .. }));
    assert_eq!(api.calls().len(), calls_before);
}
