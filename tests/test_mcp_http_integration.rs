use std::sync::Arc;

use axum::Router;
use http_body_util::BodyExt; // for .collect
use hyper::{header, Request, StatusCode};
use serde_json::{json, Value};
use tokio::time::{timeout, Duration};
use tower::ServiceExt; // for .oneshot

use openmetadata_mcp_gateway::clients::OpenMetadataRemote;
use openmetadata_mcp_gateway::infra::config::{Auth, OpenMetadataConfig};
use openmetadata_mcp_gateway::infra::http_app::build_app;
use openmetadata_mcp_gateway::tools::dispatch::Dispatcher;

fn app_for(base_url: String) -> Router {
    let cfg = OpenMetadataConfig::new(base_url, Auth::Bearer("test-token".into()));
    let client = OpenMetadataRemote::from_config(&cfg).unwrap();
    build_app(Dispatcher::new(Arc::new(client)))
}

fn rpc(path: &str, session: Option<&str>, body: Value) -> Request<axum::body::Body> {
    let mut req = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::ACCEPT, "application/json, text/event-stream")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(id) = session {
        req = req.header("Mcp-Session-Id", id);
    }
    req.body(axum::body::Body::from(body.to_string())).unwrap()
}

/// First `data:` frame of an SSE response body, parsed as JSON-RPC.
async fn sse_message(res: axum::response::Response) -> Value {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let s = String::from_utf8_lossy(&bytes);
    s.lines()
        .find_map(|line| line.strip_prefix("data: ").map(|d| d.to_string()))
        .and_then(|d| serde_json::from_str::<Value>(&d).ok())
        .expect("no JSON-RPC message in SSE body")
}

async fn open_session(app: &Router, path: &str) -> String {
    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{
            "protocolVersion":"2025-03-26","capabilities":{},
            "clientInfo":{"name":"test","version":"0.1"}
        }
    });
    let init_res = app.clone().oneshot(rpc(path, None, init)).await.unwrap();
    assert!(init_res.status().is_success());
    let session_id = init_res
        .headers()
        .get("Mcp-Session-Id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    let init_msg = sse_message(init_res).await;
    assert_eq!(init_msg["result"]["serverInfo"]["name"], "openmetadata-mcp-gateway");

    let initialized = json!({"jsonrpc":"2.0","method":"notifications/initialized","params":{}});
    let res = app
        .clone()
        .oneshot(rpc(path, Some(&session_id), initialized))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    session_id
}

#[tokio::test]
async fn initialize_list_and_call_over_streamable_http() {
    let server = httpmock::MockServer::start();
    let lookup = server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/api/v1/tables/name/db.schema.orders")
            .header("authorization", "Bearer test-token");
        then.status(200).json_body(json!({"id": "t-1", "name": "orders"}));
    });

    let app = app_for(server.base_url());
    let session_id = open_session(&app, "/mcp").await;

    // tools/list
    let list = json!({"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}});
    let list_res = timeout(
        Duration::from_secs(20),
        app.clone().oneshot(rpc("/mcp", Some(&session_id), list)),
    )
    .await
    .unwrap()
    .unwrap();
    assert!(list_res.status().is_success());
    let listed = sse_message(list_res).await;
    let names: Vec<&str> = listed["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 10);
    assert_eq!(names[0], "list_tables");
    assert_eq!(names[9], "get_glossary_term_by_name");

    // tools/call
    let call = json!({
        "jsonrpc":"2.0","id":3,"method":"tools/call",
        "params": {"name":"get_table_by_name","arguments":{"fqn":"db.schema.orders"}}
    });
    let call_res = app
        .clone()
        .oneshot(rpc("/mcp", Some(&session_id), call))
        .await
        .unwrap();
    assert!(call_res.status().is_success());
    let v = sse_message(call_res).await;
    assert_eq!(v["id"], 3);
    assert_eq!(
        v["result"]["content"][0]["text"],
        r#"{"id":"t-1","name":"orders"}"#
    );
    lookup.assert();
}

/// Next `(event, data)` pair from a live SSE body, skipping keep-alive comments.
async fn next_event(body: &mut axum::body::Body) -> (String, String) {
    loop {
        let frame = timeout(Duration::from_secs(5), body.frame())
            .await
            .expect("event in time")
            .expect("stream open")
            .unwrap();
        let Ok(data) = frame.into_data() else {
            continue;
        };
        let text = String::from_utf8_lossy(&data).into_owned();
        let field = |name: &str| {
            text.lines()
                .find_map(|l| l.strip_prefix(name).map(|v| v.trim_start().to_string()))
        };
        if let (Some(event), Some(data)) = (field("event:"), field("data:")) {
            return (event, data);
        }
    }
}

fn post(uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn legacy_sse_session_initializes_and_calls_tools() {
    let server = httpmock::MockServer::start();
    let lookup = server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/api/v1/tables/name/db.schema.orders");
        then.status(200).json_body(json!({"id": "t-1", "name": "orders"}));
    });
    let app = app_for(server.base_url());

    let res = app
        .clone()
        .oneshot(Request::get("/sse").body(axum::body::Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let mut events = res.into_body();

    let (event, endpoint) = next_event(&mut events).await;
    assert_eq!(event, "endpoint");
    assert!(endpoint.starts_with("/messages/?sessionId="));

    let init = json!({
        "jsonrpc":"2.0","id":1,"method":"initialize",
        "params":{
            "protocolVersion":"2024-11-05","capabilities":{},
            "clientInfo":{"name":"test","version":"0.1"}
        }
    });
    let res = app.clone().oneshot(post(&endpoint, init)).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let (event, data) = next_event(&mut events).await;
    assert_eq!(event, "message");
    let reply: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(reply["id"], 1);
    assert_eq!(reply["result"]["serverInfo"]["name"], "openmetadata-mcp-gateway");

    let initialized = json!({"jsonrpc":"2.0","method":"notifications/initialized"});
    let res = app.clone().oneshot(post(&endpoint, initialized)).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);

    let call = json!({
        "jsonrpc":"2.0","id":2,"method":"tools/call",
        "params": {"name":"get_table_by_name","arguments":{"fqn":"db.schema.orders"}}
    });
    let res = app.clone().oneshot(post(&endpoint, call)).await.unwrap();
    assert_eq!(res.status(), StatusCode::ACCEPTED);
    let (_, data) = next_event(&mut events).await;
    let reply: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(reply["id"], 2);
    assert_eq!(
        reply["result"]["content"][0]["text"],
        r#"{"id":"t-1","name":"orders"}"#
    );
    lookup.assert();
}

#[tokio::test]
async fn unknown_tool_is_reported_as_text_and_session_continues() {
    let server = httpmock::MockServer::start();
    let app = app_for(server.base_url());
    let session_id = open_session(&app, "/mcp").await;

    let bad = json!({
        "jsonrpc":"2.0","id":7,"method":"tools/call",
        "params": {"name":"drop_database","arguments":{}}
    });
    let res = app
        .clone()
        .oneshot(rpc("/mcp", Some(&session_id), bad))
        .await
        .unwrap();
    let v = sse_message(res).await;
    assert_eq!(v["id"], 7);
    assert_eq!(
        v["result"]["content"][0]["text"],
        "Error: unknown tool: drop_database"
    );

    let missing = json!({
        "jsonrpc":"2.0","id":8,"method":"tools/call",
        "params": {"name":"get_table","arguments":{}}
    });
    let res = app
        .clone()
        .oneshot(rpc("/mcp", Some(&session_id), missing))
        .await
        .unwrap();
    let v = sse_message(res).await;
    assert_eq!(
        v["result"]["content"][0]["text"],
        "Error: missing required argument 'table_id'"
    );
}

#[tokio::test]
async fn healthz_is_plain_ok() {
    let server = httpmock::MockServer::start();
    let app = app_for(server.base_url());
    let res = app
        .oneshot(
            Request::get("/healthz")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"ok");
}
