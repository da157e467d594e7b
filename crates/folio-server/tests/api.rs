//! Tests for the HTTP API, driven through the router without a socket.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use folio_server::{create_router, AppState, ServerConfig};
use folio_store::{library_schema, Store};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_app() -> (Router, Arc<Store>) {
    let store = Arc::new(Store::new(library_schema().unwrap()));
    let state = AppState::new(Arc::clone(&store), None);
    (create_router(Arc::new(state)), store)
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn post_author(app: &Router, body: &Value) -> Response {
    send(
        app,
        Request::post("/authors")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
}

async fn get(app: &Router, uri: &str) -> Response {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_healthcheck() {
    let (app, _) = test_app();
    let response = get(&app, "/healthcheck").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Current I'm alive\n");
}

#[tokio::test]
async fn test_empty_list_is_empty_array() {
    let (app, _) = test_app();
    let response = get(&app, "/authors").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn test_create_echoes_plain_object() {
    let (app, store) = test_app();
    let ada = json!({"id": 1, "name": "Ada", "subjects": ["math", "cs"]});

    let response = post_author(&app, &ada).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(json_body(response).await, ada);
    assert_eq!(store.read_txn().count("author").unwrap(), 1);
}

#[tokio::test]
async fn test_ada_and_grace_over_http() {
    let (app, _) = test_app();
    let ada = json!({"id": 1, "name": "Ada", "subjects": ["math", "cs"]});
    let grace = json!({"id": 2, "name": "Grace", "subjects": ["cs"]});
    // Posted out of order; the list is in id order regardless.
    post_author(&app, &grace).await;
    post_author(&app, &ada).await;

    let all = json_body(get(&app, "/authors").await).await;
    assert_eq!(all, json!([ada, grace]));

    let cs = json_body(get(&app, "/authors?subject=cs").await).await;
    assert_eq!(cs, json!([ada, grace]));

    let math = json_body(get(&app, "/authors?subject=math").await).await;
    assert_eq!(math, json!([ada]));

    let one = get(&app, "/authors/2").await;
    assert_eq!(one.status(), StatusCode::OK);
    assert_eq!(json_body(one).await, grace);
}

#[tokio::test]
async fn test_repost_replaces() {
    let (app, _) = test_app();
    post_author(&app, &json!({"id": 1, "name": "Ada", "subjects": ["math"]})).await;
    post_author(&app, &json!({"id": 1, "name": "Augusta", "subjects": ["cs"]})).await;

    let all = json_body(get(&app, "/authors").await).await;
    assert_eq!(all, json!([{"id": 1, "name": "Augusta", "subjects": ["cs"]}]));
    let math = json_body(get(&app, "/authors?subject=math").await).await;
    assert_eq!(math, json!([]));
    let cs = json_body(get(&app, "/authors?subject=cs").await).await;
    assert_eq!(cs, all);
}

#[tokio::test]
async fn test_author_without_subjects_is_rejected() {
    let (app, store) = test_app();
    post_author(&app, &json!({"id": 5, "name": "Anon", "subjects": ["law"]})).await;

    for body in [
        json!({"id": 6, "name": "Anon"}),
        json!({"id": 6, "name": "Anon", "subjects": []}),
        json!({"id": 5, "name": "Renamed", "subjects": [""]}),
    ] {
        let response = post_author(&app, &body).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "body {body}");
        assert_eq!(json_body(response).await["code"], "MissingIndexValue");
    }

    let txn = store.read_txn();
    assert_eq!(txn.count("author").unwrap(), 1);
    let all = json_body(get(&app, "/authors").await).await;
    assert_eq!(all, json!([{"id": 5, "name": "Anon", "subjects": ["law"]}]));
    let by_subject = json_body(get(&app, "/authors?subject=law").await).await;
    assert_eq!(by_subject, all);
}

#[tokio::test]
async fn test_malformed_bodies_are_400() {
    let (app, store) = test_app();

    let not_json = send(
        &app,
        Request::post("/authors")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("not valid json"))
            .unwrap(),
    )
    .await;
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);
    let json = json_body(not_json).await;
    assert_eq!(json["code"], "BAD_REQUEST");

    for bad in [
        json!({"name": "no id"}),
        json!({"id": -1, "name": "negative"}),
        json!({"id": 1, "name": "Ada", "subjects": "math"}),
    ] {
        let response = post_author(&app, &bad).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {bad}");
    }

    assert_eq!(store.read_txn().count("author").unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_author_is_404() {
    let (app, _) = test_app();
    let response = get(&app, "/authors/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["code"], "NOT_FOUND");

}

#[tokio::test]
async fn test_bad_path_and_query_are_json_400() {
    let (app, _) = test_app();
    for uri in ["/authors/not-a-number", "/authors/-3", "/authors?subject=a&subject=b"] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {uri}");
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json"));
        let json = json_body(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert_eq!(json["retryable"], false);
        assert!(json["error"].as_str().unwrap().starts_with("invalid"));
    }
}

#[tokio::test]
async fn test_write_deadline_answers_503() {
    let config = ServerConfig::builder().write_timeout_ms(20).build();
    let state = Arc::new(AppState::from_config(&config).unwrap());
    let store = Arc::clone(&state.store);
    let app = create_router(state);

    let (locked_tx, locked_rx) = std::sync::mpsc::channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    let holder = std::thread::spawn(move || {
        let _txn = store.write_txn();
        locked_tx.send(()).unwrap();
        let _ = release_rx.recv_timeout(Duration::from_secs(5));
    });
    locked_rx.recv().unwrap();

    let response = post_author(&app, &json!({"id": 1, "name": "Ada", "subjects": ["math"]})).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json_body(response).await["retryable"], true);

    release_tx.send(()).unwrap();
    holder.join().unwrap();

    let response = post_author(&app, &json!({"id": 1, "name": "Ada", "subjects": ["math"]})).await;
    assert_eq!(response.status(), StatusCode::OK);
}
