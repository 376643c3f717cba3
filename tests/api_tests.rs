use chat_widget::config::WidgetConfig;
use chat_widget::message::WidgetResponse;
use chat_widget::routes::create_router;
use chat_widget::state::AppState;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::util::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn app_for(server: &MockServer) -> Router {
    let config = WidgetConfig {
        backend_url: server.uri(),
        ..Default::default()
    };
    let state = Arc::new(AppState::new(&config).unwrap());
    create_router(&config.static_dir).with_state(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_widget(response: axum::response::Response) -> WidgetResponse {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_welcome_is_formatted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/welcome"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "**Welcome!**\n1. Enter your details\n2. Ask"})),
        )
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .oneshot(Request::builder().uri("/widget/welcome").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let widget = read_widget(response).await;
    assert!(!widget.widget_id.is_empty());
    assert!(widget.html.contains("<p><strong>Welcome!</strong></p>"));
    assert!(widget.html.contains("<ol><li>Enter your details</li><li>Ask</li></ol>"));
}

#[tokio::test]
async fn test_first_message_without_identity_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "hi"})))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .oneshot(post_json(
            "/widget/chat",
            json!({"message": "My landlord", "name": "Alice", "age": "", "gender": "female"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(
        body["error"],
        "Please enter your name, age, and gender to start the chat."
    );
}

#[tokio::test]
async fn test_stateful_flow_integration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"session_id": "backend-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "Follow-up answer"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"name": "Alice"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "Hello Alice!", "session_id": "backend-1"})),
        )
        .mount(&server)
        .await;
    let app = app_for(&server);

    // First message with identity
    let response = app
        .clone()
        .oneshot(post_json(
            "/widget/chat",
            json!({"message": "  <b>deposit</b>  ", "name": "Alice", "age": "30", "gender": "female"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let widget = read_widget(response).await;
    assert!(widget.html.contains("<p>&lt;b&gt;deposit&lt;/b&gt;</p>"));
    assert!(widget.html.contains("Hello Alice!"));

    // Follow-up needs no identity; the backend session is reused
    let response = app
        .clone()
        .oneshot(post_json(
            "/widget/chat",
            json!({"widget_id": widget.widget_id, "message": "And then?"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let follow_up = read_widget(response).await;
    assert_eq!(follow_up.widget_id, widget.widget_id);
    assert!(follow_up.html.contains("Follow-up answer"));

    // Transcript holds all four entries in order
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/widget/transcript/{}", widget.widget_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert_eq!(html.matches("user-msg").count(), 2);
    assert!(html.find("Hello Alice!").unwrap() < html.find("Follow-up answer").unwrap());
}

#[tokio::test]
async fn test_backend_error_is_rendered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(
                json!({"error": "An internal server error occurred. Please try again later."}),
            ),
        )
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .oneshot(post_json(
            "/widget/chat",
            json!({"message": "hi", "name": "Bob", "age": "41", "gender": "male"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let widget = read_widget(response).await;
    assert!(widget.html.contains(r#"<div class="bot-msg error"><strong>Error:</strong><p>An internal server error occurred. Please try again later.</p></div>"#));
}

#[tokio::test]
async fn test_non_object_reply_shows_generic_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("ok")))
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .oneshot(post_json(
            "/widget/chat",
            json!({"message": "hi", "name": "Bob", "age": "41", "gender": "male"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let widget = read_widget(response).await;
    assert!(widget.html.contains("<p>Something went wrong!</p>"));
    assert!(!widget.html.contains("Could not connect"));
}

#[tokio::test]
async fn test_unreachable_backend_shows_fallback() {
    let config = WidgetConfig {
        // Nothing listens on the discard port.
        backend_url: "http://127.0.0.1:9".to_string(),
        ..Default::default()
    };
    let state = Arc::new(AppState::new(&config).unwrap());
    let app = create_router(&config.static_dir).with_state(state);

    let response = app
        .oneshot(Request::builder().uri("/widget/welcome").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let widget = read_widget(response).await;
    assert!(widget.html.contains("Could not connect to the server. Please check your network."));
}

#[tokio::test]
async fn test_language_ask_replaces_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_partial_json(json!({"message": "hola", "language": "es"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "**¡Hola!**"})))
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .clone()
        .oneshot(post_json("/widget/ask", json!({"message": "hola", "language": "es"})))
        .await
        .unwrap();
    let widget = read_widget(response).await;
    assert!(widget.html.starts_with(r#"<div class="user-msg">hola</div>"#));
    assert!(!widget.html.contains("👨 You"));
    assert!(widget.html.contains(r#"<div class="bot-msg">**¡Hola!**</div>"#));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/widget/transcript/{}", widget.widget_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(!html.contains("Typing..."));
    assert!(html.contains("¡Hola!"));
}

#[tokio::test]
async fn test_empty_ask_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "x"})))
        .expect(0)
        .mount(&server)
        .await;
    let app = app_for(&server);

    let response = app
        .oneshot(post_json("/widget/ask", json!({"message": "   ", "language": "en"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(read_widget(response).await.html.is_empty());
}

#[tokio::test]
async fn test_unknown_transcript_is_not_found() {
    let server = MockServer::start().await;
    let app = app_for(&server);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/widget/transcript/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
