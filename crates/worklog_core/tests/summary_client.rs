use serde_json::json;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use worklog_core::{Summarizer, SummarizerError, SummaryClient, SummaryClientOptions, WorkItem};

fn fast_options() -> SummaryClientOptions {
    SummaryClientOptions {
        request_timeout: Duration::from_secs(5),
        idle_timeout: Duration::from_secs(2),
        listener_grace: Duration::from_millis(10),
        poll_interval: Duration::from_millis(20),
        poll_timeout: Duration::from_millis(300),
    }
}

fn client_for(server: &MockServer) -> SummaryClient {
    SummaryClient::with_options(&server.uri(), "github-copilot", "claude-sonnet-4", fast_options())
        .unwrap()
}

fn items() -> Vec<WorkItem> {
    vec![WorkItem::done("fix login"), WorkItem::done("ship v2")]
}

fn assistant_reply(text: &str) -> serde_json::Value {
    json!([
        {"info": {"id": "msg_1", "role": "user"}, "parts": [{"type": "text", "text": "prompt"}]},
        {"info": {"id": "msg_2", "role": "assistant"}, "parts": [
            {"type": "step-start"},
            {"type": "text", "text": text}
        ]}
    ])
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ses_1"})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/ses_1/message"))
        .and(body_partial_json(json!({
            "model": {"providerID": "github-copilot", "modelID": "claude-sonnet-4"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn idle_event_then_single_fetch_returns_assistant_text() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    let events = concat!(
        "data: {\"type\":\"server.connected\",\"properties\":{}}\n\n",
        "data: {\"type\":\"session.idle\",\"properties\":{\"sessionID\":\"ses_other\"}}\n\n",
        "data: {\"type\":\"session.idle\",\"properties\":{\"sessionID\":\"ses_1\"}}\n\n",
    );
    Mock::given(method("GET"))
        .and(path("/event"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(events, "text/event-stream"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/message"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(assistant_reply("  Fixed login and shipped v2. ")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let summary = client_for(&server).summarize(&items()).await.unwrap();
    assert_eq!(summary, "Fixed login and shipped v2.");
}

#[tokio::test]
async fn empty_first_fetch_falls_back_to_polling() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assistant_reply("Late reply.")))
        .mount(&server)
        .await;

    let summary = client_for(&server).summarize(&items()).await.unwrap();
    assert_eq!(summary, "Late reply.");
}

#[tokio::test]
async fn stalled_event_stream_times_out_then_polls() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/event"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("", "text/event-stream")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assistant_reply("Polled reply.")))
        .mount(&server)
        .await;

    let options = SummaryClientOptions {
        idle_timeout: Duration::from_millis(300),
        ..fast_options()
    };
    let client =
        SummaryClient::with_options(&server.uri(), "github-copilot", "claude-sonnet-4", options)
            .unwrap();

    let started = Instant::now();
    let summary = client.summarize(&items()).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(summary, "Polled reply.");
    assert!(elapsed >= Duration::from_millis(300), "returned before idle wait: {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "idle wait not bounded: {elapsed:?}");

    let requests = server.received_requests().await.unwrap();
    assert!(requests.iter().any(|request| request.url.path() == "/event"));
}

#[tokio::test]
async fn polling_budget_exhaustion_reports_no_response() {
    let server = MockServer::start().await;
    mount_session(&server).await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(assistant_reply("   ")))
        .mount(&server)
        .await;

    let err = client_for(&server).summarize(&items()).await.unwrap_err();
    assert!(matches!(err, SummarizerError::NoResponse));
    assert_eq!(err.to_string(), "no response received");
}

#[tokio::test]
async fn session_creation_failure_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client_for(&server).summarize(&items()).await.unwrap_err();
    match err {
        SummarizerError::Status {
            stage,
            status,
            body,
        } => {
            assert_eq!(stage, "create_session");
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn rejected_prompt_fails_without_polling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ses_1"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/ses_1/message"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/session/ses_1/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client_for(&server).summarize(&items()).await.unwrap_err();
    assert!(err.is_connection_failure());
    assert!(err.to_string().contains("send_message"));
}

#[tokio::test]
async fn health_check_follows_endpoint_status() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    assert!(client.test_connection().await.is_err());

    Mock::given(method("GET"))
        .and(path("/global/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"healthy": true})))
        .mount(&server)
        .await;
    client.test_connection().await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_connection_error() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let uri = format!("http://127.0.0.1:{port}");

    let client = SummaryClient::with_options(&uri, "p", "m", fast_options()).unwrap();
    let err = client.summarize(&items()).await.unwrap_err();
    assert!(matches!(
        err,
        SummarizerError::Connection {
            stage: "create_session",
            ..
        }
    ));
}
