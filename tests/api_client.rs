use std::fs;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use gmail_mailer::api::client::GmailClient;
use gmail_mailer::api::models::{MessageQuery, OutboundMessage};
use gmail_mailer::api::session::Session;
use gmail_mailer::error::AppError;

struct Captured {
    head: String,
    body: String,
}

/// Serves one canned response per connection, in order, and hands back
/// what each request looked like.
async fn serve(responses: Vec<(u16, String)>) -> (String, JoinHandle<Vec<Captured>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let base_url = format!("http://{}", listener.local_addr().expect("addr"));

    let handle = tokio::spawn(async move {
        let mut captured = Vec::new();
        for (status, body) in responses {
            let (mut stream, _) = listener.accept().await.expect("accept");
            captured.push(read_request(&mut stream).await);

            let reason = if status == 200 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            let _ = stream.shutdown().await;
        }
        captured
    });

    (base_url, handle)
}

async fn read_request(stream: &mut tokio::net::TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0_u8; 4096];

    let header_end = loop {
        let size = stream.read(&mut chunk).await.expect("read");
        assert!(size > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..size]);
        if let Some(pos) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let size = stream.read(&mut chunk).await.expect("read body");
        assert!(size > 0, "connection closed before body");
        buf.extend_from_slice(&chunk[..size]);
    }

    Captured {
        head,
        body: String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string(),
    }
}

fn client(base_url: &str) -> GmailClient {
    let http = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("http client");
    GmailClient::with_http(http, base_url)
}

fn session() -> Session {
    Session::new("me", "test-token")
}

const LABELS: &str = r#"{"labels":[
    {"id":"INBOX","name":"INBOX","type":"system"},
    {"id":"L1","name":"Chatwork_eigyo","type":"user"},
    {"id":"L2","name":"Chatwork_soudan","type":"user"}
]}"#;

#[tokio::test]
async fn resolves_label_names_with_one_listing() {
    let (base_url, server) = serve(vec![(200, LABELS.to_string())]).await;

    let ids = client(&base_url)
        .resolve_label_ids(
            &session(),
            &["Chatwork_eigyo".to_string(), "Chatwork_soudan".to_string()],
        )
        .await
        .expect("resolve");
    assert_eq!(ids, ["L1", "L2"]);

    let requests = server.await.expect("server");
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .head
        .starts_with("GET /gmail/v1/users/me/labels HTTP/1.1"));
    assert!(requests[0]
        .head
        .to_ascii_lowercase()
        .contains("authorization: bearer test-token"));
}

#[tokio::test]
async fn unknown_label_name_is_a_typed_error() {
    let (base_url, server) = serve(vec![(200, LABELS.to_string())]).await;

    let err = client(&base_url)
        .resolve_label_ids(&session(), &["chatwork_eigyo".to_string()])
        .await
        .expect_err("case-sensitive miss");
    assert!(matches!(err, AppError::LabelNotFound(name) if name == "chatwork_eigyo"));

    server.await.expect("server");
}

#[tokio::test]
async fn zero_estimate_lists_as_none() {
    let (base_url, server) = serve(vec![(200, r#"{"resultSizeEstimate":0}"#.to_string())]).await;

    let filter = MessageQuery::with_count(2).query("is:unread").label("L1");
    let ids = client(&base_url)
        .list_message_ids(&session(), &filter)
        .await
        .expect("list");
    assert_eq!(ids, None);

    let requests = server.await.expect("server");
    let request_line = requests[0].head.lines().next().expect("request line");
    assert!(request_line.starts_with("GET /gmail/v1/users/me/messages?"));
    assert!(request_line.contains("q=is%3Aunread"));
    assert!(request_line.contains("labelIds=L1"));
    assert!(request_line.contains("maxResults=2"));
}

#[tokio::test]
async fn fetches_and_decodes_each_message() {
    let inline = r#"{
        "id": "m1",
        "labelIds": ["INBOX"],
        "payload": {
            "mimeType": "text/plain",
            "headers": [{"name": "Subject", "value": "inline"}],
            "body": {"size": 5, "data": "aGVsbG8="}
        }
    }"#;
    let multipart = r#"{
        "id": "m2",
        "labelIds": ["INBOX", "L1"],
        "payload": {
            "mimeType": "multipart/alternative",
            "headers": [{"name": "From", "value": "dev@example.com"}],
            "body": {"size": 0},
            "parts": [
                {"mimeType": "text/plain", "body": {"size": 5, "data": "cGxhaW4"}},
                {"mimeType": "text/html", "body": {"size": 12, "data": "PHA-cGxhaW48L3A-"}}
            ]
        }
    }"#;
    let (base_url, server) = serve(vec![
        (200, inline.to_string()),
        (200, multipart.to_string()),
    ])
    .await;

    let messages = client(&base_url)
        .fetch_messages(&session(), &["m1".to_string(), "m2".to_string()])
        .await
        .expect("fetch");

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].body, "hello");
    assert_eq!(messages[0].size, 5);
    assert_eq!(messages[0].header("subject"), Some("inline"));
    assert_eq!(messages[1].body, "plain");
    assert_eq!(messages[1].size, 0);
    assert!(messages[1].label_ids.contains("L1"));

    let requests = server.await.expect("server");
    assert!(requests[0]
        .head
        .starts_with("GET /gmail/v1/users/me/messages/m1?format=full"));
    assert!(requests[1]
        .head
        .starts_with("GET /gmail/v1/users/me/messages/m2?format=full"));
}

#[tokio::test]
async fn sends_multipart_envelope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = dir.path().join("a.csv");
    let jpg = dir.path().join("b.jpg");
    fs::write(&csv, "x,y\n").expect("write csv");
    fs::write(&jpg, [0xFF_u8, 0xD8, 0xFF]).expect("write jpg");

    let (base_url, server) = serve(vec![(
        200,
        r#"{"id":"sent-1","threadId":"t-1","labelIds":["SENT"]}"#.to_string(),
    )])
    .await;

    let message = OutboundMessage {
        subject: "report".to_string(),
        body: "attached".to_string(),
        sender: "from@example.com".to_string(),
        to: "to@example.com".to_string(),
        cc: None,
        bcc: Some("bcc@example.com".to_string()),
        attachments: vec![csv, jpg],
    };

    let result = client(&base_url)
        .send(&session(), &message)
        .await
        .expect("send");
    assert_eq!(result.id, "sent-1");
    assert_eq!(result.thread_id.as_deref(), Some("t-1"));

    let requests = server.await.expect("server");
    assert!(requests[0]
        .head
        .starts_with("POST /gmail/v1/users/me/messages/send HTTP/1.1"));

    let payload: serde_json::Value = serde_json::from_str(&requests[0].body).expect("json body");
    let raw = payload["raw"].as_str().expect("raw field");
    let decoded = String::from_utf8(URL_SAFE.decode(raw).expect("base64url")).expect("utf8");
    assert!(decoded.contains("Bcc: bcc@example.com"));
    assert!(decoded.contains("multipart/mixed"));
    assert!(decoded.contains("filename=\"a.csv\""));
    assert!(decoded.contains("Content-Type: image/jpeg"));
}

#[tokio::test]
async fn unauthorized_response_maps_to_auth_error() {
    let (base_url, server) = serve(vec![(
        401,
        r#"{"error":{"code":401,"message":"Request had invalid authentication credentials.","status":"UNAUTHENTICATED"}}"#
            .to_string(),
    )])
    .await;

    let err = client(&base_url)
        .list_labels(&session())
        .await
        .expect_err("unauthorized");
    assert!(matches!(err, AppError::Auth(message) if message.contains("invalid authentication")));

    server.await.expect("server");
}
