//! Sends through [`SesMailer`] to a local endpoint standing in for SES.

use std::sync::{Arc, Mutex};

use aws_sdk_sesv2::config::retry::RetryConfig;
use aws_sdk_sesv2::config::{BehaviorVersion, Credentials, Region};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use mailer::{DeliveryError, Mailer, OutgoingEmail, SesMailer};

/// Answers a single request with `status_line`, `headers` and `body`, and
/// hands back the raw request it received.
async fn answer_once(status_line: &'static str, headers: &'static str, body: &'static str) -> (String, Arc<Mutex<Option<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let received = Arc::new(Mutex::new(None));
    let slot = received.clone();

    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else { return };
        let request = read_request(&mut socket).await;
        *slot.lock().unwrap() = Some(request);

        let response = format!(
            "HTTP/1.1 {}\r\n\
             Content-Type: application/json\r\n\
             {}\
             Content-Length: {}\r\n\
             Connection: close\r\n\r\n{}",
            status_line,
            headers,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });

    (url, received)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn ses_mailer(endpoint: &str) -> SesMailer {
    let config = aws_sdk_sesv2::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(Credentials::new("AKIDEXAMPLE", "secret", None, None, "static"))
        .endpoint_url(endpoint)
        .retry_config(RetryConfig::disabled())
        .build();
    SesMailer::new(aws_sdk_sesv2::Client::from_conf(config))
}

fn violation_email() -> OutgoingEmail {
    OutgoingEmail {
        sender: "alerts@example.com".to_string(),
        recipient: "oncall@example.com".to_string(),
        subject: "Freeze Change Violation".to_string(),
        body: "Violation detected:\nEvent Name: CreateBucket".to_string(),
    }
}

#[tokio::test]
async fn send_posts_one_plain_text_email_and_returns_message_id() {
    let (url, received) = answer_once("200 OK", "", r#"{"MessageId":"0100018c-example"}"#).await;
    let mailer = ses_mailer(&url);

    let receipt = mailer.send(&violation_email()).await.unwrap();

    assert_eq!(receipt.message_id.as_deref(), Some("0100018c-example"));

    let request = received.lock().unwrap().clone().unwrap();
    assert!(request.starts_with("POST /v2/email/outbound-emails"), "{}", request);
    for fragment in [
        "alerts@example.com",
        "oncall@example.com",
        "Freeze Change Violation",
        r#"Violation detected:\nEvent Name: CreateBucket"#,
    ] {
        assert!(request.contains(fragment), "request missing {:?}:\n{}", fragment, request);
    }
    assert!(!request.contains("\"Html\""), "{}", request);
}

#[tokio::test]
async fn rejected_send_surfaces_ses_error() {
    let (url, _received) = answer_once(
        "400 Bad Request",
        "x-amzn-ErrorType: MessageRejected\r\n",
        r#"{"message":"Email address is not verified."}"#,
    ).await;
    let mailer = ses_mailer(&url);

    let err = mailer.send(&violation_email()).await.unwrap_err();

    assert!(
        matches!(err, DeliveryError::Ses(aws_sdk_sesv2::Error::MessageRejected(_))),
        "unexpected error: {:?}",
        err
    );
    assert!(err.to_string().contains("Email address is not verified."));
}
