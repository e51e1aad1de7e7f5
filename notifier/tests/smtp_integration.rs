//! Integration tests for the SMTP notifier against unreachable and scripted servers.

use std::path::PathBuf;
use std::time::Duration;

use chrono::Local;
use filealert_notifier::{FileCreationFact, Notifier, TransportConfig};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

/// Accept one session: send `greeting`, then answer each command line with the
/// next reply. Commands past the end of the script get `221`.
async fn scripted_server(greeting: &'static str, replies: &'static [&'static str]) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let Ok((stream, _)) = listener.accept().await else {
            return;
        };
        let (read, mut write) = stream.into_split();
        let mut lines = BufReader::new(read).lines();

        if write.write_all(greeting.as_bytes()).await.is_err() {
            return;
        }
        let mut replies = replies.iter();
        while let Ok(Some(_command)) = lines.next_line().await {
            let reply = replies.next().copied().unwrap_or("221 2.0.0 Bye\r\n");
            if write.write_all(reply.as_bytes()).await.is_err() {
                return;
            }
        }
    });

    port
}

async fn send_to(port: u16) -> String {
    let config = TransportConfig::new("me@example.com", "secret", "you@example.com")
        .with_host("127.0.0.1")
        .with_port(port)
        .with_timeout(Duration::from_secs(5));

    let outcome = Notifier::new(config).send(&fact()).await;
    assert!(!outcome.success);
    outcome.error_detail.unwrap()
}

fn fact() -> FileCreationFact {
    FileCreationFact {
        name: "a.txt".to_string(),
        path: PathBuf::from("/data/a.txt"),
        observed_at: Local::now(),
    }
}

#[tokio::test]
async fn test_unreachable_host_reports_connection_failure() {
    let config = TransportConfig::new("me@example.com", "secret", "you@example.com")
        .with_host("127.0.0.1")
        .with_port(closed_port())
        .with_timeout(Duration::from_secs(5));
    let notifier = Notifier::new(config);

    let outcome = notifier.send(&fact()).await;

    assert!(!outcome.success);
    let detail = outcome.error_detail.unwrap();
    assert!(
        detail.starts_with("connection failed"),
        "unexpected detail: {detail}"
    );
}

#[tokio::test]
async fn test_each_send_is_independent() {
    let config = TransportConfig::new("me@example.com", "secret", "you@example.com")
        .with_host("127.0.0.1")
        .with_port(closed_port())
        .with_timeout(Duration::from_secs(5));
    let notifier = Notifier::new(config);

    let first = notifier.send(&fact()).await;
    let second = notifier.send(&fact()).await;

    for outcome in [first, second] {
        assert!(!outcome.success);
        assert!(
            outcome
                .error_detail
                .as_deref()
                .is_some_and(|d| d.starts_with("connection failed"))
        );
    }
}

#[tokio::test]
async fn test_malformed_recipient_is_reported_before_connecting() {
    let config = TransportConfig::new("me@example.com", "secret", "not-an-address")
        .with_host("127.0.0.1")
        .with_port(closed_port());
    let notifier = Notifier::new(config);

    let outcome = notifier.send(&fact()).await;

    assert!(!outcome.success);
    assert!(
        outcome
            .error_detail
            .as_deref()
            .is_some_and(|d| d.starts_with("invalid message: recipient"))
    );
}

#[tokio::test]
async fn test_service_unavailable_greeting_is_a_connection_failure() {
    let port = scripted_server("421 4.3.2 Service not available\r\n", &[]).await;

    let detail = send_to(port).await;
    assert!(
        detail.starts_with("connection failed"),
        "unexpected detail: {detail}"
    );
}

#[tokio::test]
async fn test_rejecting_greeting_is_a_transmission_failure() {
    let port = scripted_server("554 5.3.2 No SMTP service here\r\n", &[]).await;

    let detail = send_to(port).await;
    assert!(
        detail.starts_with("transmission failed"),
        "unexpected detail: {detail}"
    );
}

#[tokio::test]
async fn test_auth_reply_is_an_authentication_failure() {
    let port = scripted_server(
        "220 localhost ESMTP\r\n",
        &["530 5.7.0 Authentication required\r\n"],
    )
    .await;

    let detail = send_to(port).await;
    assert!(
        detail.starts_with("authentication failed"),
        "unexpected detail: {detail}"
    );
}

#[tokio::test]
async fn test_server_without_starttls_is_a_connection_failure() {
    let port = scripted_server("220 localhost ESMTP\r\n", &["250 localhost\r\n"]).await;

    let detail = send_to(port).await;
    assert!(
        detail.starts_with("connection failed"),
        "unexpected detail: {detail}"
    );
}
