//! End-to-end resolver tests against a minimal in-process HTTP stub.
//!
//! The stub answers every request with one canned response, which is all
//! the resolver's read-only GET round trips need.

use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use vod_diary::config::StoreConfig;
use vod_diary::error::{FailureClass, VodError};
use vod_diary::keys::compute_lookup_key;
use vod_diary::store::{ListFilter, MetadataResolver};
use vod_diary::types::Platform;

/// Serves `body` with the given status line to every connection.
async fn spawn_stub(status_line: &str, body: serde_json::Value) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let status_line = status_line.to_string();
    let body = body.to_string();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let status_line = status_line.clone();
            let body = body.clone();
            tokio::spawn(async move {
                // Read the request head fully; GET requests carry no body.
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => {
                            head.extend_from_slice(&buf[..n]);
                            if head.windows(4).any(|w| w == b"\r\n\r\n") {
                                break;
                            }
                        }
                    }
                }
                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}

/// Accepts connections and never answers, to exercise the request bound.
async fn spawn_stalled_stub() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let _hold = socket;
                tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            });
        }
    });
    format!("http://{}", addr)
}

/// An address nothing listens on, for proving a call was (not) made.
async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn resolver_for(base_url: String) -> MetadataResolver {
    MetadataResolver::new(StoreConfig {
        base_url,
        timeout_seconds: 1,
        ..StoreConfig::default()
    })
}

#[tokio::test]
async fn test_resolve_url_end_to_end() {
    let url = "https://archive.wubby.tv/vods/public/test.mp4";
    let key = compute_lookup_key(url).unwrap();
    assert_eq!(
        key,
        "381270a278b02f63dae94f2c801af1df84cba1b00264135c6d156edf49591c28"
    );

    let base = spawn_stub(
        "200 OK",
        json!([{
            "url": url,
            "url_hash": key,
            "pleb_title": "Kick Friday Madness",
            "platform": "kick",
            "summary": "Friday chaos, archived.",
            "tags": ["kick", "gambling"],
            "uploaded_at": "2025-07-05T22:25:14+00:00",
            "created_at": "2025-07-06T01:00:00+00:00"
        }]),
    )
    .await;

    let record = resolver_for(base)
        .resolve_url(url)
        .await
        .unwrap()
        .expect("row should resolve");

    assert_eq!(record.title, "Kick Friday Madness");
    assert_eq!(record.platform, Platform::Kick);
    assert_eq!(record.lookup_key, key);
    assert_eq!(record.source_url, url);
}

#[tokio::test]
async fn test_zero_rows_is_absent_not_error() {
    let base = spawn_stub("200 OK", json!([])).await;
    let result = resolver_for(base)
        .resolve_by_key(&"a".repeat(64))
        .await
        .unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_malformed_key_is_rejected_without_a_request() {
    let base = dead_endpoint().await;
    let result = resolver_for(base).resolve_by_key("not-a-key").await;
    assert!(matches!(result, Err(VodError::Validation(_))));
}

#[tokio::test]
async fn test_not_found_classification() {
    let base = spawn_stub("404 Not Found", json!({"message": "no such table"})).await;
    let result = resolver_for(base).resolve_by_key(&"a".repeat(64)).await;
    match result {
        Err(VodError::Request {
            classification,
            status,
            ..
        }) => {
            assert_eq!(classification, FailureClass::NotFound);
            assert_eq!(status, 404);
        }
        other => panic!("expected not-found request error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_server_error_classification() {
    let base = spawn_stub(
        "500 Internal Server Error",
        json!({"message": "on fire"}),
    )
    .await;
    let result = resolver_for(base).list_recent(&ListFilter::default()).await;
    match result {
        Err(VodError::Request { classification, .. }) => {
            assert_eq!(classification, FailureClass::ServerError);
        }
        other => panic!("expected server-error request error, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_stalled_response_is_timeout() {
    let base = spawn_stalled_stub().await;
    let result = resolver_for(base).resolve_by_key(&"a".repeat(64)).await;
    assert!(matches!(result, Err(VodError::Timeout(1))));
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    let base = dead_endpoint().await;
    let result = resolver_for(base).resolve_by_key(&"a".repeat(64)).await;
    assert!(matches!(result, Err(VodError::Network(_))));
}

#[tokio::test]
async fn test_malformed_body_is_response_format_error() {
    let base = spawn_stub("200 OK", json!({"rows": "not an array"})).await;
    let result = resolver_for(base).resolve_by_key(&"a".repeat(64)).await;
    assert!(matches!(result, Err(VodError::ResponseFormat(_))));
}

#[tokio::test]
async fn test_list_recent_orders_nulls_last() {
    // The stub returns rows unordered; the resolver re-asserts the
    // published-desc, undated-last contract after mapping.
    let base = spawn_stub(
        "200 OK",
        json!([
            {"url": "https://a.example/jan.mp4", "uploaded_at": "2025-01-01T00:00:00+00:00"},
            {"url": "https://a.example/undated.mp4"},
            {"url": "https://a.example/feb.mp4", "uploaded_at": "2025-02-01T00:00:00+00:00"}
        ]),
    )
    .await;

    let records = resolver_for(base)
        .list_recent(&ListFilter::default())
        .await
        .unwrap();

    let order: Vec<&str> = records.iter().map(|r| r.source_url.as_str()).collect();
    assert_eq!(
        order,
        vec![
            "https://a.example/feb.mp4",
            "https://a.example/jan.mp4",
            "https://a.example/undated.mp4"
        ]
    );
}

#[tokio::test]
async fn test_empty_search_term_short_circuits_without_network() {
    // A dead endpoint would turn any request into a network error, so an
    // Ok result proves no call went out.
    let base = dead_endpoint().await;
    let resolver = resolver_for(base);

    assert!(resolver.search("", 200).await.unwrap().is_empty());
    assert!(resolver.search("   ", 200).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_keeps_tag_only_matches() {
    // Neither title nor URL of the first row mentions the term; its tags
    // do. The second row matches nothing and must be dropped client-side
    // even though the server returned it.
    let base = spawn_stub(
        "200 OK",
        json!([
            {
                "url": "https://a.example/ep12.mp4",
                "pleb_title": "Tuesday stream",
                "tags": ["Cooking", "irl"]
            },
            {
                "url": "https://a.example/ep13.mp4",
                "pleb_title": "Wednesday stream",
                "tags": ["gambling"]
            }
        ]),
    )
    .await;

    let records = resolver_for(base).search("cooking", 200).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_url, "https://a.example/ep12.mp4");
}

#[tokio::test]
async fn test_concurrent_calls_share_one_resolver() {
    let base = spawn_stub("200 OK", json!([])).await;
    let resolver = resolver_for(base);

    let key = "a".repeat(64);
    let filter = ListFilter::default();
    let (first, second, third) = tokio::join!(
        resolver.resolve_by_key(&key),
        resolver.list_recent(&filter),
        resolver.search("anything", 10),
    );

    assert!(first.unwrap().is_none());
    assert!(second.unwrap().is_empty());
    assert!(third.unwrap().is_empty());
}
