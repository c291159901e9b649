//! HttpStore against a local HTTP server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use stowage_common::config::{Addressing, NetworkConfig};
use stowage_common::remote::{ArtifactFetcher, BucketTranslator, HttpStore, RemoteStoreClient};
use stowage_core::{FetchError, FetchRequest, StoreError};
use url::Url;

struct Reply {
    status: &'static str,
    body: Vec<u8>,
    declared: Option<usize>,
}

impl Reply {
    fn ok(body: &[u8]) -> Self {
        Self {
            status: "200 OK",
            body: body.to_vec(),
            declared: None,
        }
    }

    /// Successful reply announcing `declared` bytes but sending only `body`.
    fn cut_off(body: &[u8], declared: usize) -> Self {
        Self {
            declared: Some(declared),
            ..Self::ok(body)
        }
    }

    fn status(status: &'static str) -> Self {
        Self {
            status,
            body: Vec::new(),
            declared: None,
        }
    }
}

/// Serve one reply per connection, in order, and report each raw request head.
fn serve(replies: Vec<Reply>) -> (Url, Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for reply in replies {
            let (mut stream, _) = listener.accept().unwrap();
            let head = read_head(&mut stream);
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                reply.status,
                reply.declared.unwrap_or(reply.body.len())
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.write_all(&reply.body).unwrap();
            stream.flush().unwrap();
            tx.send(head).unwrap();
        }
    });

    (Url::parse(&format!("http://{}", addr)).unwrap(), rx)
}

fn read_head(stream: &mut TcpStream) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 512];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }
    String::from_utf8_lossy(&head).to_lowercase()
}

fn store(endpoint: Url) -> HttpStore {
    HttpStore::new(endpoint, Addressing::Path, &NetworkConfig::default()).unwrap()
}

#[test]
fn test_fetch_over_http() {
    let body: Vec<u8> = (0..42).collect();
    let (endpoint, requests) = serve(vec![Reply::ok(&body)]);

    let fetcher = ArtifactFetcher::new(
        store(endpoint.clone()),
        BucketTranslator::new("classes").with_requester_pays(true),
    );
    let artifact = fetcher.fetch("com.example.Foo").unwrap();

    assert_eq!(artifact.bytes(), body.as_slice());
    assert_eq!(
        artifact.origin().url.as_ref().unwrap().as_str(),
        format!("{}classes/", endpoint)
    );

    let head = requests.recv().unwrap();
    assert!(head.starts_with("get /classes/com/example/foo.class http/1.1"));
    assert!(head.contains("x-amz-request-payer: requester"));
}

#[test]
fn test_no_payer_header_by_default() {
    let (endpoint, requests) = serve(vec![Reply::ok(b"data")]);

    let object = store(endpoint)
        .fetch_object(&FetchRequest::new("assets", "logo.png"))
        .unwrap()
        .unwrap();
    assert_eq!(object.metadata().size_in_bytes, Some(4));

    let head = requests.recv().unwrap();
    assert!(!head.contains("x-amz-request-payer"));
}

#[test]
fn test_missing_object_is_not_found() {
    let (endpoint, _requests) = serve(vec![Reply::status("404 Not Found")]);

    let fetcher = ArtifactFetcher::new(store(endpoint), BucketTranslator::new("classes"));
    let err = fetcher.fetch("com.example.Missing").unwrap_err();
    assert!(matches!(err, FetchError::NotFound { .. }));
}

#[test]
fn test_forbidden_is_http_error() {
    let (endpoint, _requests) = serve(vec![Reply::status("403 Forbidden")]);

    let fetcher = ArtifactFetcher::new(store(endpoint), BucketTranslator::new("classes"));
    let err = fetcher.fetch("com.example.Secret").unwrap_err();
    assert!(matches!(
        err,
        FetchError::Store {
            source: StoreError::Http { status: 403, .. },
            ..
        }
    ));
    assert!(!err.is_not_found());
}

#[test]
fn test_empty_object_has_invalid_size() {
    let (endpoint, _requests) = serve(vec![Reply::ok(b"")]);

    let fetcher = ArtifactFetcher::new(store(endpoint), BucketTranslator::new("classes"));
    let err = fetcher.fetch("com.example.Empty").unwrap_err();
    assert!(matches!(err, FetchError::InvalidSize { size: Some(0), .. }));
}

#[test]
fn test_short_body_is_truncated_transfer() {
    let (endpoint, _requests) = serve(vec![Reply::cut_off(&[7u8; 10], 42)]);

    let fetcher = ArtifactFetcher::new(store(endpoint), BucketTranslator::new("classes"));
    let err = fetcher.fetch("com.example.Foo").unwrap_err();
    assert!(
        matches!(
            err,
            FetchError::TruncatedTransfer {
                expected: 42,
                received: 10,
                ..
            }
        ),
        "unexpected error: {:?}",
        err
    );
}

#[test]
fn test_connection_refused_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = Url::parse(&format!("http://{}", listener.local_addr().unwrap())).unwrap();
    drop(listener);

    let err = store(endpoint)
        .fetch_object(&FetchRequest::new("classes", "a/B.class"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Transport(_)));
}
