//! Integration tests: real curl transport against a local capture server.
//!
//! Exercises the full path — planner, queue, engine, multipart encoding —
//! and asserts on the bytes the server actually received.

mod common;

use common::upload_server::{self, find};
use cue_core::config::UploadConfig;
use cue_core::engine::{DrainStatus, UploadEngine};
use cue_core::hooks::UploadHooks;
use cue_core::response::ServerResponse;
use cue_core::source::UploadFile;
use cue_core::transport::{CurlTransport, TransportError, TransportEvent};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone, Default)]
struct Probe {
    starts: Rc<RefCell<u32>>,
    errors: Rc<RefCell<u32>>,
    aborts: Rc<RefCell<u32>>,
    done: Rc<RefCell<Option<Option<serde_json::Value>>>>,
}

impl UploadHooks for Probe {
    fn on_start(&mut self, _event: &TransportEvent) {
        *self.starts.borrow_mut() += 1;
    }
    fn on_abort(&mut self, _event: &TransportEvent) {
        *self.aborts.borrow_mut() += 1;
    }
    fn on_error(&mut self, _error: &TransportError) {
        *self.errors.borrow_mut() += 1;
    }
    fn on_done(&mut self, last_response: Option<&ServerResponse>) {
        *self.done.borrow_mut() = Some(last_response.map(|r| r.payload.clone()));
    }
}

fn patterned(size: usize) -> Vec<u8> {
    (b'a'..=b'z').cycle().take(size).collect()
}

/// Extracts `len` data bytes of the named multipart field.
fn multipart_blob<'a>(body: &'a [u8], field: &str, len: usize) -> &'a [u8] {
    let marker = format!("name=\"{}\"", field);
    let at = find(body, marker.as_bytes()).unwrap_or_else(|| panic!("field {} missing", field));
    let data_at = at + find(&body[at..], b"\r\n\r\n").expect("part data") + 4;
    &body[data_at..data_at + len]
}

fn contains(body: &[u8], needle: &str) -> bool {
    find(body, needle.as_bytes()).is_some()
}

#[test]
fn whole_file_upload_posts_single_image_unit() {
    let server = upload_server::start_with_replies(vec![(
        200,
        r#"{"success":1,"stored":"photo.bin"}"#.to_string(),
    )]);
    let content = patterned(500);
    let file = UploadFile::from_bytes("photo.bin", content.clone());

    let probe = Probe::default();
    let mut engine = UploadEngine::new(CurlTransport::new());
    let mut config = UploadConfig::new(server.url.clone());
    config.resource_id = Some(7);
    engine.init(config, Box::new(probe.clone()));

    assert_eq!(engine.enqueue(&file), 1);
    assert!(matches!(engine.start(), DrainStatus::Drained));
    assert_eq!(engine.count(), 0);

    assert_eq!(server.request_count(), 1);
    let request = server.request(0);
    assert!(request.head.starts_with("POST /upload"));
    assert_eq!(multipart_blob(&request.body, "id", 1), b"7");
    assert_eq!(multipart_blob(&request.body, "image", 500), &content[..]);
    assert!(contains(&request.body, "filename=\"photo.bin\""));
    assert!(!contains(&request.body, "name=\"chunked\""));

    let done = probe.done.borrow().clone().expect("on_done fired");
    assert_eq!(done.expect("carried a response")["stored"], "photo.bin");
}

#[test]
fn chunked_upload_sends_three_contiguous_parts() {
    let server = upload_server::start();
    let content = patterned(250_000);
    let file = UploadFile::from_bytes("video.mp4", content.clone());

    let probe = Probe::default();
    let mut engine = UploadEngine::new(CurlTransport::new());
    let mut config = UploadConfig::new(server.url.clone());
    config.chunk_size = Some(100_000);
    engine.init(config, Box::new(probe.clone()));

    assert_eq!(engine.enqueue(&file), 3);
    assert!(matches!(engine.start(), DrainStatus::Drained));
    assert_eq!(engine.count(), 0);
    assert_eq!(server.request_count(), 3);

    let ranges = [(0usize, 83_334usize), (83_334, 166_668), (166_668, 250_000)];
    for (i, (start, end)) in ranges.iter().enumerate() {
        let body = server.request(i).body;
        let part = i + 1;
        assert_eq!(multipart_blob(&body, "chunked", 1), b"1");
        assert_eq!(multipart_blob(&body, "parts", 1), b"3");
        assert_eq!(
            multipart_blob(&body, "part", 1),
            part.to_string().as_bytes()
        );
        let field = format!("chunk_{}", part);
        assert_eq!(
            multipart_blob(&body, &field, end - start),
            &content[*start..*end]
        );
        assert!(contains(&body, &format!("filename=\"{}\"", field)));
    }
    assert!(*probe.starts.borrow() >= 1, "upload start should be signaled");
}

#[test]
fn server_rejection_halts_the_drain_and_preserves_the_queue() {
    let server = upload_server::start_with_replies(vec![
        (200, r#"{"success":1}"#.to_string()),
        (200, r#"{"success":0,"message":"checksum mismatch"}"#.to_string()),
    ]);
    let file = UploadFile::from_bytes("big.bin", patterned(250_000));

    let probe = Probe::default();
    let mut engine = UploadEngine::new(CurlTransport::new());
    let mut config = UploadConfig::new(server.url.clone());
    config.chunk_size = Some(100_000);
    engine.init(config, Box::new(probe.clone()));
    engine.enqueue(&file);

    match engine.start() {
        DrainStatus::ServerRejected(message) => {
            assert_eq!(message.as_deref(), Some("checksum mismatch"))
        }
        other => panic!("expected ServerRejected, got {:?}", other),
    }
    assert_eq!(server.request_count(), 2);
    assert_eq!(engine.count(), 2);
    assert!(probe.done.borrow().is_none(), "on_done must not fire");

    // Caller-driven retry re-attempts the same head unit; the script is
    // exhausted so everything succeeds now.
    assert!(matches!(engine.start(), DrainStatus::Drained));
    assert_eq!(server.request_count(), 4);
    assert_eq!(engine.count(), 0);
}

#[test]
fn non_json_reply_becomes_wrapped_rejection() {
    let server =
        upload_server::start_with_replies(vec![(200, "<html>nope</html>".to_string())]);
    let file = UploadFile::from_bytes("a.bin", patterned(100));

    let mut engine = UploadEngine::new(CurlTransport::new());
    engine.init(
        UploadConfig::new(server.url.clone()),
        Box::new(Probe::default()),
    );
    engine.enqueue(&file);

    match engine.start() {
        DrainStatus::ServerRejected(message) => {
            assert_eq!(message.as_deref(), Some("<html>nope</html>"))
        }
        other => panic!("expected ServerRejected, got {:?}", other),
    }
    assert_eq!(engine.count(), 1);
}

#[test]
fn http_error_status_routes_to_the_error_hook() {
    let server = upload_server::start_with_replies(vec![(500, "boom".to_string())]);
    let file = UploadFile::from_bytes("a.bin", patterned(100));

    let probe = Probe::default();
    let mut engine = UploadEngine::new(CurlTransport::new());
    engine.init(UploadConfig::new(server.url.clone()), Box::new(probe.clone()));
    engine.enqueue(&file);

    assert!(matches!(
        engine.start(),
        DrainStatus::TransportFailed(TransportError::Http { status: 500 })
    ));
    assert_eq!(*probe.errors.borrow(), 1);
    assert_eq!(engine.count(), 1);
}

#[test]
fn configured_headers_reach_the_wire() {
    let server = upload_server::start();
    let file = UploadFile::from_bytes("a.bin", patterned(100));

    let mut engine = UploadEngine::new(CurlTransport::new());
    let mut config = UploadConfig::new(server.url.clone());
    config
        .headers
        .insert("X-Auth-Token".to_string(), "sesame".to_string());
    engine.init(config, Box::new(Probe::default()));
    engine.enqueue(&file);

    assert!(matches!(engine.start(), DrainStatus::Drained));
    assert!(server.request(0).head.contains("X-Auth-Token: sesame"));
}

#[test]
fn pre_set_abort_token_stops_the_transfer() {
    let server = upload_server::start();
    let file = UploadFile::from_bytes("a.bin", patterned(250_000));

    let token = Arc::new(AtomicBool::new(true));
    let probe = Probe::default();
    let mut engine = UploadEngine::new(CurlTransport::with_abort_token(Arc::clone(&token)));
    let mut config = UploadConfig::new(server.url.clone());
    config.chunk_size = Some(100_000);
    engine.init(config, Box::new(probe.clone()));
    engine.enqueue(&file);

    assert!(matches!(engine.start(), DrainStatus::Aborted));
    assert_eq!(*probe.aborts.borrow(), 1);
    assert_eq!(*probe.errors.borrow(), 0);
    assert_eq!(engine.count(), 3, "aborted head unit stays queued");
}
