//! Minimal HTTP/1.1 server that accepts multipart POSTs for integration tests.
//!
//! Captures each request (headers + raw body) and replies with a scripted
//! status/body pair; once the script runs out, every request gets
//! `200 {"success":1}`. Connections are handled sequentially, matching the
//! engine's one-outstanding-transfer model, so capture order is wire order.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One captured POST.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Raw request head (request line + headers).
    pub head: String,
    /// Raw body bytes (the multipart encoding).
    pub body: Vec<u8>,
}

pub struct UploadServer {
    /// Endpoint URL to configure the engine with.
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl UploadServer {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn request(&self, index: usize) -> CapturedRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

/// Starts a server whose first N requests get the scripted `(status, body)`
/// replies. Runs in a background thread until the process exits.
pub fn start_with_replies(replies: Vec<(u16, String)>) -> UploadServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests: Arc<Mutex<Vec<CapturedRequest>>> = Arc::default();
    let captured = Arc::clone(&requests);
    thread::spawn(move || {
        let mut script = replies.into_iter();
        for stream in listener.incoming().flatten() {
            let reply = script
                .next()
                .unwrap_or_else(|| (200, r#"{"success":1}"#.to_string()));
            handle(stream, &captured, reply);
        }
    });
    UploadServer {
        url: format!("http://127.0.0.1:{}/upload", port),
        requests,
    }
}

/// All-success server.
pub fn start() -> UploadServer {
    start_with_replies(Vec::new())
}

fn handle(mut stream: TcpStream, captured: &Mutex<Vec<CapturedRequest>>, reply: (u16, String)) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let mut buf: Vec<u8> = Vec::new();
    let mut tmp = [0u8; 8192];
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut tmp) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&tmp[..n]),
        }
    };
    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.trim()
                .eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);

    // libcurl sends Expect: 100-continue for large multipart bodies and waits
    // for the interim response before streaming.
    if head.to_ascii_lowercase().contains("expect: 100-continue") {
        let _ = stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n");
    }

    let mut body = buf[head_end..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut tmp) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&tmp[..n]),
        }
    }
    body.truncate(content_length);
    captured.lock().unwrap().push(CapturedRequest { head, body });

    let (status, payload) = reply;
    let reason = if (200..300).contains(&status) { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        payload.len(),
        payload
    );
    let _ = stream.write_all(response.as_bytes());
}

/// First index of `needle` in `haystack`.
pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
