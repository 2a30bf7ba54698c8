//! Minimal HTTP/1.1 server for integration tests: answers open-ended range
//! GETs in bounded chunks, with switchable misbehavior modes.
//!
//! Serves a single static body. A well-behaved run answers
//! `Range: bytes=N-` with 206 and `Content-Range: bytes N-M/total`; the
//! misbehavior knobs simulate the server failures the engine must reject.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct RangeServerOptions {
    /// Max bytes served per range response. Forces multi-request transfers
    /// even for open-ended ranges. None = serve to the end.
    pub chunk_limit: Option<usize>,
    /// If false, GET ignores Range and always returns 200 with the full
    /// body and no Content-Range.
    pub support_ranges: bool,
    /// Content-Type header value, if any.
    pub content_type: Option<String>,
    /// Added to the start byte reported in Content-Range (simulates a
    /// server/proxy skipping bytes).
    pub start_skew: u64,
    /// If true, every response after the first reports double the real
    /// total size.
    pub grow_total_after_first: bool,
    /// Respond to every GET with this status and an empty body.
    pub error_status: Option<u32>,
}

impl Default for RangeServerOptions {
    fn default() -> Self {
        Self {
            chunk_limit: None,
            support_ranges: true,
            content_type: None,
            start_skew: 0,
            grow_total_after_first: false,
            error_status: None,
        }
    }
}

/// Running server: base URL plus a request counter for assertions.
pub struct RangeServer {
    pub url: String,
    pub requests: Arc<AtomicUsize>,
}

impl RangeServer {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// URL for `path` on this server (path may carry a metadata segment;
    /// the server ignores it).
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.url, path.trim_start_matches('/'))
    }
}

/// Starts a server in a background thread serving `body` with default
/// options. The server runs until the process exits.
pub fn start(body: Vec<u8>) -> RangeServer {
    start_with_options(body, RangeServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: RangeServerOptions) -> RangeServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = opts.clone();
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &body, &opts, &counter));
        }
    });
    RangeServer {
        url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, body: &[u8], opts: &RangeServerOptions, counter: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let (method, range) = parse_request(request);
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nConnection: close\r\n\r\n");
        return;
    }

    let request_index = counter.fetch_add(1, Ordering::SeqCst);

    if let Some(code) = opts.error_status {
        let response = format!(
            "HTTP/1.1 {} Error\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            code
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let total = body.len() as u64;
    let content_type_header = opts
        .content_type
        .as_deref()
        .map(|ct| format!("Content-Type: {}\r\n", ct))
        .unwrap_or_default();

    if !opts.support_ranges || range.is_none() {
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n",
            total, content_type_header
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(body);
        return;
    }

    let (start, end_incl_req) = range.unwrap();
    if start >= total {
        let response = format!(
            "HTTP/1.1 416 Range Not Satisfiable\r\nContent-Length: 0\r\nContent-Range: bytes */{}\r\nConnection: close\r\n\r\n",
            total
        );
        let _ = stream.write_all(response.as_bytes());
        return;
    }

    let mut end_incl = end_incl_req.min(total - 1);
    if let Some(limit) = opts.chunk_limit {
        end_incl = end_incl.min(start + limit as u64 - 1);
    }
    let slice = &body[start as usize..=end_incl as usize];

    let reported_total = if opts.grow_total_after_first && request_index > 0 {
        total * 2
    } else {
        total
    };
    let reported_start = start + opts.start_skew;
    let reported_end = end_incl + opts.start_skew;

    let response = format!(
        "HTTP/1.1 206 Partial Content\r\nContent-Length: {}\r\nContent-Range: bytes {}-{}/{}\r\n{}Accept-Ranges: bytes\r\nConnection: close\r\n\r\n",
        slice.len(),
        reported_start,
        reported_end,
        reported_total,
        content_type_header
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(slice);
}

/// Returns (method, optional (start, end_inclusive)). An open-ended
/// `bytes=N-` maps to end = u64::MAX.
fn parse_request(request: &str) -> (&str, Option<(u64, u64)>) {
    let mut method = "";
    let mut range = None;
    for line in request.lines() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if method.is_empty() {
            method = line.split_whitespace().next().unwrap_or("");
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("range") {
                let value = value.trim();
                if let Some(part) = value
                    .strip_prefix("bytes=")
                    .or_else(|| value.strip_prefix("Bytes="))
                {
                    if let Some((a, b)) = part.split_once('-') {
                        let start = a.trim().parse::<u64>().unwrap_or(0);
                        let end = b.trim();
                        let end_incl = if end.is_empty() {
                            u64::MAX
                        } else {
                            end.parse::<u64>().unwrap_or(0)
                        };
                        range = Some((start, end_incl));
                    }
                }
            }
        }
    }
    (method, range)
}
