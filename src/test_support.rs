//! Shared test utilities: a scripted HTTP stub server for exercising the
//! blocking clients over real sockets.
//!
//! Available only under `#[cfg(test)]`.

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// StubServer
// ============================================================================

/// Minimal HTTP/1.1 server bound to an ephemeral localhost port. Serves a
/// scripted sequence of `(status, body)` responses in order, counting every
/// request and capturing request lines and bodies for assertions. Requests
/// beyond the script get a 500 and still count, so overcalls show up in
/// `hits()`.
pub struct StubServer {
    port: u16,
    hits: Arc<AtomicUsize>,
    lines: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub fn start(responses: Vec<(u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let port = listener.local_addr().expect("stub server addr").port();
        let hits = Arc::new(AtomicUsize::new(0));
        let lines = Arc::new(Mutex::new(Vec::new()));
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let script = Mutex::new(VecDeque::from(responses));

        let thread_hits = hits.clone();
        let thread_lines = lines.clone();
        let thread_bodies = bodies.clone();
        // Detached accept loop; it dies with the test process.
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let response = script
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or((500, String::new()));
                let _ = handle(stream, response, &thread_hits, &thread_lines, &thread_bodies);
            }
        });

        Self {
            port,
            hits,
            lines,
            bodies,
        }
    }

    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Number of requests fully received so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Request lines ("GET /path?query HTTP/1.1") in arrival order.
    pub fn request_lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Request bodies in arrival order (empty string for body-less requests).
    pub fn request_bodies(&self) -> Vec<String> {
        self.bodies.lock().unwrap().clone()
    }

    /// A URL nothing listens on: bind an ephemeral port, then release it.
    pub fn dead_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe");
        let port = listener.local_addr().expect("probe addr").port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }
}

/// Read one request, record it, then write the scripted response.
/// Counters are updated before the response bytes go out, so a client that
/// has finished reading always observes the bumped counts.
fn handle(
    mut stream: TcpStream,
    (status, body): (u16, String),
    hits: &AtomicUsize,
    lines: &Mutex<Vec<String>>,
    bodies: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            break;
        }
        if header == "\r\n" || header == "\n" {
            break;
        }
        if let Some(rest) = header.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = rest.trim().parse().unwrap_or(0);
        }
    }
    let mut request_body = vec![0u8; content_length];
    reader.read_exact(&mut request_body)?;

    hits.fetch_add(1, Ordering::SeqCst);
    lines.lock().unwrap().push(request_line.trim_end().to_string());
    bodies
        .lock()
        .unwrap()
        .push(String::from_utf8_lossy(&request_body).to_string());

    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes())?;
    stream.flush()
}
