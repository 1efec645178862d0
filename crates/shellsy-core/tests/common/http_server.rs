//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed set of routes, one response per connection. Routes can fail
//! their first N hits (503 or a truncated body) to exercise retries.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// How a route misbehaves on its first `fail_first` hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Respond 503 Service Unavailable.
    Unavailable,
    /// Announce the full Content-Length but send only half the body.
    Truncated,
}

#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
    pub fail_first: usize,
    pub failure: Failure,
}

impl Route {
    pub fn ok(path: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(path, 200, body)
    }

    pub fn with_status(path: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        Route {
            path: path.to_string(),
            status,
            body: body.into(),
            headers: Vec::new(),
            fail_first: 0,
            failure: Failure::Unavailable,
        }
    }

    pub fn redirect(path: &str, location: &str) -> Self {
        let mut r = Self::with_status(path, 302, Vec::new());
        r.headers.push(("Location".into(), location.into()));
        r
    }

    pub fn failing_first(mut self, n: usize, failure: Failure) -> Self {
        self.fail_first = n;
        self.failure = failure;
        self
    }
}

struct RouteState {
    route: Route,
    hits: AtomicUsize,
}

/// Handle to a running server. The server thread lives until the process exits.
pub struct TestServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl TestServer {
    /// `http://127.0.0.1:<port>` + `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Request targets seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn start(routes: Vec<Route>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<Vec<RouteState>> = Arc::new(
        routes
            .into_iter()
            .map(|route| RouteState {
                route,
                hits: AtomicUsize::new(0),
            })
            .collect(),
    );
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            thread::spawn(move || handle(stream, &routes, &log));
        }
    });
    TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, routes: &[RouteState], log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(target.clone());
    let path = target.split('?').next().unwrap_or("/");

    let Some(state) = routes.iter().find(|r| r.route.path == path) else {
        write_response(&mut stream, 404, &[], b"not found", None);
        return;
    };
    let route = &state.route;
    let hit = state.hits.fetch_add(1, Ordering::SeqCst);
    if hit < route.fail_first {
        match route.failure {
            Failure::Unavailable => {
                write_response(&mut stream, 503, &[], b"try later", None);
            }
            Failure::Truncated => {
                let half = &route.body[..route.body.len() / 2];
                write_response(&mut stream, route.status, &route.headers, half, Some(route.body.len()));
            }
        }
        return;
    }
    write_response(&mut stream, route.status, &route.headers, &route.body, None);
}

fn write_response(
    stream: &mut TcpStream,
    status: u16,
    headers: &[(String, String)],
    body: &[u8],
    declared_len: Option<usize>,
) {
    let reason = match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        503 => "Service Unavailable",
        _ => "Status",
    };
    let mut head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        reason,
        declared_len.unwrap_or(body.len())
    );
    for (name, value) in headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
    let _ = stream.flush();
}
