//! Minimal HTTP/1.1 server standing in for Jenkins in integration tests.
//!
//! Serves canned responses keyed by method and request target (path plus
//! query) and records every request it receives. Unknown targets get 404.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub target: String,
    pub status: u16,
    pub body: String,
}

impl Route {
    pub fn get(target: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            method: "GET",
            target: target.into(),
            status,
            body: body.into(),
        }
    }

    pub fn post(target: impl Into<String>, status: u16) -> Self {
        Self {
            method: "POST",
            target: target.into(),
            status,
            body: String::new(),
        }
    }
}

/// Canned routes for a job: last build and job info.
pub fn job_routes(job: &str, building: bool, result: &str, in_queue: bool) -> Vec<Route> {
    vec![
        Route::get(
            format!("/job/{}/lastBuild/api/json?tree=building,result", job),
            200,
            format!(r#"{{"building":{},"result":{}}}"#, building, result),
        ),
        Route::get(
            format!("/job/{}/api/json?tree=inQueue", job),
            200,
            format!(r#"{{"inQueue":{}}}"#, in_queue),
        ),
        Route::post(format!("/job/{}/build", job), 201),
    ]
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub target: String,
    pub headers: Vec<(String, String)>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

pub struct FakeJenkins {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeJenkins {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    /// "METHOD target" for every request, in arrival order.
    pub fn request_lines(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|r| format!("{} {}", r.method, r.target))
            .collect()
    }
}

/// Starts a server in a background thread. It runs until the process exits.
pub fn start(routes: Vec<Route>) -> FakeJenkins {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes = Arc::new(routes);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    thread::spawn(move || {
        // One connection at a time keeps the recorded order deterministic.
        for stream in listener.incoming().flatten() {
            handle(stream, &routes, &recorded);
        }
    });
    FakeJenkins {
        url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, routes: &[Route], recorded: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let head = match read_head(&mut stream) {
        Some(h) => h,
        None => return,
    };
    let request = match parse_request(&head) {
        Some(r) => r,
        None => return,
    };

    let route = routes
        .iter()
        .find(|r| r.method.eq_ignore_ascii_case(&request.method) && r.target == request.target);
    recorded.lock().unwrap().push(request);

    let (status, body) = match route {
        Some(r) => (r.status, r.body.as_str()),
        None => (404, "Not Found"),
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

/// Reads until the blank line ending the request head.
fn read_head(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    while !data.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return None,
            Ok(n) => data.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8(data).ok()
}

fn parse_request(head: &str) -> Option<Recorded> {
    let mut lines = head.lines();
    let mut first = lines.next()?.split_whitespace();
    let method = first.next()?.to_string();
    let target = first.next()?.to_string();
    let headers = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();
    Some(Recorded {
        method,
        target,
        headers,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        302 => "Found",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Error",
    }
}
