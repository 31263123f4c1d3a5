// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

pub fn shelf() -> Command {
    let mut cmd = cargo_bin_cmd!("shelf");
    cmd.env_remove("SHELF_API_URL").env_remove("SHELF_LOG");
    cmd
}

/// An API url nothing listens on: connections are refused right away.
pub fn dead_api_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

/// Helper to create an initialized temp directory pointing at `api_url`
pub fn init_temp_with(api_url: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    shelf()
        .arg("init")
        .arg("--api-url")
        .arg(api_url)
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory whose server is down
pub fn init_temp() -> TempDir {
    init_temp_with(&dead_api_url())
}

/// Helper to queue a create without contacting the server
pub fn queue_create(temp: &TempDir, name: &str) {
    shelf()
        .args(["create", "--name", name, "--queue"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("queued"));
}

/// Stored queue as parsed JSON
pub fn stored_queue(temp: &TempDir) -> Vec<serde_json::Value> {
    let path = temp.path().join(".shelf/store/offline_operations.json");
    match std::fs::read_to_string(path) {
        Ok(raw) => serde_json::from_str(&raw).unwrap(),
        Err(_) => Vec::new(),
    }
}

/// Minimal HTTP server answering each connection with the next scripted
/// response (default `200 {}`) and recording request lines.
pub struct FakeApi {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
    script: Arc<Mutex<VecDeque<(u16, String)>>>,
}

impl FakeApi {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/api", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let script = Arc::new(Mutex::new(VecDeque::new()));

        let (seen, replies) = (Arc::clone(&requests), Arc::clone(&script));
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { return };
                handle(stream, &seen, &replies);
            }
        });

        FakeApi {
            url,
            requests,
            script,
        }
    }

    /// Answer the next non-probe request with `status` and `body`.
    pub fn reply(&self, status: u16, body: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back((status, body.to_string()));
        self
    }

    /// Request lines seen so far, probes excluded.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|line| !line.starts_with("HEAD "))
            .cloned()
            .collect()
    }
}

fn handle(
    stream: TcpStream,
    seen: &Mutex<Vec<String>>,
    replies: &Mutex<VecDeque<(u16, String)>>,
) {
    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let request_line = request_line.trim_end().to_string();

    let mut content_length = 0;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap_or(0) == 0 || header == "\r\n" {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0; content_length];
    let _ = reader.read_exact(&mut body);

    let is_probe = request_line.starts_with("HEAD ");
    let (status, body) = if is_probe {
        (200, String::new())
    } else {
        replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or((200, "{}".to_string()))
    };
    seen.lock().unwrap().push(request_line);

    let mut response = format!(
        "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    if !is_probe {
        response.push_str(&body);
    }
    let mut stream = reader.into_inner();
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}
