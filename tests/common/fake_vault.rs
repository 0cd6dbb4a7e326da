//! Minimal loopback HTTP server speaking the slice of Vault's KV v1 API the client uses.
//! Backed by a MemoryStore; one request per connection.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use vault_kv_mv::{MemoryStore, SecretStore, ValueBundle};

pub const TOKEN: &str = "test-root-token";
/// Writes below this prefix are denied with 403.
pub const READ_ONLY_PREFIX: &str = "ro/";

#[derive(Debug, Clone)]
pub struct Seen {
    pub method: String,
    pub target: String,
    pub token: Option<String>,
    pub namespace: Option<String>,
}

pub struct FakeVault {
    pub address: String,
    pub store: Arc<MemoryStore>,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl FakeVault {
    pub fn start(store: MemoryStore) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let address = format!("http://{}", listener.local_addr().unwrap());
        let store = Arc::new(store);
        let seen = Arc::new(Mutex::new(Vec::new()));
        {
            let store = Arc::clone(&store);
            let seen = Arc::clone(&seen);
            thread::spawn(move || {
                for stream in listener.incoming().flatten() {
                    let _ = handle(stream, &store, &seen);
                }
            });
        }
        Self { address, store, seen }
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

fn handle(stream: TcpStream, store: &MemoryStore, seen: &Mutex<Vec<Seen>>) -> std::io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let target = parts.next().unwrap_or_default().to_string();

    let mut token = None;
    let mut namespace = None;
    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        reader.read_line(&mut header)?;
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let value = value.trim().to_string();
            match name.to_ascii_lowercase().as_str() {
                "x-vault-token" => token = Some(value),
                "x-vault-namespace" => namespace = Some(value),
                "content-length" => content_length = value.parse().unwrap_or(0),
                _ => {}
            }
        }
    }
    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    seen.lock().unwrap().push(Seen {
        method: method.clone(),
        target: target.clone(),
        token: token.clone(),
        namespace,
    });

    let (status, payload) = if token.as_deref() != Some(TOKEN) {
        (403, r#"{"errors":["permission denied"]}"#.to_string())
    } else {
        route(&method, &target, &body, store)
    };
    respond(stream, status, &payload)
}

fn route(method: &str, target: &str, body: &[u8], store: &MemoryStore) -> (u16, String) {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));
    let Some(path) = path.strip_prefix("/v1/") else {
        return (404, r#"{"errors":["no handler for route"]}"#.into());
    };
    let decoded = percent_decode(path);
    let path = decoded.as_str();
    let not_found = || (404, r#"{"errors":[]}"#.to_string());

    match method {
        "GET" if query.contains("list=true") => match store.list(path) {
            Ok(Some(keys)) => (200, serde_json::json!({ "data": { "keys": keys } }).to_string()),
            _ => not_found(),
        },
        "GET" => match store.read(path) {
            Ok(Some(value)) => (200, serde_json::json!({ "data": value }).to_string()),
            _ => not_found(),
        },
        "PUT" | "POST" if path.starts_with(READ_ONLY_PREFIX) => {
            (403, r#"{"errors":["1 error occurred:\n\t* permission denied\n\n"]}"#.into())
        }
        "PUT" | "POST" => match serde_json::from_slice::<ValueBundle>(body) {
            Ok(value) => match store.write(path, &value) {
                Ok(()) => (204, String::new()),
                Err(e) => (400, serde_json::json!({ "errors": [e.to_string()] }).to_string()),
            },
            Err(e) => (400, serde_json::json!({ "errors": [e.to_string()] }).to_string()),
        },
        "DELETE" => match store.delete(path) {
            Ok(()) => (204, String::new()),
            Err(e) => (400, serde_json::json!({ "errors": [e.to_string()] }).to_string()),
        },
        _ => (405, r#"{"errors":["unsupported operation"]}"#.into()),
    }
}

/// Decode `%XX` escapes the way Vault's HTTP layer does before routing.
fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let hex = bytes
            .get(i + 1..i + 3)
            .and_then(|h| std::str::from_utf8(h).ok())
            .and_then(|h| u8::from_str_radix(h, 16).ok());
        match (bytes[i], hex) {
            (b'%', Some(b)) => {
                out.push(b);
                i += 3;
            }
            (b, _) => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn respond(mut stream: TcpStream, status: u16, payload: &str) -> std::io::Result<()> {
    let reason = match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Method Not Allowed",
    };
    let head = if status == 204 {
        format!("HTTP/1.1 204 {reason}\r\nConnection: close\r\n\r\n")
    } else {
        format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            payload.len()
        )
    };
    stream.write_all(head.as_bytes())?;
    if status != 204 {
        stream.write_all(payload.as_bytes())?;
    }
    stream.flush()
}
