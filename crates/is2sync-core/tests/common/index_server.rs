//! Minimal HTTP/1.1 data pool for integration tests.
//!
//! Serves one Apache-style date directory index and its files behind HTTP
//! basic auth. With `login_redirect`, unauthenticated requests are bounced to
//! a login endpoint that checks credentials, sets a session cookie and
//! redirects back, the way Earthdata Login does.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const COOKIE: &str = "pool_session=ok";

#[derive(Debug, Clone)]
pub struct PoolFile {
    pub name: String,
    pub body: Vec<u8>,
    /// `YYYY-MM-DD HH:MM`, shown in the index.
    pub last_modified: String,
    /// Advertise more bytes than are sent.
    pub truncate: bool,
}

impl PoolFile {
    pub fn new(name: &str, body: Vec<u8>, last_modified: &str) -> Self {
        Self {
            name: name.to_string(),
            body,
            last_modified: last_modified.to_string(),
            truncate: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PoolOptions {
    pub user: String,
    pub password: String,
    /// e.g. `/ATLAS/ATL03.003/2018.10.14/`
    pub directory: String,
    pub files: Vec<PoolFile>,
    pub login_redirect: bool,
}

pub struct PoolServer {
    /// `http://127.0.0.1:PORT` without trailing slash.
    pub host: String,
    file_gets: Arc<AtomicUsize>,
}

impl PoolServer {
    /// Number of file (non-index) GETs answered with a body.
    pub fn file_gets(&self) -> usize {
        self.file_gets.load(Ordering::SeqCst)
    }
}

/// Start the server on an ephemeral port. It runs until the process exits.
pub fn start(opts: PoolOptions) -> PoolServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let opts = Arc::new(opts);
    let file_gets = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&file_gets);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let opts = Arc::clone(&opts);
            let counter = Arc::clone(&counter);
            thread::spawn(move || handle(stream, &opts, &counter));
        }
    });
    PoolServer {
        host: format!("http://127.0.0.1:{}", port),
        file_gets,
    }
}

struct Request {
    path: String,
    authorization: Option<String>,
    cookie: Option<String>,
}

fn handle(mut stream: TcpStream, opts: &PoolOptions, file_gets: &AtomicUsize) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(text) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let Some(req) = parse_request(text) else {
        respond(&mut stream, "405 Method Not Allowed", &[], b"");
        return;
    };

    let expected_auth = format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", opts.user, opts.password))
    );
    let authorized = req.authorization.as_deref() == Some(expected_auth.as_str());
    let has_session = req
        .cookie
        .as_deref()
        .map(|c| c.split(';').any(|kv| kv.trim() == COOKIE))
        .unwrap_or(false);

    if let Some(back) = req.path.strip_prefix("/login?back=") {
        if !authorized {
            respond(&mut stream, "401 Unauthorized", &[("WWW-Authenticate", "Basic realm=\"pool\"")], b"");
            return;
        }
        let cookie = format!("{}; Path=/", COOKIE);
        respond(
            &mut stream,
            "302 Found",
            &[("Set-Cookie", cookie.as_str()), ("Location", back)],
            b"",
        );
        return;
    }

    if opts.login_redirect {
        if !has_session {
            let location = format!("/login?back={}", req.path);
            respond(&mut stream, "302 Found", &[("Location", location.as_str())], b"");
            return;
        }
    } else if !authorized {
        respond(&mut stream, "401 Unauthorized", &[("WWW-Authenticate", "Basic realm=\"pool\"")], b"");
        return;
    }

    if req.path == "/ATLAS/" {
        respond(&mut stream, "200 OK", &[("Content-Type", "text/html")], b"<html>ATLAS</html>");
        return;
    }
    if req.path == opts.directory {
        let page = index_page(opts);
        respond(&mut stream, "200 OK", &[("Content-Type", "text/html")], page.as_bytes());
        return;
    }
    let file = req
        .path
        .strip_prefix(opts.directory.as_str())
        .and_then(|name| opts.files.iter().find(|f| f.name == name));
    match file {
        Some(f) if f.truncate => {
            let advertised = (f.body.len() + 100).to_string();
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                advertised
            );
            let _ = stream.write_all(head.as_bytes());
            let _ = stream.write_all(&f.body);
        }
        Some(f) => {
            file_gets.fetch_add(1, Ordering::SeqCst);
            respond(&mut stream, "200 OK", &[("Content-Type", "application/x-hdf5")], &f.body);
        }
        None => respond(&mut stream, "404 Not Found", &[], b"not found"),
    }
}

fn respond(stream: &mut TcpStream, status: &str, headers: &[(&str, &str)], body: &[u8]) {
    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for (k, v) in headers {
        head.push_str(&format!("{}: {}\r\n", k, v));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}

fn index_page(opts: &PoolOptions) -> String {
    let mut page = format!(
        "<html><head><title>Index of {0}</title></head><body><h1>Index of {0}</h1>\n<table id=\"indexlist\">\n",
        opts.directory.trim_end_matches('/')
    );
    page.push_str("<tr class=\"indexhead\"><th class=\"indexcolname\"><a href=\"?C=N;O=A\">Name</a></th></tr>\n");
    page.push_str("<tr class=\"parent\"><td class=\"indexcolname\"><a href=\"../\">Parent Directory</a></td><td class=\"indexcollastmod\">&nbsp;</td></tr>\n");
    for f in &opts.files {
        page.push_str(&format!(
            "<tr><td class=\"indexcolicon\"><img src=\"/icons/unknown.gif\" alt=\"[   ]\"></td><td class=\"indexcolname\"><a href=\"{0}\">{0}</a></td><td class=\"indexcollastmod\">{1}  </td><td class=\"indexcolsize\">{2}</td></tr>\n",
            f.name,
            f.last_modified,
            f.body.len()
        ));
    }
    page.push_str("</table></body></html>\n");
    page
}

fn parse_request(request: &str) -> Option<Request> {
    let mut lines = request.lines();
    let mut first = lines.next()?.split_whitespace();
    if !first.next()?.eq_ignore_ascii_case("GET") {
        return None;
    }
    let path = first.next()?.to_string();
    let mut req = Request {
        path,
        authorization: None,
        cookie: None,
    };
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim().to_string();
            if name.eq_ignore_ascii_case("authorization") {
                req.authorization = Some(value);
            } else if name.eq_ignore_ascii_case("cookie") {
                req.cookie = Some(value);
            }
        }
    }
    Some(req)
}
