//! Minimal blocking HTTP/1.1 server plumbing over any Read + Write stream.
//!
//! Replaces a server framework with ~150 lines of httparse-based parsing.
//! The daemon serves TCP only; staying generic over Read + Write keeps the
//! parser testable on in-memory streams.
//!
//! Intentionally limited surface:
//! - One request per connection (no keep-alive)
//! - No chunked transfer encoding (rejected)
//! - POST requires Content-Length
//! - Header cap: 32 KiB, body cap: 1 MiB, both enforced before routing

use std::io::{Read, Write};

/// Maximum header section size (32 KiB)
const MAX_HEADER_SIZE: usize = 32 * 1024;

/// Maximum request body size (1 MiB)
const MAX_BODY_SIZE: usize = 1_048_576;

/// Parsed HTTP request (transport-free). `path` keeps the raw query string;
/// routing splits it off.
#[derive(Debug)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    // No route inspects headers today; parsing still captures them
    #[allow(dead_code)]
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// HTTP response to write back
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Add a header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Reason phrase for status codes this daemon can emit. Proxied platform
/// statuses may fall outside the table.
fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        _ => "Unknown",
    }
}

/// Byte offset just past the `\r\n\r\n` header terminator, if present.
fn find_header_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n").map(|i| i + 4)
}

/// Read and parse one HTTP request from a stream.
///
/// Returns None if the connection closed before any request arrived.
/// Returns Some(Err) for malformed or oversized requests (caller writes an
/// error response).
pub fn read_request(stream: &mut impl Read) -> Option<Result<HttpRequest, String>> {
    let mut buf = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];

    // Accumulate until the blank line ending the header section. A read may
    // also deliver body bytes; they stay in `buf` past `header_end`.
    let header_end = loop {
        match find_header_end(&buf) {
            Some(end) if end > MAX_HEADER_SIZE => {
                return Some(Err("Headers too large".to_string()));
            }
            Some(end) => break end,
            None if buf.len() > MAX_HEADER_SIZE => {
                return Some(Err("Headers too large".to_string()));
            }
            None => {}
        }

        match stream.read(&mut chunk) {
            Ok(0) => {
                if buf.is_empty() {
                    return None; // clean close
                }
                return Some(Err("Connection closed mid-request".to_string()));
            }
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) => {
                if buf.is_empty() {
                    return None; // read error on fresh connection = closed
                }
                return Some(Err(format!("Read error: {}", e)));
            }
        }
    };

    // Parse the header section with httparse
    let mut parsed_headers = [httparse::EMPTY_HEADER; 64];
    let mut req = httparse::Request::new(&mut parsed_headers);

    match req.parse(&buf[..header_end]) {
        Ok(httparse::Status::Complete(_)) => {}
        Ok(httparse::Status::Partial) => {
            return Some(Err("Incomplete HTTP request".to_string()));
        }
        Err(e) => {
            return Some(Err(format!("HTTP parse error: {}", e)));
        }
    }

    let method = req.method.unwrap_or("").to_string();
    let path = req.path.unwrap_or("/").to_string();

    let mut headers = Vec::new();
    let mut content_length: Option<usize> = None;
    let mut chunked = false;

    for h in req.headers.iter() {
        let name = h.name.to_string();
        let value = String::from_utf8_lossy(h.value).to_string();

        if name.eq_ignore_ascii_case("Content-Length") {
            content_length = value.trim().parse().ok();
        }
        if name.eq_ignore_ascii_case("Transfer-Encoding")
            && value.to_lowercase().contains("chunked")
        {
            chunked = true;
        }

        headers.push((name, value));
    }

    if chunked {
        return Some(Err("Chunked transfer encoding not supported".to_string()));
    }

    // Body: leftover bytes from the header reads first, then the stream
    let body = if method == "POST" {
        match content_length {
            Some(len) => {
                if len > MAX_BODY_SIZE {
                    return Some(Err("Request body too large".to_string()));
                }
                let leftover = &buf[header_end..];
                let take = leftover.len().min(len);
                let mut body = Vec::with_capacity(len);
                body.extend_from_slice(&leftover[..take]);
                if body.len() < len {
                    let mut rest = vec![0u8; len - body.len()];
                    if let Err(e) = stream.read_exact(&mut rest) {
                        return Some(Err(format!("Connection closed mid-body: {}", e)));
                    }
                    body.extend_from_slice(&rest);
                }
                body
            }
            None => {
                return Some(Err("POST requires Content-Length".to_string()));
            }
        }
    } else {
        Vec::new()
    };

    Some(Ok(HttpRequest {
        method,
        path,
        headers,
        body,
    }))
}

/// Write an HTTP response to a stream.
pub fn write_response(stream: &mut impl Write, response: &HttpResponse) {
    let status_line = format!(
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason(response.status)
    );

    let mut header_block = status_line;
    header_block.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
    header_block.push_str("Connection: close\r\n");

    for (name, value) in &response.headers {
        header_block.push_str(&format!("{}: {}\r\n", name, value));
    }
    header_block.push_str("\r\n");

    // Write header + body, ignore errors (client may have disconnected)
    let _ = stream.write_all(header_block.as_bytes());
    if !response.body.is_empty() {
        let _ = stream.write_all(&response.body);
    }
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Read adapter that yields at most `chunk` bytes per call, to exercise
    /// requests arriving in fragments.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.data.len() {
                return Ok(0);
            }
            let n = buf.len().min(self.chunk).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_parse_get_request() {
        let raw = b"GET /health HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let mut stream = Cursor::new(raw.to_vec());
        let req = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/health");
        assert!(req.body.is_empty());
        assert!(req
            .headers
            .iter()
            .any(|(name, value)| name == "Host" && value == "localhost"));
    }

    #[test]
    fn test_query_string_stays_in_path() {
        let raw = b"GET /open_in_codespaces/?project_name=my%20app HTTP/1.1\r\n\r\n";
        let mut stream = Cursor::new(raw.to_vec());
        let req = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(req.path, "/open_in_codespaces/?project_name=my%20app");
    }

    #[test]
    fn test_parse_post_with_body() {
        let body = r#"{"project_name":"demo"}"#;
        let raw = format!(
            "POST /generate_project/ HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let mut stream = Cursor::new(raw.into_bytes());
        let req = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/generate_project/");
        assert_eq!(String::from_utf8_lossy(&req.body), body);
    }

    #[test]
    fn test_parse_post_arriving_in_fragments() {
        let body = r#"{"repo_url":"https://github.com/octocat/Hello-World"}"#;
        let raw = format!(
            "POST /open_existing_repo/ HTTP/1.1\r\nContent-Length: {}\r\n\r\n{}",
            body.len(),
            body
        );
        let mut stream = Trickle {
            data: raw.into_bytes(),
            pos: 0,
            chunk: 3,
        };
        let req = read_request(&mut stream).unwrap().unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(String::from_utf8_lossy(&req.body), body);
    }

    #[test]
    fn test_reject_chunked() {
        let raw = b"POST /generate_project/ HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n";
        let mut stream = Cursor::new(raw.to_vec());
        let result = read_request(&mut stream).unwrap();
        assert!(result.unwrap_err().contains("Chunked"));
    }

    #[test]
    fn test_post_requires_content_length() {
        let raw = b"POST /generate_project/ HTTP/1.1\r\nHost: localhost\r\n\r\n";
        let mut stream = Cursor::new(raw.to_vec());
        let result = read_request(&mut stream).unwrap();
        assert!(result.unwrap_err().contains("Content-Length"));
    }

    #[test]
    fn test_declared_body_over_cap_rejected() {
        let raw = format!(
            "POST /generate_project/ HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_SIZE + 1
        );
        let mut stream = Cursor::new(raw.into_bytes());
        let result = read_request(&mut stream).unwrap();
        assert!(result.unwrap_err().contains("too large"));
    }

    #[test]
    fn test_truncated_body_is_an_error() {
        let raw = b"POST /generate_project/ HTTP/1.1\r\nContent-Length: 50\r\n\r\n{\"short\":true}";
        let mut stream = Cursor::new(raw.to_vec());
        let result = read_request(&mut stream).unwrap();
        assert!(result.unwrap_err().contains("mid-body"));
    }

    #[test]
    fn test_empty_stream_returns_none() {
        let mut stream = Cursor::new(Vec::<u8>::new());
        assert!(read_request(&mut stream).is_none());
    }

    #[test]
    fn test_headers_too_large() {
        // Terminated header section just over the 32 KiB cap
        let huge_header = format!(
            "GET / HTTP/1.1\r\nX-Big: {}\r\n\r\n",
            "A".repeat(MAX_HEADER_SIZE)
        );
        let mut stream = Cursor::new(huge_header.into_bytes());
        let result = read_request(&mut stream).unwrap();
        assert!(result.unwrap_err().contains("too large"));
    }

    #[test]
    fn test_unterminated_headers_too_large() {
        // No terminator at all - the cap still ends the read
        let endless = format!("GET / HTTP/1.1\r\nX-Big: {}", "A".repeat(MAX_HEADER_SIZE * 2));
        let mut stream = Cursor::new(endless.into_bytes());
        let result = read_request(&mut stream).unwrap();
        assert!(result.unwrap_err().contains("too large"));
    }

    #[test]
    fn test_write_response() {
        let resp = HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: b"{}".to_vec(),
        }
        .with_header("Access-Control-Allow-Origin", "*");

        let mut buf = Vec::new();
        write_response(&mut buf, &resp);
        let output = String::from_utf8_lossy(&buf);
        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(output.contains("Content-Length: 2\r\n"));
        assert!(output.contains("Connection: close\r\n"));
        assert!(output.contains("Content-Type: application/json\r\n"));
        assert!(output.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(output.ends_with("{}"));
    }

    #[test]
    fn test_status_line_for_proxied_platform_status() {
        let resp = HttpResponse {
            status: 422,
            headers: Vec::new(),
            body: Vec::new(),
        };
        let mut buf = Vec::new();
        write_response(&mut buf, &resp);
        let output = String::from_utf8_lossy(&buf);
        assert!(output.starts_with("HTTP/1.1 422 Unprocessable Entity\r\n"));
    }
}
