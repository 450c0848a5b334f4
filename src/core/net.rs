// src/core/net.rs
// HTTP GET over plain TCP (std-only), wrapped in a retry policy.
//
// The origin server is old and flaky: it normally speaks HTTP/1.0 with
// Connection: close, but one of its mirrors answers 1.1 with chunked
// transfer. Each attempt walks an ordered list of transports; attempts are
// separated by an increasing back-off.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use crate::params::{FETCH_BACKOFF_MS, FETCH_MAX_ATTEMPTS, FETCH_TIMEOUT_SECS, HOST};

type NetResult = Result<String, Box<dyn std::error::Error>>;

#[derive(Clone, Copy)]
pub struct FetchPolicy {
    pub timeout: Duration,
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            max_attempts: FETCH_MAX_ATTEMPTS,
            backoff_ms: FETCH_BACKOFF_MS,
        }
    }
}

/// One way of getting a URL body. Tried in order, per attempt.
pub trait Transport {
    fn name(&self) -> &'static str;
    fn fetch(&self, host: &str, path: &str, timeout: Duration) -> NetResult;
}

/// HTTP/1.0 GET with Connection: close; server closes, we read to EOF.
pub struct Http10;

/// HTTP/1.1 GET; handles Transfer-Encoding: chunked responses.
pub struct Http11;

impl Transport for Http10 {
    fn name(&self) -> &'static str { "http/1.0" }

    fn fetch(&self, host: &str, path: &str, timeout: Duration) -> NetResult {
        let raw = raw_get(host, path, timeout, "1.0")?;
        let (head, body) = split_response(&raw)?;
        check_status(&head, host, path)?;
        Ok(String::from_utf8_lossy(body).into_owned())
    }
}

impl Transport for Http11 {
    fn name(&self) -> &'static str { "http/1.1" }

    fn fetch(&self, host: &str, path: &str, timeout: Duration) -> NetResult {
        let raw = raw_get(host, path, timeout, "1.1")?;
        let (head, body) = split_response(&raw)?;
        check_status(&head, host, path)?;
        if head.to_ascii_lowercase().contains("transfer-encoding: chunked") {
            Ok(String::from_utf8_lossy(&dechunk(body)?).into_owned())
        } else {
            Ok(String::from_utf8_lossy(body).into_owned())
        }
    }
}

fn raw_get(host: &str, path: &str, timeout: Duration, version: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut s = TcpStream::connect((host, 80))?;
    s.set_read_timeout(Some(timeout))?;
    s.set_write_timeout(Some(timeout))?;

    let req = format!(
        "GET {} HTTP/{}\r\nHost: {}\r\nUser-Agent: zici_scrape/0.3\r\nConnection: close\r\n\r\n",
        path, version, host
    );
    s.write_all(req.as_bytes())?;
    s.flush()?;

    let mut buf = Vec::new();
    s.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Split the raw response at the header/body boundary. The head is ASCII and
/// safe to stringify; the body stays as bytes so chunk framing (which counts
/// transfer bytes) is applied before any UTF-8 conversion.
fn split_response(resp: &[u8]) -> Result<(String, &[u8]), Box<dyn std::error::Error>> {
    let idx = resp
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .ok_or("Malformed HTTP response")?;
    let head = String::from_utf8_lossy(&resp[..idx]).into_owned();
    Ok((head, &resp[idx + 4..]))
}

fn check_status(head: &str, host: &str, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let status = head.split("\r\n").next().unwrap_or("");
    if !status.contains("200") {
        return Err(format!("HTTP error: {} {}{}", status, host, path).into());
    }
    Ok(())
}

fn find_crlf(b: &[u8]) -> Option<usize> {
    b.windows(2).position(|w| w == b"\r\n")
}

/// Decode a chunked transfer body: hex length line, CRLF, that many bytes,
/// CRLF, repeat; a zero length chunk terminates. Sizes count raw bytes, so
/// this runs on the undecoded body.
fn dechunk(body: &[u8]) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let mut out = Vec::with_capacity(body.len());
    let mut pos = 0usize;

    loop {
        let line_end = find_crlf(&body[pos..]).ok_or("chunked: missing size line")? + pos;
        let size_str = std::str::from_utf8(&body[pos..line_end])
            .map_err(|_| "chunked: non-ascii size line")?
            .trim();
        let size = usize::from_str_radix(size_str, 16)
            .map_err(|_| format!("chunked: bad size line '{}'", size_str))?;
        if size == 0 { break; }
        let data_start = line_end + 2;
        let data_end = data_start + size;
        if data_end > body.len() {
            return Err("chunked: truncated chunk".into());
        }
        out.extend_from_slice(&body[data_start..data_end]);
        pos = data_end + 2; // skip trailing CRLF
        if pos > body.len() {
            return Err("chunked: truncated trailer".into());
        }
    }
    Ok(out)
}

/// Fetch `path` from the configured host, trying every transport per attempt,
/// sleeping `attempt * backoff_ms` between attempts.
pub fn fetch_with_policy(path: &str, policy: &FetchPolicy) -> NetResult {
    let transports: [&dyn Transport; 2] = [&Http10, &Http11];
    let mut last_err: Option<Box<dyn std::error::Error>> = None;

    for attempt in 1..=policy.max_attempts {
        for t in transports {
            match t.fetch(HOST, path, policy.timeout) {
                Ok(body) => {
                    if attempt > 1 {
                        logf!("Fetch ok after retry: {} via {} (attempt {})", path, t.name(), attempt);
                    }
                    return Ok(body);
                }
                Err(e) => {
                    logd!("Fetch failed: {} via {}: {}", path, t.name(), e);
                    last_err = Some(e);
                }
            }
        }
        if attempt < policy.max_attempts {
            thread::sleep(Duration::from_millis(policy.backoff_ms * attempt as u64));
        }
    }
    Err(last_err.unwrap_or_else(|| "no transport available".into()))
}

/// Convenience wrapper with the default policy.
pub fn http_get(path: &str) -> NetResult {
    fetch_with_policy(path, &FetchPolicy::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dechunk_reassembles_body() {
        let body = b"5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n";
        assert_eq!(dechunk(body).unwrap(), b"hello world");
    }

    #[test]
    fn dechunk_sizes_count_bytes_not_chars() {
        // 水 is three bytes; a correctly framed multibyte chunk decodes intact
        let body = "6\r\n水水\r\n0\r\n\r\n".as_bytes();
        assert_eq!(String::from_utf8_lossy(&dechunk(body).unwrap()), "水水");
    }

    #[test]
    fn dechunk_misframed_multibyte_is_an_error() {
        // size line says 1 byte but the chunk holds multibyte text; the
        // trailer skip lands mid-character and must surface as Err, not panic
        assert!(dechunk("1\r\néé\r\n0\r\n\r\n".as_bytes()).is_err());
    }

    #[test]
    fn dechunk_rejects_bad_size() {
        assert!(dechunk(b"zz\r\nhello\r\n0\r\n\r\n").is_err());
    }

    #[test]
    fn split_response_finds_body() {
        let (head, body) = split_response(b"HTTP/1.0 200 OK\r\nX: y\r\n\r\nBODY").unwrap();
        assert!(head.starts_with("HTTP/1.0 200"));
        assert_eq!(body, b"BODY");
    }

    #[test]
    fn status_check_rejects_404() {
        assert!(check_status("HTTP/1.0 404 Not Found", "h", "/p").is_err());
        assert!(check_status("HTTP/1.1 200 OK", "h", "/p").is_ok());
    }
}
