//! A single blocking POST over a raw TCP connection.
//!
//! Without a configured timeout the read loop blocks until the server closes
//! the connection; a stalled compiler stalls the caller indefinitely.

use std::io::{Read, Write};
use std::net::TcpStream;

use ccgate_config::RemoteEndpoint;
use tracing::{debug, warn};

use crate::chunked::{find, unchunk};
use crate::error::TransportError;
use crate::form::FormBody;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// A response from the compiler, with any chunked framing already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code from the status line, if one could be parsed.
    pub status: Option<u16>,
    /// The raw header block, status line included.
    pub headers: String,
    /// The decoded body.
    pub body: Vec<u8>,
}

/// POSTs `form` to the endpoint and returns the decoded response.
///
/// The request carries `Host`, `Referer` (empty when `referer` is `None`),
/// `Content-Type`, `Content-Length` and `Connection: close`. The whole
/// response is read until the server closes the stream.
pub fn send(
    endpoint: &RemoteEndpoint,
    form: &FormBody,
    referer: Option<&str>,
) -> Result<HttpResponse, TransportError> {
    let addr = format!("{}:{}", endpoint.host, endpoint.port);
    let mut stream =
        TcpStream::connect((endpoint.host.as_str(), endpoint.port)).map_err(|e| {
            TransportError::Connect {
                addr: addr.clone(),
                source: e,
            }
        })?;

    let io_err = |e: std::io::Error| TransportError::Io {
        addr: addr.clone(),
        source: e,
    };

    if let Some(timeout) = endpoint.timeout() {
        stream.set_read_timeout(Some(timeout)).map_err(io_err)?;
        stream.set_write_timeout(Some(timeout)).map_err(io_err)?;
    }

    let body = form.encode();
    let request = format_request(&endpoint.host, &endpoint.path, &body, referer.unwrap_or(""));
    debug!(addr = %addr, path = %endpoint.path, bytes = body.len(), "sending compile request");

    stream.write_all(request.as_bytes()).map_err(io_err)?;
    stream.flush().map_err(io_err)?;

    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).map_err(io_err)?;
    debug!(addr = %addr, bytes = raw.len(), "received compile response");

    Ok(split_response(&raw))
}

/// Formats the request head and body.
fn format_request(host: &str, path: &str, body: &str, referer: &str) -> String {
    format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Referer: {referer}\r\n\
         Content-Type: application/x-www-form-urlencoded\r\n\
         Content-Length: {len}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        len = body.len()
    )
}

/// Splits a raw response at the first blank line and decodes the body.
///
/// A response with no blank line is treated as all headers and no body.
pub fn split_response(raw: &[u8]) -> HttpResponse {
    let (head, body) = match find(raw, HEADER_TERMINATOR) {
        Some(end) => (&raw[..end], &raw[end + HEADER_TERMINATOR.len()..]),
        None => {
            warn!("response has no header terminator; treating body as empty");
            (raw, &raw[raw.len()..])
        }
    };

    let headers = String::from_utf8_lossy(head).into_owned();
    let status = parse_status(&headers);
    let body = if is_chunked(&headers) {
        unchunk(body)
    } else {
        body.to_vec()
    };

    if let Some(code) = status {
        if code != 200 {
            warn!(status = code, "compiler responded with non-200 status");
        }
    }

    HttpResponse {
        status,
        headers,
        body,
    }
}

/// Returns `true` if any `Transfer-Encoding` header in the block lists
/// `chunked`. Names and values are matched case-insensitively.
fn is_chunked(headers: &str) -> bool {
    headers.lines().any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("transfer-encoding")
                && value.to_ascii_lowercase().contains("chunked")
        })
    })
}

/// Reads the status code from a `HTTP/1.x NNN Reason` status line.
fn parse_status(headers: &str) -> Option<u16> {
    let line = headers.lines().next()?;
    let mut parts = line.split_whitespace();
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}
