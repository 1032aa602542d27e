//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! VERB SPAMC/1.5\r\n
//! Header-Name: value\r\n     (zero or more)
//! \r\n
//! body                       (optional, zlib-deflated if Compress is set)
//! ```
//!
//! ### Response Format
//! ```text
//! SPAMD/1.5 <status> <message>\r\n
//! Header-Name: value\r\n     (zero or more)
//! \r\n
//! body                       (optional)
//! ```

use std::io::{Read, Write};
use std::sync::LazyLock;

use bytes::{BufMut, Bytes, BytesMut};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use memchr::memmem;
use regex::Regex;

use crate::error::{Result, SpamdError};
use super::{Header, Request, Response, Status, Verb, SPAMC_PROTOCOL};

/// Maximum response size accepted by `read_response` by default (16 MB)
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

const CRLF: &[u8] = b"\r\n";
const BLANK_LINE: &[u8] = b"\r\n\r\n";

static STATUS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*SPAMD/(?P<version>\d+\.\d+)\s+(?P<status>\d+)\s+(?P<message>[^\r\n]*)")
        .expect("status line pattern is valid")
});

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request to bytes
///
/// Caller headers are written first, then Compress (only when a body is
/// compressed) and Content-length computed over the bytes actually sent.
pub fn encode_request(request: &Request) -> Bytes {
    let mut message = BytesMut::new();
    message.put_slice(request.verb.as_str().as_bytes());
    message.put_u8(b' ');
    message.put_slice(SPAMC_PROTOCOL.as_bytes());
    message.put_slice(CRLF);

    for header in &request.headers {
        header.encode(&mut message);
    }

    match request.payload() {
        Some(body) => {
            let body = if request.compress {
                Header::Compress.encode(&mut message);
                deflate(body)
            } else {
                body.clone()
            };
            Header::ContentLength(body.len()).encode(&mut message);
            message.put_slice(CRLF);
            message.put_slice(&body);
        }
        None => {
            Header::ContentLength(0).encode(&mut message);
            message.put_slice(CRLF);
        }
    }

    tracing::trace!(verb = %request.verb, len = message.len(), "Encoded request");
    message.freeze()
}

/// Decode a request from bytes
///
/// The Content-length and Compress headers written by `encode_request` are
/// consumed: the body is inflated and `compress` set instead.
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let (head, raw_body) = split_message(bytes);
    let mut lines = split_lines(head);

    let request_line = std::str::from_utf8(lines.next().unwrap_or_default())
        .map_err(|e| SpamdError::BadRequest(format!("Request line is not UTF-8: {}", e)))?;
    let (verb, protocol) = request_line
        .trim()
        .split_once(' ')
        .ok_or_else(|| SpamdError::BadRequest(format!("Malformed request line: {:?}", request_line)))?;
    if !protocol.trim().starts_with("SPAMC/") {
        return Err(SpamdError::BadRequest(format!(
            "Unknown protocol: {:?}",
            protocol
        )));
    }
    let verb: Verb = verb.parse()?;

    let mut compress = false;
    let mut headers = Vec::new();
    for line in lines.filter(|line| !line.is_empty()) {
        let header = Header::parse_line(line)
            .map_err(|e| SpamdError::BadRequest(format!("Invalid header line: {}", e)))?;
        match header {
            Header::Compress => compress = true,
            Header::ContentLength(_) => {}
            other => headers.push(other),
        }
    }

    let body = decode_body(raw_body, compress, MAX_RESPONSE_SIZE)?;

    Ok(Request {
        verb,
        body,
        headers,
        compress,
    })
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Content-length is computed from the body; a Compress header in the
/// response deflates the body first.
pub fn encode_response(response: &Response) -> Bytes {
    let mut message = BytesMut::new();
    let status_line = format!(
        "SPAMD/{} {} {}\r\n",
        response.version,
        response.status.code(),
        response.message
    );
    message.put_slice(status_line.as_bytes());

    for header in &response.headers {
        if !matches!(header, Header::ContentLength(_)) {
            header.encode(&mut message);
        }
    }

    let body = match response.body.as_ref().filter(|body| !body.is_empty()) {
        Some(body) if response.is_compressed() => Some(deflate(body)),
        Some(body) => Some(body.clone()),
        None => None,
    };

    if let Some(body) = &body {
        Header::ContentLength(body.len()).encode(&mut message);
    }
    message.put_slice(CRLF);
    if let Some(body) = &body {
        message.put_slice(body);
    }

    message.freeze()
}

/// Decode a response from bytes
///
/// Fails with `BadResponse` on a malformed status line, unknown status code
/// or malformed header, and with `Status` for any status other than EX_OK.
/// A compressed body may inflate to at most `MAX_RESPONSE_SIZE` bytes.
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    decode_response_limited(bytes, MAX_RESPONSE_SIZE)
}

/// Decode a response, inflating a compressed body to at most `max_size` bytes
pub fn decode_response_limited(bytes: &[u8], max_size: usize) -> Result<Response> {
    let (head, raw_body) = split_message(bytes);
    let mut lines = split_lines(head);

    let status_line = std::str::from_utf8(lines.next().unwrap_or_default())
        .map_err(|e| SpamdError::BadResponse(format!("Status line is not UTF-8: {}", e)))?;
    let captures = STATUS_LINE.captures(status_line).ok_or_else(|| {
        tracing::debug!("Rejected status line: {:?}", status_line);
        SpamdError::BadResponse(format!("Not a SPAMD status line: {:?}", status_line))
    })?;

    let version = captures["version"].to_string();
    let message = captures["message"].trim().to_string();
    let code = &captures["status"];
    let status = code
        .parse::<u32>()
        .ok()
        .and_then(Status::from_code)
        .ok_or_else(|| SpamdError::BadResponse(format!("Unknown status code: {}", code)))?;

    if !status.is_ok() {
        tracing::debug!(code = status.code(), "Server returned {}: {}", status.name(), message);
        return Err(SpamdError::Status { status, message });
    }

    let headers = lines
        .filter(|line| !line.is_empty())
        .map(|line| {
            Header::parse_line(line)
                .map_err(|e| SpamdError::BadResponse(format!("Invalid header line: {}", e)))
        })
        .collect::<Result<Vec<_>>>()?;

    let compressed = headers.iter().any(|header| matches!(header, Header::Compress));
    let body = decode_body(raw_body, compressed, max_size)?;

    let response = Response {
        version,
        status,
        message,
        headers,
        body,
    };

    if let Some(expected) = response.content_length() {
        if expected != raw_body.map_or(0, <[u8]>::len) {
            tracing::debug!(
                expected,
                received = raw_body.map_or(0, <[u8]>::len),
                "Content-length does not match body"
            );
        }
    }

    tracing::trace!(
        version = %response.version,
        headers = response.headers.len(),
        body = response.body().len(),
        "Decoded response"
    );
    Ok(response)
}

// =============================================================================
// Body Compression
// =============================================================================

/// Deflate a body with zlib framing
pub fn deflate(body: &[u8]) -> Bytes {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(body.len() / 2), Compression::default());
    encoder
        .write_all(body)
        .expect("zlib into Vec cannot fail");
    encoder
        .finish()
        .expect("zlib into Vec cannot fail")
        .into()
}

/// Inflate a zlib-framed body of at most `max_size` bytes
pub fn inflate(body: &[u8], max_size: usize) -> Result<Bytes> {
    let mut inflated = Vec::new();
    ZlibDecoder::new(body)
        .take(max_size as u64 + 1)
        .read_to_end(&mut inflated)
        .map_err(|e| SpamdError::Decompress(e.to_string()))?;

    if inflated.len() > max_size {
        tracing::debug!(compressed = body.len(), max_size, "Rejected oversized body");
        return Err(SpamdError::Decompress(format!(
            "Inflated body too large: more than {} bytes",
            max_size
        )));
    }

    Ok(inflated.into())
}

// =============================================================================
// Framing helpers
// =============================================================================

/// Split a message into head and body at the first blank line
fn split_message(bytes: &[u8]) -> (&[u8], Option<&[u8]>) {
    match memmem::find(bytes, BLANK_LINE) {
        Some(pos) => (&bytes[..pos], Some(&bytes[pos + BLANK_LINE.len()..])),
        None => (bytes, None),
    }
}

/// Split a head into its CRLF-separated lines
fn split_lines(head: &[u8]) -> std::vec::IntoIter<&[u8]> {
    let mut lines = Vec::new();
    let mut start = 0;
    for pos in memmem::find_iter(head, CRLF) {
        lines.push(&head[start..pos]);
        start = pos + CRLF.len();
    }
    lines.push(&head[start..]);
    lines.into_iter()
}

fn decode_body(raw_body: Option<&[u8]>, compressed: bool, max_size: usize) -> Result<Option<Bytes>> {
    match raw_body {
        Some(raw) if !raw.is_empty() => {
            let body = if compressed {
                inflate(raw, max_size)?
            } else {
                Bytes::copy_from_slice(raw)
            };
            Ok(Some(body))
        }
        _ => Ok(None),
    }
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a request to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let bytes = encode_request(request);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
///
/// spamd closes its side after replying, so this reads until EOF. More than
/// `max_size` bytes on the wire, or a body inflating past `max_size`, is
/// rejected.
pub fn read_response<R: Read>(reader: &mut R, max_size: usize) -> Result<Response> {
    let mut buffer = Vec::new();
    reader
        .by_ref()
        .take(max_size as u64 + 1)
        .read_to_end(&mut buffer)?;

    if buffer.len() > max_size {
        return Err(SpamdError::BadResponse(format!(
            "Response too large: more than {} bytes",
            max_size
        )));
    }

    decode_response_limited(&buffer, max_size)
}
