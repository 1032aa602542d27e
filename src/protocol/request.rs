//! Request definitions
//!
//! Represents a request to spamd.

use bytes::Bytes;

use super::{Header, Verb};

/// A request to send to spamd
///
/// Encoding never mutates the request: the Compress and Content-length
/// headers are written per encoding, never stored in `headers`.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Command verb
    pub verb: Verb,

    /// Message body (absent for PING)
    pub body: Option<Bytes>,

    /// Caller headers, encoded in insertion order
    pub headers: Vec<Header>,

    /// Deflate the body before sending
    pub compress: bool,
}

impl Request {
    /// Create a request with no body or headers
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            body: None,
            headers: Vec::new(),
            compress: false,
        }
    }

    /// Set the message body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a header
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    /// Set the compression flag
    pub fn compressed(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Body bytes, if non-empty
    ///
    /// An empty body is encoded exactly like a missing one.
    pub fn payload(&self) -> Option<&Bytes> {
        self.body.as_ref().filter(|body| !body.is_empty())
    }

    pub fn ping() -> Self {
        Self::new(Verb::Ping)
    }

    pub fn check(message: impl Into<Bytes>) -> Self {
        Self::new(Verb::Check).with_body(message)
    }

    pub fn headers(message: impl Into<Bytes>) -> Self {
        Self::new(Verb::Headers).with_body(message)
    }

    pub fn process(message: impl Into<Bytes>) -> Self {
        Self::new(Verb::Process).with_body(message)
    }

    pub fn report(message: impl Into<Bytes>) -> Self {
        Self::new(Verb::Report).with_body(message)
    }

    pub fn report_if_spam(message: impl Into<Bytes>) -> Self {
        Self::new(Verb::ReportIfSpam).with_body(message)
    }

    pub fn symbols(message: impl Into<Bytes>) -> Self {
        Self::new(Verb::Symbols).with_body(message)
    }

    /// TELL request; add Message-class/Set/Remove with `with_header`
    pub fn tell(message: impl Into<Bytes>) -> Self {
        Self::new(Verb::Tell).with_body(message)
    }
}
