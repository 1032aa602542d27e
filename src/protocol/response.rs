//! Response definitions
//!
//! Represents responses from spamd and the status code registry.

use bytes::Bytes;

use crate::error::ErrorKind;
use super::header::{names, Header, SpamStatus};

/// Response status codes, following sysexits.h
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    Usage = 64,
    DataErr = 65,
    NoInput = 66,
    NoUser = 67,
    NoHost = 68,
    Unavailable = 69,
    Software = 70,
    OsErr = 71,
    OsFile = 72,
    CantCreate = 73,
    IoErr = 74,
    TempFail = 75,
    Protocol = 76,
    NoPerm = 77,
    Config = 78,
    Timeout = 79,
}

/// One row of the status registry
#[derive(Debug)]
pub struct StatusEntry {
    pub status: Status,
    pub name: &'static str,
    pub kind: Option<ErrorKind>,
    pub description: &'static str,
}

const fn entry(
    status: Status,
    name: &'static str,
    kind: Option<ErrorKind>,
    description: &'static str,
) -> StatusEntry {
    StatusEntry { status, name, kind, description }
}

/// Status registry: EX_OK followed by codes 64 through 79, in order
pub static STATUS_TABLE: [StatusEntry; 17] = [
    entry(Status::Ok, "EX_OK", None, "No problems"),
    entry(Status::Usage, "EX_USAGE", Some(ErrorKind::Usage), "Command line usage error"),
    entry(Status::DataErr, "EX_DATAERR", Some(ErrorKind::DataErr), "Data format error"),
    entry(Status::NoInput, "EX_NOINPUT", Some(ErrorKind::NoInput), "Cannot open input"),
    entry(Status::NoUser, "EX_NOUSER", Some(ErrorKind::NoUser), "Addressee unknown"),
    entry(Status::NoHost, "EX_NOHOST", Some(ErrorKind::NoHost), "Host name unknown"),
    entry(Status::Unavailable, "EX_UNAVAILABLE", Some(ErrorKind::Unavailable), "Service unavailable"),
    entry(Status::Software, "EX_SOFTWARE", Some(ErrorKind::Software), "Internal software error"),
    entry(Status::OsErr, "EX_OSERR", Some(ErrorKind::OsErr), "System error (e.g., can't fork)"),
    entry(Status::OsFile, "EX_OSFILE", Some(ErrorKind::OsFile), "Critical OS file missing"),
    entry(Status::CantCreate, "EX_CANTCREAT", Some(ErrorKind::CantCreate), "Can't create (user) output file"),
    entry(Status::IoErr, "EX_IOERR", Some(ErrorKind::IoErr), "Input/output error"),
    entry(Status::TempFail, "EX_TEMPFAIL", Some(ErrorKind::TempFail), "Temp failure; user is invited to retry"),
    entry(Status::Protocol, "EX_PROTOCOL", Some(ErrorKind::Protocol), "Remote error in protocol"),
    entry(Status::NoPerm, "EX_NOPERM", Some(ErrorKind::NoPerm), "Permission denied"),
    entry(Status::Config, "EX_CONFIG", Some(ErrorKind::Config), "Configuration error"),
    entry(Status::Timeout, "EX_TIMEOUT", Some(ErrorKind::Timeout), "Read timeout"),
];

impl Status {
    /// Look up a wire status code; codes 1-63 and above 79 are unknown
    pub fn from_code(code: u32) -> Option<Status> {
        STATUS_TABLE
            .iter()
            .find(|entry| entry.status.code() as u32 == code)
            .map(|entry| entry.status)
    }

    /// Get the wire status code
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Get the registry row for this status
    pub fn entry(&self) -> &'static StatusEntry {
        match self {
            Status::Ok => &STATUS_TABLE[0],
            other => &STATUS_TABLE[(other.code() - 63) as usize],
        }
    }

    /// Symbolic name, e.g. `EX_PROTOCOL`
    pub fn name(&self) -> &'static str {
        self.entry().name
    }

    pub fn description(&self) -> &'static str {
        self.entry().description
    }

    /// Error kind raised for this status, `None` for EX_OK
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.entry().kind
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Status::Ok)
    }
}

/// A successful response from spamd
///
/// Error statuses never produce a `Response`; decoding fails instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Protocol version from the status line, e.g. `1.5`
    pub version: String,

    /// Status code
    pub status: Status,

    /// Message accompanying the status code
    pub message: String,

    /// Headers in wire order
    pub headers: Vec<Header>,

    /// Body, already decompressed; `None` when empty
    pub body: Option<Bytes>,
}

impl Response {
    /// Create an EX_OK response with the given message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            version: super::SPAMD_VERSION.to_string(),
            status: Status::Ok,
            message: message.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Append a header
    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.push(header);
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Last header with the given wire name
    pub fn header(&self, name: &str) -> Option<&Header> {
        self.headers.iter().rev().find(|header| header.name() == name)
    }

    /// Value of the last Content-length header
    pub fn content_length(&self) -> Option<usize> {
        match self.header(names::CONTENT_LENGTH) {
            Some(Header::ContentLength(length)) => Some(*length),
            _ => None,
        }
    }

    /// Verdict from the last Spam header
    pub fn spam(&self) -> Option<SpamStatus> {
        match self.header(names::SPAM) {
            Some(Header::Spam(status)) => Some(*status),
            _ => None,
        }
    }

    /// Whether the body was sent compressed
    pub fn is_compressed(&self) -> bool {
        self.headers.iter().any(|header| matches!(header, Header::Compress))
    }

    /// Raw body bytes, empty if there is no body
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or(&[])
    }

    /// Body as text, replacing invalid UTF-8
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(self.body()).into_owned()
    }
}
