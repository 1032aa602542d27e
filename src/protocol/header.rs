//! Header definitions
//!
//! Typed `Name: value` lines shared by requests and responses.
//!
//! ## Registry
//! - Compress:       `zlib` (marker)
//! - Content-length: body length in bytes
//! - Message-class:  `spam` | `ham`
//! - Remove / Set / DidRemove / DidSet: `local`, `remote` or both
//! - Spam:           `True ; 15.0 / 5.0`
//! - User:           user name the scan runs as
//!
//! Any other name is kept as an extension header with its raw value.

use std::fmt;
use std::str::Utf8Error;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Wire value of the Compress header
pub const COMPRESS_ZLIB: &str = "zlib";

/// Errors raised while decoding a single header line
#[derive(Debug, Error)]
pub enum HeaderError {
    #[error("invalid utf8 encoding: {0}")]
    InvalidUtf8(#[from] Utf8Error),

    #[error("no delimiter ':' found")]
    NoDelimiter,

    #[error("missing header name")]
    MissingName,

    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Value of the Message-class header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageClass {
    Spam,
    Ham,
}

impl MessageClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageClass::Spam => "spam",
            MessageClass::Ham => "ham",
        }
    }
}

/// Databases targeted by Set/Remove and reported by DidSet/DidRemove
///
/// Always names at least one database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actions {
    local: bool,
    remote: bool,
}

impl Actions {
    pub fn local() -> Self {
        Self { local: true, remote: false }
    }

    pub fn remote() -> Self {
        Self { local: false, remote: true }
    }

    pub fn both() -> Self {
        Self { local: true, remote: true }
    }

    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn is_remote(&self) -> bool {
        self.remote
    }

    fn parse(name: &'static str, value: &str) -> Result<Self, HeaderError> {
        let invalid = || HeaderError::InvalidValue {
            name,
            value: value.to_string(),
        };

        let (mut local, mut remote) = (false, false);
        for token in value.split(',').map(str::trim) {
            if token.eq_ignore_ascii_case("local") {
                local = true;
            } else if token.eq_ignore_ascii_case("remote") {
                remote = true;
            } else {
                return Err(invalid());
            }
        }

        Ok(Actions { local, remote })
    }
}

impl fmt::Display for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.local, self.remote) {
            (true, true) => f.write_str("local, remote"),
            (true, false) => f.write_str("local"),
            // Constructors always set at least one flag
            (false, _) => f.write_str("remote"),
        }
    }
}

/// Verdict carried by the Spam header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpamStatus {
    pub is_spam: bool,
    pub score: f64,
    pub threshold: f64,
}

impl SpamStatus {
    fn parse(value: &str) -> Result<Self, HeaderError> {
        let invalid = || HeaderError::InvalidValue {
            name: names::SPAM,
            value: value.to_string(),
        };

        let (flag, scores) = value.split_once(';').ok_or_else(invalid)?;
        let (score, threshold) = scores.split_once('/').ok_or_else(invalid)?;

        let flag = flag.trim();
        let is_spam = if flag.eq_ignore_ascii_case("true") || flag.eq_ignore_ascii_case("yes") {
            true
        } else if flag.eq_ignore_ascii_case("false") || flag.eq_ignore_ascii_case("no") {
            false
        } else {
            return Err(invalid());
        };

        Ok(SpamStatus {
            is_spam,
            score: score.trim().parse().map_err(|_| invalid())?,
            threshold: threshold.trim().parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for SpamStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.is_spam { "True" } else { "False" };
        write!(f, "{} ; ", flag)?;
        write_score(f, self.score)?;
        f.write_str(" / ")?;
        write_score(f, self.threshold)
    }
}

// Whole scores keep one decimal, as spamd prints them
fn write_score(f: &mut fmt::Formatter<'_>, score: f64) -> fmt::Result {
    if score.fract() == 0.0 {
        write!(f, "{:.1}", score)
    } else {
        write!(f, "{}", score)
    }
}

/// Wire names of the recognized headers
pub mod names {
    pub const COMPRESS: &str = "Compress";
    pub const CONTENT_LENGTH: &str = "Content-length";
    pub const MESSAGE_CLASS: &str = "Message-class";
    pub const REMOVE: &str = "Remove";
    pub const SET: &str = "Set";
    pub const DID_REMOVE: &str = "DidRemove";
    pub const DID_SET: &str = "DidSet";
    pub const SPAM: &str = "Spam";
    pub const USER: &str = "User";
}

/// A single protocol header
#[derive(Debug, Clone, PartialEq)]
pub enum Header {
    /// Body is zlib-compressed
    Compress,

    /// Body length in bytes, after compression
    ContentLength(usize),

    /// Training class for TELL
    MessageClass(MessageClass),

    /// Databases to remove the message from (TELL)
    Remove(Actions),

    /// Databases to add the message to (TELL)
    Set(Actions),

    /// Databases the message was removed from
    DidRemove(Actions),

    /// Databases the message was added to
    DidSet(Actions),

    /// Scan verdict
    Spam(SpamStatus),

    /// User the scan runs as
    User(String),

    /// Any header outside the registry, passed through untouched
    Extension { name: String, value: String },
}

impl Header {
    /// Build a header from its wire name and raw value
    ///
    /// Names are matched case-sensitively; unknown names become extensions.
    pub fn from_parts(name: &str, value: &str) -> Result<Header, HeaderError> {
        let header = match name {
            names::COMPRESS => Header::Compress,
            names::CONTENT_LENGTH => {
                let length = value.parse().map_err(|_| HeaderError::InvalidValue {
                    name: names::CONTENT_LENGTH,
                    value: value.to_string(),
                })?;
                Header::ContentLength(length)
            }
            names::MESSAGE_CLASS => {
                let class = if value.eq_ignore_ascii_case("spam") {
                    MessageClass::Spam
                } else if value.eq_ignore_ascii_case("ham") {
                    MessageClass::Ham
                } else {
                    return Err(HeaderError::InvalidValue {
                        name: names::MESSAGE_CLASS,
                        value: value.to_string(),
                    });
                };
                Header::MessageClass(class)
            }
            names::REMOVE => Header::Remove(Actions::parse(names::REMOVE, value)?),
            names::SET => Header::Set(Actions::parse(names::SET, value)?),
            names::DID_REMOVE => Header::DidRemove(Actions::parse(names::DID_REMOVE, value)?),
            names::DID_SET => Header::DidSet(Actions::parse(names::DID_SET, value)?),
            names::SPAM => Header::Spam(SpamStatus::parse(value)?),
            names::USER => Header::User(value.to_string()),
            _ => Header::Extension {
                name: name.to_string(),
                value: value.to_string(),
            },
        };

        Ok(header)
    }

    /// Parse a raw `Name: value` line, with or without its line break
    pub fn parse_line(buf: &[u8]) -> Result<Header, HeaderError> {
        let line = std::str::from_utf8(buf)?;

        let p = memchr::memchr(b':', line.as_bytes()).ok_or(HeaderError::NoDelimiter)?;
        if p == 0 {
            return Err(HeaderError::MissingName);
        }

        let name = &line[..p];
        let value = line[p + 1..].trim();
        Header::from_parts(name, value)
    }

    /// Get the wire name
    pub fn name(&self) -> &str {
        match self {
            Header::Compress => names::COMPRESS,
            Header::ContentLength(_) => names::CONTENT_LENGTH,
            Header::MessageClass(_) => names::MESSAGE_CLASS,
            Header::Remove(_) => names::REMOVE,
            Header::Set(_) => names::SET,
            Header::DidRemove(_) => names::DID_REMOVE,
            Header::DidSet(_) => names::DID_SET,
            Header::Spam(_) => names::SPAM,
            Header::User(_) => names::USER,
            Header::Extension { name, .. } => name,
        }
    }

    /// Append `Name: value\r\n` to a buffer
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(self.to_string().as_bytes());
        buf.put_slice(b"\r\n");
    }

    /// Serialize to `Name: value\r\n`
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf);
        buf.freeze()
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.name())?;
        match self {
            Header::Compress => f.write_str(COMPRESS_ZLIB),
            Header::ContentLength(length) => write!(f, "{}", length),
            Header::MessageClass(class) => f.write_str(class.as_str()),
            Header::Remove(actions)
            | Header::Set(actions)
            | Header::DidRemove(actions)
            | Header::DidSet(actions) => write!(f, "{}", actions),
            Header::Spam(status) => write!(f, "{}", status),
            Header::User(user) => f.write_str(user),
            Header::Extension { value, .. } => f.write_str(value),
        }
    }
}
