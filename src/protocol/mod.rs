//! Protocol Module
//!
//! Defines the spamd wire protocol spoken by the client.
//!
//! ## Protocol Format (SPAMC/1.5 - Line-oriented text, binary-safe body)
//!
//! ### Request Format
//! ```text
//! VERB SPAMC/1.5\r\n
//! Name: value\r\n ...
//! \r\n
//! [body]
//! ```
//!
//! ### Verbs
//! - CHECK, HEADERS, PROCESS, REPORT, REPORT_IFSPAM, SYMBOLS, TELL - Body: message
//! - PING - Body: empty
//!
//! ### Response Format
//! ```text
//! SPAMD/1.5 <code> <message>\r\n
//! Name: value\r\n ...
//! \r\n
//! [body]
//! ```
//!
//! ### Status Codes
//! - 0: EX_OK
//! - 64-79: sysexits.h failures, each decoded as its own error kind

mod verb;
mod header;
mod request;
mod response;
mod codec;

pub use verb::Verb;
pub use header::{names, Actions, Header, HeaderError, MessageClass, SpamStatus, COMPRESS_ZLIB};
pub use request::Request;
pub use response::{Response, Status, StatusEntry, STATUS_TABLE};
pub use codec::{
    encode_request, decode_request,
    encode_response, decode_response, decode_response_limited,
    write_request, read_response,
    deflate, inflate,
    MAX_RESPONSE_SIZE,
};

/// Protocol token written on every request line
pub const SPAMC_PROTOCOL: &str = "SPAMC/1.5";

/// Protocol version written on encoded responses
pub const SPAMD_VERSION: &str = "1.5";
