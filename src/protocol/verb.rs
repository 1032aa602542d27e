//! Verb definitions
//!
//! The command names a client may put on a request line.

use std::fmt;
use std::str::FromStr;

use crate::error::SpamdError;

/// Request verbs understood by spamd
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    /// Check a message, reply with the Spam header only
    Check,
    /// Check a message, reply with the rewritten headers
    Headers,
    /// Health check
    Ping,
    /// Check a message, reply with the rewritten message
    Process,
    /// Check a message, reply with the spam report
    Report,
    /// Like REPORT, but only reports spam
    ReportIfSpam,
    /// Check a message, reply with the matched rule names
    Symbols,
    /// Train the learner or report/revoke a message
    Tell,
}

impl Verb {
    /// All verbs, in wire-name order
    pub const ALL: [Verb; 8] = [
        Verb::Check,
        Verb::Headers,
        Verb::Ping,
        Verb::Process,
        Verb::Report,
        Verb::ReportIfSpam,
        Verb::Symbols,
        Verb::Tell,
    ];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Check => "CHECK",
            Verb::Headers => "HEADERS",
            Verb::Ping => "PING",
            Verb::Process => "PROCESS",
            Verb::Report => "REPORT",
            Verb::ReportIfSpam => "REPORT_IFSPAM",
            Verb::Symbols => "SYMBOLS",
            Verb::Tell => "TELL",
        }
    }

    /// Whether a request with this verb carries a message body
    pub fn requires_body(&self) -> bool {
        !matches!(self, Verb::Ping)
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = SpamdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .iter()
            .copied()
            .find(|verb| verb.as_str() == s)
            .ok_or_else(|| SpamdError::BadRequest(format!("Unknown verb: {}", s)))
    }
}
