//! # spamc
//!
//! Client-side codec for the SpamAssassin spamd protocol:
//! - Request composition with optional zlib body compression
//! - Response parsing with status-code-to-error mapping
//! - Typed headers (Content-length, Compress, User, Spam, TELL headers)
//! - No I/O of its own; callers own the connection
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Caller / Transport (socket)                  │
//! └──────────────┬──────────────────────────────▲───────────────┘
//!                │ Request                      │ Response / SpamdError
//! ┌──────────────▼──────────────┐ ┌─────────────┴───────────────┐
//! │       encode_request        │ │       decode_response       │
//! │ (Compress + Content-length) │ │ (status table, inflate)     │
//! └──────────────┬──────────────┘ └─────────────▲───────────────┘
//!                │                              │
//!                └──────────┐        ┌──────────┘
//!                           ▼        │
//!                    ┌─────────────────────┐
//!                    │    Header model     │
//!                    │ (Name: value\r\n)   │
//!                    └─────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Result, SpamdError};
pub use config::ClientConfig;
pub use protocol::{Header, Request, Response, Status, Verb};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of spamc
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
