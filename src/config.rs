//! Configuration for spamc
//!
//! Client options applied to every request built from a config.

use std::io::{Read, Write};

use bytes::Bytes;

use crate::error::Result;
use crate::protocol::{self, Header, Request, Response, Verb, MAX_RESPONSE_SIZE};

/// Client-side options shared by all requests
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -------------------------------------------------------------------------
    // Request Configuration
    // -------------------------------------------------------------------------
    /// User to scan as, sent in a `User` header
    pub user: Option<String>,

    /// Compress request bodies with zlib
    pub compress: bool,

    // -------------------------------------------------------------------------
    // Response Configuration
    // -------------------------------------------------------------------------
    /// Largest response accepted by `exchange`, on the wire and after
    /// inflating a compressed body (in bytes)
    pub max_response_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user: None,
            compress: false,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Build a request carrying the configured User header and compression
    ///
    /// PING never carries a body, so `body` is dropped for it.
    pub fn request(&self, verb: Verb, body: Option<Bytes>) -> Request {
        let mut request = Request::new(verb).compressed(self.compress);
        if verb.requires_body() {
            request.body = body;
        }
        if let Some(user) = &self.user {
            request.headers.push(Header::User(user.clone()));
        }
        request
    }

    /// Write a request to `stream` and read the reply until EOF
    ///
    /// The caller owns the connection; a fresh one is needed per exchange.
    pub fn exchange<S: Read + Write>(&self, stream: &mut S, request: &Request) -> Result<Response> {
        protocol::write_request(stream, request)?;
        protocol::read_response(stream, self.max_response_size)
    }
}

/// Builder for ClientConfig
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the user to scan as
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = Some(user.into());
        self
    }

    /// Enable or disable request body compression
    pub fn compress(mut self, compress: bool) -> Self {
        self.config.compress = compress;
        self
    }

    /// Set the maximum response size (in bytes)
    pub fn max_response_size(mut self, size: usize) -> Self {
        self.config.max_response_size = size;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}
