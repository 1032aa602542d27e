//! Request Tests
//!
//! Tests for request composition and decoding.

use spamc::protocol::{
    decode_request, encode_request, inflate, Actions, Header, MessageClass, Request, Verb,
    MAX_RESPONSE_SIZE,
};
use spamc::{ClientConfig, ErrorKind};

const MESSAGE: &[u8] = b"Subject: Test\r\n\r\nHello, world\r\n";

/// Split an encoded message into its head and body
fn split(encoded: &[u8]) -> (&[u8], &[u8]) {
    let pos = encoded
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("blank line");
    (&encoded[..pos + 2], &encoded[pos + 4..])
}

// =============================================================================
// Composition Tests
// =============================================================================

#[test]
fn test_encode_ping() {
    let encoded = encode_request(&Request::ping());
    assert_eq!(&encoded[..], b"PING SPAMC/1.5\r\nContent-length: 0\r\n\r\n");
}

#[test]
fn test_encode_check_with_body() {
    let encoded = encode_request(&Request::check(MESSAGE));

    let mut expected = format!("CHECK SPAMC/1.5\r\nContent-length: {}\r\n\r\n", MESSAGE.len()).into_bytes();
    expected.extend_from_slice(MESSAGE);
    assert_eq!(&encoded[..], &expected[..]);
}

#[test]
fn test_encode_every_verb_line() {
    for verb in Verb::ALL {
        let encoded = encode_request(&Request::new(verb).with_body(MESSAGE));
        let first_line = format!("{} SPAMC/1.5\r\n", verb.as_str());
        assert!(encoded.starts_with(first_line.as_bytes()), "verb {}", verb);
    }
}

#[test]
fn test_encode_headers_in_insertion_order() {
    let request = Request::tell(MESSAGE)
        .with_header(Header::MessageClass(MessageClass::Spam))
        .with_header(Header::Set(Actions::local()))
        .with_header(Header::User("dave".to_string()));
    let encoded = encode_request(&request);
    let (head, body) = split(&encoded);

    let expected_head = format!(
        "TELL SPAMC/1.5\r\nMessage-class: spam\r\nSet: local\r\nUser: dave\r\nContent-length: {}\r\n",
        MESSAGE.len()
    );
    assert_eq!(head, expected_head.as_bytes());
    assert_eq!(body, MESSAGE);
}

#[test]
fn test_encode_duplicate_headers_kept() {
    let request = Request::check(MESSAGE)
        .with_header(Header::User("first".to_string()))
        .with_header(Header::User("second".to_string()));
    let encoded = encode_request(&request);
    let (head, _) = split(&encoded);
    let head = std::str::from_utf8(head).unwrap();

    assert!(head.contains("User: first\r\n"));
    assert!(head.contains("User: second\r\n"));
}

#[test]
fn test_encode_empty_body_same_as_none() {
    let with_empty = encode_request(&Request::new(Verb::Check).with_body(Vec::new()));
    let without = encode_request(&Request::new(Verb::Check));
    assert_eq!(with_empty, without);
    assert!(with_empty.ends_with(b"Content-length: 0\r\n\r\n"));
}

#[test]
fn test_encode_compressed_body() {
    let request = Request::process(MESSAGE).compressed(true);
    let encoded = encode_request(&request);
    let (head, body) = split(&encoded);
    let head = std::str::from_utf8(head).unwrap();

    assert!(head.contains("Compress: zlib\r\n"));
    assert!(head.contains(&format!("Content-length: {}\r\n", body.len())));
    assert_eq!(&inflate(body, MAX_RESPONSE_SIZE).unwrap()[..], MESSAGE);
}

#[test]
fn test_encode_compressed_length_is_compressed_size() {
    let message = vec![b'a'; 10_000];
    let encoded = encode_request(&Request::check(message.clone()).compressed(true));
    let (head, body) = split(&encoded);
    let head = std::str::from_utf8(head).unwrap();

    assert!(body.len() < message.len());
    assert!(head.contains(&format!("Content-length: {}\r\n", body.len())));
    assert!(!head.contains("Content-length: 10000"));
}

#[test]
fn test_encode_compress_without_body_is_ignored() {
    let encoded = encode_request(&Request::ping().compressed(true));
    assert_eq!(&encoded[..], b"PING SPAMC/1.5\r\nContent-length: 0\r\n\r\n");
}

#[test]
fn test_encode_is_idempotent() {
    let request = Request::symbols(MESSAGE)
        .with_header(Header::User("erin".to_string()))
        .compressed(true);
    let headers_before = request.headers.clone();

    let first = encode_request(&request);
    let second = encode_request(&request);

    assert_eq!(first, second);
    assert_eq!(request.headers, headers_before);
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_round_trip_plain() {
    let request = Request::report(MESSAGE)
        .with_header(Header::User("frank".to_string()))
        .with_header(Header::Extension {
            name: "X-Custom".to_string(),
            value: "1".to_string(),
        });
    let decoded = decode_request(&encode_request(&request)).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_round_trip_compressed() {
    let request = Request::headers(MESSAGE).compressed(true);
    let decoded = decode_request(&encode_request(&request)).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_round_trip_binary_body() {
    let body: Vec<u8> = (0..=255).collect();
    let request = Request::check(body);
    let decoded = decode_request(&encode_request(&request)).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_round_trip_ping() {
    let decoded = decode_request(&encode_request(&Request::ping())).unwrap();
    assert_eq!(decoded.verb, Verb::Ping);
    assert!(decoded.body.is_none());
    assert!(decoded.headers.is_empty());
}

#[test]
fn test_decode_unknown_verb() {
    let err = decode_request(b"SCAN SPAMC/1.5\r\nContent-length: 0\r\n\r\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert!(err.to_string().contains("Unknown verb"));
}

#[test]
fn test_decode_wrong_protocol() {
    let err = decode_request(b"CHECK HTTP/1.1\r\n\r\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
}

#[test]
fn test_decode_bad_compressed_body() {
    let err = decode_request(b"CHECK SPAMC/1.5\r\nCompress: zlib\r\nContent-length: 3\r\n\r\nabc")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decompress);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_propagates_user_and_compress() {
    let config = ClientConfig::builder().user("grace").compress(true).build();
    let request = config.request(Verb::Check, Some(MESSAGE.into()));

    assert_eq!(request.headers, vec![Header::User("grace".to_string())]);
    assert!(request.compress);

    let encoded = encode_request(&request);
    let (head, _) = split(&encoded);
    let head = std::str::from_utf8(head).unwrap();
    assert!(head.contains("User: grace\r\n"));
    assert!(head.contains("Compress: zlib\r\n"));
}

#[test]
fn test_config_ping_drops_body() {
    let config = ClientConfig::default();
    let request = config.request(Verb::Ping, Some(MESSAGE.into()));
    assert!(request.body.is_none());
    assert!(request.headers.is_empty());
}
