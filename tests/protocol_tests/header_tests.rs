//! Header Tests
//!
//! Tests for header serialization and line parsing.

use spamc::protocol::{Actions, Header, HeaderError, MessageClass, SpamStatus};

// =============================================================================
// Serialization Tests
// =============================================================================

#[test]
fn test_serialize_content_length() {
    assert_eq!(&Header::ContentLength(42).to_bytes()[..], b"Content-length: 42\r\n");
}

#[test]
fn test_serialize_compress() {
    assert_eq!(&Header::Compress.to_bytes()[..], b"Compress: zlib\r\n");
}

#[test]
fn test_serialize_user() {
    let header = Header::User("alice".to_string());
    assert_eq!(&header.to_bytes()[..], b"User: alice\r\n");
}

#[test]
fn test_serialize_spam_keeps_one_decimal() {
    let header = Header::Spam(SpamStatus {
        is_spam: true,
        score: 1000.0,
        threshold: 5.0,
    });
    assert_eq!(&header.to_bytes()[..], b"Spam: True ; 1000.0 / 5.0\r\n");

    let header = Header::Spam(SpamStatus {
        is_spam: false,
        score: -1.5,
        threshold: 5.0,
    });
    assert_eq!(&header.to_bytes()[..], b"Spam: False ; -1.5 / 5.0\r\n");
}

#[test]
fn test_serialize_tell_headers() {
    assert_eq!(
        &Header::MessageClass(MessageClass::Spam).to_bytes()[..],
        b"Message-class: spam\r\n"
    );
    assert_eq!(&Header::Set(Actions::both()).to_bytes()[..], b"Set: local, remote\r\n");
    assert_eq!(&Header::Remove(Actions::remote()).to_bytes()[..], b"Remove: remote\r\n");
    assert_eq!(&Header::DidSet(Actions::local()).to_bytes()[..], b"DidSet: local\r\n");
}

#[test]
fn test_serialize_extension() {
    let header = Header::Extension {
        name: "X-Trace".to_string(),
        value: "abc 123".to_string(),
    };
    assert_eq!(header.name(), "X-Trace");
    assert_eq!(&header.to_bytes()[..], b"X-Trace: abc 123\r\n");
}

// =============================================================================
// Parsing Tests
// =============================================================================

#[test]
fn test_parse_content_length() {
    let header = Header::parse_line(b"Content-length: 5").unwrap();
    assert_eq!(header, Header::ContentLength(5));
}

#[test]
fn test_parse_trims_value_and_line_break() {
    let header = Header::parse_line(b"User:   bob  \r\n").unwrap();
    assert_eq!(header, Header::User("bob".to_string()));
}

#[test]
fn test_parse_spam() {
    let header = Header::parse_line(b"Spam: True ; 15.2 / 5.0").unwrap();
    match header {
        Header::Spam(status) => {
            assert!(status.is_spam);
            assert_eq!(status.score, 15.2);
            assert_eq!(status.threshold, 5.0);
        }
        other => panic!("Expected Spam header, got {:?}", other),
    }
}

#[test]
fn test_parse_spam_accepts_yes_no() {
    let header = Header::parse_line(b"Spam: no ; 0.1 / 5").unwrap();
    assert!(matches!(header, Header::Spam(SpamStatus { is_spam: false, .. })));
}

#[test]
fn test_parse_spam_malformed() {
    assert!(Header::parse_line(b"Spam: True 15.0 5.0").is_err());
    assert!(Header::parse_line(b"Spam: maybe ; 1.0 / 5.0").is_err());
    assert!(Header::parse_line(b"Spam: True ; high / 5.0").is_err());
}

#[test]
fn test_parse_actions() {
    let header = Header::parse_line(b"DidRemove: Remote, local").unwrap();
    assert_eq!(header, Header::DidRemove(Actions::both()));

    assert!(Header::parse_line(b"Set: everywhere").is_err());
    assert!(Header::parse_line(b"Set: ").is_err());
}

#[test]
fn test_parse_message_class() {
    let header = Header::parse_line(b"Message-class: ham").unwrap();
    assert_eq!(header, Header::MessageClass(MessageClass::Ham));
    assert!(Header::parse_line(b"Message-class: eggs").is_err());
}

#[test]
fn test_parse_unknown_name_is_extension() {
    let header = Header::parse_line(b"X-Spam-Level: ***").unwrap();
    assert_eq!(
        header,
        Header::Extension {
            name: "X-Spam-Level".to_string(),
            value: "***".to_string(),
        }
    );
}

#[test]
fn test_parse_name_is_case_sensitive() {
    // Only the exact registry spelling is typed
    let header = Header::parse_line(b"content-length: abc").unwrap();
    assert!(matches!(header, Header::Extension { .. }));
}

#[test]
fn test_parse_invalid_content_length() {
    let err = Header::parse_line(b"Content-length: -3").unwrap_err();
    assert!(matches!(err, HeaderError::InvalidValue { name: "Content-length", .. }));
}

#[test]
fn test_parse_missing_delimiter() {
    let err = Header::parse_line(b"Content-length 5").unwrap_err();
    assert!(matches!(err, HeaderError::NoDelimiter));
}

#[test]
fn test_parse_missing_name() {
    let err = Header::parse_line(b": value").unwrap_err();
    assert!(matches!(err, HeaderError::MissingName));
}

#[test]
fn test_parse_invalid_utf8() {
    let err = Header::parse_line(&[b'U', b's', 0xFF, b':', b' ', b'x']).unwrap_err();
    assert!(matches!(err, HeaderError::InvalidUtf8(_)));
}

#[test]
fn test_every_action_set_parses_back() {
    for actions in [Actions::local(), Actions::remote(), Actions::both()] {
        assert!(actions.is_local() || actions.is_remote());
        for header in [
            Header::Set(actions),
            Header::Remove(actions),
            Header::DidSet(actions),
            Header::DidRemove(actions),
        ] {
            let parsed = Header::parse_line(&header.to_bytes()).unwrap();
            assert_eq!(parsed, header);
        }
    }
}

#[test]
fn test_parsed_actions_flags() {
    match Header::parse_line(b"Set: remote").unwrap() {
        Header::Set(actions) => {
            assert!(!actions.is_local());
            assert!(actions.is_remote());
        }
        other => panic!("Expected Set header, got {:?}", other),
    }
}

#[test]
fn test_serialized_header_parses_back() {
    let headers = vec![
        Header::Compress,
        Header::ContentLength(0),
        Header::User("carol".to_string()),
        Header::Set(Actions::local()),
        Header::Spam(SpamStatus {
            is_spam: true,
            score: 7.5,
            threshold: 5.0,
        }),
    ];

    for header in headers {
        let parsed = Header::parse_line(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
    }
}
