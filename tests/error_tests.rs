// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use imagefeed_core::error::{AuthError, NetworkError, StorageError};

#[test]
fn test_should_offer_retry_for_remote_failures() {
    assert!(NetworkError::Transport("timed out".to_string()).should_offer_retry());
    assert!(NetworkError::HttpStatus(500).should_offer_retry());
    assert!(NetworkError::HttpStatus(404).should_offer_retry());
    assert!(NetworkError::EmptyBody.should_offer_retry());
    assert!(NetworkError::Decoding("missing field".to_string()).should_offer_retry());
}

#[test]
fn test_should_offer_retry_no_match() {
    assert!(!NetworkError::InvalidRequest("no token".to_string()).should_offer_retry());
    assert!(!NetworkError::DuplicateRequest.should_offer_retry());
    assert!(!NetworkError::Cancelled.should_offer_retry());
}

#[test]
fn test_status_only_for_http_errors() {
    assert_eq!(NetworkError::HttpStatus(429).status(), Some(429));
    assert_eq!(NetworkError::EmptyBody.status(), None);
}

#[test]
fn test_auth_error_wraps_both_sources() {
    let err: AuthError = NetworkError::HttpStatus(401).into();
    assert_eq!(err.as_network(), Some(&NetworkError::HttpStatus(401)));
    assert_eq!(err.to_string(), "HTTP status 401");

    let err: AuthError = StorageError::Io("disk full".to_string()).into();
    assert_eq!(err.as_network(), None);
    assert_eq!(err.to_string(), "Token store I/O error: disk full");
}

#[test]
fn test_io_error_converts_to_storage_error() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    assert!(matches!(StorageError::from(io), StorageError::Io(_)));
}
