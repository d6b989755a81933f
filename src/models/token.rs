// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer credential and the OAuth token response.

use crate::error::NetworkError;
use reqwest::header::HeaderValue;
use serde::Deserialize;
use std::fmt;

/// Opaque bearer credential.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `Authorization: Bearer <token>` header value.
    ///
    /// An empty token or one with non-header characters is an invalid request.
    pub fn authorization_header(&self) -> Result<HeaderValue, NetworkError> {
        if self.0.trim().is_empty() {
            return Err(NetworkError::InvalidRequest(
                "bearer token is empty".to_string(),
            ));
        }
        let mut value = HeaderValue::from_str(&format!("Bearer {}", self.0)).map_err(|_| {
            NetworkError::InvalidRequest("bearer token is not a valid header value".to_string())
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

/// Token response from the OAuth token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTokenResponseBody {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub created_at: i64,
}
