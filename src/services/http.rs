// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request execution and response decoding shared by every service.
//!
//! Handles:
//! - Building bearer-authenticated requests against the API
//! - Executing a request exactly once (no retries)
//! - Classifying transport, status, empty-body and decode failures

use crate::error::NetworkError;
use crate::models::BearerToken;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Request, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::rc::Rc;

/// Raw HTTP response: status and full body.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Executes prepared requests.
///
/// Implementations only report transport-level failures; status handling
/// belongs to [`HttpPipeline`].
#[async_trait(?Send)]
pub trait Transport {
    async fn execute(&self, request: Request) -> Result<RawResponse, NetworkError>;
}

/// Production transport backed by `reqwest`.
///
/// Each call runs on its own tokio task; the caller resumes on its own
/// context once the body has been read. Dropping the caller's future
/// aborts the task.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(tokio::task::JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<RawResponse, NetworkError> {
        let http = self.http.clone();
        let mut task = AbortOnDrop(tokio::spawn(async move {
            let response = http.execute(request).await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(RawResponse {
                status,
                body: body.to_vec(),
            })
        }));

        match (&mut task.0).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(NetworkError::Transport(e.to_string())),
            Err(e) if e.is_cancelled() => Err(NetworkError::Cancelled),
            Err(e) => Err(NetworkError::Transport(format!("transport task failed: {}", e))),
        }
    }
}

/// Build a request for `{base_url}{path}` with query pairs and an optional
/// bearer credential. Any malformed piece is an invalid request.
pub fn build_request(
    method: Method,
    base_url: &str,
    path: &str,
    query: &[(&str, &str)],
    token: Option<&BearerToken>,
) -> Result<Request, NetworkError> {
    let mut url = Url::parse(&format!("{}{}", base_url, path)).map_err(|e| {
        tracing::warn!(base_url, path, error = %e, "Unable to build request URL");
        NetworkError::InvalidRequest(format!("bad URL {}{}: {}", base_url, path, e))
    })?;

    if !query.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (name, value) in query {
            pairs.append_pair(name, value);
        }
    }

    let mut request = Request::new(method, url);
    if let Some(token) = token {
        request
            .headers_mut()
            .insert(AUTHORIZATION, token.authorization_header()?);
    }
    Ok(request)
}

/// Executes requests through a [`Transport`] and turns outcomes into
/// typed results.
#[derive(Clone)]
pub struct HttpPipeline {
    transport: Rc<dyn Transport>,
}

impl HttpPipeline {
    pub fn new(transport: Rc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Execute once and return the body of a 2xx response.
    pub async fn fetch_data(&self, request: Request) -> Result<Vec<u8>, NetworkError> {
        let method = request.method().clone();
        let url = redacted_url(request.url());

        let response = self.transport.execute(request).await.map_err(|e| {
            if e != NetworkError::Cancelled {
                tracing::warn!(%method, url = %url, error = %e, "Request failed");
            }
            e
        })?;

        if !response.status.is_success() {
            tracing::warn!(
                %method,
                url = %url,
                status = response.status.as_u16(),
                body_len = response.body.len(),
                "Request returned non-success status"
            );
            return Err(NetworkError::HttpStatus(response.status.as_u16()));
        }

        tracing::debug!(%method, url = %url, status = response.status.as_u16(), "Request succeeded");
        Ok(response.body)
    }

    /// Execute once and decode the JSON body as `T`.
    pub async fn fetch_object<T: DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<T, NetworkError> {
        let body = self.fetch_data(request).await?;
        decode_body(&body)
    }
}

/// Decode a response body, mapping parse errors to a decode failure.
///
/// Bodies may carry credentials, so only their length is logged.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, NetworkError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        tracing::warn!("Response body is empty");
        return Err(NetworkError::EmptyBody);
    }

    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(
            error = %e,
            body_len = body.len(),
            "Failed to decode response body"
        );
        NetworkError::Decoding(e.to_string())
    })
}

/// URL without its query string, which may carry OAuth secrets.
fn redacted_url(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}
