// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OAuth authorization-code flow.
//!
//! Handles:
//! - Building the browser authorization URL
//! - Recognising the redirect callback and extracting the code
//! - Exchanging a code for a bearer token, once per distinct code

use crate::config::Config;
use crate::context::ExecutionContext;
use crate::error::NetworkError;
use crate::models::{BearerToken, OAuthTokenResponseBody};
use crate::services::http::HttpPipeline;
use crate::services::single_flight::{FlightPolicy, SingleFlight};
use reqwest::{Method, Request, Url};

/// Path of the redirect that carries the authorization code.
pub const NATIVE_CALLBACK_PATH: &str = "/oauth/authorize/native";

/// Authorization URL building and callback parsing.
#[derive(Debug, Clone)]
pub struct AuthHelper {
    authorize_url: String,
    access_key: String,
    redirect_uri: String,
    access_scope: String,
}

impl AuthHelper {
    pub fn new(config: &Config) -> Self {
        Self {
            authorize_url: config.authorize_url(),
            access_key: config.access_key.clone(),
            redirect_uri: config.redirect_uri.clone(),
            access_scope: config.access_scope.clone(),
        }
    }

    /// URL the browser opens to start the authorization flow.
    pub fn authorize_url(&self) -> Result<Url, NetworkError> {
        let auth_url = format!(
            "{}?\
             client_id={}&\
             redirect_uri={}&\
             response_type=code&\
             scope={}",
            self.authorize_url,
            urlencoding::encode(&self.access_key),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.access_scope),
        );

        Url::parse(&auth_url).map_err(|e| {
            tracing::warn!(error = %e, "Unable to build authorization URL");
            NetworkError::InvalidRequest(format!("bad authorization URL: {}", e))
        })
    }

    /// Extract the authorization code from a navigation URL.
    ///
    /// Only the native callback path counts; any other URL yields `None`.
    pub fn code_from_url(url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        if url.path() != NATIVE_CALLBACK_PATH {
            return None;
        }
        url.query_pairs()
            .find(|(name, _)| name == "code")
            .map(|(_, value)| value.into_owned())
            .filter(|code| !code.is_empty())
    }
}

/// Exchanges authorization codes for bearer tokens.
pub struct OAuth2Service {
    context: ExecutionContext,
    pipeline: HttpPipeline,
    token_url: String,
    access_key: String,
    secret_key: String,
    redirect_uri: String,
    exchange: SingleFlight<String>,
}

impl OAuth2Service {
    pub fn new(config: &Config, pipeline: HttpPipeline) -> Self {
        Self {
            context: ExecutionContext::current(),
            pipeline,
            token_url: config.token_url(),
            access_key: config.access_key.clone(),
            secret_key: config.secret_key.clone(),
            redirect_uri: config.redirect_uri.clone(),
            exchange: SingleFlight::new("oauth_token", FlightPolicy::Supersede),
        }
    }

    /// Code currently being exchanged, if any.
    pub fn outstanding_code(&self) -> Option<String> {
        self.exchange.outstanding_key()
    }

    /// Exchange `code` for a bearer token.
    ///
    /// A second call with the same code while the first is in flight fails
    /// with `DuplicateRequest`. A call with a different code cancels the
    /// outstanding exchange, which then resolves to `Cancelled`.
    pub async fn fetch_token(&self, code: &str) -> Result<BearerToken, NetworkError> {
        self.context.assert_current("OAuth2Service::fetch_token");

        let request = self.make_token_request(code)?;
        let flight = self.exchange.begin(code.to_string())?;

        tracing::info!("Exchanging authorization code for token");

        let body: OAuthTokenResponseBody = flight
            .run(self.pipeline.fetch_object(request))
            .await
            .map_err(|e| {
                if e != NetworkError::Cancelled {
                    tracing::error!(error = %e, "Token exchange failed");
                }
                e
            })?;

        tracing::info!(
            token_type = %body.token_type,
            scope = %body.scope,
            created_at = body.created_at,
            "Token exchange successful"
        );
        Ok(BearerToken::new(body.access_token))
    }

    fn make_token_request(&self, code: &str) -> Result<Request, NetworkError> {
        let mut url = Url::parse(&self.token_url).map_err(|e| {
            tracing::warn!(url = %self.token_url, error = %e, "Unable to build token URL");
            NetworkError::InvalidRequest(format!("bad token URL {}: {}", self.token_url, e))
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.access_key)
            .append_pair("client_secret", &self.secret_key)
            .append_pair("redirect_uri", &self.redirect_uri)
            .append_pair("code", code)
            .append_pair("grant_type", "authorization_code");

        Ok(Request::new(Method::POST, url))
    }
}
