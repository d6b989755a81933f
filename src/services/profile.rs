// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile of the signed-in user.

use crate::config::Config;
use crate::context::ExecutionContext;
use crate::error::NetworkError;
use crate::models::{BearerToken, Profile, ProfileResultBody};
use crate::services::http::{build_request, HttpPipeline};
use crate::services::single_flight::{FlightPolicy, SingleFlight};
use reqwest::Method;
use std::cell::RefCell;

/// Fetches and caches the `GET /me` profile. Single-flight per token.
pub struct ProfileService {
    context: ExecutionContext,
    pipeline: HttpPipeline,
    api_base_url: String,
    profile: RefCell<Option<Profile>>,
    fetch: SingleFlight<BearerToken>,
}

impl ProfileService {
    pub fn new(config: &Config, pipeline: HttpPipeline) -> Self {
        Self {
            context: ExecutionContext::current(),
            pipeline,
            api_base_url: config.api_base_url.clone(),
            profile: RefCell::new(None),
            fetch: SingleFlight::new("profile", FlightPolicy::Supersede),
        }
    }

    /// Cached profile from the last successful fetch.
    pub fn profile(&self) -> Option<Profile> {
        self.profile.borrow().clone()
    }

    pub fn is_fetch_outstanding(&self) -> bool {
        self.fetch.is_outstanding()
    }

    /// Fetch the profile for `token` and cache it.
    ///
    /// A request that cannot be built fails before it can supersede the
    /// outstanding fetch.
    pub async fn fetch_profile(&self, token: &BearerToken) -> Result<Profile, NetworkError> {
        self.context.assert_current("ProfileService::fetch_profile");

        let request = build_request(Method::GET, &self.api_base_url, "/me", &[], Some(token))?;
        let flight = self.fetch.begin(token.clone())?;

        let body: ProfileResultBody = flight
            .run(self.pipeline.fetch_object(request))
            .await
            .map_err(|e| {
                if e != NetworkError::Cancelled {
                    tracing::error!(error = %e, "Profile fetch failed");
                }
                e
            })?;

        let profile = Profile::from(body);
        tracing::info!(username = %profile.username, "Profile loaded");
        *self.profile.borrow_mut() = Some(profile.clone());
        Ok(profile)
    }

    /// Drop the cached profile (logout).
    pub fn clear(&self) {
        self.context.assert_current("ProfileService::clear");
        self.profile.borrow_mut().take();
    }
}
