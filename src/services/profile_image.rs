// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Avatar URL of a user.

use crate::config::Config;
use crate::context::ExecutionContext;
use crate::error::NetworkError;
use crate::listener::{Listeners, ProfileImageListener};
use crate::models::{BearerToken, UserResultBody};
use crate::services::http::{build_request, HttpPipeline};
use crate::services::single_flight::{FlightPolicy, SingleFlight};
use reqwest::Method;
use std::cell::RefCell;
use std::rc::Rc;

/// Fetches the large avatar URL from `GET /users/{username}`.
///
/// Single-flight per username; listeners are told about every new URL.
pub struct ProfileImageService {
    context: ExecutionContext,
    pipeline: HttpPipeline,
    api_base_url: String,
    avatar_url: RefCell<Option<String>>,
    fetch: SingleFlight<String>,
    listeners: Listeners<dyn ProfileImageListener>,
}

impl ProfileImageService {
    pub fn new(config: &Config, pipeline: HttpPipeline) -> Self {
        Self {
            context: ExecutionContext::current(),
            pipeline,
            api_base_url: config.api_base_url.clone(),
            avatar_url: RefCell::new(None),
            fetch: SingleFlight::new("profile_image", FlightPolicy::Supersede),
            listeners: Listeners::default(),
        }
    }

    /// Cached avatar URL.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar_url.borrow().clone()
    }

    pub fn subscribe(&self, listener: Rc<dyn ProfileImageListener>) {
        self.listeners.subscribe(listener);
    }

    pub fn unsubscribe(&self, listener: &Rc<dyn ProfileImageListener>) {
        self.listeners.unsubscribe(listener);
    }

    /// Fetch and cache the avatar URL for `username`.
    ///
    /// On failure the cached URL is left untouched.
    pub async fn fetch_avatar_url(
        &self,
        username: &str,
        token: &BearerToken,
    ) -> Result<String, NetworkError> {
        self.context
            .assert_current("ProfileImageService::fetch_avatar_url");

        let path = format!("/users/{}", urlencoding::encode(username));
        let request = build_request(Method::GET, &self.api_base_url, &path, &[], Some(token))?;
        let flight = self.fetch.begin(username.to_string())?;

        let body: UserResultBody = flight
            .run(self.pipeline.fetch_object(request))
            .await
            .map_err(|e| {
                if e != NetworkError::Cancelled {
                    tracing::error!(username, error = %e, "Avatar fetch failed");
                }
                e
            })?;

        let url = body.profile_image.large;
        tracing::info!(username = %body.username, "Avatar URL loaded");
        *self.avatar_url.borrow_mut() = Some(url.clone());
        self.listeners
            .notify(|listener| listener.on_profile_image_changed(&url));
        Ok(url)
    }

    /// Drop the cached avatar URL (logout).
    pub fn clear(&self) {
        self.context.assert_current("ProfileImageService::clear");
        self.avatar_url.borrow_mut().take();
    }
}
