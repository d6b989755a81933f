// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session flows that span the token store and the remote services.
//!
//! Handles:
//! - Completing sign-in: code exchange followed by token persistence
//! - Restoring a session: profile first, then avatar

use crate::context::ExecutionContext;
use crate::error::{AuthError, NetworkError};
use crate::models::Profile;
use crate::services::oauth::OAuth2Service;
use crate::services::profile::ProfileService;
use crate::services::profile_image::ProfileImageService;
use crate::services::token_store::TokenStore;
use std::rc::Rc;

/// Sign-in and session restore.
pub struct SessionService {
    context: ExecutionContext,
    token_store: Rc<dyn TokenStore>,
    oauth: Rc<OAuth2Service>,
    profile: Rc<ProfileService>,
    profile_image: Rc<ProfileImageService>,
}

impl SessionService {
    pub fn new(
        token_store: Rc<dyn TokenStore>,
        oauth: Rc<OAuth2Service>,
        profile: Rc<ProfileService>,
        profile_image: Rc<ProfileImageService>,
    ) -> Self {
        Self {
            context: ExecutionContext::current(),
            token_store,
            oauth,
            profile,
            profile_image,
        }
    }

    /// Whether a credential is stored. A store that cannot be read counts
    /// as signed out.
    pub fn is_authenticated(&self) -> bool {
        match self.token_store.load() {
            Ok(token) => token.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Token store unreadable");
                false
            }
        }
    }

    /// Exchange `code` for a token and persist it.
    pub async fn authenticate(&self, code: &str) -> Result<(), AuthError> {
        self.context.assert_current("SessionService::authenticate");

        let token = self.oauth.fetch_token(code).await?;
        self.token_store.store(&token).map_err(|e| {
            tracing::error!(error = %e, "Failed to persist bearer token");
            e
        })?;

        tracing::info!("Sign-in complete");
        Ok(())
    }

    /// Load the profile with the stored token, then the avatar.
    ///
    /// With no stored credential this fails with an invalid-request error
    /// and makes no network call. An avatar failure is logged but does not
    /// fail the restore.
    pub async fn restore(&self) -> Result<Profile, AuthError> {
        self.context.assert_current("SessionService::restore");

        let Some(token) = self.token_store.load()? else {
            tracing::warn!("No stored bearer token, cannot restore session");
            return Err(NetworkError::InvalidRequest("no stored bearer token".to_string()).into());
        };

        let profile = self.profile.fetch_profile(&token).await?;

        if let Err(e) = self
            .profile_image
            .fetch_avatar_url(&profile.username, &token)
            .await
        {
            tracing::warn!(username = %profile.username, error = %e, "Avatar not loaded");
        }

        Ok(profile)
    }
}
