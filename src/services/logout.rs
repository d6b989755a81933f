// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-out: credential removal and cache teardown.

use crate::context::ExecutionContext;
use crate::error::StorageError;
use crate::services::images_list::ImagesListService;
use crate::services::profile::ProfileService;
use crate::services::profile_image::ProfileImageService;
use crate::services::token_store::TokenStore;
use std::rc::Rc;

/// Signs the user out.
pub struct LogoutService {
    context: ExecutionContext,
    token_store: Rc<dyn TokenStore>,
    profile: Rc<ProfileService>,
    profile_image: Rc<ProfileImageService>,
    images_list: Rc<ImagesListService>,
}

impl LogoutService {
    pub fn new(
        token_store: Rc<dyn TokenStore>,
        profile: Rc<ProfileService>,
        profile_image: Rc<ProfileImageService>,
        images_list: Rc<ImagesListService>,
    ) -> Self {
        Self {
            context: ExecutionContext::current(),
            token_store,
            profile,
            profile_image,
            images_list,
        }
    }

    /// Remove the stored credential, then clear every cache.
    ///
    /// If the credential cannot be removed nothing is cleared and the
    /// error is returned; the credential state is then unknown.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.context.assert_current("LogoutService::logout");

        if let Err(e) = self.token_store.remove() {
            tracing::error!(error = %e, "Failed to remove bearer token, logout aborted");
            return Err(e);
        }

        self.profile.clear();
        self.profile_image.clear();
        self.images_list.clear_feed();

        tracing::info!("User logged out");
        Ok(())
    }
}
