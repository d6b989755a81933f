// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Imagefeed core: network sync for a photo-feed client.
//!
//! This crate provides OAuth sign-in, encrypted credential storage, the
//! user's profile and avatar, and a paginated photo feed with likes.
//! Every service lives on one logical execution context; construct
//! [`AppState`] and drive it from a single-threaded runtime or a
//! `tokio::task::LocalSet`.

pub mod config;
pub mod context;
pub mod error;
pub mod listener;
pub mod logging;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use error::StorageError;
use services::{
    AuthHelper, EncryptedFileTokenStore, HttpPipeline, ImagesListService, LogoutService,
    OAuth2Service, ProfileImageService, ProfileService, ReqwestTransport, SessionService,
    TokenStore, Transport,
};
use std::rc::Rc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub token_store: Rc<dyn TokenStore>,
    pub auth_helper: AuthHelper,
    pub oauth: Rc<OAuth2Service>,
    pub profile: Rc<ProfileService>,
    pub profile_image: Rc<ProfileImageService>,
    pub images_list: Rc<ImagesListService>,
    pub session: SessionService,
    pub logout: LogoutService,
}

impl AppState {
    /// Wire every service onto one transport and one token store.
    pub fn new(
        config: Config,
        transport: Rc<dyn Transport>,
        token_store: Rc<dyn TokenStore>,
    ) -> Self {
        let pipeline = HttpPipeline::new(transport);

        let oauth = Rc::new(OAuth2Service::new(&config, pipeline.clone()));
        let profile = Rc::new(ProfileService::new(&config, pipeline.clone()));
        let profile_image = Rc::new(ProfileImageService::new(&config, pipeline.clone()));
        let images_list = Rc::new(ImagesListService::new(&config, pipeline, token_store.clone()));

        let session = SessionService::new(
            token_store.clone(),
            oauth.clone(),
            profile.clone(),
            profile_image.clone(),
        );
        let logout = LogoutService::new(
            token_store.clone(),
            profile.clone(),
            profile_image.clone(),
            images_list.clone(),
        );

        Self {
            auth_helper: AuthHelper::new(&config),
            config,
            token_store,
            oauth,
            profile,
            profile_image,
            images_list,
            session,
            logout,
        }
    }

    /// Production wiring: `reqwest` transport and the encrypted file store.
    pub fn from_config(config: Config) -> Result<Self, StorageError> {
        let token_store = EncryptedFileTokenStore::with_secret(
            config.token_store_path.clone(),
            &config.token_store_secret,
        )?;
        tracing::info!(
            path = %config.token_store_path.display(),
            api = %config.api_base_url,
            "Initializing services"
        );
        Ok(Self::new(
            config,
            Rc::new(ReqwestTransport::default()),
            Rc::new(token_store),
        ))
    }
}
