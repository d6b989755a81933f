// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - network sync layer.

pub mod cipher;
pub mod http;
pub mod images_list;
pub mod logout;
pub mod oauth;
pub mod profile;
pub mod profile_image;
pub mod session;
pub mod single_flight;
pub mod token_store;

pub use cipher::TokenCipher;
pub use http::{build_request, HttpPipeline, RawResponse, ReqwestTransport, Transport};
pub use images_list::ImagesListService;
pub use logout::LogoutService;
pub use oauth::{AuthHelper, OAuth2Service};
pub use profile::ProfileService;
pub use profile_image::ProfileImageService;
pub use session::SessionService;
pub use single_flight::{FlightPolicy, SingleFlight};
pub use token_store::{EncryptedFileTokenStore, MemoryTokenStore, TokenStore};
