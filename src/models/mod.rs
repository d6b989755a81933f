// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Domain models and the wire shapes they are decoded from.

pub mod photo;
pub mod profile;
pub mod token;

pub use photo::{Photo, PhotoResultBody, PixelSize};
pub use profile::{Profile, ProfileResultBody, UserResultBody};
pub use token::{BearerToken, OAuthTokenResponseBody};
