// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Photo model for the feed.

use crate::time_utils::parse_iso8601;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pixel dimensions of the original image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

/// A photo in the feed. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    /// Server-assigned ID
    pub id: String,
    /// Original image size
    pub size: PixelSize,
    /// Creation time, `None` when missing or unparsable
    pub created_at: Option<DateTime<Utc>>,
    /// Free-text description
    pub description: Option<String>,
    /// Thumbnail URL
    pub thumb_url: String,
    /// Full-size URL
    pub full_url: String,
    /// Whether the signed-in user likes this photo
    pub is_liked: bool,
}

impl Photo {
    /// Copy of this photo with `is_liked` inverted.
    pub fn with_like_toggled(&self) -> Self {
        Self {
            is_liked: !self.is_liked,
            ..self.clone()
        }
    }
}

impl From<PhotoResultBody> for Photo {
    fn from(body: PhotoResultBody) -> Self {
        Self {
            created_at: body.created_at.as_deref().and_then(parse_iso8601),
            id: body.id,
            size: PixelSize {
                width: body.width,
                height: body.height,
            },
            description: body.description,
            thumb_url: body.urls.thumb,
            full_url: body.urls.full,
            is_liked: body.liked_by_user,
        }
    }
}

/// One entry of the `GET /photos` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoResultBody {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub created_at: Option<String>,
    pub description: Option<String>,
    pub urls: PhotoUrls,
    pub liked_by_user: bool,
}

/// Image URLs by size; the feed only shows `thumb` and `full`.
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoUrls {
    pub full: String,
    pub thumb: String,
}
