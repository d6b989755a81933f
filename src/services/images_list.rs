// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated photo feed.
//!
//! The service owns the ordered photo collection and is its only writer.
//! Pages are appended in server order; an ID the collection already holds
//! is skipped, so overlapping pages never produce duplicates. Likes are
//! applied only after the server confirms them.

use crate::config::Config;
use crate::context::ExecutionContext;
use crate::error::NetworkError;
use crate::listener::{FeedListener, Listeners};
use crate::models::{BearerToken, Photo, PhotoResultBody};
use crate::services::http::{build_request, HttpPipeline};
use crate::services::single_flight::{FlightPolicy, SingleFlight};
use crate::services::token_store::TokenStore;
use reqwest::Method;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

/// Photos requested per page.
pub const PHOTOS_PER_PAGE: u32 = 10;

/// Server-side ordering of the feed.
pub const PHOTOS_ORDER_BY: &str = "latest";

#[derive(Default)]
struct FeedCollection {
    photos: Vec<Photo>,
    ids: HashSet<String>,
}

impl FeedCollection {
    /// Append entries not already present. Returns how many were added.
    fn append_page(&mut self, page: Vec<PhotoResultBody>) -> usize {
        let before = self.photos.len();
        for entry in page {
            if self.ids.contains(&entry.id) {
                tracing::debug!(photo_id = %entry.id, "Skipping photo already in feed");
                continue;
            }
            self.ids.insert(entry.id.clone());
            self.photos.push(Photo::from(entry));
        }
        self.photos.len() - before
    }

    /// Flip `is_liked` on `photo_id`. Returns false when the photo is gone.
    fn toggle_like(&mut self, photo_id: &str) -> bool {
        match self.photos.iter().position(|p| p.id == photo_id) {
            Some(index) => {
                self.photos[index] = self.photos[index].with_like_toggled();
                true
            }
            None => false,
        }
    }

    fn clear(&mut self) {
        self.photos.clear();
        self.ids.clear();
    }
}

/// Photo feed with single-flight pagination and like mutation.
///
/// Page fetches and like toggles use separate in-flight markers, so a like
/// never blocks pagination and vice versa.
pub struct ImagesListService {
    context: ExecutionContext,
    pipeline: HttpPipeline,
    token_store: Rc<dyn TokenStore>,
    api_base_url: String,
    feed: RefCell<FeedCollection>,
    last_loaded_page: Cell<Option<u32>>,
    page_fetch: SingleFlight<u32>,
    like_fetch: SingleFlight<String>,
    listeners: Listeners<dyn FeedListener>,
}

impl ImagesListService {
    pub fn new(config: &Config, pipeline: HttpPipeline, token_store: Rc<dyn TokenStore>) -> Self {
        Self {
            context: ExecutionContext::current(),
            pipeline,
            token_store,
            api_base_url: config.api_base_url.clone(),
            feed: RefCell::new(FeedCollection::default()),
            last_loaded_page: Cell::new(None),
            page_fetch: SingleFlight::new("photos_page", FlightPolicy::Reject),
            like_fetch: SingleFlight::new("photo_like", FlightPolicy::Reject),
            listeners: Listeners::default(),
        }
    }

    // ─── Read Access ─────────────────────────────────────────────────────────

    /// Snapshot of the feed in display order.
    pub fn photos(&self) -> Vec<Photo> {
        self.feed.borrow().photos.clone()
    }

    /// Photo with `photo_id`, if loaded.
    pub fn photo(&self, photo_id: &str) -> Option<Photo> {
        self.feed
            .borrow()
            .photos
            .iter()
            .find(|p| p.id == photo_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.feed.borrow().photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.borrow().photos.is_empty()
    }

    /// Last page successfully appended, `None` before the first page.
    pub fn last_loaded_page(&self) -> Option<u32> {
        self.last_loaded_page.get()
    }

    pub fn is_page_fetch_outstanding(&self) -> bool {
        self.page_fetch.is_outstanding()
    }

    pub fn is_like_outstanding(&self) -> bool {
        self.like_fetch.is_outstanding()
    }

    pub fn subscribe(&self, listener: Rc<dyn FeedListener>) {
        self.listeners.subscribe(listener);
    }

    pub fn unsubscribe(&self, listener: &Rc<dyn FeedListener>) {
        self.listeners.unsubscribe(listener);
    }

    // ─── Pagination ──────────────────────────────────────────────────────────

    /// Fetch the page after `last_loaded_page` and append it.
    ///
    /// Fails with `DuplicateRequest` while a page fetch is in flight and
    /// with `InvalidRequest` when no credential is stored. On failure the
    /// feed and `last_loaded_page` are unchanged.
    pub async fn fetch_next_page(&self) -> Result<(), NetworkError> {
        self.context
            .assert_current("ImagesListService::fetch_next_page");

        if self.page_fetch.is_outstanding() {
            tracing::debug!("Page fetch already in flight");
            return Err(NetworkError::DuplicateRequest);
        }

        let target_page = self.last_loaded_page.get().unwrap_or(0) + 1;
        let token = self.require_token()?;
        let page_param = target_page.to_string();
        let per_page_param = PHOTOS_PER_PAGE.to_string();
        let request = build_request(
            Method::GET,
            &self.api_base_url,
            "/photos",
            &[
                ("page", page_param.as_str()),
                ("per_page", per_page_param.as_str()),
                ("order_by", PHOTOS_ORDER_BY),
            ],
            Some(&token),
        )?;

        let flight = self.page_fetch.begin(target_page)?;
        tracing::debug!(page = target_page, "Fetching photos page");

        let page: Vec<PhotoResultBody> = flight
            .run(self.pipeline.fetch_object(request))
            .await
            .map_err(|e| {
                tracing::warn!(page = target_page, error = %e, "Photos page fetch failed");
                e
            })?;

        let received = page.len();
        let appended = self.feed.borrow_mut().append_page(page);
        self.last_loaded_page.set(Some(target_page));

        tracing::info!(
            page = target_page,
            received,
            appended,
            total = self.len(),
            "Photos page loaded"
        );

        self.listeners
            .notify(|listener| listener.on_feed_changed(target_page));
        Ok(())
    }

    // ─── Likes ───────────────────────────────────────────────────────────────

    /// Like (`POST`) or unlike (`DELETE`) a photo.
    ///
    /// Only one like mutation is in flight across the whole feed. The local
    /// photo is updated after the server confirms; a photo that is no longer
    /// in the feed is silently ignored.
    pub async fn change_like(&self, photo_id: &str, is_liked: bool) -> Result<(), NetworkError> {
        self.context.assert_current("ImagesListService::change_like");

        if self.like_fetch.is_outstanding() {
            tracing::debug!(photo_id, "Like change already in flight");
            return Err(NetworkError::DuplicateRequest);
        }

        let token = self.require_token()?;
        let method = if is_liked {
            Method::POST
        } else {
            Method::DELETE
        };
        let path = format!("/photos/{}/like", urlencoding::encode(photo_id));
        let request = build_request(method, &self.api_base_url, &path, &[], Some(&token))?;

        let flight = self.like_fetch.begin(photo_id.to_string())?;

        flight
            .run(self.pipeline.fetch_data(request))
            .await
            .map_err(|e| {
                tracing::warn!(photo_id, is_liked, error = %e, "Like change failed");
                e
            })?;

        if self.feed.borrow_mut().toggle_like(photo_id) {
            tracing::info!(photo_id, is_liked, "Like change applied");
        } else {
            tracing::debug!(photo_id, "Liked photo no longer in feed");
        }
        Ok(())
    }

    // ─── Reset ───────────────────────────────────────────────────────────────

    /// Empty the feed and forget the pagination cursor (logout).
    ///
    /// In-flight markers are left alone; a call that completes afterwards
    /// still releases its own marker.
    pub fn clear_feed(&self) {
        self.context.assert_current("ImagesListService::clear_feed");
        self.feed.borrow_mut().clear();
        self.last_loaded_page.set(None);
        tracing::info!("Photo feed cleared");
    }

    fn require_token(&self) -> Result<BearerToken, NetworkError> {
        match self.token_store.load() {
            Ok(Some(token)) => Ok(token),
            Ok(None) => {
                tracing::warn!("Authorization token was not found");
                Err(NetworkError::InvalidRequest(
                    "no stored bearer token".to_string(),
                ))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Authorization token could not be loaded");
                Err(NetworkError::InvalidRequest(format!(
                    "bearer token unavailable: {}",
                    e
                )))
            }
        }
    }
}
