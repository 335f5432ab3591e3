//! Club listing and detail endpoints.

use std::time::Instant;

use gatherly_core::ClubId;
use tracing::{debug, instrument};

use crate::api::types::{Club, ClubWire, Event, EventWire, ListWire};
use crate::cache::Snapshot;
use crate::error::ApiError;
use crate::http::ApiClient;

const CLUBS_CACHE_KEY: &str = "clubs:all";

impl ApiClient {
    /// List clubs, cache-then-revalidate.
    ///
    /// # Errors
    ///
    /// Returns an error only on a cache miss that fails to fetch.
    #[instrument(skip(self))]
    pub async fn list_clubs(&self) -> Result<Snapshot<Club>, ApiError> {
        if let Some(cached) = self.inner.clubs_cache.get(CLUBS_CACHE_KEY).await {
            debug!("clubs served from cache");
            return Ok(cached);
        }

        let fetched_at = Instant::now();
        let wire: ListWire<ClubWire> = self.get_json("/clubs", &[]).await?;
        let clubs: Vec<Club> = wire.into_items().into_iter().map(ClubWire::normalize).collect();
        debug!(count = clubs.len(), "clubs fetched");

        let snapshot = Snapshot::new(clubs, fetched_at);
        self.inner
            .clubs_cache
            .insert_if_newer(CLUBS_CACHE_KEY, snapshot.clone())
            .await;
        Ok(snapshot)
    }

    /// Fetch one club.
    ///
    /// # Errors
    ///
    /// `ApiError::Status { status: 404, .. }` when no such club exists.
    #[instrument(skip(self))]
    pub async fn get_club(&self, id: &ClubId) -> Result<Club, ApiError> {
        let wire: ClubWire = self
            .get_json(&format!("/clubs/{}", id.as_str()), &[])
            .await?;
        Ok(wire.normalize())
    }

    /// List the events a club is hosting. Uncached: this view is only ever
    /// one hop from a club detail fetch.
    ///
    /// # Errors
    ///
    /// Propagates backend and transport failures.
    #[instrument(skip(self))]
    pub async fn club_events(&self, id: &ClubId) -> Result<Vec<Event>, ApiError> {
        let wire: ListWire<EventWire> = self
            .get_json(&format!("/clubs/{}/events", id.as_str()), &[])
            .await?;
        Ok(wire.into_items().into_iter().map(EventWire::normalize).collect())
    }
}
