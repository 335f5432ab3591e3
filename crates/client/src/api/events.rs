//! Event listing and detail endpoints.

use std::time::Instant;

use tracing::{debug, instrument};

use crate::api::types::{Event, EventQuery, EventWire, ListWire};
use crate::cache::Snapshot;
use crate::error::ApiError;
use crate::http::ApiClient;

impl ApiClient {
    /// List events, cache-then-revalidate.
    ///
    /// A cached snapshot for the same query is returned immediately when
    /// present. On a cache miss the backend is fetched and the result
    /// stored, stamped with the fetch start time so a slower concurrent
    /// fetch can never clobber a newer snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error only on a cache miss that fails to fetch.
    #[instrument(skip(self))]
    pub async fn list_events(&self, query: &EventQuery) -> Result<Snapshot<Event>, ApiError> {
        let key = query.cache_key();
        if let Some(cached) = self.inner.events_cache.get(&key).await {
            debug!(key, "events served from cache");
            return Ok(cached);
        }

        let fetched_at = Instant::now();
        let mut params: Vec<(&str, String)> = Vec::new();
        if query.only_available {
            params.push(("available", "true".to_owned()));
        }
        if query.include_club {
            params.push(("include", "club".to_owned()));
        }
        if let Some(sort) = &query.sort {
            params.push(("sort", sort.clone()));
        }
        if let Some(limit) = query.limit {
            params.push(("limit", limit.to_string()));
        }

        let wire: ListWire<EventWire> = self.get_json("/events", &params).await?;
        let events: Vec<Event> = wire.into_items().into_iter().map(EventWire::normalize).collect();
        debug!(count = events.len(), "events fetched");

        let snapshot = Snapshot::new(events, fetched_at);
        self.inner
            .events_cache
            .insert_if_newer(&key, snapshot.clone())
            .await;
        Ok(snapshot)
    }

    /// Fetch one event by slug (or id, which doubles as the slug).
    ///
    /// # Errors
    ///
    /// `ApiError::Status { status: 404, .. }` when no such event exists.
    #[instrument(skip(self))]
    pub async fn get_event(&self, slug: &str) -> Result<Event, ApiError> {
        let wire: EventWire = self.get_json(&format!("/events/{slug}"), &[]).await?;
        Ok(wire.normalize())
    }
}
