//! Typed endpoint wrappers over [`crate::ApiClient`].
//!
//! Each endpoint decodes into a raw wire struct from [`types`] and
//! normalizes it before returning, so callers only ever see canonical
//! records.

pub mod types;

mod auth;
mod clubs;
mod events;
mod registrations;
