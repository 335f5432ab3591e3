//! Gatherly Core - Shared types library.
//!
//! This crate provides common types used across all Gatherly components:
//! - `client` - API client and booking flow library
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! The backend API is the source of truth for every entity modeled here;
//! these types exist so the client side cannot mix up an event id with a
//! registration id, or a whole-unit amount with a minor-unit amount.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, contact details,
//!   prices, and booking statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
