//! Gatherly client library.
//!
//! A headless client for the Gatherly event booking backend. The backend
//! owns all business state - inventory, pricing, payment capture, webhook
//! confirmation, idempotency enforcement. This crate is the consumer side:
//!
//! - [`config`] - environment-driven configuration
//! - [`session`] - access-token storage and the single-flight refresh gate
//! - [`http`] - [`http::ApiClient`], bearer auth, 401 refresh-and-retry
//! - [`api`] - typed endpoint wrappers and canonical wire records
//! - [`form`] - registration form validation (buyer identity + capacity)
//! - [`checkout`] - the hosted checkout gateway seam
//! - [`flow`] - the booking orchestrator state machine
//! - [`poller`] - cancellable confirmation polling after checkout
//!
//! # Booking flow
//!
//! ```rust,ignore
//! let session = Session::new(Box::new(FileStore::default_path()?));
//! let client = ApiClient::new(&config, session)?;
//!
//! let event = client.get_event("supper-club-night").await?;
//! let valid = form.validate(&event.snapshot(), &limits)?;
//!
//! let flow = BookingFlow::new(client.clone(), gateway);
//! match flow.submit(&event, valid).await? {
//!     FlowOutcome::PendingConfirmation { registration_id, email } => {
//!         // checkout handshake done; actual capture is webhook-driven,
//!         // so poll the status endpoint until a terminal state
//!         let (canceller, cancel) = cancel_pair();
//!         let outcome = poll_status(
//!             || client.registration_status(&registration_id, &email),
//!             PollPolicy::default(),
//!             cancel,
//!         )
//!         .await;
//!     }
//!     FlowOutcome::Dismissed => { /* informational, retry allowed */ }
//!     FlowOutcome::AlreadyRegistered { message, .. } => { /* show message */ }
//! }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod checkout;
pub mod config;
pub mod error;
pub mod flow;
pub mod form;
pub mod http;
pub mod poller;
pub mod session;

pub use api::types::{
    AuthSession, Buyer, Club, ClubSummary, CreateRegistration, Event, EventQuery, PaymentOrder,
    Registration, StatusSnapshot, User,
};
pub use cache::Snapshot;
pub use checkout::{CheckoutError, CheckoutGateway, CheckoutOutcome, CheckoutRequest};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use flow::{BookingFlow, FlowError, FlowOutcome, FlowState, RegistrationApi};
pub use form::{BuyerInput, EventSnapshot, FormError, FormLimits, RegistrationForm, ValidRegistration};
pub use http::ApiClient;
pub use poller::{Canceller, PollOutcome, PollPolicy, cancel_pair, poll_status};
pub use session::{FileStore, MemoryStore, Session, SessionStore};
