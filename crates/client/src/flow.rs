//! Booking orchestrator.
//!
//! Sequences booking creation, payment-order creation, and the hosted
//! checkout handoff:
//!
//! ```text
//! IDLE -> CREATING_BOOKING -> CREATING_ORDER -> AWAITING_CHECKOUT
//!      -> { PENDING_WEBHOOK | DISMISSED | FAILED }
//! ```
//!
//! The orchestrator guards against re-entrant submission (double-click)
//! and owns the idempotency key lifecycle. Inventory, pricing, and the
//! at-most-one-active-registration-per-user-per-event invariant all live
//! in the backend; this state machine only sequences calls and surfaces
//! outcomes.

use std::sync::atomic::{AtomicBool, Ordering};

use gatherly_core::{BookingStatus, Email, IdempotencyKey, RegistrationId};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::api::types::{CreateRegistration, Event, PaymentOrder, Registration};
use crate::checkout::{CheckoutError, CheckoutGateway, CheckoutOutcome, CheckoutRequest};
use crate::error::ApiError;
use crate::form::ValidRegistration;

/// The backend operations the orchestrator needs. [`crate::ApiClient`]
/// implements this; tests substitute fakes.
#[allow(async_fn_in_trait)]
pub trait RegistrationApi {
    /// Create (or idempotently fetch) a registration.
    async fn create_registration(
        &self,
        request: &CreateRegistration,
        key: &IdempotencyKey,
    ) -> Result<Registration, ApiError>;

    /// Request a payment order for an existing registration.
    async fn start_payment(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<PaymentOrder, ApiError>;
}

/// Observable orchestrator state, for progress UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    #[default]
    Idle,
    CreatingBooking,
    CreatingOrder,
    AwaitingCheckout,
    /// Checkout handshake done; webhook confirmation still pending.
    PendingWebhook,
    Dismissed,
    Failed,
}

/// Terminal result of one submit.
#[derive(Debug, Clone)]
pub enum FlowOutcome {
    /// Checkout completed client-side. The caller should redirect to the
    /// status view keyed by `(registration_id, email)` - the durable
    /// lookup pair, never the idempotency key - and poll until the
    /// webhook lands.
    PendingConfirmation {
        registration_id: RegistrationId,
        email: Email,
    },
    /// The user closed checkout without paying. Informational, not an
    /// error; an immediate retry is fine.
    Dismissed,
    /// The buyer already holds a registration for this event. Recovered
    /// into a message keyed off the existing booking's status.
    AlreadyRegistered {
        status: BookingStatus,
        message: String,
    },
}

/// Failures that end a submit.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// A submit is already in flight; no network call was made.
    #[error("a booking attempt is already in progress")]
    SubmitInFlight,
    /// Backend or transport failure, surfaced verbatim (backend message
    /// preferred over generic transport error).
    #[error(transparent)]
    Api(ApiError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// The booking orchestrator.
pub struct BookingFlow<A, G> {
    api: A,
    gateway: G,
    in_flight: AtomicBool,
    state: watch::Sender<FlowState>,
}

impl<A: RegistrationApi, G: CheckoutGateway> BookingFlow<A, G> {
    /// Create an orchestrator over an API client and a checkout gateway.
    pub fn new(api: A, gateway: G) -> Self {
        let (state, _) = watch::channel(FlowState::Idle);
        Self {
            api,
            gateway,
            in_flight: AtomicBool::new(false),
            state,
        }
    }

    /// Subscribe to state transitions.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<FlowState> {
        self.state.subscribe()
    }

    /// Run one registration attempt end to end.
    ///
    /// A fresh idempotency key is minted per attempt and reused for every
    /// call within it. A dismissal ends the attempt: the next submit mints
    /// a fresh key, so a stale paid order is never resumed.
    ///
    /// # Errors
    ///
    /// [`FlowError::SubmitInFlight`] if called re-entrantly, otherwise the
    /// first backend/gateway failure.
    #[instrument(skip_all, fields(event = %event.id, quantity = valid.quantity))]
    pub async fn submit(
        &self,
        event: &Event,
        valid: ValidRegistration,
    ) -> Result<FlowOutcome, FlowError> {
        // At most one in-flight submit: a double-click must not produce a
        // second create-booking call.
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(FlowError::SubmitInFlight);
        }
        // The guard clears the flag even when this future is dropped
        // mid-await; otherwise an abandoned submit would lock the flow out
        // of all future attempts.
        let _guard = InFlightGuard(&self.in_flight);
        self.run(event, valid).await
    }

    async fn run(
        &self,
        event: &Event,
        valid: ValidRegistration,
    ) -> Result<FlowOutcome, FlowError> {
        let key = IdempotencyKey::mint();
        let email = valid.buyer.email.clone();

        self.transition(FlowState::CreatingBooking);
        let request = CreateRegistration {
            event_id: event.id.clone(),
            quantity: valid.quantity,
            buyer: valid.buyer.clone(),
        };
        let registration = match self.api.create_registration(&request, &key).await {
            Ok(registration) => registration,
            Err(ApiError::AlreadyRegistered(existing)) => {
                debug!(status = %existing.status, "existing registration reported");
                self.transition(FlowState::Failed);
                return Ok(FlowOutcome::AlreadyRegistered {
                    status: existing.status,
                    message: ApiError::already_registered_message(existing.status),
                });
            }
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(FlowState::CreatingOrder);
        let order = match self.api.start_payment(&registration.id).await {
            Ok(order) => order,
            Err(e) => return Err(self.fail(e)),
        };

        self.transition(FlowState::AwaitingCheckout);
        let outcome = self
            .gateway
            .open(CheckoutRequest {
                key_id: order.key_id.clone(),
                order_id: order.order_id.clone(),
                amount: order.amount,
                description: event.title.clone(),
                prefill: valid.buyer,
                registration_id: registration.id.clone(),
            })
            .await;

        match outcome {
            Ok(CheckoutOutcome::Completed) => {
                self.transition(FlowState::PendingWebhook);
                Ok(FlowOutcome::PendingConfirmation {
                    registration_id: registration.id,
                    email,
                })
            }
            Ok(CheckoutOutcome::Dismissed) => {
                debug!("checkout dismissed by user");
                self.transition(FlowState::Dismissed);
                Ok(FlowOutcome::Dismissed)
            }
            Err(e) => {
                self.transition(FlowState::Failed);
                Err(e.into())
            }
        }
    }

    fn fail(&self, error: ApiError) -> FlowError {
        warn!(error = %error, "booking flow failed");
        self.transition(FlowState::Failed);
        FlowError::Api(error)
    }

    fn transition(&self, next: FlowState) {
        // send_replace never fails even with no subscribers.
        self.state.send_replace(next);
    }
}

/// Clears the submit guard on completion or mid-await drop.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
