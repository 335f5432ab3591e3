//! Hosted checkout gateway seam.
//!
//! The payment provider's checkout is an opaque third-party surface. It is
//! modeled here as a single result-producing async operation instead of a
//! pair of independent callbacks: `open` resolves to a tagged
//! [`CheckoutOutcome`] once the user either completes the client-side
//! handshake or closes the checkout.

use gatherly_core::{OrderId, Price, RegistrationId};

use crate::api::types::Buyer;

/// Everything the hosted checkout needs to charge one payment order.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Publishable key identifying the merchant account.
    pub key_id: String,
    /// Gateway order reference; the amount is bound to it server-side.
    pub order_id: OrderId,
    /// Amount for display; ignored by the gateway when an order id is set.
    pub amount: Price,
    /// Human-readable purpose (the event title).
    pub description: String,
    /// Buyer contact, prefilled into the checkout.
    pub prefill: Buyer,
    /// Registration reference carried through as gateway notes.
    pub registration_id: RegistrationId,
}

/// How the checkout interaction ended, from the client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The browser-side handshake completed. This does NOT mean payment
    /// was captured - confirmation arrives asynchronously via webhook and
    /// must be observed through the status poller.
    Completed,
    /// The user closed the checkout without completing payment. No
    /// booking mutation occurred.
    Dismissed,
}

/// Errors from the gateway itself (as opposed to user dismissal).
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The checkout runtime could not be prepared.
    #[error("checkout failed to load: {0}")]
    Load(String),
    /// The gateway reported a failure during the interaction.
    #[error("payment failed: {0}")]
    Gateway(String),
}

/// A hosted checkout implementation.
///
/// Implementations must be safe to call concurrently: any one-time
/// preparation (the hosted runtime loads exactly once process-wide) has to
/// be guarded so concurrent opens share a single load, e.g. via
/// `tokio::sync::OnceCell`.
pub trait CheckoutGateway {
    /// Open the checkout for one payment order and wait for its outcome.
    fn open(
        &self,
        request: CheckoutRequest,
    ) -> impl Future<Output = Result<CheckoutOutcome, CheckoutError>> + Send;
}
