//! Error types for backend API interactions.

use gatherly_core::BookingStatus;
use thiserror::Error;

use crate::api::types::Registration;

/// Errors that can occur when calling the booking backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend returned a non-success status without a recognized code.
    /// `message` prefers the backend's own `error`/`message` body field
    /// over a generic transport string.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Backend-provided or synthesized message.
        message: String,
    },

    /// The buyer already has a registration for this event. Recovered
    /// locally into an informational message keyed off the existing
    /// booking's status; never fatal.
    #[error("already registered for this event ({})", .0.status)]
    AlreadyRegistered(Box<Registration>),

    /// Response body did not parse as the expected JSON shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Response parsed but a required field was missing after
    /// normalization (e.g. no order id in a payment order).
    #[error("malformed response: missing {0}")]
    Malformed(&'static str),
}

impl ApiError {
    /// The user-facing conflict message for an existing registration.
    #[must_use]
    pub fn already_registered_message(status: BookingStatus) -> String {
        match status {
            BookingStatus::Confirmed => {
                "You're already booked for this event.".to_owned()
            }
            BookingStatus::Pending => {
                "A payment for this event is already in progress. \
                 Check your email for the outcome, or try again in a few minutes."
                    .to_owned()
            }
            BookingStatus::Cancelled => {
                "Your earlier registration for this event was cancelled. \
                 You can register again.".to_owned()
            }
            BookingStatus::Refunded => {
                "Your earlier registration for this event was refunded. \
                 You can register again.".to_owned()
            }
            BookingStatus::Failed | BookingStatus::Expired => {
                "Your earlier attempt didn't complete. Please try again.".to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display_uses_backend_message() {
        let err = ApiError::Status {
            status: 503,
            message: "event capacity changed, please retry".to_owned(),
        };
        assert_eq!(err.to_string(), "event capacity changed, please retry");
    }

    #[test]
    fn test_conflict_messages_key_off_status() {
        let confirmed = ApiError::already_registered_message(BookingStatus::Confirmed);
        assert!(confirmed.contains("already booked"));

        let pending = ApiError::already_registered_message(BookingStatus::Pending);
        assert!(pending.contains("already in progress"));

        let refunded = ApiError::already_registered_message(BookingStatus::Refunded);
        assert!(refunded.contains("refunded"));
    }
}
