//! Booking status enum.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a registration, owned entirely by the backend.
///
/// The client never mutates this - it only observes transitions driven by
/// webhook-confirmed payment, expiry, or cancellation. Wire form is
/// SCREAMING_SNAKE_CASE (`"CONFIRMED"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created, payment not yet confirmed by the gateway webhook.
    #[default]
    Pending,
    /// Payment captured and confirmed.
    Confirmed,
    /// Cancelled before payment completed.
    Cancelled,
    /// Paid and subsequently refunded.
    Refunded,
    /// Payment attempt failed.
    Failed,
    /// Pending registration that outlived its hold on capacity.
    Expired,
}

impl BookingStatus {
    /// Whether the status is terminal - once observed, no further state
    /// transition will ever happen and polling must stop.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Whether this registration still counts against the
    /// one-active-registration-per-user-per-event invariant.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Refunded => "REFUNDED",
            Self::Failed => "FAILED",
            Self::Expired => "EXPIRED",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let parsed: BookingStatus = serde_json::from_str("\"CONFIRMED\"").unwrap();
        assert_eq!(parsed, BookingStatus::Confirmed);
        assert_eq!(
            serde_json::to_string(&BookingStatus::Expired).unwrap(),
            "\"EXPIRED\""
        );
    }

    #[test]
    fn test_only_pending_is_non_terminal() {
        assert!(!BookingStatus::Pending.is_terminal());
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::Cancelled,
            BookingStatus::Refunded,
            BookingStatus::Failed,
            BookingStatus::Expired,
        ] {
            assert!(status.is_terminal(), "{status} should be terminal");
        }
    }

    #[test]
    fn test_active_statuses() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Refunded.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
