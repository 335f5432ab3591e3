//! Domain types for the booking backend API.
//!
//! The backend has accumulated more than one spelling for several concepts
//! (`coverImageUrl`/`imageUrl`/`image`, `orderId`/`razorpayOrderId`,
//! `amountMinor`/`amount`). Raw wire structs accept every spelling and a
//! single normalization step collapses them into one canonical typed record
//! per entity, applied once at the API boundary. Everything outside this
//! module sees only the canonical types.

use chrono::{DateTime, Utc};
use gatherly_core::{
    BookingStatus, ClubId, Currency, Email, EventId, OrderId, Phone, Price, RegistrationId, UserId,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

// =============================================================================
// Canonical records
// =============================================================================

/// Buyer identity collected by the registration form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Buyer {
    /// Full name, trimmed, at least 2 characters.
    pub name: String,
    /// Confirmation email address.
    pub email: Email,
    /// Contact phone, normalized to bare digits.
    pub phone: Phone,
}

/// A bookable event.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    /// URL-safe identifier used for detail lookups. Falls back to the id
    /// when the backend does not assign one.
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub venue: Option<String>,
    /// Total capacity.
    pub total_slots: u32,
    /// Seats already claimed by active registrations.
    pub booked_slots: u32,
    /// Price per ticket.
    pub unit_price: Price,
    /// Per-user ticket cap enforced client-side before submission.
    pub per_user_cap: u32,
    pub image_url: Option<String>,
    /// Hosting club, present when the query asked to include it.
    pub club: Option<ClubSummary>,
}

impl Event {
    /// Seats still available: `max(0, total - booked)`.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total_slots.saturating_sub(self.booked_slots)
    }

    /// Whether no capacity is left.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.remaining() == 0
    }
}

/// A social club hosting events.
#[derive(Debug, Clone)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub description: Option<String>,
    pub city: Option<String>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

/// Compact club reference embedded in an event.
#[derive(Debug, Clone)]
pub struct ClubSummary {
    pub id: ClubId,
    pub name: String,
    pub city: Option<String>,
}

/// A registration (booking) as held by the backend. The client only ever
/// holds a read-only copy; status transitions are backend-driven.
#[derive(Debug, Clone)]
pub struct Registration {
    pub id: RegistrationId,
    pub event_id: EventId,
    pub quantity: u32,
    pub status: BookingStatus,
    pub total_price: Price,
}

/// Short-lived capability object passed straight into the checkout
/// gateway. Not persisted; used once.
#[derive(Debug, Clone)]
pub struct PaymentOrder {
    /// Gateway order reference.
    pub order_id: OrderId,
    /// Publishable key for the hosted checkout.
    pub key_id: String,
    /// Amount the gateway will charge.
    pub amount: Price,
    /// The registration this order pays for.
    pub registration_id: RegistrationId,
}

/// Snapshot returned by the status endpoint while awaiting webhook
/// confirmation.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub status: BookingStatus,
    pub quantity: u32,
    pub total_price: Price,
}

/// Authenticated user as reported by the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

/// Result of a successful sign-in or sign-up. The access token itself is
/// written to the [`crate::session::Session`], never returned to callers.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
}

/// Request payload for creating a registration.
#[derive(Debug, Clone)]
pub struct CreateRegistration {
    pub event_id: EventId,
    pub quantity: u32,
    pub buyer: Buyer,
}

/// Query parameters for listing events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventQuery {
    /// Only events with remaining capacity.
    pub only_available: bool,
    /// Embed the hosting club summary.
    pub include_club: bool,
    /// Backend sort key (e.g. `"startAt"`).
    pub sort: Option<String>,
    pub limit: Option<u32>,
}

impl EventQuery {
    /// Stable cache key for this query.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "events:avail={}:club={}:sort={}:limit={}",
            self.only_available,
            self.include_club,
            self.sort.as_deref().unwrap_or("-"),
            self.limit.map_or_else(|| "-".to_owned(), |l| l.to_string()),
        )
    }
}

// =============================================================================
// Wire shapes + normalization
// =============================================================================

/// List responses arrive either wrapped (`{items: [...]}`) or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ListWire<T> {
    Wrapped { items: Vec<T> },
    Bare(Vec<T>),
}

impl<T> ListWire<T> {
    pub(crate) fn into_items(self) -> Vec<T> {
        match self {
            Self::Wrapped { items } | Self::Bare(items) => items,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EventWire {
    id: String,
    slug: Option<String>,
    #[serde(alias = "name")]
    title: String,
    description: Option<String>,
    #[serde(alias = "startAt")]
    starts_at: Option<DateTime<Utc>>,
    #[serde(alias = "location")]
    venue: Option<String>,
    #[serde(alias = "capacity")]
    total_slots: Option<u32>,
    /// Misnamed upstream in places; always the booked *count*.
    #[serde(alias = "bookedCount")]
    booked_slots: Option<u32>,
    // Price aliases, preferred first.
    unit_price_minor: Option<i64>,
    registration_fee: Option<i64>,
    price_minor: Option<i64>,
    currency: Option<Currency>,
    per_user_cap: Option<u32>,
    // Image aliases, preferred first.
    cover_image_url: Option<String>,
    image_url: Option<String>,
    image: Option<String>,
    club: Option<ClubSummaryWire>,
}

impl EventWire {
    pub(crate) fn normalize(self) -> Event {
        let currency = self.currency.unwrap_or_default();
        let amount_minor = self
            .unit_price_minor
            .or(self.registration_fee)
            .or(self.price_minor)
            .unwrap_or(0);
        Event {
            slug: self.slug.unwrap_or_else(|| self.id.clone()),
            id: EventId::new(self.id),
            title: self.title,
            description: self.description,
            starts_at: self.starts_at,
            venue: self.venue,
            total_slots: self.total_slots.unwrap_or(0),
            booked_slots: self.booked_slots.unwrap_or(0),
            unit_price: Price::new(amount_minor, currency),
            per_user_cap: self.per_user_cap.unwrap_or(4),
            image_url: self.cover_image_url.or(self.image_url).or(self.image),
            club: self.club.map(ClubSummaryWire::normalize),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClubWire {
    id: String,
    name: String,
    description: Option<String>,
    city: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    cover_image_url: Option<String>,
    image_url: Option<String>,
    image: Option<String>,
}

impl ClubWire {
    pub(crate) fn normalize(self) -> Club {
        Club {
            id: ClubId::new(self.id),
            name: self.name,
            description: self.description,
            city: self.city,
            tags: self.tags,
            image_url: self.cover_image_url.or(self.image_url).or(self.image),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClubSummaryWire {
    id: String,
    name: String,
    city: Option<String>,
}

impl ClubSummaryWire {
    fn normalize(self) -> ClubSummary {
        ClubSummary {
            id: ClubId::new(self.id),
            name: self.name,
            city: self.city,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrationWire {
    #[serde(alias = "registrationId", alias = "bookingId")]
    id: String,
    event_id: Option<String>,
    quantity: Option<u32>,
    #[serde(default)]
    status: BookingStatus,
    #[serde(alias = "amountMinor")]
    total_price_minor: Option<i64>,
    currency: Option<Currency>,
}

impl RegistrationWire {
    pub(crate) fn normalize(self, fallback_event: &EventId) -> Registration {
        Registration {
            id: RegistrationId::new(self.id),
            event_id: self
                .event_id
                .map_or_else(|| fallback_event.clone(), EventId::new),
            quantity: self.quantity.unwrap_or(1),
            status: self.status,
            total_price: Price::new(
                self.total_price_minor.unwrap_or(0),
                self.currency.unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentOrderWire {
    key_id: Option<String>,
    order_id: Option<String>,
    razorpay_order_id: Option<String>,
    amount_minor: Option<i64>,
    amount: Option<i64>,
    currency: Option<Currency>,
    registration_id: Option<String>,
}

impl PaymentOrderWire {
    /// Normalize, failing when the gateway handoff would be impossible.
    pub(crate) fn normalize(
        self,
        fallback_key: Option<&str>,
        fallback_registration: &RegistrationId,
    ) -> Result<PaymentOrder, ApiError> {
        let order_id = self
            .order_id
            .or(self.razorpay_order_id)
            .ok_or(ApiError::Malformed("order id"))?;
        let key_id = self
            .key_id
            .or_else(|| fallback_key.map(str::to_owned))
            .ok_or(ApiError::Malformed("publishable key id"))?;
        let amount_minor = self
            .amount_minor
            .or(self.amount)
            .ok_or(ApiError::Malformed("order amount"))?;
        Ok(PaymentOrder {
            order_id: OrderId::new(order_id),
            key_id,
            amount: Price::new(amount_minor, self.currency.unwrap_or_default()),
            registration_id: self
                .registration_id
                .map_or_else(|| fallback_registration.clone(), RegistrationId::new),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusWire {
    status: BookingStatus,
    quantity: Option<u32>,
    total_price_minor: Option<i64>,
    currency: Option<Currency>,
}

impl StatusWire {
    pub(crate) fn normalize(self) -> StatusSnapshot {
        StatusSnapshot {
            status: self.status,
            quantity: self.quantity.unwrap_or(1),
            total_price: Price::new(
                self.total_price_minor.unwrap_or(0),
                self.currency.unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthWire {
    pub(crate) access_token: String,
    pub(crate) user: User,
}

/// Conflict body shape for `409 {error: "already_registered", registration}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ConflictWire {
    pub(crate) error: String,
    pub(crate) registration: Option<RegistrationWire>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_event_normalization_collapses_aliases() {
        let wire: EventWire = serde_json::from_str(
            r#"{
                "id": "evt_1",
                "name": "Supper Club Night",
                "startAt": "2026-09-01T19:00:00Z",
                "capacity": 12,
                "bookedCount": 3,
                "registrationFee": 50000,
                "imageUrl": "https://cdn.example/evt_1.jpg"
            }"#,
        )
        .unwrap();
        let event = wire.normalize();

        assert_eq!(event.id.as_str(), "evt_1");
        assert_eq!(event.slug, "evt_1"); // falls back to id
        assert_eq!(event.title, "Supper Club Night");
        assert_eq!(event.total_slots, 12);
        assert_eq!(event.booked_slots, 3);
        assert_eq!(event.remaining(), 9);
        assert_eq!(event.unit_price, Price::new(50_000, Currency::Inr));
        assert_eq!(event.per_user_cap, 4); // default
        assert_eq!(event.image_url.as_deref(), Some("https://cdn.example/evt_1.jpg"));
    }

    #[test]
    fn test_event_image_fallback_prefers_cover() {
        let wire: EventWire = serde_json::from_str(
            r#"{
                "id": "evt_2",
                "title": "Wine Tasting",
                "coverImageUrl": "https://cdn.example/cover.jpg",
                "imageUrl": "https://cdn.example/other.jpg"
            }"#,
        )
        .unwrap();
        assert_eq!(
            wire.normalize().image_url.as_deref(),
            Some("https://cdn.example/cover.jpg")
        );
    }

    #[test]
    fn test_remaining_never_underflows() {
        let wire: EventWire = serde_json::from_str(
            r#"{"id": "evt_3", "title": "Overbooked", "capacity": 10, "bookedSlots": 14}"#,
        )
        .unwrap();
        let event = wire.normalize();
        assert_eq!(event.remaining(), 0);
        assert!(event.is_sold_out());
    }

    #[test]
    fn test_payment_order_normalization() {
        let wire: PaymentOrderWire = serde_json::from_str(
            r#"{
                "keyId": "rzp_test_abc",
                "razorpayOrderId": "order_9",
                "amountMinor": 100000,
                "currency": "INR",
                "registrationId": "reg_1"
            }"#,
        )
        .unwrap();
        let order = wire
            .normalize(None, &RegistrationId::new("reg_fallback"))
            .unwrap();
        assert_eq!(order.order_id.as_str(), "order_9");
        assert_eq!(order.amount.amount_minor, 100_000);
        assert_eq!(order.registration_id.as_str(), "reg_1");
    }

    #[test]
    fn test_payment_order_missing_order_id_is_malformed() {
        let wire: PaymentOrderWire =
            serde_json::from_str(r#"{"keyId": "rzp_test_abc", "amount": 100}"#).unwrap();
        let err = wire
            .normalize(None, &RegistrationId::new("reg_1"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Malformed("order id")));
    }

    #[test]
    fn test_payment_order_key_falls_back_to_config() {
        let wire: PaymentOrderWire =
            serde_json::from_str(r#"{"orderId": "order_1", "amount": 100}"#).unwrap();
        let order = wire
            .normalize(Some("rzp_env_key"), &RegistrationId::new("reg_1"))
            .unwrap();
        assert_eq!(order.key_id, "rzp_env_key");
    }

    #[test]
    fn test_list_wire_accepts_both_shapes() {
        let wrapped: ListWire<serde_json::Value> =
            serde_json::from_str(r#"{"items": [1, 2]}"#).unwrap();
        assert_eq!(wrapped.into_items().len(), 2);

        let bare: ListWire<serde_json::Value> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(bare.into_items().len(), 3);
    }

    #[test]
    fn test_event_query_cache_key_is_stable() {
        let a = EventQuery {
            only_available: true,
            limit: Some(50),
            ..EventQuery::default()
        };
        let b = a.clone();
        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), EventQuery::default().cache_key());
    }
}
