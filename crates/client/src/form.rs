//! Registration form validation.
//!
//! Everything here is local: a validation failure blocks submission with a
//! field-level message and no network call is made until every field
//! passes. Capacity math works off the currently loaded event snapshot;
//! the backend re-checks everything on submission.

use gatherly_core::{Email, EmailError, Phone, PhoneError, PhoneLimits, Price};
use thiserror::Error;

use crate::api::types::{Buyer, Event};

/// Minimum trimmed length for the buyer name.
const MIN_NAME_LEN: usize = 2;

/// Field-level validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("please enter your full name (at least {MIN_NAME_LEN} characters)")]
    NameTooShort,
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error(transparent)]
    Phone(#[from] PhoneError),
    #[error("this event is sold out")]
    SoldOut,
    #[error("please select at least 1 ticket")]
    QuantityZero,
    #[error("you can book up to {max} ticket(s) right now")]
    QuantityTooLarge {
        /// Current selectable maximum: `min(per-user cap, remaining)`.
        max: u32,
    },
}

/// Validation limits supplied by configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormLimits {
    pub phone: PhoneLimits,
}

/// Capacity and pricing snapshot of the event being booked.
#[derive(Debug, Clone, Copy)]
pub struct EventSnapshot {
    pub total_slots: u32,
    pub booked_slots: u32,
    pub per_user_cap: u32,
    pub unit_price: Price,
}

impl EventSnapshot {
    /// Seats still available: `max(0, total - booked)`.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.total_slots.saturating_sub(self.booked_slots)
    }

    /// Whether the form should render a sold-out state with submission
    /// disabled entirely.
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.remaining() == 0
    }

    /// Largest quantity the form should offer.
    #[must_use]
    pub fn max_selectable(&self) -> u32 {
        self.per_user_cap.min(self.remaining())
    }
}

impl From<&Event> for EventSnapshot {
    fn from(event: &Event) -> Self {
        Self {
            total_slots: event.total_slots,
            booked_slots: event.booked_slots,
            per_user_cap: event.per_user_cap,
            unit_price: event.unit_price,
        }
    }
}

impl Event {
    /// Capacity/pricing snapshot for form validation.
    #[must_use]
    pub fn snapshot(&self) -> EventSnapshot {
        EventSnapshot::from(self)
    }
}

/// Raw buyer identity as typed into the form.
#[derive(Debug, Clone, Default)]
pub struct BuyerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// A registration form: buyer identity plus ticket quantity.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub buyer: BuyerInput,
    pub quantity: u32,
}

/// A fully validated registration, ready for the booking flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub buyer: Buyer,
    pub quantity: u32,
    /// Display total: `unit_price * quantity`. The backend remains
    /// authoritative for the charged amount.
    pub total: Price,
}

impl RegistrationForm {
    /// Validate every field against the event snapshot.
    ///
    /// # Errors
    ///
    /// Returns the first field-level failure. Submission must be blocked
    /// until this returns `Ok`; only then may the booking flow run.
    pub fn validate(
        &self,
        snapshot: &EventSnapshot,
        limits: &FormLimits,
    ) -> Result<ValidRegistration, FormError> {
        let name = self.buyer.name.trim();
        if name.len() < MIN_NAME_LEN {
            return Err(FormError::NameTooShort);
        }

        let email = Email::parse(&self.buyer.email)?;
        let phone = Phone::parse(&self.buyer.phone, limits.phone)?;

        if snapshot.is_sold_out() {
            return Err(FormError::SoldOut);
        }
        if self.quantity == 0 {
            return Err(FormError::QuantityZero);
        }
        let max = snapshot.max_selectable();
        if self.quantity > max {
            return Err(FormError::QuantityTooLarge { max });
        }

        Ok(ValidRegistration {
            buyer: Buyer {
                name: name.to_owned(),
                email,
                phone,
            },
            quantity: self.quantity,
            total: snapshot.unit_price * self.quantity,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use gatherly_core::Currency;

    fn snapshot(total: u32, booked: u32) -> EventSnapshot {
        EventSnapshot {
            total_slots: total,
            booked_slots: booked,
            per_user_cap: 4,
            unit_price: Price::new(50_000, Currency::Inr),
        }
    }

    fn form(quantity: u32) -> RegistrationForm {
        RegistrationForm {
            buyer: BuyerInput {
                name: "Asha Rao".to_owned(),
                email: "asha@example.com".to_owned(),
                phone: "+91 98765 43210".to_owned(),
            },
            quantity,
        }
    }

    #[test]
    fn test_valid_submission() {
        let valid = form(2)
            .validate(&snapshot(10, 3), &FormLimits::default())
            .unwrap();
        assert_eq!(valid.buyer.name, "Asha Rao");
        assert_eq!(valid.buyer.phone.as_str(), "919876543210");
        assert_eq!(valid.quantity, 2);
        // quantity 2 at 50000 minor units each
        assert_eq!(valid.total.amount_minor, 100_000);
    }

    #[test]
    fn test_name_too_short() {
        let mut f = form(1);
        f.buyer.name = " a ".to_owned();
        assert_eq!(
            f.validate(&snapshot(10, 0), &FormLimits::default()),
            Err(FormError::NameTooShort)
        );
    }

    #[test]
    fn test_bad_email_is_field_level() {
        let mut f = form(1);
        f.buyer.email = "not-an-email".to_owned();
        assert!(matches!(
            f.validate(&snapshot(10, 0), &FormLimits::default()),
            Err(FormError::Email(_))
        ));
    }

    #[test]
    fn test_bad_phone_is_field_level() {
        let mut f = form(1);
        f.buyer.phone = "123".to_owned();
        assert!(matches!(
            f.validate(&snapshot(10, 0), &FormLimits::default()),
            Err(FormError::Phone(PhoneError::TooShort { .. }))
        ));
    }

    #[test]
    fn test_sold_out_disables_submission() {
        // totalSlots=10, bookedSlots=10 -> sold out
        let s = snapshot(10, 10);
        assert!(s.is_sold_out());
        assert_eq!(s.max_selectable(), 0);
        assert_eq!(
            form(1).validate(&s, &FormLimits::default()),
            Err(FormError::SoldOut)
        );
    }

    #[test]
    fn test_quantity_capped_by_remaining() {
        // 3 seats left, cap 4: remaining+1 = 4 must be rejected locally
        let s = snapshot(10, 7);
        assert_eq!(s.max_selectable(), 3);
        assert_eq!(
            form(4).validate(&s, &FormLimits::default()),
            Err(FormError::QuantityTooLarge { max: 3 })
        );
        assert!(form(3).validate(&s, &FormLimits::default()).is_ok());
    }

    #[test]
    fn test_quantity_capped_by_per_user_limit() {
        // plenty of seats, per-user cap still binds
        let s = snapshot(100, 0);
        assert_eq!(s.max_selectable(), 4);
        assert_eq!(
            form(5).validate(&s, &FormLimits::default()),
            Err(FormError::QuantityTooLarge { max: 4 })
        );
    }

    #[test]
    fn test_quantity_zero_rejected() {
        assert_eq!(
            form(0).validate(&snapshot(10, 0), &FormLimits::default()),
            Err(FormError::QuantityZero)
        );
    }
}
