//! Registration creation, payment-order creation, and status lookup.

use gatherly_core::{Email, IdempotencyKey, RegistrationId};
use serde::Serialize;
use tracing::instrument;

use crate::api::types::{
    CreateRegistration, PaymentOrder, PaymentOrderWire, Registration, RegistrationWire,
    StatusSnapshot, StatusWire,
};
use crate::error::ApiError;
use crate::flow::RegistrationApi;
use crate::http::ApiClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateRegistrationBody<'a> {
    event_id: &'a str,
    quantity: u32,
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    /// Also carried in the `Idempotency-Key` header; the body copy lets
    /// the backend reconcile proxied requests that drop headers.
    idempotency_key: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartPaymentBody<'a> {
    registration_id: &'a str,
}

impl ApiClient {
    /// Create (or, under a replayed key, fetch) a registration.
    ///
    /// The idempotency key travels both as the `Idempotency-Key` header
    /// and in the body. Replaying the same key returns the original
    /// registration instead of claiming seats twice.
    ///
    /// # Errors
    ///
    /// `ApiError::AlreadyRegistered` when this buyer already holds an
    /// active registration for the event, otherwise backend/transport
    /// failures.
    #[instrument(skip_all, fields(event = %request.event_id, quantity = request.quantity))]
    pub async fn create_registration(
        &self,
        request: &CreateRegistration,
        key: &IdempotencyKey,
    ) -> Result<Registration, ApiError> {
        let body = CreateRegistrationBody {
            event_id: request.event_id.as_str(),
            quantity: request.quantity,
            name: &request.buyer.name,
            email: request.buyer.email.as_str(),
            phone: request.buyer.phone.as_str(),
            idempotency_key: key.as_str(),
        };
        let wire: RegistrationWire = self
            .post_json(
                "/registrations",
                &body,
                &[("Idempotency-Key", key.as_str().to_owned())],
            )
            .await?;
        Ok(wire.normalize(&request.event_id))
    }

    /// Create a payment order for a pending registration.
    ///
    /// # Errors
    ///
    /// `ApiError::Malformed` when the backend response is missing the
    /// order id or amount, and `Malformed("publishable key id")` when
    /// neither the response nor the configuration carries a key.
    #[instrument(skip(self), fields(registration = %registration_id))]
    pub async fn start_payment(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<PaymentOrder, ApiError> {
        let body = StartPaymentBody {
            registration_id: registration_id.as_str(),
        };
        let wire: PaymentOrderWire = self.post_json("/payments/start", &body, &[]).await?;
        wire.normalize(self.inner.checkout_key_id.as_deref(), registration_id)
    }

    /// Guest status lookup by the durable `(registration id, email)` pair.
    /// Works without a signed-in session, so a confirmation link keeps
    /// working after the original browser session is gone.
    ///
    /// # Errors
    ///
    /// `ApiError::Status { status: 404, .. }` when the pair matches no
    /// registration.
    #[instrument(skip_all, fields(registration = %registration_id))]
    pub async fn registration_status(
        &self,
        registration_id: &RegistrationId,
        email: &Email,
    ) -> Result<StatusSnapshot, ApiError> {
        let wire: StatusWire = self
            .get_json(
                "/guest/status",
                &[
                    ("registrationId", registration_id.as_str().to_owned()),
                    ("email", email.as_str().to_owned()),
                ],
            )
            .await?;
        Ok(wire.normalize())
    }
}

impl RegistrationApi for ApiClient {
    async fn create_registration(
        &self,
        request: &CreateRegistration,
        key: &IdempotencyKey,
    ) -> Result<Registration, ApiError> {
        Self::create_registration(self, request, key).await
    }

    async fn start_payment(
        &self,
        registration_id: &RegistrationId,
    ) -> Result<PaymentOrder, ApiError> {
        Self::start_payment(self, registration_id).await
    }
}
