//! Sign-in, sign-up, and sign-out.
//!
//! Tokens never cross the public API surface: a successful sign-in writes
//! the access token straight into the injected [`crate::session::Session`]
//! and callers only receive the authenticated [`User`].

use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::api::types::{AuthSession, AuthWire};
use crate::error::ApiError;
use crate::http::ApiClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUp<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// `ApiError::Status { status: 401, .. }` on bad credentials.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let wire: AuthWire = self
            .post_json("/auth/signin", &Credentials { email, password }, &[])
            .await?;
        self.install(wire)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Propagates backend validation failures (duplicate email, weak
    /// password) with the backend's message.
    #[instrument(skip_all, fields(email = %email))]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let wire: AuthWire = self
            .post_json(
                "/auth/signup",
                &SignUp {
                    name,
                    email,
                    password,
                },
                &[],
            )
            .await?;
        self.install(wire)
    }

    /// Sign out. The local session is cleared even when the backend call
    /// fails; a revocation failure must not leave the client signed in.
    #[instrument(skip_all)]
    pub async fn sign_out(&self) {
        let result: Result<serde_json::Value, ApiError> =
            self.post_json("/auth/signout", &serde_json::json!({}), &[]).await;
        if let Err(e) = result {
            debug!(error = %e, "server-side sign-out failed, clearing locally");
        }
        self.session().clear();
    }

    fn install(&self, wire: AuthWire) -> Result<AuthSession, ApiError> {
        self.session()
            .set_token(SecretString::from(wire.access_token));
        Ok(AuthSession { user: wire.user })
    }
}
