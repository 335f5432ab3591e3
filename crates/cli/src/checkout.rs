//! Terminal-based checkout gateway.
//!
//! The hosted checkout is a browser surface; in a terminal the handoff
//! becomes an interactive prompt. The user completes payment out of band
//! (the gateway's hosted page, keyed by the printed order id) and then
//! confirms here, or declines to dismiss the checkout without charge.

use gatherly_client::{CheckoutError, CheckoutGateway, CheckoutOutcome, CheckoutRequest};
use tokio::sync::OnceCell;
use tracing::debug;

/// Interactive checkout driven over stdin/stdout.
pub struct TerminalCheckout {
    ready: OnceCell<()>,
}

impl TerminalCheckout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ready: OnceCell::const_new(),
        }
    }

    /// One-time preparation, shared across concurrent opens.
    async fn prepare(&self, key_id: &str) -> Result<(), CheckoutError> {
        let key_id = key_id.to_owned();
        self.ready
            .get_or_try_init(|| async move {
                if key_id.is_empty() {
                    return Err(CheckoutError::Load(
                        "no publishable checkout key configured".to_owned(),
                    ));
                }
                debug!(key_id, "checkout prepared");
                Ok(())
            })
            .await?;
        Ok(())
    }
}

impl Default for TerminalCheckout {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutGateway for TerminalCheckout {
    async fn open(&self, request: CheckoutRequest) -> Result<CheckoutOutcome, CheckoutError> {
        self.prepare(&request.key_id).await?;

        println!();
        println!("Payment for: {}", request.description);
        println!("  order:  {}", request.order_id);
        println!("  amount: {}", request.amount);
        println!("  payer:  {} <{}>", request.prefill.name, request.prefill.email);
        println!();
        println!("Complete the payment, then press Enter. Type 'c' to cancel.");

        let line = read_line().await?;
        if line.trim().eq_ignore_ascii_case("c") {
            return Ok(CheckoutOutcome::Dismissed);
        }
        Ok(CheckoutOutcome::Completed)
    }
}

async fn read_line() -> Result<String, CheckoutError> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map(|_| line)
            .map_err(|e| CheckoutError::Gateway(e.to_string()))
    })
    .await
    .map_err(|e| CheckoutError::Gateway(e.to_string()))?
}
