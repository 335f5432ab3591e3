//! Booking status lookup.

use gatherly_core::{BookingStatus, Email, RegistrationId};

use super::register::await_confirmation;

/// Check a booking by the `(registration id, email)` pair from the
/// confirmation screen. With `--watch`, poll until it settles.
pub async fn run(
    registration_id: &str,
    email: &str,
    watch: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = super::client()?;
    let registration_id = RegistrationId::new(registration_id);
    let email = Email::parse(email)?;

    if watch {
        await_confirmation(&client, &config, &registration_id, &email).await;
        return Ok(());
    }

    let snapshot = client.registration_status(&registration_id, &email).await?;
    println!(
        "{}: {} ticket(s), {}",
        snapshot.status, snapshot.quantity, snapshot.total_price
    );
    if snapshot.status == BookingStatus::Pending {
        println!("Payment is still being confirmed. Re-run with --watch to keep polling.");
    }
    Ok(())
}
