//! End-to-end registration: validate, book, pay, confirm.

use gatherly_client::{
    BookingFlow, BuyerInput, FlowOutcome, PollOutcome, RegistrationForm, cancel_pair, poll_status,
};
use gatherly_core::{Email, RegistrationId};

use crate::checkout::TerminalCheckout;

/// Register for an event and drive payment through to confirmation.
pub async fn run(
    slug: &str,
    name: &str,
    email: &str,
    phone: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let (config, client) = super::client()?;

    let event = client.get_event(slug).await?;
    println!("{}: {} per ticket, {} seats left", event.title, event.unit_price, event.remaining());

    let form = RegistrationForm {
        buyer: BuyerInput {
            name: name.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
        },
        quantity,
    };
    let valid = form.validate(&event.snapshot(), &config.form_limits())?;
    println!(
        "Booking {} ticket(s) for {} ({} total).",
        valid.quantity, valid.buyer.name, valid.total
    );

    let flow = BookingFlow::new(client.clone(), TerminalCheckout::new());
    match flow.submit(&event, valid).await? {
        FlowOutcome::PendingConfirmation {
            registration_id,
            email,
        } => {
            println!("\nPayment received. Waiting for confirmation...");
            await_confirmation(&client, &config, &registration_id, &email).await;
        }
        FlowOutcome::Dismissed => {
            println!("\nPayment cancelled. No charge was made; you can register again any time.");
        }
        FlowOutcome::AlreadyRegistered { message, .. } => {
            println!("\n{message}");
        }
    }
    Ok(())
}

/// Poll the booking until it settles, times out, or the user hits Ctrl-C.
pub(crate) async fn await_confirmation(
    client: &gatherly_client::ApiClient,
    config: &gatherly_client::ClientConfig,
    registration_id: &RegistrationId,
    email: &Email,
) {
    let (canceller, cancel) = cancel_pair();
    let ctrl_c = canceller.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let outcome = poll_status(
        || client.registration_status(registration_id, email),
        config.poll,
        cancel,
    )
    .await;

    match outcome {
        PollOutcome::Confirmed(snapshot) => {
            println!(
                "Booking confirmed: {} ticket(s), {}. See you there!",
                snapshot.quantity, snapshot.total_price
            );
        }
        PollOutcome::Ended { status, .. } => {
            println!("Booking ended as {status}. If you were charged, a refund will follow.");
        }
        PollOutcome::TimedOut => {
            println!(
                "Still waiting on the payment provider. Check back later with:\n  \
                 gatherly status {} {}",
                registration_id.as_str(),
                email.as_str()
            );
        }
        PollOutcome::Failed(e) => {
            println!(
                "Could not check the booking ({e}). Check back later with:\n  \
                 gatherly status {} {}",
                registration_id.as_str(),
                email.as_str()
            );
        }
        PollOutcome::Cancelled => {
            println!(
                "Stopped watching. Your booking is unaffected; check it with:\n  \
                 gatherly status {} {}",
                registration_id.as_str(),
                email.as_str()
            );
        }
    }
}
