//! Event listing and detail commands.

use gatherly_client::{Event, EventQuery};

/// List events.
pub async fn list(
    available: bool,
    with_club: bool,
    limit: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = super::client()?;

    let query = EventQuery {
        only_available: available,
        include_club: with_club,
        sort: Some("startAt".to_owned()),
        limit,
    };
    let snapshot = client.list_events(&query).await?;

    if snapshot.items.is_empty() {
        println!("No events found.");
        return Ok(());
    }

    for event in snapshot.items.iter() {
        print_line(event);
    }
    Ok(())
}

/// Show one event in full.
pub async fn show(slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = super::client()?;
    let event = client.get_event(slug).await?;

    println!("{}", event.title);
    println!("  slug:      {}", event.slug);
    if let Some(starts_at) = event.starts_at {
        println!("  starts:    {}", starts_at.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(venue) = &event.venue {
        println!("  venue:     {venue}");
    }
    if let Some(club) = &event.club {
        match &club.city {
            Some(city) => println!("  club:      {} ({city})", club.name),
            None => println!("  club:      {}", club.name),
        }
    }
    println!("  price:     {} per ticket", event.unit_price);
    println!(
        "  capacity:  {} of {} seats left (max {} per person)",
        event.remaining(),
        event.total_slots,
        event.per_user_cap
    );
    if let Some(description) = &event.description {
        println!("\n{description}");
    }
    if event.is_sold_out() {
        println!("\nThis event is sold out.");
    }
    Ok(())
}

fn print_line(event: &Event) {
    let when = event
        .starts_at
        .map_or_else(|| "TBA".to_owned(), |t| t.format("%Y-%m-%d").to_string());
    let seats = if event.is_sold_out() {
        "sold out".to_owned()
    } else {
        format!("{} left", event.remaining())
    };
    println!(
        "{:<12} {:<32} {:>10}  {}",
        when, event.slug, event.unit_price, seats
    );
}
