//! Club listing and detail commands.

use gatherly_core::ClubId;

/// List clubs.
pub async fn list() -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = super::client()?;
    let snapshot = client.list_clubs().await?;

    if snapshot.items.is_empty() {
        println!("No clubs found.");
        return Ok(());
    }

    for club in snapshot.items.iter() {
        let city = club.city.as_deref().unwrap_or("-");
        println!("{:<16} {:<28} {}", club.id.as_str(), club.name, city);
    }
    Ok(())
}

/// Show one club and the events it is hosting.
pub async fn show(id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = super::client()?;
    let id = ClubId::new(id);

    let club = client.get_club(&id).await?;
    println!("{}", club.name);
    if let Some(city) = &club.city {
        println!("  city: {city}");
    }
    if !club.tags.is_empty() {
        println!("  tags: {}", club.tags.join(", "));
    }
    if let Some(description) = &club.description {
        println!("\n{description}");
    }

    let events = client.club_events(&id).await?;
    if events.is_empty() {
        println!("\nNo upcoming events.");
        return Ok(());
    }
    println!("\nUpcoming events:");
    for event in &events {
        let seats = if event.is_sold_out() {
            "sold out".to_owned()
        } else {
            format!("{} left", event.remaining())
        };
        println!("  {:<32} {:>10}  {}", event.slug, event.unit_price, seats);
    }
    Ok(())
}
