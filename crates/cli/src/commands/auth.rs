//! Sign-in, sign-up, and sign-out commands.

/// Sign in and store the session.
pub async fn sign_in(email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = super::client()?;
    let auth = client.sign_in(email, password).await?;
    println!("Signed in as {} <{}>.", auth.user.name, auth.user.email);
    Ok(())
}

/// Create an account, sign in, and store the session.
pub async fn sign_up(
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = super::client()?;
    let auth = client.sign_up(name, email, password).await?;
    println!("Welcome, {}! You are signed in.", auth.user.name);
    Ok(())
}

/// Sign out and discard the stored session.
pub async fn sign_out() -> Result<(), Box<dyn std::error::Error>> {
    let (_, client) = super::client()?;
    client.sign_out().await;
    println!("Signed out.");
    Ok(())
}
