//! Command implementations.

pub mod auth;
pub mod clubs;
pub mod events;
pub mod register;
pub mod status;

use gatherly_client::{ApiClient, ClientConfig, FileStore, Session};

/// Build the shared client: config from the environment, session from the
/// user config directory.
pub(crate) fn client() -> Result<(ClientConfig, ApiClient), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let session = Session::new(Box::new(FileStore::default_path()?));
    let client = ApiClient::new(&config, session)?;
    Ok((config, client))
}
