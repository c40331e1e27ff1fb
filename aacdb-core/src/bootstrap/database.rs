//! Administrative connection setup

use mongodb::{
    bson::doc,
    options::{ClientOptions, Credential},
    Client,
};
use std::time::Duration;
use tracing::{error, info};

use crate::{Config, Result};

/// Driver options for the administrative client
///
/// Admin credentials from `mongo.username`/`mongo.password` are set on the
/// options directly, so passwords with reserved URI characters need no
/// encoding.
pub async fn client_options(config: &Config) -> Result<ClientOptions> {
    let mut options = ClientOptions::parse(config.mongo_uri()).await?;
    options.app_name = Some(config.mongo.app_name.clone());
    options.connect_timeout = Some(Duration::from_secs(config.mongo.connect_timeout_seconds));
    options.server_selection_timeout = Some(Duration::from_secs(
        config.mongo.server_selection_timeout_seconds,
    ));

    if let Some(username) = &config.mongo.username {
        options.credential = Some(
            Credential::builder()
                .username(username.clone())
                .password(config.mongo.password.clone())
                .build(),
        );
    }

    Ok(options)
}

/// Build a client from configuration and verify the server answers
///
/// Retrying the connection is left to the caller's environment.
pub async fn connect(config: &Config) -> Result<Client> {
    let options = client_options(config).await?;

    let hosts: Vec<String> = options.hosts.iter().map(ToString::to_string).collect();
    info!("Connecting to MongoDB at {}", hosts.join(","));

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| {
            error!("Failed to reach MongoDB: {}", e);
            e
        })?;

    info!("MongoDB connected successfully");
    Ok(client)
}
