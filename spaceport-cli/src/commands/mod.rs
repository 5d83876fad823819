pub mod export;
pub mod import;
pub mod spaces;

pub use export::{run_export, ExportOptions};
pub use import::run_import;
pub use spaces::run_spaces;

use crate::prompt::read_password;
use crate::ConnectionArgs;
use anyhow::{Context, Result};
use spaceport::{ClientOptions, Config, Credentials, KibanaClient};

/// Build the client for a run: URL and username from flags or config, password prompted.
pub fn connect(config: &Config, connection: &ConnectionArgs) -> Result<KibanaClient> {
    let url = connection
        .url
        .clone()
        .or_else(|| config.instance.url.clone())
        .context("No instance URL given; pass --url or set instance.url in the config file")?;
    let username = connection
        .username
        .clone()
        .or_else(|| config.instance.username.clone())
        .context("No username given; pass --username or set instance.username in the config file")?;

    let password = read_password(&username)?;
    let credentials = Credentials {
        username,
        password,
    };

    let client = KibanaClient::new(&url, credentials, &ClientOptions::from(&config.instance))
        .with_context(|| format!("Cannot create client for {}", url))?;
    tracing::info!("Connecting to {} as {}", client.base_url(), client.username());
    Ok(client)
}
