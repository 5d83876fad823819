//! Space directory: read-only view of the spaces on an instance.

use crate::client::KibanaClient;
use crate::error::Result;
use crate::space::Space;
use reqwest::StatusCode;
use tracing::{debug, instrument};

const SPACES_PATH: &str = "api/spaces/space";

/// List every space on the instance, in the order the instance returns them.
#[instrument(skip(client), fields(instance = %client.base_url()))]
pub async fn list_spaces(client: &KibanaClient) -> Result<Vec<Space>> {
    let response = client.get(client.api_url(SPACES_PATH)?).send().await?;
    let response = KibanaClient::check(response, "Listing spaces").await?;
    let spaces: Vec<Space> = response.json().await?;
    debug!("Found {} spaces", spaces.len());
    Ok(spaces)
}

/// Look up one space; `None` when the instance answers 404.
#[instrument(skip(client), fields(instance = %client.base_url()))]
pub async fn get_space(client: &KibanaClient, space_id: &str) -> Result<Option<Space>> {
    let url = client.api_url(&format!("{}/{}", SPACES_PATH, space_id))?;
    let response = client.get(url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let response = KibanaClient::check(response, &format!("Looking up space '{}'", space_id)).await?;
    Ok(Some(response.json().await?))
}
