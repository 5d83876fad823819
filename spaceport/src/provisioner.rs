//! Make sure a space exists on the destination before objects are imported into it.

use crate::client::KibanaClient;
use crate::directory::get_space;
use crate::error::Result;
use crate::space::Space;
use tracing::{info, instrument};

const SPACES_PATH: &str = "api/spaces/space";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    Created,
    AlreadyExists,
}

/// Create `space` on the instance unless a space with its id already exists.
///
/// The creation request carries the full record from the manifest, so the
/// recreated space keeps its name, colour and other settings. Neither the
/// lookup nor the creation is retried.
#[instrument(skip_all, fields(space = %space.id))]
pub async fn ensure_space(client: &KibanaClient, space: &Space) -> Result<Provisioned> {
    if get_space(client, &space.id).await?.is_some() {
        info!("Space {} already exists", space.id);
        return Ok(Provisioned::AlreadyExists);
    }

    let body = space.creation_body()?;
    let response = client
        .post(client.api_url(SPACES_PATH)?)
        .json(&body)
        .send()
        .await?;
    KibanaClient::check(response, &format!("Creating space '{}'", space.id)).await?;

    info!("Space {} created", space.id);
    Ok(Provisioned::Created)
}
