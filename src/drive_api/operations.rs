use tracing::{debug, info};

use crate::error::Result;
use crate::types::TrashState;

use super::client::{check_status, DriveClient};

// Download file content, one body chunk at a time, into memory
pub async fn download_file(client: &DriveClient, file_id: &str) -> Result<Vec<u8>> {
    let response = client
        .http
        .get(client.file_url(file_id))
        .query(&[("alt", "media")])
        .bearer_auth(client.bearer().await?)
        .send()
        .await?;
    let mut response = check_status(response).await?;

    let mut content = Vec::new();
    let mut chunks = 0usize;
    while let Some(chunk) = response.chunk().await? {
        content.extend_from_slice(&chunk);
        chunks += 1;
    }

    debug!(file_id, bytes = content.len(), chunks, "downloaded");
    Ok(content)
}

// Move a file to trash: fetch the flag, flip it, send the modified body back
pub async fn trash_file(client: &DriveClient, file_id: &str) -> Result<()> {
    let url = client.file_url(file_id);

    let response = client
        .http
        .get(&url)
        .query(&[("fields", "trashed")])
        .bearer_auth(client.bearer().await?)
        .send()
        .await?;
    let mut state: TrashState = check_status(response).await?.json().await?;
    state.trashed = true;

    let response = client
        .http
        .patch(&url)
        .bearer_auth(client.bearer().await?)
        .json(&state)
        .send()
        .await?;
    check_status(response).await?;

    info!(file_id, "trashed");
    Ok(())
}
