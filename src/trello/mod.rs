pub mod client;
pub mod export;

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Fetches attachment bytes from Trello into local storage.
#[async_trait]
pub trait AttachmentSource: Send + Sync {
    /// Downloads the attachment and returns where it was written.
    async fn download_attachment(
        &self,
        card_id: &str,
        attachment_id: &str,
        file_name: &str,
    ) -> Result<PathBuf>;
}
