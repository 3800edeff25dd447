use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::AttachmentSource;

const BASE_URL: &str = "https://api.trello.com/1";

pub struct TrelloClient {
    api_key: String,
    token: String,
    client: reqwest::Client,
    base_url: String,
    download_dir: PathBuf,
}

#[derive(Deserialize)]
struct Member {
    id: String,
    #[serde(default)]
    username: Option<String>,
}

impl TrelloClient {
    pub fn new(api_key: String, token: String, download_dir: PathBuf) -> Self {
        Self {
            api_key,
            token,
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
            download_dir,
        }
    }

    fn auth_params(&self) -> [(&str, &str); 2] {
        [("key", &self.api_key), ("token", &self.token)]
    }

    /// Attachment downloads only accept OAuth-style credentials in a header.
    fn oauth_header(&self) -> String {
        format!(
            "OAuth oauth_consumer_key=\"{}\", oauth_token=\"{}\"",
            self.api_key, self.token
        )
    }

    /// Checks the credentials before the import creates anything.
    pub async fn verify(&self) -> Result<()> {
        let member: Member = self
            .client
            .get(format!("{}/members/me", self.base_url))
            .query(&self.auth_params())
            .send()
            .await
            .context("Trello members/me failed")?
            .error_for_status()
            .context("Trello rejected the configured api_key/token")?
            .json()
            .await?;
        debug!(
            member = %member.id,
            username = member.username.as_deref().unwrap_or(""),
            "Trello credentials verified"
        );
        Ok(())
    }
}

/// Local path for a downloaded attachment: `{dir}/{card}/{attachment}/{file}`.
pub fn attachment_path(dir: &Path, card_id: &str, attachment_id: &str, file_name: &str) -> PathBuf {
    // Strip any directory components smuggled in through the file name.
    let file_name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| attachment_id.to_string());
    dir.join(card_id).join(attachment_id).join(file_name)
}

#[async_trait]
impl AttachmentSource for TrelloClient {
    async fn download_attachment(
        &self,
        card_id: &str,
        attachment_id: &str,
        file_name: &str,
    ) -> Result<PathBuf> {
        let url = format!(
            "{}/cards/{card_id}/attachments/{attachment_id}/download/{}",
            self.base_url,
            urlencoding::encode(file_name)
        );

        let resp = self
            .client
            .get(&url)
            .header("Authorization", self.oauth_header())
            .send()
            .await
            .with_context(|| format!("Trello attachment download failed for {attachment_id}"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("Trello returned {status} for attachment {attachment_id}");
        }
        let bytes = resp.bytes().await?;

        let path = attachment_path(&self.download_dir, card_id, attachment_id, file_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        tokio::fs::write(&path, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(attachment = attachment_id, path = %path.display(), bytes = bytes.len(), "Attachment downloaded");
        Ok(path)
    }
}
