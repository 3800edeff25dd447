use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_PROJECT_NAME: &str = "Trello Import";

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub planka: PlankaConfig,
    pub trello: Option<TrelloConfig>,
    #[serde(default)]
    pub import: ImportOptions,
}

#[derive(Debug, Deserialize)]
pub struct PlankaConfig {
    pub server_url: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct TrelloConfig {
    pub api_key: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Import into this Planka project instead of creating a new one.
    pub existing_project_id: Option<String>,
    pub created_project_name: String,
    pub import_archived_items: bool,
    pub fetch_attachments: bool,
    pub attachments_dir: PathBuf,
    /// Append every created mapping to this file as JSON lines.
    pub report_file: Option<PathBuf>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            existing_project_id: None,
            created_project_name: DEFAULT_PROJECT_NAME.to_string(),
            import_archived_items: false,
            fetch_attachments: false,
            attachments_dir: std::env::temp_dir().join("trello2planka"),
            report_file: None,
        }
    }
}

impl AppConfig {
    /// Checks the whole configuration once, before anything talks to a server.
    pub fn validate(&self) -> Result<()> {
        reqwest::Url::parse(&self.planka.server_url)
            .with_context(|| format!("Invalid planka.server_url {:?}", self.planka.server_url))?;
        if self.planka.username.trim().is_empty() || self.planka.password.is_empty() {
            bail!("planka.username and planka.password must be set");
        }

        if self.import.fetch_attachments {
            match &self.trello {
                Some(t) if !t.api_key.trim().is_empty() && !t.token.trim().is_empty() => {}
                _ => bail!("import.fetch_attachments requires [trello] api_key and token"),
            }
        }

        if let Some(id) = &self.import.existing_project_id {
            if id.trim().is_empty() {
                bail!("import.existing_project_id must not be empty when set");
            }
        }
        if self.import.created_project_name.trim().is_empty() {
            bail!("import.created_project_name must not be empty");
        }
        Ok(())
    }
}

pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}

pub fn data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".trello2planka")
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents)?;
    Ok(config)
}
