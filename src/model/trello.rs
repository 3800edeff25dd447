use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A Trello board as produced by "Export as JSON".
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloBoard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub lists: Vec<TrelloList>,
    #[serde(default)]
    pub cards: Vec<TrelloCard>,
    #[serde(default)]
    pub checklists: Vec<TrelloChecklist>,
    #[serde(default)]
    pub actions: Vec<TrelloAction>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrelloLabel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloList {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub pos: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloCard {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub desc: Option<String>,
    #[serde(default)]
    pub due: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub pos: f64,
    pub id_list: String,
    #[serde(default)]
    pub labels: Vec<TrelloLabel>,
    #[serde(default)]
    pub attachments: Vec<TrelloAttachment>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloChecklist {
    pub id: String,
    pub id_card: String,
    #[serde(default)]
    pub pos: f64,
    #[serde(default)]
    pub check_items: Vec<TrelloCheckItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrelloCheckItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pos: f64,
    /// "complete" or "incomplete"; anything else is treated as incomplete.
    #[serde(default)]
    pub state: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloAction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub data: ActionData,
    #[serde(default)]
    pub member_creator: Option<TrelloMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionData {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub card: Option<ActionCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActionCard {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloMember {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrelloAttachment {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub is_upload: bool,
}

impl TrelloAttachment {
    /// The name to store the downloaded file under.
    pub fn file_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or(&self.name)
    }
}

pub const COMMENT_ACTION: &str = "commentCard";
pub const COMPLETE_STATE: &str = "complete";
