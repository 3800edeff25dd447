use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Planka wraps every single-entity response as `{ "item": ... }`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub item: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProject {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBoard {
    #[serde(skip)]
    pub project_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLabel {
    #[serde(skip)]
    pub board_id: String,
    pub name: Option<String>,
    pub color: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewList {
    #[serde(skip)]
    pub board_id: String,
    pub name: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    #[serde(skip)]
    pub board_id: String,
    pub list_id: String,
    pub position: f64,
    pub name: String,
    /// Sent as `null` when the source card has no description.
    pub description: Option<String>,
    /// Omitted entirely when the source card has no due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCardLabel {
    #[serde(skip)]
    pub card_id: String,
    pub label_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[serde(skip)]
    pub card_id: String,
    pub position: f64,
    pub name: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(skip)]
    pub card_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub user_id: String,
}

pub const BOARD_TYPE_KANBAN: &str = "kanban";
pub const COMMENT_CARD: &str = "commentCard";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct List {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardLabel {
    pub id: String,
    pub card_id: String,
    pub label_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommentAction {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(due_date: Option<DateTime<Utc>>, description: Option<&str>) -> NewCard {
        NewCard {
            board_id: "b1".into(),
            list_id: "l1".into(),
            position: 1.0,
            name: "Fix bug".into(),
            description: description.map(String::from),
            due_date,
        }
    }

    #[test]
    fn card_without_due_date_omits_field_but_keeps_null_description() {
        let json = serde_json::to_value(card(None, None)).unwrap();
        assert!(json.get("dueDate").is_none());
        assert!(json.get("description").unwrap().is_null());
        assert!(json.get("boardId").is_none());
        assert_eq!(json["listId"], "l1");
    }

    #[test]
    fn card_with_due_date_serializes_it() {
        let due = "2024-03-01T12:00:00Z".parse().unwrap();
        let json = serde_json::to_value(card(Some(due), Some("details"))).unwrap();
        assert_eq!(json["dueDate"], "2024-03-01T12:00:00Z");
        assert_eq!(json["description"], "details");
    }

    #[test]
    fn envelope_unwraps_item() {
        let json = r#"{"item":{"id":"42","name":"Sprint","position":1},"included":{}}"#;
        let board: Envelope<Board> = serde_json::from_str(json).unwrap();
        assert_eq!(board.item.id, "42");
        assert_eq!(board.item.name, "Sprint");
    }
}
