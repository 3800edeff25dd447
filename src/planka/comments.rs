use crate::model::trello::TrelloAction;

/// Text for a Planka comment recreated from a Trello comment action.
///
/// Planka attributes the comment to the importing user, so the original author
/// and date go into a footer.
pub fn imported_comment_text(action: &TrelloAction) -> String {
    let text = action.data.text.as_deref().unwrap_or_default();
    let author = action
        .member_creator
        .as_ref()
        .map(|m| match (m.full_name.as_deref(), m.username.as_deref()) {
            (Some(full), Some(user)) => format!("{full} ({user})"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => "unknown".to_string(),
        })
        .unwrap_or_else(|| "unknown".to_string());

    format!(
        "{text}\n\n---\n*Note: imported comment, originally posted by {author} on {}*",
        action.date.format("%Y-%m-%d %H:%M UTC")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::trello::{ActionCard, ActionData, TrelloMember};

    fn action(member: Option<TrelloMember>) -> TrelloAction {
        TrelloAction {
            id: "a1".into(),
            kind: "commentCard".into(),
            date: "2024-01-01T10:30:00Z".parse().unwrap(),
            data: ActionData {
                text: Some("Looks like a race".into()),
                card: Some(ActionCard { id: "c1".into() }),
            },
            member_creator: member,
        }
    }

    #[test]
    fn keeps_text_and_names_original_author() {
        let text = imported_comment_text(&action(Some(TrelloMember {
            full_name: Some("Ada Lovelace".into()),
            username: Some("ada".into()),
        })));
        assert!(text.starts_with("Looks like a race\n"));
        assert!(text.contains("Ada Lovelace (ada)"));
        assert!(text.contains("2024-01-01 10:30 UTC"));
    }

    #[test]
    fn unknown_author_is_labelled() {
        let text = imported_comment_text(&action(None));
        assert!(text.contains("originally posted by unknown"));
    }
}
