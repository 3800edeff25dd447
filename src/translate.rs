//! Pure Trello → Planka payload translation. Parent ids are resolved by the caller.

use crate::model::planka::{
    NewBoard, NewCard, NewCardLabel, NewComment, NewLabel, NewList, NewTask, BOARD_TYPE_KANBAN,
    COMMENT_CARD,
};
use crate::model::trello::{
    TrelloAction, TrelloAttachment, TrelloCard, TrelloCheckItem, TrelloLabel, TrelloList,
    COMPLETE_STATE,
};
use crate::planka::comments::imported_comment_text;
use crate::planka::labels::label_color;

pub const ARCHIVED_MARKER: &str = "[ARCHIVED] ";

pub fn item_name(name: &str, archived: bool) -> String {
    if archived {
        format!("{ARCHIVED_MARKER}{name}")
    } else {
        name.to_string()
    }
}

pub fn board(name: &str, archived: bool, project_id: &str) -> NewBoard {
    NewBoard {
        project_id: project_id.to_string(),
        name: item_name(name, archived),
        kind: BOARD_TYPE_KANBAN.to_string(),
        position: 1.0,
    }
}

/// Labels are positioned by their index in the used-labels sequence.
pub fn label(label: &TrelloLabel, board_id: &str, index: usize) -> NewLabel {
    NewLabel {
        board_id: board_id.to_string(),
        name: label.name.clone().filter(|n| !n.is_empty()),
        color: label_color(label.color.as_deref()).to_string(),
        position: index as f64,
    }
}

pub fn list(list: &TrelloList, board_id: &str) -> NewList {
    NewList {
        board_id: board_id.to_string(),
        name: item_name(&list.name, list.closed),
        position: list.pos,
    }
}

pub fn card(card: &TrelloCard, board_id: &str, list_id: &str) -> NewCard {
    NewCard {
        board_id: board_id.to_string(),
        list_id: list_id.to_string(),
        position: card.pos,
        name: item_name(&card.name, card.closed),
        description: card.desc.clone().filter(|d| !d.is_empty()),
        due_date: card.due,
    }
}

pub fn card_label(card_id: &str, label_id: &str) -> NewCardLabel {
    NewCardLabel {
        card_id: card_id.to_string(),
        label_id: label_id.to_string(),
    }
}

pub fn task(item: &TrelloCheckItem, card_id: &str) -> NewTask {
    NewTask {
        card_id: card_id.to_string(),
        position: item.pos,
        name: item.name.clone(),
        is_completed: item.state == COMPLETE_STATE,
    }
}

pub fn comment(action: &TrelloAction, card_id: &str, user_id: &str) -> NewComment {
    comment_with_text(imported_comment_text(action), card_id, user_id)
}

/// Planka has no link-only attachments, so they become a markdown link comment.
pub fn link_comment(attachment: &TrelloAttachment, card_id: &str, user_id: &str) -> NewComment {
    comment_with_text(
        format!("[{}]({})", attachment.name, attachment.url),
        card_id,
        user_id,
    )
}

fn comment_with_text(text: String, card_id: &str, user_id: &str) -> NewComment {
    NewComment {
        card_id: card_id.to_string(),
        kind: COMMENT_CARD.to_string(),
        text,
        user_id: user_id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trello_card(closed: bool, desc: Option<&str>) -> TrelloCard {
        TrelloCard {
            id: "c1".into(),
            name: "Fix bug".into(),
            desc: desc.map(String::from),
            due: None,
            closed,
            pos: 16384.0,
            id_list: "l1".into(),
            labels: vec![],
            attachments: vec![],
        }
    }

    fn check_item(state: &str) -> TrelloCheckItem {
        TrelloCheckItem {
            id: "i1".into(),
            name: "write test".into(),
            pos: 3.0,
            state: state.into(),
        }
    }

    #[test]
    fn archived_items_get_marker() {
        assert_eq!(item_name("Todo", false), "Todo");
        assert_eq!(item_name("Todo", true), "[ARCHIVED] Todo");
    }

    #[test]
    fn board_is_a_kanban_at_first_position() {
        let b = board("Sprint", true, "p1");
        assert_eq!(b.name, "[ARCHIVED] Sprint");
        assert_eq!(b.kind, "kanban");
        assert_eq!(b.project_id, "p1");
        assert_eq!(b.position, 1.0);
    }

    #[test]
    fn list_keeps_position_and_marks_archived() {
        let l = list(
            &TrelloList {
                id: "l1".into(),
                name: "Done".into(),
                closed: true,
                pos: 65535.5,
            },
            "b1",
        );
        assert_eq!(l.name, "[ARCHIVED] Done");
        assert_eq!(l.position, 65535.5);
        assert_eq!(l.board_id, "b1");
    }

    #[test]
    fn label_maps_color_and_uses_index_as_position() {
        let l = label(
            &TrelloLabel {
                id: "t1".into(),
                name: Some("bug".into()),
                color: Some("red".into()),
            },
            "b1",
            2,
        );
        assert_eq!(l.name.as_deref(), Some("bug"));
        assert_eq!(l.color, "berry-red");
        assert_eq!(l.position, 2.0);
    }

    #[test]
    fn unnamed_colorless_label_still_translates() {
        let l = label(
            &TrelloLabel {
                id: "t1".into(),
                name: Some(String::new()),
                color: None,
            },
            "b1",
            0,
        );
        assert_eq!(l.name, None);
        assert_eq!(l.color, crate::planka::labels::FALLBACK_COLOR);
    }

    #[test]
    fn card_passes_nullable_fields_through() {
        let c = card(&trello_card(false, Some("")), "b1", "pl1");
        assert_eq!(c.description, None);
        assert_eq!(c.due_date, None);
        assert_eq!(c.list_id, "pl1");
        assert_eq!(c.name, "Fix bug");

        let c = card(&trello_card(true, Some("steps")), "b1", "pl1");
        assert_eq!(c.description.as_deref(), Some("steps"));
        assert_eq!(c.name, "[ARCHIVED] Fix bug");
    }

    #[test]
    fn only_complete_state_completes_a_task() {
        assert!(task(&check_item("complete"), "c1").is_completed);
        assert!(!task(&check_item("incomplete"), "c1").is_completed);
        assert!(!task(&check_item("Complete"), "c1").is_completed);
        assert!(!task(&check_item("someday"), "c1").is_completed);
        assert_eq!(task(&check_item("complete"), "c1").position, 3.0);
    }

    #[test]
    fn link_comment_is_markdown_link() {
        let attachment = TrelloAttachment {
            id: "a1".into(),
            name: "Design doc".into(),
            url: "https://example.com/doc".into(),
            file_name: None,
            is_upload: false,
        };
        let c = link_comment(&attachment, "pc1", "u1");
        assert_eq!(c.text, "[Design doc](https://example.com/doc)");
        assert_eq!(c.kind, "commentCard");
        assert_eq!(c.user_id, "u1");
        assert_eq!(c.card_id, "pc1");
    }
}
