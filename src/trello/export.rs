use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::config::ImportOptions;
use crate::model::trello::{
    TrelloAction, TrelloBoard, TrelloCard, TrelloCheckItem, TrelloLabel, TrelloList,
    COMMENT_ACTION,
};

/// Read-only view over a Trello JSON export.
#[derive(Debug)]
pub struct TrelloExport {
    board: TrelloBoard,
}

impl TrelloExport {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read Trello export {}", path.display()))?;
        let board: TrelloBoard = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse Trello export {}", path.display()))?;
        Ok(Self::from_board(board))
    }

    pub fn from_board(board: TrelloBoard) -> Self {
        Self { board }
    }

    pub fn board_id(&self) -> &str {
        &self.board.id
    }

    pub fn board_name(&self) -> &str {
        &self.board.name
    }

    pub fn board_closed(&self) -> bool {
        self.board.closed
    }

    /// Lists in board order. Sorting is stable so equal positions keep export order.
    pub fn lists(&self, include_archived: bool) -> Vec<&TrelloList> {
        let mut lists: Vec<&TrelloList> = self
            .board
            .lists
            .iter()
            .filter(|l| include_archived || !l.closed)
            .collect();
        lists.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        lists
    }

    pub fn cards_of_list(&self, list_id: &str, include_archived: bool) -> Vec<&TrelloCard> {
        let mut cards: Vec<&TrelloCard> = self
            .board
            .cards
            .iter()
            .filter(|c| c.id_list == list_id)
            .filter(|c| include_archived || !c.closed)
            .collect();
        cards.sort_by(|a, b| a.pos.total_cmp(&b.pos));
        cards
    }

    /// Every check item of the card, across all of its checklists.
    ///
    /// Planka cards carry a single task list, so checklist grouping and names are dropped.
    pub fn check_items_of_card(&self, card_id: &str) -> Vec<&TrelloCheckItem> {
        let mut checklists: Vec<_> = self
            .board
            .checklists
            .iter()
            .filter(|cl| cl.id_card == card_id)
            .collect();
        checklists.sort_by(|a, b| a.pos.total_cmp(&b.pos));

        checklists
            .into_iter()
            .flat_map(|cl| {
                let mut items: Vec<&TrelloCheckItem> = cl.check_items.iter().collect();
                items.sort_by(|a, b| a.pos.total_cmp(&b.pos));
                items
            })
            .collect()
    }

    /// Comment actions on the card, in export order.
    pub fn comments_of_card(&self, card_id: &str) -> Vec<&TrelloAction> {
        self.board
            .actions
            .iter()
            .filter(|a| a.kind == COMMENT_ACTION)
            .filter(|a| a.data.card.as_ref().is_some_and(|c| c.id == card_id))
            .collect()
    }

    /// Distinct labels referenced by in-scope cards, in first-seen order.
    pub fn used_labels(&self, include_archived: bool) -> Vec<&TrelloLabel> {
        let mut seen = HashSet::new();
        let mut used = Vec::new();
        for list in self.lists(include_archived) {
            for card in self.cards_of_list(&list.id, include_archived) {
                for label in &card.labels {
                    if seen.insert(label.id.as_str()) {
                        used.push(label);
                    }
                }
            }
        }
        used
    }
}

/// What a run with the given options would create, without contacting Planka.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportPlan {
    pub labels: usize,
    pub lists: usize,
    pub cards: usize,
    pub card_labels: usize,
    pub tasks: usize,
    pub comments: usize,
    pub attachments: usize,
}

impl ImportPlan {
    pub fn of(export: &TrelloExport, options: &ImportOptions) -> Self {
        let archived = options.import_archived_items;
        let mut plan = ImportPlan {
            labels: export.used_labels(archived).len(),
            ..Default::default()
        };
        for list in export.lists(archived) {
            plan.lists += 1;
            for card in export.cards_of_list(&list.id, archived) {
                plan.cards += 1;
                plan.card_labels += card.labels.len();
                plan.tasks += export.check_items_of_card(&card.id).len();
                plan.comments += export.comments_of_card(&card.id).len();
                if options.fetch_attachments {
                    plan.attachments += card.attachments.len();
                }
            }
        }
        plan
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{sprint_board, SPRINT_BOARD};
    use super::*;

    fn export() -> TrelloExport {
        TrelloExport::from_board(sprint_board())
    }

    fn ids<T>(items: &[&T], id: impl Fn(&T) -> String) -> Vec<String> {
        items.iter().map(|i| id(i)).collect()
    }

    #[test]
    fn load_reads_export_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, SPRINT_BOARD).unwrap();
        let export = TrelloExport::load(&path).unwrap();
        assert_eq!(export.board_id(), "board1");
        assert_eq!(export.board_name(), "Sprint");
        assert!(!export.board_closed());
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = TrelloExport::load(&path).unwrap_err();
        assert!(err.to_string().contains("board.json"));
    }

    #[test]
    fn archived_lists_are_filtered_unless_requested() {
        let export = export();
        assert_eq!(ids(&export.lists(false), |l: &TrelloList| l.id.clone()), ["list-todo"]);
        assert_eq!(
            ids(&export.lists(true), |l: &TrelloList| l.id.clone()),
            ["list-old", "list-todo"]
        );
    }

    #[test]
    fn cards_are_sorted_by_position_and_filtered() {
        let mut board = sprint_board();
        let mut second = board.cards[0].clone();
        second.id = "card-first".into();
        second.pos = 0.25;
        let mut archived = board.cards[0].clone();
        archived.id = "card-archived".into();
        archived.closed = true;
        board.cards.push(second);
        board.cards.push(archived);
        let export = TrelloExport::from_board(board);

        assert_eq!(
            ids(&export.cards_of_list("list-todo", false), |c: &TrelloCard| c.id.clone()),
            ["card-first", "card-fix"]
        );
        assert_eq!(export.cards_of_list("list-todo", true).len(), 3);
    }

    #[test]
    fn check_items_are_flattened_across_checklists() {
        let mut board = sprint_board();
        let mut other = board.checklists[0].clone();
        other.id = "cl0".into();
        other.pos = 0.5;
        other.check_items.truncate(1);
        other.check_items[0].id = "ci0".into();
        board.checklists.push(other);
        let export = TrelloExport::from_board(board);

        let items = export.check_items_of_card("card-fix");
        assert_eq!(
            ids(&items, |i: &TrelloCheckItem| i.id.clone()),
            ["ci0", "ci1", "ci2"]
        );
        assert!(export.check_items_of_card("card-old").is_empty());
    }

    #[test]
    fn only_comment_actions_of_the_card_are_returned() {
        let export = export();
        let comments = export.comments_of_card("card-fix");
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, "act1");
        assert!(export.comments_of_card("card-old").is_empty());
    }

    #[test]
    fn used_labels_skip_unreferenced_and_out_of_scope_labels() {
        let export = export();
        let used = export.used_labels(false);
        assert_eq!(ids(&used, |l: &TrelloLabel| l.id.clone()), ["lbl-bug"]);

        let with_archived = export.used_labels(true);
        assert_eq!(
            ids(&with_archived, |l: &TrelloLabel| l.id.clone()),
            ["lbl-old", "lbl-bug"]
        );
    }

    #[test]
    fn used_labels_are_distinct() {
        let mut board = sprint_board();
        let mut twin = board.cards[0].clone();
        twin.id = "card-twin".into();
        twin.pos = 2.0;
        board.cards.push(twin);
        let export = TrelloExport::from_board(board);
        assert_eq!(export.used_labels(false).len(), 1);
    }

    #[test]
    fn plan_counts_in_scope_entities() {
        let export = export();
        let plan = ImportPlan::of(&export, &ImportOptions::default());
        assert_eq!(
            plan,
            ImportPlan {
                labels: 1,
                lists: 1,
                cards: 1,
                card_labels: 1,
                tasks: 2,
                comments: 1,
                attachments: 0,
            }
        );

        let options = ImportOptions {
            import_archived_items: true,
            ..Default::default()
        };
        let plan = ImportPlan::of(&export, &options);
        assert_eq!(plan.lists, 2);
        assert_eq!(plan.cards, 2);
        assert_eq!(plan.labels, 2);
    }
}
