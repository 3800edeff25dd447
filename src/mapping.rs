use std::collections::HashMap;
use std::fmt;

use crate::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Board,
    Label,
    List,
    Card,
    CardLabel,
    Task,
    Comment,
    Attachment,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Board => "board",
            EntityKind::Label => "label",
            EntityKind::List => "list",
            EntityKind::Card => "card",
            EntityKind::CardLabel => "card label",
            EntityKind::Task => "task",
            EntityKind::Comment => "comment",
            EntityKind::Attachment => "attachment",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run-scoped map from Trello ids to the ids of the Planka entities created for them.
///
/// Entries are write-once: a Trello id can be mapped once per kind and is never
/// updated or removed afterwards.
#[derive(Debug, Default)]
pub struct CorrespondenceTable {
    entries: HashMap<EntityKind, HashMap<String, String>>,
}

impl CorrespondenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(
        &mut self,
        kind: EntityKind,
        source_id: &str,
        destination_id: &str,
    ) -> Result<(), ImportError> {
        let by_kind = self.entries.entry(kind).or_default();
        if by_kind.contains_key(source_id) {
            return Err(ImportError::DuplicateMapping {
                kind,
                source_id: source_id.to_string(),
            });
        }
        by_kind.insert(source_id.to_string(), destination_id.to_string());
        Ok(())
    }

    /// A miss means an entity was referenced before its phase created it.
    pub fn get(&self, kind: EntityKind, source_id: &str) -> Result<&str, ImportError> {
        self.entries
            .get(&kind)
            .and_then(|by_kind| by_kind.get(source_id))
            .map(String::as_str)
            .ok_or_else(|| ImportError::UnmappedReference {
                kind,
                source_id: source_id.to_string(),
            })
    }

    pub fn len(&self, kind: EntityKind) -> usize {
        self.entries.get(&kind).map_or(0, HashMap::len)
    }
}
