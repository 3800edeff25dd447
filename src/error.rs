use thiserror::Error;

use crate::mapping::EntityKind;

/// Failures that end an import run. There is no partial-success result.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("setup failed: {0:#}")]
    Setup(anyhow::Error),

    #[error("failed to read Trello export: {0:#}")]
    Export(anyhow::Error),

    #[error("failed to create {kind} for Trello {kind} {source_id}: {source:#}")]
    Creation {
        kind: EntityKind,
        source_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to download attachment {attachment_id}: {source:#}")]
    Download {
        attachment_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("no Planka {kind} was created for Trello {kind} {source_id}")]
    UnmappedReference { kind: EntityKind, source_id: String },

    #[error("Trello {kind} {source_id} was already imported")]
    DuplicateMapping { kind: EntityKind, source_id: String },
}

impl ImportError {
    pub fn creation(kind: EntityKind, source_id: &str) -> impl FnOnce(anyhow::Error) -> Self {
        let source_id = source_id.to_string();
        move |source| ImportError::Creation {
            kind,
            source_id,
            source,
        }
    }
}
