use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::mapping::EntityKind;

/// One Trello entity and the Planka entity created for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEvent {
    pub kind: String,
    pub source_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,
    pub destination_id: String,
}

impl MappingEvent {
    pub fn new(
        kind: EntityKind,
        source_id: &str,
        source_name: Option<&str>,
        destination_id: &str,
    ) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            source_id: source_id.to_string(),
            source_name: source_name.map(String::from),
            destination_id: destination_id.to_string(),
        }
    }
}

/// Receives every mapping as it is created. Reporting never fails an import.
pub trait Reporter: Send + Sync {
    fn report(&self, event: &MappingEvent);
}

pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: &MappingEvent) {
        info!(
            kind = %event.kind,
            trello = %event.source_id,
            planka = %event.destination_id,
            name = event.source_name.as_deref().unwrap_or(""),
            "Imported"
        );
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LoggedEvent {
    timestamp: String,
    #[serde(flatten)]
    event: MappingEvent,
}

/// Appends each mapping to a file as one JSON object per line.
pub struct JsonlReporter {
    path: PathBuf,
}

impl JsonlReporter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn append(&self, event: &MappingEvent) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let line = serde_json::to_string(&LoggedEvent {
            timestamp: chrono::Utc::now().to_rfc3339(),
            event: event.clone(),
        })?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

impl Reporter for JsonlReporter {
    fn report(&self, event: &MappingEvent) {
        if let Err(e) = self.append(event) {
            warn!(path = %self.path.display(), error = %e, "Failed to write mapping report");
        }
    }
}

pub struct MultiReporter {
    reporters: Vec<Box<dyn Reporter>>,
}

impl MultiReporter {
    pub fn new(reporters: Vec<Box<dyn Reporter>>) -> Self {
        Self { reporters }
    }
}

impl Reporter for MultiReporter {
    fn report(&self, event: &MappingEvent) {
        for reporter in &self.reporters {
            reporter.report(event);
        }
    }
}
