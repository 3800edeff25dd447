//! Recreates a Trello board in Planka.
//!
//! Entities are created strictly in dependency order, one request at a time:
//! project and board, the labels in use, then each list followed depth-first by
//! its cards and everything hanging off each card. Every Trello id is recorded in
//! a run-scoped [`CorrespondenceTable`] so later entities can reference the Planka
//! ids created for earlier ones. The first failed request ends the run; entities
//! already created in Planka are left in place.

use anyhow::anyhow;
use tracing::{debug, info, warn};

use crate::config::ImportOptions;
use crate::error::ImportError;
use crate::mapping::{CorrespondenceTable, EntityKind};
use crate::model::planka::NewProject;
use crate::model::trello::{TrelloCard, TrelloList};
use crate::planka::Destination;
use crate::report::{MappingEvent, Reporter};
use crate::translate;
use crate::trello::export::TrelloExport;
use crate::trello::AttachmentSource;


/// Outcome of a run that created the whole hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub project_id: String,
    pub board_id: String,
    pub labels: usize,
    pub lists: usize,
    pub cards: usize,
    pub card_labels: usize,
    pub tasks: usize,
    pub comments: usize,
    pub attachments: usize,
}

pub struct Importer<'a> {
    destination: &'a dyn Destination,
    attachments: Option<&'a dyn AttachmentSource>,
    reporter: &'a dyn Reporter,
    options: &'a ImportOptions,
}

/// State owned by a single run.
struct ImportRun<'e> {
    export: &'e TrelloExport,
    table: CorrespondenceTable,
    user_id: String,
    board_id: String,
}

impl<'a> Importer<'a> {
    pub fn new(
        destination: &'a dyn Destination,
        attachments: Option<&'a dyn AttachmentSource>,
        reporter: &'a dyn Reporter,
        options: &'a ImportOptions,
    ) -> Self {
        Self {
            destination,
            attachments,
            reporter,
            options,
        }
    }

    pub async fn run(&self, export: &TrelloExport) -> Result<ImportSummary, ImportError> {
        info!(
            board = export.board_name(),
            archived = self.options.import_archived_items,
            attachments = self.options.fetch_attachments,
            "Starting import"
        );

        if self.options.fetch_attachments && self.attachments.is_none() {
            return Err(ImportError::Setup(anyhow!(
                "attachment fetching is enabled but no Trello client is configured"
            )));
        }
        let me = self
            .destination
            .get_current_user()
            .await
            .map_err(ImportError::Setup)?;
        debug!(user = %me.id, "Importing as Planka user");

        let (project_id, board_id) = self.import_project_and_board(export).await?;
        let mut run = ImportRun {
            export,
            table: CorrespondenceTable::new(),
            user_id: me.id,
            board_id,
        };

        self.import_labels(&mut run).await?;
        self.import_lists(&mut run).await?;

        let summary = ImportSummary {
            project_id,
            board_id: run.board_id.clone(),
            labels: run.table.len(EntityKind::Label),
            lists: run.table.len(EntityKind::List),
            cards: run.table.len(EntityKind::Card),
            card_labels: run.table.len(EntityKind::CardLabel),
            tasks: run.table.len(EntityKind::Task),
            comments: run.table.len(EntityKind::Comment),
            attachments: run.table.len(EntityKind::Attachment),
        };
        info!(?summary, "Import complete");
        Ok(summary)
    }

    async fn import_project_and_board(
        &self,
        export: &TrelloExport,
    ) -> Result<(String, String), ImportError> {
        let project_id = match &self.options.existing_project_id {
            Some(id) => id.clone(),
            None => {
                let name = &self.options.created_project_name;
                let project = self
                    .destination
                    .create_project(&NewProject { name: name.clone() })
                    .await
                    .map_err(ImportError::creation(EntityKind::Project, name))?;
                self.reporter.report(&MappingEvent::new(
                    EntityKind::Project,
                    name,
                    Some(&project.name),
                    &project.id,
                ));
                project.id
            }
        };

        let payload = translate::board(export.board_name(), export.board_closed(), &project_id);
        let board = self
            .destination
            .create_board(&payload)
            .await
            .map_err(ImportError::creation(EntityKind::Board, export.board_id()))?;
        info!(project = %project_id, board = %board.id, "Created Planka board");
        self.reporter.report(&MappingEvent::new(
            EntityKind::Board,
            export.board_id(),
            Some(export.board_name()),
            &board.id,
        ));
        Ok((project_id, board.id))
    }

    async fn import_labels(&self, run: &mut ImportRun<'_>) -> Result<(), ImportError> {
        let export = run.export;
        for (index, label) in export
            .used_labels(self.options.import_archived_items)
            .into_iter()
            .enumerate()
        {
            let payload = translate::label(label, &run.board_id, index);
            let created = self
                .destination
                .create_label(&payload)
                .await
                .map_err(ImportError::creation(EntityKind::Label, &label.id))?;
            run.table.put(EntityKind::Label, &label.id, &created.id)?;
            self.reporter.report(&MappingEvent::new(
                EntityKind::Label,
                &label.id,
                label.name.as_deref(),
                &created.id,
            ));
        }
        info!(count = run.table.len(EntityKind::Label), "Labels imported");
        Ok(())
    }

    async fn import_lists(&self, run: &mut ImportRun<'_>) -> Result<(), ImportError> {
        let export = run.export;
        for list in export.lists(self.options.import_archived_items) {
            let payload = translate::list(list, &run.board_id);
            let created = self
                .destination
                .create_list(&payload)
                .await
                .map_err(ImportError::creation(EntityKind::List, &list.id))?;
            run.table.put(EntityKind::List, &list.id, &created.id)?;
            self.reporter.report(&MappingEvent::new(
                EntityKind::List,
                &list.id,
                Some(&list.name),
                &created.id,
            ));

            self.import_cards(run, list).await?;
        }
        Ok(())
    }

    async fn import_cards(
        &self,
        run: &mut ImportRun<'_>,
        list: &TrelloList,
    ) -> Result<(), ImportError> {
        let export = run.export;
        let list_id = run.table.get(EntityKind::List, &list.id)?.to_string();
        for card in export.cards_of_list(&list.id, self.options.import_archived_items) {
            let payload = translate::card(card, &run.board_id, &list_id);
            let created = self
                .destination
                .create_card(&payload)
                .await
                .map_err(ImportError::creation(EntityKind::Card, &card.id))?;
            run.table.put(EntityKind::Card, &card.id, &created.id)?;
            self.reporter.report(&MappingEvent::new(
                EntityKind::Card,
                &card.id,
                Some(&card.name),
                &created.id,
            ));

            self.import_card_labels(run, card).await?;
            self.import_tasks(run, card).await?;
            self.import_comments(run, card).await?;
            self.import_attachments(run, card).await?;
        }
        debug!(list = %list.id, "List imported");
        Ok(())
    }

    async fn import_card_labels(
        &self,
        run: &mut ImportRun<'_>,
        card: &TrelloCard,
    ) -> Result<(), ImportError> {
        let card_id = run.table.get(EntityKind::Card, &card.id)?.to_string();
        for label in &card.labels {
            let label_id = run.table.get(EntityKind::Label, &label.id)?;
            let payload = translate::card_label(&card_id, label_id);
            let link_key = format!("{}/{}", card.id, label.id);
            let created = self
                .destination
                .create_card_label(&payload)
                .await
                .map_err(ImportError::creation(EntityKind::CardLabel, &link_key))?;
            run.table.put(EntityKind::CardLabel, &link_key, &created.id)?;
            self.reporter.report(&MappingEvent::new(
                EntityKind::CardLabel,
                &link_key,
                label.name.as_deref(),
                &created.id,
            ));
        }
        Ok(())
    }

    /// Check items from every checklist of the card land in one flat task list.
    async fn import_tasks(
        &self,
        run: &mut ImportRun<'_>,
        card: &TrelloCard,
    ) -> Result<(), ImportError> {
        let export = run.export;
        let card_id = run.table.get(EntityKind::Card, &card.id)?.to_string();
        for item in export.check_items_of_card(&card.id) {
            let payload = translate::task(item, &card_id);
            let created = self
                .destination
                .create_task(&payload)
                .await
                .map_err(ImportError::creation(EntityKind::Task, &item.id))?;
            run.table.put(EntityKind::Task, &item.id, &created.id)?;
            self.reporter.report(&MappingEvent::new(
                EntityKind::Task,
                &item.id,
                Some(&item.name),
                &created.id,
            ));
        }
        Ok(())
    }

    async fn import_comments(
        &self,
        run: &mut ImportRun<'_>,
        card: &TrelloCard,
    ) -> Result<(), ImportError> {
        let export = run.export;
        let card_id = run.table.get(EntityKind::Card, &card.id)?.to_string();
        let mut comments = export.comments_of_card(&card.id);
        // Stable: comments posted at the same instant keep their export order.
        comments.sort_by_key(|action| action.date);

        for action in comments {
            let payload = translate::comment(action, &card_id, &run.user_id);
            let created = self
                .destination
                .create_comment(&payload)
                .await
                .map_err(ImportError::creation(EntityKind::Comment, &action.id))?;
            run.table.put(EntityKind::Comment, &action.id, &created.id)?;
            self.reporter.report(&MappingEvent::new(
                EntityKind::Comment,
                &action.id,
                None,
                &created.id,
            ));
        }
        Ok(())
    }

    async fn import_attachments(
        &self,
        run: &mut ImportRun<'_>,
        card: &TrelloCard,
    ) -> Result<(), ImportError> {
        if !self.options.fetch_attachments {
            return Ok(());
        }
        let Some(fetcher) = self.attachments else {
            return Ok(());
        };
        let card_id = run.table.get(EntityKind::Card, &card.id)?.to_string();

        for attachment in &card.attachments {
            let downloaded = fetcher
                .download_attachment(&card.id, &attachment.id, attachment.file_name())
                .await;

            let destination_id = if attachment.is_upload {
                let file = downloaded.map_err(|source| ImportError::Download {
                    attachment_id: attachment.id.clone(),
                    source,
                })?;
                self.destination
                    .create_attachment(&card_id, &file, attachment.file_name())
                    .await
                    .map_err(ImportError::creation(EntityKind::Attachment, &attachment.id))?
                    .id
            } else {
                // Trello keeps no stored file behind a link.
                if let Err(e) = downloaded {
                    warn!(attachment = %attachment.id, error = %e, "Link attachment not downloadable");
                }
                debug!(attachment = %attachment.id, "Link attachment, importing as comment");
                let payload = translate::link_comment(attachment, &card_id, &run.user_id);
                self.destination
                    .create_comment(&payload)
                    .await
                    .map_err(ImportError::creation(EntityKind::Attachment, &attachment.id))?
                    .id
            };
            run.table
                .put(EntityKind::Attachment, &attachment.id, &destination_id)?;
            self.reporter.report(&MappingEvent::new(
                EntityKind::Attachment,
                &attachment.id,
                Some(&attachment.name),
                &destination_id,
            ));
        }
        Ok(())
    }
}
