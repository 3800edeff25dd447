pub mod client;
pub mod comments;
pub mod labels;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

use crate::model::planka::{
    Attachment, Board, Card, CardLabel, CommentAction, Label, List, NewBoard, NewCard,
    NewCardLabel, NewComment, NewLabel, NewList, NewProject, NewTask, Project, Task, User,
};

/// The Planka operations an import needs. Every call is attempted exactly once.
#[async_trait]
pub trait Destination: Send + Sync {
    async fn get_current_user(&self) -> Result<User>;
    async fn create_project(&self, project: &NewProject) -> Result<Project>;
    async fn create_board(&self, board: &NewBoard) -> Result<Board>;
    async fn create_label(&self, label: &NewLabel) -> Result<Label>;
    async fn create_list(&self, list: &NewList) -> Result<List>;
    async fn create_card(&self, card: &NewCard) -> Result<Card>;
    async fn create_card_label(&self, card_label: &NewCardLabel) -> Result<CardLabel>;
    async fn create_task(&self, task: &NewTask) -> Result<Task>;
    async fn create_comment(&self, comment: &NewComment) -> Result<CommentAction>;
    /// Uploads a file previously downloaded to `file` as an attachment of the card.
    async fn create_attachment(
        &self,
        card_id: &str,
        file: &Path,
        file_name: &str,
    ) -> Result<Attachment>;
}
