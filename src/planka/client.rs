use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

use super::Destination;
use crate::config::PlankaConfig;
use crate::model::planka::{
    Attachment, Board, Card, CardLabel, CommentAction, Envelope, Label, List, NewBoard, NewCard,
    NewCardLabel, NewComment, NewLabel, NewList, NewProject, NewTask, Project, Task, User,
};

const API_ACCESS_TOKENS: &str = "access-tokens";
const API_ME: &str = "users/me";
const API_PROJECTS: &str = "projects";

fn api_boards(project_id: &str) -> String {
    format!("projects/{project_id}/boards")
}

fn api_labels(board_id: &str) -> String {
    format!("boards/{board_id}/labels")
}

fn api_lists(board_id: &str) -> String {
    format!("boards/{board_id}/lists")
}

fn api_cards(board_id: &str) -> String {
    format!("boards/{board_id}/cards")
}

fn api_card_labels(card_id: &str) -> String {
    format!("cards/{card_id}/labels")
}

fn api_tasks(card_id: &str) -> String {
    format!("cards/{card_id}/tasks")
}

fn api_comments(card_id: &str) -> String {
    format!("cards/{card_id}/comment-actions")
}

fn api_attachments(card_id: &str) -> String {
    format!("cards/{card_id}/attachments")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Credentials<'a> {
    email_or_username: &'a str,
    password: &'a str,
}

pub struct PlankaClient {
    api_base: String,
    access_token: String,
    client: reqwest::Client,
}

impl PlankaClient {
    /// Logs in and returns a client holding the access token.
    pub async fn connect(config: &PlankaConfig) -> Result<Self> {
        let client = reqwest::Client::new();
        let api_base = format!("{}/api", config.server_url.trim_end_matches('/'));

        let resp = client
            .post(format!("{api_base}/{API_ACCESS_TOKENS}"))
            .json(&Credentials {
                email_or_username: &config.username,
                password: &config.password,
            })
            .send()
            .await
            .with_context(|| format!("Could not reach Planka at {}", config.server_url))?;

        let token: Envelope<String> = parse_response(API_ACCESS_TOKENS, resp)
            .await
            .context("Planka login failed")?;
        debug!(server = %config.server_url, "Logged in to Planka");

        Ok(Self {
            api_base,
            access_token: token.item,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .with_context(|| format!("Planka GET {path} failed"))?;
        let envelope: Envelope<T> = parse_response(path, resp).await?;
        Ok(envelope.item)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let resp = self
            .client
            .post(self.url(path))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Planka POST {path} failed"))?;
        let envelope: Envelope<T> = parse_response(path, resp).await?;
        Ok(envelope.item)
    }
}

async fn parse_response<T: DeserializeOwned>(path: &str, resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("Planka {path} returned {status}: {body}");
    }
    resp.json()
        .await
        .with_context(|| format!("Failed to parse Planka {path} response"))
}

#[async_trait]
impl Destination for PlankaClient {
    async fn get_current_user(&self) -> Result<User> {
        self.get(API_ME).await
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project> {
        self.post(API_PROJECTS, project).await
    }

    async fn create_board(&self, board: &NewBoard) -> Result<Board> {
        self.post(&api_boards(&board.project_id), board).await
    }

    async fn create_label(&self, label: &NewLabel) -> Result<Label> {
        self.post(&api_labels(&label.board_id), label).await
    }

    async fn create_list(&self, list: &NewList) -> Result<List> {
        self.post(&api_lists(&list.board_id), list).await
    }

    async fn create_card(&self, card: &NewCard) -> Result<Card> {
        self.post(&api_cards(&card.board_id), card).await
    }

    async fn create_card_label(&self, card_label: &NewCardLabel) -> Result<CardLabel> {
        self.post(&api_card_labels(&card_label.card_id), card_label)
            .await
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task> {
        self.post(&api_tasks(&task.card_id), task).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<CommentAction> {
        self.post(&api_comments(&comment.card_id), comment).await
    }

    async fn create_attachment(
        &self,
        card_id: &str,
        file: &Path,
        file_name: &str,
    ) -> Result<Attachment> {
        let bytes = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read downloaded attachment {}", file.display()))?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let path = api_attachments(card_id);
        let resp = self
            .client
            .post(self.url(&path))
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("Planka POST {path} failed"))?;
        let envelope: Envelope<Attachment> = parse_response(&path, resp).await?;
        Ok(envelope.item)
    }
}
