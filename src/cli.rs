use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use crate::config::{self, AppConfig, ImportOptions};
use crate::error::ImportError;
use crate::import::Importer;
use crate::planka::client::PlankaClient;
use crate::report::{JsonlReporter, MultiReporter, Reporter, TracingReporter};
use crate::trello::client::TrelloClient;
use crate::trello::export::{ImportPlan, TrelloExport};
use crate::trello::AttachmentSource;

/// Import a Trello board export into Planka.
#[derive(Debug, Parser)]
#[command(name = "trello2planka", version)]
pub struct Cli {
    /// Trello board exported as JSON
    pub export: PathBuf,

    /// Config file (defaults to ~/.trello2planka/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Show what would be imported without contacting Planka
    #[arg(long)]
    pub dry_run: bool,

    /// Also import archived lists and cards
    #[arg(long)]
    pub import_archived: bool,

    /// Download attachments from Trello and upload them to Planka
    #[arg(long)]
    pub fetch_attachments: bool,

    /// Import into this existing Planka project
    #[arg(long, conflicts_with = "project_name")]
    pub project_id: Option<String>,

    /// Name of the Planka project to create
    #[arg(long)]
    pub project_name: Option<String>,
}

impl Cli {
    /// Flags given on the command line win over the config file.
    pub fn apply_overrides(&self, options: &mut ImportOptions) {
        if self.import_archived {
            options.import_archived_items = true;
        }
        if self.fetch_attachments {
            options.fetch_attachments = true;
        }
        if let Some(id) = &self.project_id {
            options.existing_project_id = Some(id.clone());
        }
        if let Some(name) = &self.project_name {
            options.existing_project_id = None;
            options.created_project_name = name.clone();
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    if cli.dry_run {
        let mut options = if config_path.exists() {
            config::load_config(&config_path)?.import
        } else {
            ImportOptions::default()
        };
        cli.apply_overrides(&mut options);
        let export = TrelloExport::load(&cli.export).map_err(ImportError::Export)?;
        print_plan(&export, &ImportPlan::of(&export, &options));
        return Ok(());
    }

    let mut config = config::load_config(&config_path)?;
    cli.apply_overrides(&mut config.import);
    config.validate()?;

    let export = TrelloExport::load(&cli.export).map_err(ImportError::Export)?;
    info!(export = %cli.export.display(), board = export.board_name(), "Loaded Trello export");

    import(&config, &export).await
}

async fn import(config: &AppConfig, export: &TrelloExport) -> Result<()> {
    let planka = PlankaClient::connect(&config.planka)
        .await
        .map_err(ImportError::Setup)?;

    let trello = match (&config.trello, config.import.fetch_attachments) {
        (Some(t), true) => {
            let client = TrelloClient::new(
                t.api_key.clone(),
                t.token.clone(),
                config.import.attachments_dir.clone(),
            );
            client.verify().await.map_err(ImportError::Setup)?;
            Some(client)
        }
        _ => None,
    };

    let mut reporters: Vec<Box<dyn Reporter>> = vec![Box::new(TracingReporter)];
    if let Some(path) = &config.import.report_file {
        reporters.push(Box::new(JsonlReporter::new(path.clone())));
    }
    let reporter = MultiReporter::new(reporters);

    let importer = Importer::new(
        &planka,
        trello.as_ref().map(|t| t as &dyn AttachmentSource),
        &reporter,
        &config.import,
    );
    let summary = importer
        .run(export)
        .await
        .context("Import stopped; entities created so far remain in Planka")?;

    println!(
        "Imported \"{}\" into Planka project {} (board {})",
        export.board_name(),
        summary.project_id,
        summary.board_id
    );
    println!(
        "  {} labels, {} lists, {} cards, {} card labels, {} tasks, {} comments, {} attachments",
        summary.labels,
        summary.lists,
        summary.cards,
        summary.card_labels,
        summary.tasks,
        summary.comments,
        summary.attachments
    );
    Ok(())
}

fn print_plan(export: &TrelloExport, plan: &ImportPlan) {
    println!("Dry run for \"{}\": nothing will be created", export.board_name());
    println!("  labels:      {}", plan.labels);
    println!("  lists:       {}", plan.lists);
    println!("  cards:       {}", plan.cards);
    println!("  card labels: {}", plan.card_labels);
    println!("  tasks:       {}", plan.tasks);
    println!("  comments:    {}", plan.comments);
    println!("  attachments: {}", plan.attachments);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("trello2planka").chain(args.iter().copied()))
    }

    #[test]
    fn parse_export_path_only() {
        let cli = parse(&["board.json"]).unwrap();
        assert_eq!(cli.export, PathBuf::from("board.json"));
        assert!(!cli.dry_run);
        assert_eq!(cli.config, None);
    }

    #[test]
    fn parse_requires_export_path() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn project_id_and_name_conflict() {
        assert!(parse(&["board.json", "--project-id", "1", "--project-name", "X"]).is_err());
    }

    #[test]
    fn flags_override_config_options() {
        let cli = parse(&[
            "board.json",
            "--import-archived",
            "--fetch-attachments",
            "--project-id",
            "77",
        ])
        .unwrap();
        let mut options = ImportOptions::default();
        cli.apply_overrides(&mut options);
        assert!(options.import_archived_items);
        assert!(options.fetch_attachments);
        assert_eq!(options.existing_project_id.as_deref(), Some("77"));
    }

    #[test]
    fn project_name_flag_replaces_configured_project_id() {
        let cli = parse(&["board.json", "--project-name", "Fresh"]).unwrap();
        let mut options = ImportOptions {
            existing_project_id: Some("42".into()),
            ..Default::default()
        };
        cli.apply_overrides(&mut options);
        assert_eq!(options.existing_project_id, None);
        assert_eq!(options.created_project_name, "Fresh");
    }

    #[test]
    fn absent_flags_keep_config_options() {
        let cli = parse(&["board.json"]).unwrap();
        let mut options = ImportOptions {
            import_archived_items: true,
            created_project_name: "From file".into(),
            ..Default::default()
        };
        cli.apply_overrides(&mut options);
        assert!(options.import_archived_items);
        assert_eq!(options.created_project_name, "From file");
    }

    #[tokio::test]
    async fn dry_run_does_not_need_a_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let export = dir.path().join("board.json");
        std::fs::write(&export, crate::trello::export::fixtures::SPRINT_BOARD).unwrap();
        let missing_config = dir.path().join("none.toml");

        let cli = parse(&[
            export.to_str().unwrap(),
            "--dry-run",
            "--config",
            missing_config.to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli).await.is_ok());
    }

    #[tokio::test]
    async fn missing_config_fails_a_real_run() {
        let dir = tempfile::tempdir().unwrap();
        let missing_config = dir.path().join("none.toml");
        let cli = parse(&[
            "board.json",
            "--config",
            missing_config.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(err.to_string().contains("none.toml"));
    }
}
