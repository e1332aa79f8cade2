use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    analysis::{AnalysisOptions, AnalysisProgress, AnalysisRequest, LandmarkProducer, SuppliedPose},
    db::models::{AnalysisRecord, AnalysisSummary},
    log_debug, log_warn,
    models::Pose,
    Engine,
};

const ENABLE_LOGS: bool = true;

const DEFAULT_HISTORY_LIMIT: usize = 20;

pub const USAGE: &str = "usage: physioassist <command>

commands:
  analyze <pose.json> <media-file> [display name]   assess a pose and cache the result
  history [limit]                                   list recent analyses, newest first
  search <query>                                    find analyses by patient or file name
  show <id>                                         print one analysis
  delete <id>                                       remove one analysis
  stats                                             summarize the stored history

environment:
  PHYSIOASSIST_DATA_DIR   data directory (default ./physioassist-data)
  RUST_LOG                log filter (default info)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze {
        pose_path: PathBuf,
        media_path: PathBuf,
        display_name: Option<String>,
    },
    History {
        limit: usize,
    },
    Search {
        query: String,
    },
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
    Stats,
    Help,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            return Ok(Command::Help);
        };

        let command = match name.as_str() {
            "analyze" => match rest {
                [pose, media] => Command::Analyze {
                    pose_path: pose.into(),
                    media_path: media.into(),
                    display_name: None,
                },
                [pose, media, words @ ..] if !words.is_empty() => Command::Analyze {
                    pose_path: pose.into(),
                    media_path: media.into(),
                    display_name: Some(words.join(" ")),
                },
                _ => bail!("analyze needs <pose.json> <media-file> [display name]\n\n{USAGE}"),
            },
            "history" => match rest {
                [] => Command::History {
                    limit: DEFAULT_HISTORY_LIMIT,
                },
                [limit] => Command::History {
                    limit: limit
                        .parse()
                        .with_context(|| format!("invalid history limit '{limit}'"))?,
                },
                _ => bail!("history takes at most one argument\n\n{USAGE}"),
            },
            "search" if !rest.is_empty() => Command::Search {
                query: rest.join(" "),
            },
            "show" => Command::Show {
                id: single_id(name, rest)?,
            },
            "delete" => Command::Delete {
                id: single_id(name, rest)?,
            },
            "stats" if rest.is_empty() => Command::Stats,
            "help" | "--help" | "-h" => Command::Help,
            other => bail!("unknown or incomplete command '{other}'\n\n{USAGE}"),
        };
        Ok(command)
    }
}

fn single_id(command: &str, rest: &[String]) -> Result<String> {
    match rest {
        [id] => Ok(id.clone()),
        _ => Err(anyhow!("{command} needs exactly one <id>")),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn summaries(records: &[AnalysisRecord]) -> Vec<AnalysisSummary> {
    records.iter().map(AnalysisSummary::from).collect()
}

fn load_pose(path: &Path) -> Result<Pose> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read pose file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid pose in {}", path.display()))
}

/// Logs each stage as it arrives; the task ends with the number of events seen
/// once every sender is gone.
fn spawn_progress_reporter() -> (mpsc::UnboundedSender<AnalysisProgress>, JoinHandle<usize>) {
    let (progress_tx, mut progress_rx) = mpsc::unbounded_channel::<AnalysisProgress>();
    let reporter = tokio::spawn(async move {
        let mut seen = 0;
        while let Some(progress) = progress_rx.recv().await {
            log_debug!("{:>3}% {}", progress.percent, progress.stage.as_str());
            seen += 1;
        }
        seen
    });
    (progress_tx, reporter)
}

pub async fn dispatch(engine: &Engine, command: Command) -> Result<()> {
    let db = engine.database();

    match command {
        Command::Analyze {
            pose_path,
            media_path,
            display_name,
        } => {
            let pose = load_pose(&pose_path)?;
            let media = std::fs::read(&media_path)
                .with_context(|| format!("failed to read media file {}", media_path.display()))?;
            let file_name = media_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| media_path.display().to_string());

            let mut request = AnalysisRequest::new(media, file_name);
            if let Some(name) = display_name {
                request = request.with_display_name(name);
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log_warn!("Interrupted, cancelling analysis");
                    on_interrupt.cancel();
                }
            });

            let (progress_tx, reporter) = spawn_progress_reporter();

            let producer: Arc<dyn LandmarkProducer> = Arc::new(SuppliedPose::new(pose));
            let outcome = engine
                .controller()
                .analyze_with(
                    request,
                    producer,
                    AnalysisOptions {
                        progress: Some(progress_tx),
                        cancel,
                    },
                )
                .await;
            // The sender went away with the request, so the reporter drains and exits.
            let _ = reporter.await;

            print_json(&outcome?)
        }
        Command::History { limit } => print_json(&summaries(&db.list_recent(limit).await?)),
        Command::Search { query } => print_json(&summaries(&db.search_by_text(&query).await?)),
        Command::Show { id } => match db.get_by_id(&id).await? {
            Some(record) => print_json(&record),
            None => bail!("no analysis with id {id}"),
        },
        Command::Delete { id } => {
            if db.delete_by_id(&id).await? {
                println!("deleted {id}");
                Ok(())
            } else {
                bail!("no analysis with id {id}")
            }
        }
        Command::Stats => print_json(&db.history_stats(Utc::now()).await?),
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
    }
}
