use anyhow::{bail, Context};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

use taskboard::board::{BoardSynchronizer, TransitionOutcome};
use taskboard::cache::TaskCache;
use taskboard::client::FetchClient;
use taskboard::config::Config;
use taskboard::controller::FilterController;
use taskboard::model::{Session, SessionUser, TaskState};
use taskboard::service::HttpTaskService;

const DEFAULT_CONFIG: &str = "taskboard.yaml";

fn session_from_env() -> Session {
    match (env::var("TASKBOARD_TOKEN"), env::var("TASKBOARD_USER_ID")) {
        (Ok(token), Ok(id)) => Session::new(
            token,
            SessionUser {
                id,
                usuario: None,
                nombre: None,
            },
        ),
        _ => Session::anonymous(),
    }
}

fn print_board(sync: &BoardSynchronizer<HttpTaskService>) {
    let board = match sync.board() {
        Some(board) => board,
        None => {
            println!("no tasks loaded");
            return;
        }
    };
    for state in TaskState::ALL {
        println!("[{}]", state);
        for task in board.column(state) {
            let flag = if task.priority { "!" } else { " " };
            println!("  {} {:<12} {}", flag, task.id, task.title);
        }
    }
    let controller = sync.controller();
    let pages = controller
        .pagination()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    println!("page {} of [{}]", controller.page(), pages);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config_path = env::var("TASKBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config = Config::from_file(&config_path)
        .with_context(|| format!("loading config from {}", config_path))?;
    taskboard::log::setup(EnvFilter::try_from_env("TASKBOARD_LOG"), &config.log);

    event!(Level::INFO, base_url = %config.api.base_url, "starting taskboard {}", env!("CARGO_PKG_VERSION"));

    let session = session_from_env();
    if !session.is_authenticated() {
        event!(Level::WARN, "no session, requests are sent without credentials");
    }
    let client = FetchClient::new(&config.api, session.clone())?;
    let controller = Arc::new(FilterController::new(
        Arc::new(HttpTaskService::new(client)),
        Arc::new(TaskCache::new()),
        &session,
        config.board.page_size,
    ));
    let sync = BoardSynchronizer::new(controller.clone());

    let args: Vec<String> = env::args().skip(1).collect();
    match args.as_slice() {
        [] => {
            controller.refresh().await?;
        }
        [cmd, id, state] if cmd == "move" => {
            let target: TaskState = state.parse()?;
            controller.refresh().await?;
            match sync.drop_task(id, target).await? {
                TransitionOutcome::RolledBack(err) => bail!("moving {} failed: {}", id, err),
                outcome => event!(Level::INFO, task_id = %id, ?outcome, "task moved"),
            }
        }
        _ => bail!("usage: taskboard [move <task id> <pendiente|en_progreso|completada>]"),
    }

    print_board(&sync);
    Ok(())
}
