pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    routing::any,
    Json, Router,
};
use config::Config;
use db::driver::Db;
use error::AppError;
use models::{Todo, TodoInput};
use tokio::{
    net::TcpListener,
    sync::{Mutex, MutexGuard},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

// === App State ===
#[derive(Debug, Clone)]
struct AppState {
    db: Arc<Mutex<Db>>,
}
impl AppState {
    fn new(db: Db) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    // one statement at a time on the shared connection
    async fn db(&self) -> MutexGuard<'_, Db> {
        self.db.lock().await
    }
}

// every route answers on any method, and bodies are unbounded
fn app(state: AppState) -> Router {
    Router::new()
        .route("/todos", any(list_todos))
        .route("/todos/add", any(add_todo))
        .route("/todos/update", any(update_todo))
        .route("/todos/delete", any(delete_todo))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    // initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::default();
    let db = Db::new(&config.db_path)?;
    tracing::info!(path = %config.db_path.display(), "database ready");

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!(addr = %config.addr, "server listening");

    axum::serve(listener, app(AppState::new(db)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}

// === Request parsing ===
type QueryPairs = Vec<(String, String)>;

// the first `id` wins when the parameter repeats
fn parse_id(params: &[(String, String)]) -> Result<i64, AppError> {
    params
        .iter()
        .find(|(key, _)| key == "id")
        .and_then(|(_, id)| id.parse().ok())
        .ok_or_else(|| AppError::bad_request("Invalid todo ID"))
}

// decoded from raw bytes so the content type does not matter
fn parse_body(body: &Bytes) -> Result<TodoInput, AppError> {
    serde_json::from_slice(body).map_err(|err| AppError::bad_request(err.to_string()))
}

// === Routes ===
async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = repository::list_todos(&*state.db().await)?;
    Ok(Json(todos))
}

async fn add_todo(State(state): State<AppState>, body: Bytes) -> Result<StatusCode, AppError> {
    let input = parse_body(&body)?;
    let id = repository::insert_todo(&*state.db().await, &input)?;
    tracing::debug!(id, "todo created");
    Ok(StatusCode::CREATED)
}

async fn update_todo(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&params)?;
    let input = parse_body(&body)?;
    let changed = repository::update_todo(&*state.db().await, id, &input)?;
    tracing::debug!(id, changed, "todo updated");
    Ok(StatusCode::OK)
}

async fn delete_todo(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&params)?;
    let changed = repository::delete_todo(&*state.db().await, id)?;
    tracing::debug!(id, changed, "todo deleted");
    Ok(StatusCode::OK)
}
