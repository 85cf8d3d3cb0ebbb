use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use petclinic_core::workflow::WorkflowResult;
use petclinic_core::{Database, VisitWorkflow, WorkflowError};
use tracing::error;

/// Shared handler state. The connection is locked for one workflow call at a time.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Run a closure against the locked database.
    ///
    /// Synchronous: the guard must never live across an await.
    pub fn with_database<T>(&self, f: impl FnOnce(&Database) -> T) -> Result<T, ApiError> {
        let db = self
            .db
            .lock()
            .map_err(|e| ApiError::Internal(format!("database lock poisoned: {}", e)))?;
        Ok(f(&db))
    }

    /// Run one workflow step on the blocking pool.
    pub async fn with_workflow<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&VisitWorkflow<'_>) -> WorkflowResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let state = self.clone();
        tokio::task::spawn_blocking(move || {
            state
                .with_database(|db| f(&VisitWorkflow::new(db)))?
                .map_err(ApiError::from)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("workflow task failed: {}", e)))?
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (code, body).into_response()
    }
}

impl From<WorkflowError> for ApiError {
    fn from(e: WorkflowError) -> Self {
        match e {
            WorkflowError::Database(db_error) => {
                error!(error = %db_error, "visit workflow failed");
                ApiError::Internal(db_error.to_string())
            }
            not_found => ApiError::NotFound(not_found.to_string()),
        }
    }
}
