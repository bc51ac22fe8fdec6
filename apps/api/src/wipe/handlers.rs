use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::file::FileEntry;
use crate::state::AppState;
use crate::wipe::eraser::{Eraser, EraserError, WipeReport};

#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileEntry>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
pub struct WipeRequest {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct WipeResponse {
    pub success: bool,
    pub report: WipeReport,
}

impl From<EraserError> for AppError {
    fn from(e: EraserError) -> Self {
        match e {
            EraserError::NothingToWipe => AppError::Validation(e.to_string()),
            EraserError::Storage(e) => AppError::Storage(e),
            EraserError::InvalidTransition { .. } => AppError::Internal(anyhow::anyhow!(e)),
        }
    }
}

/// GET /api/v1/wipe/files
pub async fn handle_list_files(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<FileListResponse>, AppError> {
    let mut eraser = Eraser::new(state.namespaces.for_user(user.id));
    let files = eraser.load().await?.to_vec();
    Ok(Json(FileListResponse {
        count: files.len(),
        files,
    }))
}

/// POST /api/v1/wipe
///
/// Lists the user's files, deletes all of them and clears their key-value
/// entries. Responds 500 with the per-object report when anything survived.
pub async fn handle_wipe(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<WipeRequest>,
) -> Result<(StatusCode, Json<WipeResponse>), AppError> {
    if !request.confirm {
        return Err(AppError::Validation(
            "Wiping data requires \"confirm\": true".to_string(),
        ));
    }

    let mut eraser = Eraser::new(state.namespaces.for_user(user.id));
    eraser.load().await?;
    let count = eraser.request_confirmation()?;
    info!("User {} confirmed wipe of {count} files", user.id);

    let report = eraser.confirm().await?;
    let success = report.is_complete();
    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    Ok((status, Json(WipeResponse { success, report })))
}
