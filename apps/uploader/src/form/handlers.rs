//! Axum route handlers for the upload form: the HTML page and its JSON twin.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{Html, Redirect},
    Json,
};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::analysis_client::FILE_FIELD;
use crate::errors::AppError;
use crate::form::{Submission, UiState, UploadForm};
use crate::models::upload::{SelectedFile, SelectedFileSummary};
use crate::render::html::UploadPage;
use crate::render::{render_blocks, DisplayBlock, ExtractedTextPolicy};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct FormSnapshot {
    #[serde(flatten)]
    pub ui: UiState,
    pub phase: &'static str,
    pub submit_enabled: bool,
    pub selected_file: Option<SelectedFileSummary>,
    pub blocks: Vec<DisplayBlock>,
}

impl FormSnapshot {
    fn of(form: &UploadForm, policy: ExtractedTextPolicy) -> Self {
        let ui = form.ui_state();
        let blocks = ui
            .result
            .as_ref()
            .map(|result| render_blocks(result, policy))
            .unwrap_or_default();
        Self {
            ui,
            phase: form.state().phase(),
            submit_enabled: form.submit_enabled(),
            selected_file: form.selected(),
            blocks,
        }
    }
}

async fn snapshot(state: &AppState) -> FormSnapshot {
    let form = state.form.lock().await;
    FormSnapshot::of(&form, state.config.extracted_text_policy)
}

/// Pulls the `file` part out of a multipart body. A part without a file name
/// (an untouched file input) counts as no selection.
async fn read_file_part(multipart: &mut Multipart) -> Result<Option<SelectedFile>, AppError> {
    let mut selected = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Multipart(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Multipart(e.to_string()))?;

        if file_name.is_empty() {
            continue;
        }
        selected = Some(SelectedFile::new(file_name, content_type, bytes));
    }

    Ok(selected)
}

/// Sends the submission and settles the form. The form lock is only taken
/// after the request completes.
pub async fn run_submission(state: &AppState, submission: Submission) {
    let outcome = state.analyzer.analyze(&submission.file).await;
    state
        .form
        .lock()
        .await
        .complete(submission.attempt, outcome);
}

/// Runs the submission on its own task so the form settles even when the
/// request that started it is dropped.
fn spawn_submission(state: &AppState, submission: Submission) -> JoinHandle<()> {
    let background = state.clone();
    tokio::spawn(async move {
        run_submission(&background, submission).await;
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_page(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let snapshot = snapshot(&state).await;
    let template = UploadPage::new(
        &snapshot.ui,
        snapshot.submit_enabled,
        snapshot.selected_file.as_ref(),
        &snapshot.blocks,
    );
    let page = template.render().map_err(|e| {
        AppError::Internal(anyhow::Error::new(e).context("Failed to render upload page"))
    })?;
    Ok(Html(page))
}

/// POST /upload
///
/// Target of the HTML form: selects the posted file (if any), submits, waits
/// for the outcome, then redirects back to the page. Submit failures are
/// already recorded in the form state and shown there.
///
/// The backend call runs on a spawned task, so a disconnecting browser cannot
/// leave the form in `Submitting`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Redirect, AppError> {
    let file = read_file_part(&mut multipart).await?;

    let begun = {
        let mut form = state.form.lock().await;
        if let Some(file) = file {
            form.select_file(file);
        }
        form.begin_submit()
    };

    match begun {
        Ok(submission) => spawn_submission(&state, submission).await.map_err(|e| {
            AppError::Internal(anyhow::Error::new(e).context("Submit task failed"))
        })?,
        Err(AppError::Upload(e)) => debug!("Upload form submit rejected: {e}"),
        Err(AppError::SubmitInProgress) => {
            warn!("Upload form submit refused: an analysis request is already in progress")
        }
        Err(e) => return Err(e),
    }

    Ok(Redirect::to("/"))
}

/// POST /api/file
///
/// Replaces the selected file. Does not submit.
pub async fn handle_select_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<FormSnapshot>, AppError> {
    let file = read_file_part(&mut multipart)
        .await?
        .ok_or_else(|| AppError::Multipart(format!("missing '{FILE_FIELD}' part")))?;

    let mut form = state.form.lock().await;
    form.select_file(file);
    Ok(Json(FormSnapshot::of(
        &form,
        state.config.extracted_text_policy,
    )))
}

/// POST /api/submit
///
/// Starts the analysis in the background and returns immediately with the
/// loading state. Poll `GET /api/state` for the outcome.
pub async fn handle_submit(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<FormSnapshot>), AppError> {
    let (submission, snapshot) = {
        let mut form = state.form.lock().await;
        let submission = form.begin_submit()?;
        (
            submission,
            FormSnapshot::of(&form, state.config.extracted_text_policy),
        )
    };

    spawn_submission(&state, submission);

    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

/// GET /api/state
pub async fn handle_state(State(state): State<AppState>) -> Json<FormSnapshot> {
    Json(snapshot(&state).await)
}
