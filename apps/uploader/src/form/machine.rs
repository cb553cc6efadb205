//! Upload Form — the single UI state record as an explicit state machine.
//!
//! `Idle → Submitting → {Succeeded, Failed}`; the next submit leaves either
//! terminal state for `Submitting` again (or `Failed` when nothing is selected).
//! `UiState` is a read-only projection of the machine.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::analysis_client::{AnalysisService, ClientError};
use crate::errors::{AppError, UploadError};
use crate::models::analysis::AnalysisResult;
use crate::models::upload::{SelectedFile, SelectedFileSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum RequestState {
    Idle,
    Submitting {
        attempt: Uuid,
        started_at: DateTime<Utc>,
    },
    Succeeded(AnalysisResult),
    Failed(UploadError),
}

impl RequestState {
    pub fn phase(&self) -> &'static str {
        match self {
            RequestState::Idle => "idle",
            RequestState::Submitting { .. } => "submitting",
            RequestState::Succeeded(_) => "succeeded",
            RequestState::Failed(_) => "failed",
        }
    }
}

/// A started submit: the attempt id to complete and the file to send.
#[derive(Debug, Clone)]
pub struct Submission {
    pub attempt: Uuid,
    pub file: SelectedFile,
}

/// `{loading, error, result}` as the page sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiState {
    pub loading: bool,
    pub error: Option<String>,
    pub result: Option<AnalysisResult>,
}

#[derive(Debug)]
pub struct UploadForm {
    selected: Option<SelectedFile>,
    state: RequestState,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadForm {
    pub fn new() -> Self {
        Self {
            selected: None,
            state: RequestState::Idle,
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn selected(&self) -> Option<SelectedFileSummary> {
        self.selected.as_ref().map(SelectedFile::summary)
    }

    /// Replaces the selection unconditionally. Does not touch the request state.
    pub fn select_file(&mut self, file: SelectedFile) {
        if !file.looks_like_pdf() {
            warn!(
                "Selected file '{}' does not have a .pdf extension",
                file.file_name
            );
        }
        info!(
            "Selected '{}' ({} bytes)",
            file.file_name,
            file.bytes.len()
        );
        self.selected = Some(file);
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Submitting { .. })
    }

    pub fn submit_enabled(&self) -> bool {
        !self.is_loading()
    }

    /// Starts a submit: clears any previous error and result and moves to
    /// `Submitting`. Without a selection the machine lands in `Failed` and no
    /// request must be issued.
    pub fn begin_submit(&mut self) -> Result<Submission, AppError> {
        if self.is_loading() {
            return Err(AppError::SubmitInProgress);
        }

        let Some(file) = self.selected.clone() else {
            self.state = RequestState::Failed(UploadError::NoFileSelected);
            return Err(UploadError::NoFileSelected.into());
        };

        let attempt = Uuid::new_v4();
        self.state = RequestState::Submitting {
            attempt,
            started_at: Utc::now(),
        };
        info!(%attempt, file = %file.file_name, "Submitting resume for analysis");

        Ok(Submission { attempt, file })
    }

    /// Settles the attempt started by `begin_submit`. Completions for any
    /// other attempt are dropped.
    pub fn complete(&mut self, attempt: Uuid, outcome: Result<AnalysisResult, ClientError>) {
        let started_at = match &self.state {
            RequestState::Submitting {
                attempt: current,
                started_at,
            } if *current == attempt => *started_at,
            _ => {
                warn!(%attempt, "Ignoring completion for a stale submit");
                return;
            }
        };
        let elapsed_ms = (Utc::now() - started_at).num_milliseconds();

        self.state = match outcome {
            Ok(result) => {
                info!(%attempt, elapsed_ms, "Resume analysis succeeded");
                RequestState::Succeeded(result)
            }
            Err(e) => {
                // Detail stays in the log; the user only sees the fixed message.
                error!(%attempt, elapsed_ms, "Resume analysis failed: {e}");
                RequestState::Failed(UploadError::RequestFailed)
            }
        };
    }

    /// Runs a whole submit against `service` while holding the form.
    pub async fn submit(&mut self, service: &dyn AnalysisService) -> Result<(), AppError> {
        let submission = self.begin_submit()?;
        let outcome = service.analyze(&submission.file).await;
        self.complete(submission.attempt, outcome);

        match &self.state {
            RequestState::Failed(e) => Err(AppError::Upload(*e)),
            _ => Ok(()),
        }
    }

    pub fn ui_state(&self) -> UiState {
        match &self.state {
            RequestState::Idle => UiState {
                loading: false,
                error: None,
                result: None,
            },
            RequestState::Submitting { .. } => UiState {
                loading: true,
                error: None,
                result: None,
            },
            RequestState::Succeeded(result) => UiState {
                loading: false,
                error: None,
                result: Some(result.clone()),
            },
            RequestState::Failed(e) => UiState {
                loading: false,
                error: Some(e.to_string()),
                result: None,
            },
        }
    }
}
