// Upload Form: file selection, the submit state machine, and its HTTP handlers.
// The outbound request goes through analysis_client only.

pub mod handlers;
pub mod machine;

pub use machine::{Submission, UiState, UploadForm};
