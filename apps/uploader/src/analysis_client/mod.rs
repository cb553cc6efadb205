//! Analysis client — the only code that talks to the resume analysis backend.
//!
//! Contract: one `POST` per submit, `multipart/form-data` with the resume under
//! the part name `file`, JSON `AnalysisResult` back. No retries.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::analysis::AnalysisResult;
use crate::models::upload::SelectedFile;

/// Multipart part name the backend reads the resume from.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Anything that can turn a resume file into an `AnalysisResult`.
///
/// Carried in `AppState` as `Arc<dyn AnalysisService>`.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult, ClientError>;
}

/// Error body the backend sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct BackendError {
    error: String,
}

#[derive(Clone)]
pub struct HttpAnalysisClient {
    client: Client,
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form_for(file: &SelectedFile) -> Result<Form, ClientError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)?;
        Ok(Form::new().part(FILE_FIELD, part))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, file: &SelectedFile) -> Result<AnalysisResult, ClientError> {
        let form = Self::form_for(file)?;

        debug!(
            "Posting {} ({} bytes) to {}",
            file.file_name,
            file.bytes.len(),
            self.endpoint
        );

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<BackendError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            warn!("Analysis backend returned {}: {}", status, message);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let result = serde_json::from_slice::<AnalysisResult>(&body)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use std::io::Write;

    use crate::errors::{AppError, UploadError};
    use crate::form::UploadForm;

    const SAMPLE_BODY: &str = r#"{"extracted_text":"Hello","analysis":{"key_sections":{"education_present":true,"experience_present":false,"skills_present":true}},"improvement_suggestions":[{"suggestion":"Add metrics"}]}"#;

    fn pdf() -> SelectedFile {
        SelectedFile::new("resume.pdf", None, &b"%PDF-1.4 fake resume body"[..])
    }

    fn client_for(url: String) -> HttpAnalysisClient {
        HttpAnalysisClient::new(url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_posts_file_part_once_and_parses_result() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze/")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="file""#.to_string()),
                Matcher::Regex(r#"filename="resume.pdf""#.to_string()),
                Matcher::Regex("%PDF-1.4 fake resume body".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SAMPLE_BODY)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(format!("{}/analyze/", server.url()));
        let result = client.analyze(&pdf()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(result.extracted_text.as_deref(), Some("Hello"));
        assert_eq!(result.improvement_suggestions.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_success_status_carries_backend_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/analyze/")
            .with_status(400)
            .with_body(r#"{"error": "Invalid file format. Only PDF files are allowed."}"#)
            .create_async()
            .await;

        let client = client_for(format!("{}/analyze/", server.url()));
        let err = client.analyze(&pdf()).await.unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid file format. Only PDF files are allowed.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_with_plain_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/analyze/")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let client = client_for(format!("{}/analyze/", server.url()));
        let err = client.analyze(&pdf()).await.unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/analyze/")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(format!("{}/analyze/", server.url()));
        let err = client.analyze(&pdf()).await.unwrap_err();
        assert!(matches!(err, ClientError::Parse(_)));
    }

    #[tokio::test]
    async fn test_slow_backend_times_out_into_request_failed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/analyze/")
            .with_status(200)
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_secs(2));
                w.write_all(SAMPLE_BODY.as_bytes())
            })
            .create_async()
            .await;

        let client = HttpAnalysisClient::new(
            format!("{}/analyze/", server.url()),
            Duration::from_secs(1),
        )
        .unwrap();

        match client.analyze(&pdf()).await.unwrap_err() {
            ClientError::Http(e) => assert!(e.is_timeout(), "expected timeout, got {e}"),
            other => panic!("expected Http timeout, got {other:?}"),
        }

        let mut form = UploadForm::new();
        form.select_file(pdf());
        let err = form.submit(&client).await.unwrap_err();

        assert!(matches!(err, AppError::Upload(UploadError::RequestFailed)));
        let ui = form.ui_state();
        assert!(!ui.loading);
        assert_eq!(
            ui.error.as_deref(),
            Some("Failed to upload and analyze the resume. Please try again.")
        );
        assert!(ui.result.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_an_http_error() {
        let client = client_for("http://127.0.0.1:1/analyze/".to_string());
        let err = client.analyze(&pdf()).await.unwrap_err();
        assert!(matches!(err, ClientError::Http(_)));
    }
}
