//! Parsing Providers
//!
//! Defines the parser trait and the LlamaParse client that implements it.

use std::path::Path;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use super::types::{JobResponse, JobStatus, ParseError, ParsedDocument, UploadResponse};
use crate::config::ParserConfig;

/// Separator the service puts between pages of a result
pub const PAGE_SEPARATOR: &str = "\n---\n";

/// Document parser trait
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Parse the file at `path` into ordered text segments
    async fn load_data(&self, path: &Path) -> Result<Vec<ParsedDocument>, ParseError>;
}

/// LlamaParse (LlamaCloud) client
///
/// One upload, then poll the job until it finishes and fetch the result in
/// the configured format. The `reqwest::Client` is shared by every request
/// the server handles.
pub struct LlamaParse {
    client: reqwest::Client,
    config: ParserConfig,
}

impl LlamaParse {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/parsing{}", self.config.base_url, path)
    }

    /// Upload the file and return the job id
    async fn create_job(&self, path: &Path) -> Result<String, ParseError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document.pdf".to_string());

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = Form::new()
            .text("language", self.config.language.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.url("/upload"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let upload: UploadResponse = read_json(response).await?;
        Ok(upload.id)
    }

    /// Poll the job until it succeeds, fails, or exceeds `max_timeout`
    async fn wait_for_job(&self, job_id: &str) -> Result<(), ParseError> {
        let started = Instant::now();

        loop {
            let response = self
                .client
                .get(self.url(&format!("/job/{}", job_id)))
                .bearer_auth(&self.config.api_key)
                .send()
                .await?;
            let job: JobResponse = read_json(response).await?;

            match job.status {
                JobStatus::Success | JobStatus::PartialSuccess => return Ok(()),
                JobStatus::Error | JobStatus::Canceled => {
                    return Err(ParseError::JobFailed {
                        job_id: job_id.to_string(),
                        status: job.status,
                        detail: job.error_message,
                    });
                }
                JobStatus::Pending | JobStatus::Unknown => {}
            }

            if started.elapsed() > self.config.max_timeout {
                return Err(ParseError::Timeout {
                    job_id: job_id.to_string(),
                    secs: self.config.max_timeout.as_secs(),
                });
            }

            if self.config.verbose {
                tracing::debug!(
                    job_id = %job_id,
                    elapsed_secs = started.elapsed().as_secs(),
                    "Parsing job still running"
                );
            }

            tokio::time::sleep(self.config.check_interval).await;
        }
    }

    async fn fetch_result(&self, job_id: &str, path: &Path) -> Result<Vec<ParsedDocument>, ParseError> {
        let result_type = self.config.result_type.as_str();
        let response = self
            .client
            .get(self.url(&format!("/job/{}/result/{}", job_id, result_type)))
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;
        let body: serde_json::Value = read_json(response).await?;

        let text = body[result_type].as_str().ok_or_else(|| {
            ParseError::MalformedResponse(format!("result has no '{}' field", result_type))
        })?;

        Ok(split_pages(text, self.config.split_by_page)
            .into_iter()
            .map(|page| ParsedDocument::new(page, path))
            .collect())
    }
}

/// The whole result, or one entry per page when `split_by_page` is set
fn split_pages(text: &str, split_by_page: bool) -> Vec<&str> {
    if split_by_page {
        text.split(PAGE_SEPARATOR).collect()
    } else {
        vec![text]
    }
}

#[async_trait]
impl DocumentParser for LlamaParse {
    async fn load_data(&self, path: &Path) -> Result<Vec<ParsedDocument>, ParseError> {
        let job_id = self.create_job(path).await?;

        if self.config.verbose {
            tracing::info!(job_id = %job_id, "Started parsing the file");
        }

        self.wait_for_job(&job_id).await?;
        let documents = self.fetch_result(&job_id, path).await?;

        tracing::debug!(
            job_id = %job_id,
            segments = documents.len(),
            "Parsing job finished"
        );

        Ok(documents)
    }
}

/// Check the status and decode a JSON body
async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ParseError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ParseError::Api {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ParseError::MalformedResponse(e.to_string()))
}

/// Mock parser for testing
#[cfg(test)]
pub struct MockParser {
    pub segments: Vec<String>,
    pub fail_with: Option<String>,
    /// Every path `load_data` was called with, plus whether it existed then
    pub calls: std::sync::Mutex<Vec<(std::path::PathBuf, bool)>>,
}

#[cfg(test)]
impl MockParser {
    pub fn returning(segments: &[&str]) -> Self {
        Self {
            segments: segments.iter().map(|s| s.to_string()).collect(),
            fail_with: None,
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            segments: Vec::new(),
            fail_with: Some(message.to_string()),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(std::path::PathBuf, bool)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl DocumentParser for MockParser {
    async fn load_data(&self, path: &Path) -> Result<Vec<ParsedDocument>, ParseError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_path_buf(), path.exists()));

        // Give concurrent callers a chance to overlap
        tokio::task::yield_now().await;

        match &self.fail_with {
            Some(message) => Err(ParseError::Api {
                status: 500,
                body: message.clone(),
            }),
            None => Ok(self
                .segments
                .iter()
                .map(|s| ParsedDocument::new(s.clone(), path))
                .collect()),
        }
    }
}
