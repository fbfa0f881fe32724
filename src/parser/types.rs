//! Parser Types
//!
//! Types shared by the parsing service client and the conversion pipeline.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output format requested from the parsing service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Markdown,
    Text,
}

impl Default for ResultType {
    fn default() -> Self {
        Self::Markdown
    }
}

impl ResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Text => "text",
        }
    }
}

impl FromStr for ResultType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "txt" => Ok(Self::Text),
            other => Err(format!("unknown result type '{}'", other)),
        }
    }
}

/// One text segment returned for an input file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub text: String,
    /// Path of the file the segment was parsed from
    pub file_path: PathBuf,
}

impl ParsedDocument {
    pub fn new(text: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            file_path: file_path.into(),
        }
    }
}

/// Parsing job state as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Success,
    PartialSuccess,
    Error,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Response to a file upload
#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    pub id: String,
}

/// Response to a job status poll
#[derive(Debug, Deserialize)]
pub(crate) struct JobResponse {
    pub status: JobStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Parsing service error types
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Parsing service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Parsing job {job_id} failed with status {status:?}{}", failure_suffix(.detail))]
    JobFailed {
        job_id: String,
        status: JobStatus,
        detail: Option<String>,
    },

    #[error("Parsing job {job_id} did not finish within {secs} seconds")]
    Timeout { job_id: String, secs: u64 },

    #[error("Malformed response from parsing service: {0}")]
    MalformedResponse(String),
}

fn failure_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(": {}", d))
        .unwrap_or_default()
}
