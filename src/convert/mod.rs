//! Conversion pipeline
//!
//! Stage the upload on disk, hand it to the parser, and join the returned
//! segments into one markdown string.

mod scratch;

use std::path::Path;

use axum::body::Bytes;

use crate::parser::{DocumentParser, ParseError, ParsedDocument};

pub use scratch::ScratchPdf;

/// Anything that can go wrong after the upload has been accepted
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Failed to read upload: {0}")]
    Upload(#[from] axum::extract::multipart::MultipartError),

    #[error("Failed to store upload: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Convert uploaded PDF bytes to markdown.
///
/// The scratch file is gone by the time this returns, on every path.
pub async fn convert_upload(
    parser: &dyn DocumentParser,
    scratch_dir: Option<&Path>,
    data: Bytes,
) -> Result<String, ConversionError> {
    let scratch = ScratchPdf::write(scratch_dir.map(Path::to_path_buf), data).await?;

    tracing::debug!(path = %scratch.path().display(), "Upload staged for parsing");

    let parsed = parser.load_data(scratch.path()).await;
    scratch.discard();

    Ok(combine_segments(&parsed?))
}

/// Join segments in order, each followed by a blank line, then trim.
pub fn combine_segments(documents: &[ParsedDocument]) -> String {
    let mut markdown = String::new();
    for doc in documents {
        markdown.push_str(&doc.text);
        markdown.push_str("\n\n");
    }
    markdown.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::MockParser;

    fn docs(texts: &[&str]) -> Vec<ParsedDocument> {
        texts
            .iter()
            .map(|t| ParsedDocument::new(*t, "/tmp/upload.pdf"))
            .collect()
    }

    #[test]
    fn test_combine_segments() {
        assert_eq!(
            combine_segments(&docs(&["# Title", "Body text"])),
            "# Title\n\nBody text"
        );
        assert_eq!(combine_segments(&docs(&["  only  "])), "only");
        assert_eq!(combine_segments(&docs(&["a\n", "", "b"])), "a\n\n\n\n\nb");
        assert_eq!(combine_segments(&[]), "");
    }

    #[tokio::test]
    async fn test_convert_upload_success_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let parser = MockParser::returning(&["# Title", "Body text"]);

        let markdown = convert_upload(&parser, Some(dir.path()), Bytes::from_static(b"%PDF"))
            .await
            .unwrap();

        assert_eq!(markdown, "# Title\n\nBody text");

        let calls = parser.calls();
        assert_eq!(calls.len(), 1);
        let (path, existed) = &calls[0];
        assert!(existed);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_convert_upload_failure_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let parser = MockParser::failing("quota exceeded");

        let err = convert_upload(&parser, Some(dir.path()), Bytes::from_static(b"%PDF"))
            .await
            .unwrap_err();

        assert!(matches!(err, ConversionError::Parse(ParseError::Api { .. })));
        assert!(err.to_string().contains("quota exceeded"));

        let (path, existed) = parser.calls()[0].clone();
        assert!(existed);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_uploads_use_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let parser = MockParser::returning(&["ok"]);

        let (a, b) = tokio::join!(
            convert_upload(&parser, Some(dir.path()), Bytes::from_static(b"%PDF a")),
            convert_upload(&parser, Some(dir.path()), Bytes::from_static(b"%PDF b")),
        );
        a.unwrap();
        b.unwrap();

        let calls = parser.calls();
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[0].0, calls[1].0);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
