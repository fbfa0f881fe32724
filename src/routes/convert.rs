//! PDF conversion endpoint
//!
//! - POST /convert-pdf - Upload a PDF (multipart field `file`), get markdown back

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
    Json, Router,
};
use serde::Serialize;

use crate::convert::{convert_upload, ConversionError};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Successful conversion payload
#[derive(Debug, Serialize)]
pub struct ConversionResult {
    pub success: bool,
    pub filename: String,
    pub markdown: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/convert-pdf", post(convert_pdf))
        // Uploads are not size limited
        .layer(DefaultBodyLimit::disable())
}

/// Accept only names ending in `.pdf`, any case
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".pdf")
}

async fn convert_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ConversionResult>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        AppError::InvalidInput(e.to_string())
    })? {
        if field.name() != Some("file") {
            continue;
        }

        // A part without a filename is not a file upload
        let Some(filename) = field.file_name().map(str::to_string) else {
            return Err(AppError::MissingFile);
        };
        if !is_pdf_filename(&filename) {
            return Err(AppError::InvalidInput(
                "Only PDF files are allowed".to_string(),
            ));
        }

        let data = field.bytes().await.map_err(ConversionError::from)?;

        tracing::info!(
            filename = %filename,
            bytes = data.len(),
            "Converting PDF"
        );

        let markdown = convert_upload(state.parser(), state.scratch_dir(), data).await?;

        tracing::info!(
            filename = %filename,
            markdown_len = markdown.len(),
            "PDF converted"
        );

        return Ok(Json(ConversionResult {
            success: true,
            filename,
            markdown,
        }));
    }

    Err(AppError::MissingFile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_filename() {
        assert!(is_pdf_filename("report.pdf"));
        assert!(is_pdf_filename("REPORT.PDF"));
        assert!(is_pdf_filename("scan.Pdf"));
        assert!(is_pdf_filename("archive.tar.pdf"));
        assert!(!is_pdf_filename("report.pdf.exe"));
        assert!(!is_pdf_filename("report.docx"));
        assert!(!is_pdf_filename("pdf"));
        assert!(!is_pdf_filename(""));
    }
}
