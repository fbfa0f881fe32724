//! Scratch copies of uploaded PDFs

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use tempfile::NamedTempFile;

use super::ConversionError;

/// Uniquely named `.pdf` file holding one request's upload.
///
/// The file is removed by [`ScratchPdf::discard`], or on drop if the request
/// is abandoned first.
#[derive(Debug)]
pub struct ScratchPdf {
    file: NamedTempFile,
}

impl ScratchPdf {
    /// Write `data` to a new scratch file in `dir` (platform temp dir if `None`)
    pub async fn write(dir: Option<PathBuf>, data: Bytes) -> Result<Self, ConversionError> {
        let scratch =
            tokio::task::spawn_blocking(move || Self::write_blocking(dir.as_deref(), &data)).await??;
        Ok(scratch)
    }

    fn write_blocking(dir: Option<&Path>, data: &[u8]) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("upload-").suffix(".pdf");

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(data)?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file. A failure here never reaches the caller.
    pub fn discard(self) {
        let path = self.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove temporary upload"
            );
        }
    }
}
