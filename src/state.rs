//! Application state management

use std::path::Path;
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::parser::DocumentParser;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    server: ServerConfig,
    parser: Arc<dyn DocumentParser>,
}

impl AppState {
    /// Create a new application state around an already configured parser
    pub fn new(server: ServerConfig, parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { server, parser }),
        }
    }

    /// Get the parsing service client
    pub fn parser(&self) -> &dyn DocumentParser {
        self.inner.parser.as_ref()
    }

    /// Directory for scratch copies of uploads, if one is configured
    pub fn scratch_dir(&self) -> Option<&Path> {
        self.inner.server.scratch_dir.as_deref()
    }
}
