//! Parser Module
//!
//! Client for the hosted LlamaParse document parsing service.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pdf_markdown_server::config::ParserConfig;
//! use pdf_markdown_server::parser::{DocumentParser, LlamaParse};
//!
//! let parser = LlamaParse::new(ParserConfig::with_api_key("llx-..."));
//! let documents = parser.load_data(Path::new("report.pdf")).await?;
//! ```

mod provider;
mod types;

pub use provider::{DocumentParser, LlamaParse};
pub use types::{JobStatus, ParseError, ParsedDocument, ResultType};

#[cfg(test)]
pub use provider::MockParser;
