//! PDF to Markdown Converter Server Library
//!
//! The server binary is in main.rs; everything it wires together lives here
//! so the router can be driven directly in tests.
//!
//! # Modules
//!
//! - `config`: Environment configuration
//! - `convert`: Upload staging and segment joining
//! - `parser`: LlamaParse client behind the `DocumentParser` trait
//! - `routes`: HTTP endpoints

pub mod config;
pub mod convert;
pub mod error;
pub mod parser;
pub mod routes;
pub mod state;
