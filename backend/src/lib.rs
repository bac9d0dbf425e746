//! # Dineview - restaurant listing exploration
//!
//! Dineview loads a restaurant listing export, normalizes its list-encoded
//! columns, and answers cascading selections (location → cuisine →
//! restaurants) with a per-restaurant summary and chart payloads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│ Normalizer  │────▶│  Explorer   │
//! │  (any enc.) │     │  (auto-enc) │     │  (explode)  │     │ (read-only) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └──────┬──────┘
//!                                                                    │ selection
//!                                          ┌─────────────┐     ┌─────▼───────┐
//!                                          │   Charts    │◀────│ Aggregator  │
//!                                          └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dineview::{Explorer, Selection, ExploreOutcome};
//!
//! let explorer = Explorer::from_path("zomato_chennai.csv".as_ref())?;
//! let selection = Selection::new("Adyar", "South Indian", vec!["Annapoorna".into()]);
//! if let ExploreOutcome::Ready(report) = explorer.explore(&selection)? {
//!     println!("{} restaurants", report.rows.len());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Row and cell types
//! - [`parser`] - CSV loading with auto-detection
//! - [`transform`] - Normalize, select, aggregate, chart
//! - [`logging`] - Log broadcasting
//! - [`config`] - Runtime settings
//! - [`api`] - HTTP API server

// Core modules
pub mod config;
pub mod error;
pub mod logging;
pub mod models;

// Loading
pub mod parser;

// Transformation
pub mod transform;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors
// =============================================================================

pub use error::{LoadError, PipelineError, SelectionError, ServerError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{AggregatedRow, CellValue, NormalizedRow, NormalizedTable, RawRow, RawTable};

// =============================================================================
// Re-exports - Loading
// =============================================================================

pub use parser::{
    detect_delimiter, detect_encoding, decode_content, parse_bytes_auto, parse_csv_file_auto,
    parse_table, CellWarning, ParseResult,
};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    aggregate, correlation_matrix, normalize, price_view, rating_view, select, ChartSet,
    CorrelationMatrix, ExploreOutcome, Explorer, Report, Selection, SourceInfo,
};

// =============================================================================
// Re-exports - Config
// =============================================================================

pub use config::Settings;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server};
}
