//! Transformation module.
//!
//! Raw rows to dashboard payloads:
//! - Literal: list-literal cell parsing
//! - Normalizer: explode rows per (cuisine, dish, feature)
//! - Selector: cascading location / cuisine / restaurant filter
//! - Aggregator: one summary row per restaurant
//! - Charts: price, rating and correlation payloads
//! - Pipeline: the `Explorer` application state

pub mod aggregator;
pub mod charts;
pub mod literal;
pub mod normalizer;
pub mod pipeline;
pub mod selector;

pub use aggregator::aggregate;
pub use charts::{correlation_matrix, price_view, rating_view, ChartSet, CorrelationMatrix};
pub use normalizer::normalize;
pub use pipeline::{ExploreOutcome, Explorer, Report, SourceInfo};
pub use selector::{select, Selection};
