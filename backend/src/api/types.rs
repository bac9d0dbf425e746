//! REST API types for the presentation layer.
//!
//! Rows keep the dataset's column names (`"Name of Restaurant"`, ...) so a
//! table widget can show them as-is; envelope fields are camelCase.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::transform::charts::ChartSet;
use crate::transform::pipeline::{ExploreOutcome, SourceInfo};
use crate::models::AggregatedRow;

/// Query for the cuisine list.
#[derive(Debug, Clone, Deserialize)]
pub struct CuisineQuery {
    pub location: String,
}

/// Query for the restaurant list.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantQuery {
    pub location: String,
    pub cuisine: String,
}

/// One cascading choice list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionsResponse {
    pub options: Vec<String>,
}

impl From<Vec<String>> for OptionsResponse {
    fn from(options: Vec<String>) -> Self {
        Self { options }
    }
}

/// Dataset summary shown by the health endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetMetadata {
    pub encoding: String,
    pub delimiter: String,
    pub source_rows: usize,
    pub normalized_rows: usize,
    pub wrapped_cells: usize,
    pub columns: Vec<String>,
}

impl DatasetMetadata {
    pub fn new(source: &SourceInfo, normalized_rows: usize, wrapped_cells: usize) -> Self {
        Self {
            encoding: source.encoding.clone(),
            delimiter: source.delimiter.to_string(),
            source_rows: source.row_count,
            normalized_rows,
            wrapped_cells,
            columns: source.headers.clone(),
        }
    }
}

/// Response to an explore request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExploreResponse {
    pub report_id: String,
    pub generated_at: String,
    /// "prompt" or "ready"
    pub status: String,
    /// Guidance text when there is nothing to chart
    pub message: Option<String>,
    pub restaurants: Vec<AggregatedRow>,
    pub charts: Option<ChartSet>,
}

impl From<ExploreOutcome> for ExploreResponse {
    fn from(outcome: ExploreOutcome) -> Self {
        let (status, message, restaurants, charts) = match outcome {
            ExploreOutcome::Prompt { message } => ("prompt", Some(message), Vec::new(), None),
            ExploreOutcome::Ready(report) => ("ready", None, report.rows, Some(report.charts)),
        };

        ExploreResponse {
            report_id: Uuid::new_v4().to_string(),
            generated_at: Utc::now().to_rfc3339(),
            status: status.to_string(),
            message,
            restaurants,
            charts,
        }
    }
}

/// Create an error response body.
pub fn error_response(error: &str) -> Value {
    json!({
        "reportId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "restaurants": [],
        "charts": null
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::pipeline::Report;

    #[test]
    fn test_prompt_response() {
        let response = ExploreResponse::from(ExploreOutcome::Prompt {
            message: "pick one".into(),
        });
        assert_eq!(response.status, "prompt");
        assert_eq!(response.message.as_deref(), Some("pick one"));
        assert!(response.restaurants.is_empty());
        assert!(response.charts.is_none());
        assert!(Uuid::parse_str(&response.report_id).is_ok());
    }

    #[test]
    fn test_ready_response_json() {
        let response = ExploreResponse::from(ExploreOutcome::Ready(Report {
            rows: vec![],
            charts: ChartSet::from_rows(&[]),
        }));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "ready");
        assert!(json["message"].is_null());
        assert_eq!(json["charts"]["price"]["title"], "Price for 2 Comparison");
        assert!(json["generatedAt"].is_string());
    }

    #[test]
    fn test_error_response() {
        let body = error_response("Unknown location: Mylapore");
        assert_eq!(body["status"], "error");
        assert_eq!(body["error"], "Unknown location: Mylapore");
    }
}
