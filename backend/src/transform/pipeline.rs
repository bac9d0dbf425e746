//! Application state and the per-selection pipeline.
//!
//! [`Explorer`] is built once at startup: it loads the listing table,
//! normalizes it and keeps the result read-only for the rest of the process.
//! Each selection is then answered independently:
//!
//! ```text
//! Selection → validate → select → aggregate → charts → ExploreOutcome
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use dineview::{Explorer, Selection};
//!
//! let explorer = Explorer::from_path("zomato_chennai.csv".as_ref())?;
//! let location = &explorer.locations()[0];
//! let cuisine = &explorer.cuisines(location)[0];
//! let names = explorer.restaurants(location, cuisine);
//! let outcome = explorer.explore(&Selection::new(location, cuisine, names))?;
//! ```

use serde::Serialize;
use std::path::Path;

use super::aggregator::aggregate;
use super::charts::ChartSet;
use super::normalizer::normalize;
use super::selector::{self, Selection};
use crate::config::{MAX_REPORTED_WARNINGS, SELECT_PROMPT};
use crate::error::PipelineResult;
use crate::logging;
use crate::models::{AggregatedRow, NormalizedTable, RawTable};
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult};

/// Where the table came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

/// Summary rows plus chart payloads for one selection.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub rows: Vec<AggregatedRow>,
    pub charts: ChartSet,
}

/// Result of exploring a selection.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExploreOutcome {
    /// Nothing to aggregate; show guidance instead of charts.
    Prompt { message: String },
    /// Aggregated rows and charts.
    Ready(Report),
}

/// Read-only application state.
#[derive(Debug, Clone)]
pub struct Explorer {
    table: NormalizedTable,
    source: SourceInfo,
}

impl Explorer {
    /// Load and normalize a listing file.
    pub fn from_path(path: &Path) -> PipelineResult<Self> {
        logging::info(format!("Reading {}", path.display()));
        let parsed = parse_csv_file_auto(path)?;
        Ok(Self::from_parsed(parsed))
    }

    /// Load and normalize listing bytes.
    pub fn from_bytes(bytes: &[u8]) -> PipelineResult<Self> {
        let parsed = parse_bytes_auto(bytes)?;
        Ok(Self::from_parsed(parsed))
    }

    pub fn from_parsed(parsed: ParseResult) -> Self {
        logging::success(format!("Detected encoding: {}", parsed.encoding));
        logging::success(format!(
            "Detected separator: '{}'",
            format_delimiter(parsed.delimiter)
        ));
        logging::success(format!("Read {} rows", parsed.table.len()));

        if !parsed.warnings.is_empty() {
            logging::warning(format!(
                "{} numeric cells unreadable, treated as missing",
                parsed.warnings.len()
            ));
            for warning in parsed.warnings.iter().take(MAX_REPORTED_WARNINGS) {
                logging::warning_indent(warning.to_string(), 1);
            }
        }

        let source = SourceInfo {
            encoding: parsed.encoding,
            delimiter: parsed.delimiter,
            headers: parsed.table.headers.clone(),
            row_count: parsed.table.len(),
        };
        Self::build(&parsed.table, source)
    }

    /// Build from an in-memory table.
    pub fn from_raw(raw: &RawTable) -> Self {
        let source = SourceInfo {
            encoding: "utf-8".to_string(),
            delimiter: ',',
            headers: raw.headers.clone(),
            row_count: raw.len(),
        };
        Self::build(raw, source)
    }

    fn build(raw: &RawTable, source: SourceInfo) -> Self {
        let table = normalize(raw);
        logging::success(format!(
            "Normalized {} rows into {} (cuisine, dish, feature) rows",
            table.source_rows,
            table.len()
        ));
        if table.wrapped_cells > 0 {
            logging::info_indent(
                format!("{} list cells kept as single values", table.wrapped_cells),
                1,
            );
        }
        Self { table, source }
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    pub fn locations(&self) -> Vec<String> {
        selector::locations(&self.table)
    }

    pub fn cuisines(&self, location: &str) -> Vec<String> {
        selector::cuisines(&self.table, location)
    }

    pub fn restaurants(&self, location: &str, cuisine: &str) -> Vec<String> {
        selector::restaurants(&self.table, location, cuisine)
    }

    /// Aggregate the rows a selection picks, without validating it.
    pub fn summarize(&self, selection: &Selection) -> Vec<AggregatedRow> {
        let rows = selector::select(
            &self.table,
            &selection.location,
            &selection.cuisine,
            &selection.restaurants,
        );
        aggregate(&rows)
    }

    /// Validate a selection and produce its report, or a prompt when no
    /// restaurant is chosen.
    pub fn explore(&self, selection: &Selection) -> PipelineResult<ExploreOutcome> {
        selector::validate(&self.table, selection)?;

        if selection.restaurants.is_empty() {
            return Ok(ExploreOutcome::Prompt {
                message: SELECT_PROMPT.to_string(),
            });
        }

        let rows = self.summarize(selection);
        logging::info(format!(
            "{} / {}: {} restaurants",
            selection.location,
            selection.cuisine,
            rows.len()
        ));
        let charts = ChartSet::from_rows(&rows);
        Ok(ExploreOutcome::Ready(Report { rows, charts }))
    }
}

fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, SelectionError};
    use crate::models::RawRow;

    fn raw(name: &str, location: &str, cuisine: &str, price: f64, dining: f64) -> RawRow {
        RawRow {
            name: Some(name.into()),
            location: Some(location.into()),
            address: Some(format!("{} street", name)),
            cuisine: Some(cuisine.into()),
            top_dishes: Some("['Biryani', 'Kebab']".into()),
            features: Some("['AC']".into()),
            price_for_two: Some(price),
            dining_rating: Some(dining),
            dining_rating_count: Some(10.0),
            delivery_rating: Some(dining - 0.5),
            delivery_rating_count: Some(5.0),
        }
    }

    fn explorer() -> Explorer {
        Explorer::from_raw(&RawTable::new(
            vec![],
            vec![
                raw("A", "Adyar", "['Indian','Chinese']", 500.0, 4.0),
                raw("B", "Adyar", "['Indian']", 300.0, 3.6),
                raw("C", "Adyar", "Chinese", 900.0, 4.4),
                raw("D", "T Nagar", "['Indian']", 200.0, 3.9),
            ],
        ))
    }

    #[test]
    fn test_options_cascade() {
        let explorer = explorer();
        assert_eq!(explorer.locations(), vec!["Adyar", "T Nagar"]);
        assert_eq!(explorer.cuisines("Adyar"), vec!["Chinese", "Indian"]);
        assert_eq!(explorer.restaurants("Adyar", "Indian"), vec!["A", "B"]);
        assert_eq!(explorer.table().source_rows, 4);
    }

    #[test]
    fn test_prompt_when_nothing_selected() {
        let outcome = explorer()
            .explore(&Selection::new("Adyar", "Indian", vec![]))
            .unwrap();
        match outcome {
            ExploreOutcome::Prompt { message } => assert_eq!(message, SELECT_PROMPT),
            other => panic!("expected prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_report_for_selection() {
        let outcome = explorer()
            .explore(&Selection::new("Adyar", "Indian", vec!["A".into(), "B".into()]))
            .unwrap();
        let report = match outcome {
            ExploreOutcome::Ready(report) => report,
            other => panic!("expected report, got {:?}", other),
        };

        assert_eq!(report.rows.len(), 2);
        let a = &report.rows[0];
        assert_eq!(a.name, "A");
        assert_eq!(a.top_dishes, "Biryani, Kebab");
        // only the Indian rows of A survive the cuisine filter: 2 dishes × 1 feature
        assert_eq!(a.dining_rating_count, Some(20.0));
        assert_eq!(report.charts.price.points.len(), 2);
        assert_eq!(report.charts.ratings.restaurants, vec!["A", "B"]);
    }

    #[test]
    fn test_unknown_selection_rejected() {
        let err = explorer()
            .explore(&Selection::new("Adyar", "Indian", vec!["D".into()]))
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Selection(SelectionError::UnknownRestaurant(ref n)) if n == "D"
        ));
    }

    #[test]
    fn test_outcome_json_tags() {
        let prompt = ExploreOutcome::Prompt {
            message: SELECT_PROMPT.to_string(),
        };
        let json = serde_json::to_value(&prompt).unwrap();
        assert_eq!(json["status"], "prompt");

        let ready = explorer()
            .explore(&Selection::new("Adyar", "Chinese", vec!["C".into()]))
            .unwrap();
        let json = serde_json::to_value(&ready).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["rows"][0]["Name of Restaurant"], "C");
        // a single restaurant has no defined correlation
        assert!(json["charts"]["correlation"]["values"][0][1].is_null());
    }

    #[test]
    fn test_from_bytes() {
        let csv = "Name of Restaurant,Location,Address,Cuisine,Top Dishes,Features,Price for 2,\
Dining Rating,Dining Rating Count,Delivery Rating,Delivery Rating Count\n\
A,Adyar,x,\"['Indian','Chinese']\",['Biryani'],['AC'],500,4.0,10,3.5,5\n";
        let explorer = Explorer::from_bytes(csv.as_bytes()).unwrap();

        assert_eq!(explorer.source().row_count, 1);
        assert_eq!(explorer.source().delimiter, ',');
        assert_eq!(explorer.table().len(), 2);
    }
}
