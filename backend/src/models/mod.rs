//! Domain models for the Dineview exploration pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`RawRow`] / [`RawTable`] - Listing records as read from the source file
//! - [`CellValue`] - A list-encoded cell after parsing (scalar or sequence)
//! - [`NormalizedRow`] / [`NormalizedTable`] - One row per (cuisine, dish, feature)
//! - [`AggregatedRow`] - One summary row per restaurant

use serde::{Deserialize, Serialize};

// =============================================================================
// Column Names
// =============================================================================

pub const NAME: &str = "Name of Restaurant";
pub const LOCATION: &str = "Location";
pub const ADDRESS: &str = "Address";
pub const CUISINE: &str = "Cuisine";
pub const TOP_DISHES: &str = "Top Dishes";
pub const FEATURES: &str = "Features";
pub const PRICE_FOR_TWO: &str = "Price for 2";
pub const DINING_RATING: &str = "Dining Rating";
pub const DINING_RATING_COUNT: &str = "Dining Rating Count";
pub const DELIVERY_RATING: &str = "Delivery Rating";
pub const DELIVERY_RATING_COUNT: &str = "Delivery Rating Count";

/// Every column the source table must provide.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    NAME,
    LOCATION,
    ADDRESS,
    CUISINE,
    TOP_DISHES,
    FEATURES,
    PRICE_FOR_TWO,
    DINING_RATING,
    DINING_RATING_COUNT,
    DELIVERY_RATING,
    DELIVERY_RATING_COUNT,
];

/// Columns whose text may encode a list literal.
pub const LIST_COLUMNS: [&str; 3] = [CUISINE, TOP_DISHES, FEATURES];

// =============================================================================
// Cell Values
// =============================================================================

/// A list-encoded cell after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    /// No value in the source cell.
    Missing,
    /// A single value (parse failure, or a literal that is not a sequence).
    Scalar(String),
    /// A parsed list or tuple literal.
    Sequence(Vec<String>),
}

impl CellValue {
    /// Values this cell contributes along its expansion axis.
    ///
    /// Always yields at least one entry so a row is never dropped: a missing
    /// cell or an empty sequence contributes a single `None`.
    pub fn expansion_values(&self) -> Vec<Option<String>> {
        match self {
            CellValue::Missing => vec![None],
            CellValue::Scalar(s) => vec![Some(s.trim().to_string())],
            CellValue::Sequence(items) if items.is_empty() => vec![None],
            CellValue::Sequence(items) => items
                .iter()
                .map(|s| Some(s.trim().to_string()))
                .collect(),
        }
    }

    /// Number of rows this cell expands into.
    pub fn arity(&self) -> usize {
        match self {
            CellValue::Sequence(items) => items.len().max(1),
            _ => 1,
        }
    }
}

// =============================================================================
// Raw Rows
// =============================================================================

/// One listing record as read from the source table.
///
/// String cells are already trimmed; blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Name of Restaurant")]
    pub name: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "Cuisine")]
    pub cuisine: Option<String>,
    #[serde(rename = "Top Dishes")]
    pub top_dishes: Option<String>,
    #[serde(rename = "Features")]
    pub features: Option<String>,
    #[serde(rename = "Price for 2")]
    pub price_for_two: Option<f64>,
    #[serde(rename = "Dining Rating")]
    pub dining_rating: Option<f64>,
    #[serde(rename = "Dining Rating Count")]
    pub dining_rating_count: Option<f64>,
    #[serde(rename = "Delivery Rating")]
    pub delivery_rating: Option<f64>,
    #[serde(rename = "Delivery Rating Count")]
    pub delivery_rating_count: Option<f64>,
}

/// Turns an already-normalized row back into a raw row, so the table can be
/// fed through normalization again.
impl From<&NormalizedRow> for RawRow {
    fn from(row: &NormalizedRow) -> Self {
        Self {
            name: row.name.clone(),
            location: row.location.clone(),
            address: row.address.clone(),
            cuisine: row.cuisine.clone(),
            top_dishes: row.top_dish.clone(),
            features: row.feature.clone(),
            price_for_two: row.price_for_two,
            dining_rating: row.dining_rating,
            dining_rating_count: row.dining_rating_count,
            delivery_rating: row.delivery_rating,
            delivery_rating_count: row.delivery_rating_count,
        }
    }
}

/// The source table: header names as found (trimmed) plus rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Normalized Rows
// =============================================================================

/// One row per (cuisine, dish, feature) combination of a source row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    #[serde(rename = "Name of Restaurant")]
    pub name: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "Cuisine")]
    pub cuisine: Option<String>,
    #[serde(rename = "Top Dishes")]
    pub top_dish: Option<String>,
    #[serde(rename = "Features")]
    pub feature: Option<String>,
    #[serde(rename = "Price for 2")]
    pub price_for_two: Option<f64>,
    #[serde(rename = "Dining Rating")]
    pub dining_rating: Option<f64>,
    #[serde(rename = "Dining Rating Count")]
    pub dining_rating_count: Option<f64>,
    #[serde(rename = "Delivery Rating")]
    pub delivery_rating: Option<f64>,
    #[serde(rename = "Delivery Rating Count")]
    pub delivery_rating_count: Option<f64>,
}

/// The expanded table, immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedTable {
    pub rows: Vec<NormalizedRow>,
    /// Number of source rows the table was expanded from.
    pub source_rows: usize,
    /// List-encoded cells that failed to parse and were kept as one value.
    pub wrapped_cells: usize,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedRow> {
        self.rows.iter()
    }

    /// View the table as raw rows again (one list cell = one plain string).
    pub fn to_raw(&self) -> RawTable {
        RawTable {
            headers: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: self.rows.iter().map(RawRow::from).collect(),
        }
    }
}

// =============================================================================
// Aggregated Rows
// =============================================================================

/// Per-restaurant summary of a filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRow {
    #[serde(rename = "Name of Restaurant")]
    pub name: String,
    /// First non-missing address.
    #[serde(rename = "Address")]
    pub address: Option<String>,
    /// Distinct dishes in first-seen order, comma separated.
    #[serde(rename = "Top Dishes")]
    pub top_dishes: String,
    /// Distinct features in first-seen order, comma separated.
    #[serde(rename = "Features")]
    pub features: String,
    #[serde(rename = "Price for 2")]
    pub price_for_two: Option<f64>,
    #[serde(rename = "Dining Rating")]
    pub dining_rating: Option<f64>,
    #[serde(rename = "Dining Rating Count")]
    pub dining_rating_count: Option<f64>,
    #[serde(rename = "Delivery Rating")]
    pub delivery_rating: Option<f64>,
    #[serde(rename = "Delivery Rating Count")]
    pub delivery_rating_count: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expansion_values() {
        assert_eq!(CellValue::Missing.expansion_values(), vec![None]);
        assert_eq!(
            CellValue::Scalar(" AC ".into()).expansion_values(),
            vec![Some("AC".to_string())]
        );
        assert_eq!(
            CellValue::Sequence(vec!["Indian".into(), " Chinese".into()]).expansion_values(),
            vec![Some("Indian".to_string()), Some("Chinese".to_string())]
        );
    }

    #[test]
    fn test_empty_sequence_keeps_row() {
        let cell = CellValue::Sequence(vec![]);
        assert_eq!(cell.arity(), 1);
        assert_eq!(cell.expansion_values(), vec![None]);
    }

    #[test]
    fn test_serialized_column_names() {
        let row = AggregatedRow {
            name: "A".into(),
            address: Some("1 Main Road".into()),
            top_dishes: "Biryani".into(),
            features: "AC".into(),
            price_for_two: Some(500.0),
            dining_rating: Some(4.0),
            dining_rating_count: Some(20.0),
            delivery_rating: None,
            delivery_rating_count: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Name of Restaurant"], "A");
        assert_eq!(json["Price for 2"], 500.0);
        assert!(json["Delivery Rating"].is_null());
    }

    #[test]
    fn test_cell_value_tagging() {
        let json = serde_json::to_value(CellValue::Sequence(vec!["a".into()])).unwrap();
        assert_eq!(json["type"], "Sequence");
        assert_eq!(json["value"][0], "a");
    }
}
