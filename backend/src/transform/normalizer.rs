//! Expand raw listing rows into one row per (cuisine, dish, feature).
//!
//! # Architecture
//!
//! ```text
//! Raw row                              Normalized rows
//! ┌─────────────────────────────┐      ┌──────────────────────────┐
//! │ A  ['Indian','Chinese']     │      │ A  Indian   Biryani  AC  │
//! │    ['Biryani']  ['AC']      │  →   │ A  Chinese  Biryani  AC  │
//! └─────────────────────────────┘      └──────────────────────────┘
//! ```
//!
//! A row expands into `len(Cuisine) × len(Top Dishes) × len(Features)` rows.
//! Scalar columns are copied unchanged into every expanded row.

use crate::models::{CellValue, NormalizedRow, NormalizedTable, RawRow, RawTable};
use crate::transform::literal::{self, ReadCell};

/// Normalize a raw table. Pure: never fails, never mutates the input.
pub fn normalize(raw: &RawTable) -> NormalizedTable {
    let mut rows = Vec::new();
    let mut wrapped_cells = 0;

    for row in &raw.rows {
        let [cuisines, dishes, features] = list_cells(row);
        wrapped_cells += [&cuisines, &dishes, &features]
            .iter()
            .filter(|cell| cell.wrapped)
            .count();
        expand_row(row, &cuisines.value, &dishes.value, &features.value, &mut rows);
    }

    NormalizedTable {
        rows,
        source_rows: raw.rows.len(),
        wrapped_cells,
    }
}

/// Number of rows a raw row expands into.
pub fn expansion_count(row: &RawRow) -> usize {
    list_cells(row).iter().map(|cell| cell.value.arity()).product()
}

fn list_cells(row: &RawRow) -> [ReadCell; 3] {
    [&row.cuisine, &row.top_dishes, &row.features]
        .map(|cell| literal::parse_or_wrap(cell.as_deref()))
}

fn expand_row(
    row: &RawRow,
    cuisines: &CellValue,
    dishes: &CellValue,
    features: &CellValue,
    out: &mut Vec<NormalizedRow>,
) {
    let dishes = dishes.expansion_values();
    let features = features.expansion_values();

    for cuisine in cuisines.expansion_values() {
        for dish in &dishes {
            for feature in &features {
                out.push(NormalizedRow {
                    name: row.name.clone(),
                    location: row.location.clone(),
                    address: row.address.clone(),
                    cuisine: cuisine.clone(),
                    top_dish: dish.clone(),
                    feature: feature.clone(),
                    price_for_two: row.price_for_two,
                    dining_rating: row.dining_rating,
                    dining_rating_count: row.dining_rating_count,
                    delivery_rating: row.delivery_rating,
                    delivery_rating_count: row.delivery_rating_count,
                });
            }
        }
    }
}
