//! Cascading selection over the normalized table.
//!
//! Choices narrow in a fixed order: location, then cuisine within that
//! location, then restaurant names within both. Each option list is drawn
//! from the rows that survive the previous choice, so a selection built from
//! offered options always names a combination present in the data.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{SelectionError, SelectionResult};
use crate::models::{NormalizedRow, NormalizedTable};

/// A user's current choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub location: String,
    pub cuisine: String,
    #[serde(default)]
    pub restaurants: Vec<String>,
}

impl Selection {
    pub fn new(
        location: impl Into<String>,
        cuisine: impl Into<String>,
        restaurants: Vec<String>,
    ) -> Self {
        Self {
            location: location.into(),
            cuisine: cuisine.into(),
            restaurants,
        }
    }
}

/// Distinct locations, sorted.
pub fn locations(table: &NormalizedTable) -> Vec<String> {
    distinct(table.iter(), |r| r.location.as_deref())
}

/// Distinct cuisines offered within `location`, sorted.
pub fn cuisines(table: &NormalizedTable, location: &str) -> Vec<String> {
    distinct(at_location(table, location), |r| r.cuisine.as_deref())
}

/// Distinct restaurant names offered within `location` and `cuisine`, sorted.
pub fn restaurants(table: &NormalizedTable, location: &str, cuisine: &str) -> Vec<String> {
    distinct(serving(table, location, cuisine), |r| r.name.as_deref())
}

/// Rows matching `location` and `cuisine` whose restaurant is in `names`.
///
/// An empty `names` yields an empty set.
pub fn select<'a>(
    table: &'a NormalizedTable,
    location: &str,
    cuisine: &str,
    names: &[String],
) -> Vec<&'a NormalizedRow> {
    if names.is_empty() {
        return Vec::new();
    }
    serving(table, location, cuisine)
        .filter(|r| r.name.as_ref().is_some_and(|n| names.contains(n)))
        .collect()
}

/// Check that every value of `selection` is currently offered.
pub fn validate(table: &NormalizedTable, selection: &Selection) -> SelectionResult<()> {
    if !locations(table).contains(&selection.location) {
        return Err(SelectionError::UnknownLocation(selection.location.clone()));
    }
    if !cuisines(table, &selection.location).contains(&selection.cuisine) {
        return Err(SelectionError::UnknownCuisine {
            location: selection.location.clone(),
            cuisine: selection.cuisine.clone(),
        });
    }
    let offered = restaurants(table, &selection.location, &selection.cuisine);
    if let Some(unknown) = selection.restaurants.iter().find(|n| !offered.contains(n)) {
        return Err(SelectionError::UnknownRestaurant(unknown.clone()));
    }
    Ok(())
}

fn at_location<'a: 'k, 'k>(
    table: &'a NormalizedTable,
    location: &'k str,
) -> impl Iterator<Item = &'a NormalizedRow> + 'k {
    table
        .iter()
        .filter(move |r| r.location.as_deref() == Some(location))
}

// Rows borrow from `table` only; the filter keys may be shorter-lived.
fn serving<'a: 'k, 'k>(
    table: &'a NormalizedTable,
    location: &'k str,
    cuisine: &'k str,
) -> impl Iterator<Item = &'a NormalizedRow> + 'k {
    at_location(table, location).filter(move |r| r.cuisine.as_deref() == Some(cuisine))
}

fn distinct<'a, I, F>(rows: I, field: F) -> Vec<String>
where
    I: Iterator<Item = &'a NormalizedRow>,
    F: Fn(&'a NormalizedRow) -> Option<&'a str>,
{
    rows.filter_map(field)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, location: &str, cuisine: &str) -> NormalizedRow {
        NormalizedRow {
            name: Some(name.into()),
            location: Some(location.into()),
            cuisine: Some(cuisine.into()),
            ..Default::default()
        }
    }

    fn sample_table() -> NormalizedTable {
        NormalizedTable {
            rows: vec![
                row("Saravana", "T Nagar", "South Indian"),
                row("Saravana", "T Nagar", "North Indian"),
                row("Annapoorna", "Adyar", "South Indian"),
                row("Dragon House", "Adyar", "Chinese"),
                row("Amma Mess", "Adyar", "South Indian"),
                NormalizedRow {
                    location: None,
                    ..row("Ghost Kitchen", "", "Chinese")
                },
            ],
            source_rows: 5,
            wrapped_cells: 0,
        }
    }

    #[test]
    fn test_cascading_options() {
        let table = sample_table();

        assert_eq!(locations(&table), vec!["Adyar", "T Nagar"]);
        assert_eq!(cuisines(&table, "Adyar"), vec!["Chinese", "South Indian"]);
        assert_eq!(
            restaurants(&table, "Adyar", "South Indian"),
            vec!["Amma Mess", "Annapoorna"]
        );
        assert!(restaurants(&table, "T Nagar", "Chinese").is_empty());
    }

    #[test]
    fn test_select_narrows_by_all_three() {
        let table = sample_table();
        let rows = select(&table, "Adyar", "South Indian", &["Annapoorna".to_string()]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name.as_deref(), Some("Annapoorna"));
    }

    #[test]
    fn test_select_without_names_is_empty() {
        let table = sample_table();
        assert!(select(&table, "Adyar", "South Indian", &[]).is_empty());
    }

    #[test]
    fn test_selected_rows_outlive_filter_keys() {
        let table = sample_table();
        let names = vec!["Amma Mess".to_string(), "Annapoorna".to_string()];
        let rows = {
            let location = String::from("Adyar");
            let cuisine = format!("South {}", "Indian");
            select(&table, &location, &cuisine, &names)
        };

        let picked: Vec<_> = rows.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(picked, vec!["Annapoorna", "Amma Mess"]);
    }

    #[test]
    fn test_select_ignores_other_locations() {
        let table = sample_table();
        let rows = select(&table, "Adyar", "South Indian", &["Saravana".to_string()]);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_validate() {
        let table = sample_table();

        let ok = Selection::new("Adyar", "Chinese", vec!["Dragon House".into()]);
        assert!(validate(&table, &ok).is_ok());

        let bad_location = Selection::new("Mylapore", "Chinese", vec![]);
        assert_eq!(
            validate(&table, &bad_location),
            Err(SelectionError::UnknownLocation("Mylapore".into()))
        );

        let bad_cuisine = Selection::new("T Nagar", "Chinese", vec![]);
        assert!(matches!(
            validate(&table, &bad_cuisine),
            Err(SelectionError::UnknownCuisine { .. })
        ));

        let bad_name = Selection::new("Adyar", "Chinese", vec!["Saravana".into()]);
        assert_eq!(
            validate(&table, &bad_name),
            Err(SelectionError::UnknownRestaurant("Saravana".into()))
        );
    }

    #[test]
    fn test_selection_deserialize_defaults() {
        let sel: Selection =
            serde_json::from_value(serde_json::json!({"location": "Adyar", "cuisine": "Chinese"}))
                .unwrap();
        assert!(sel.restaurants.is_empty());
    }
}
