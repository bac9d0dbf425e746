//! Group filtered rows into one summary row per restaurant.
//!
//! | Column                  | Reduction                                  |
//! |-------------------------|--------------------------------------------|
//! | `Address`               | first non-missing value                    |
//! | `Top Dishes`            | distinct values, first-seen order, `", "`  |
//! | `Features`              | distinct values, first-seen order, `", "`  |
//! | `Price for 2`           | first non-missing value                    |
//! | `Dining Rating`         | mean of non-missing values                 |
//! | `Dining Rating Count`   | sum of non-missing values                  |
//! | `Delivery Rating`       | mean of non-missing values                 |
//! | `Delivery Rating Count` | sum of non-missing values                  |
//!
//! Numeric reductions over a group with no values yield `None`.
//! Output is ordered by restaurant name.

use std::collections::{BTreeMap, HashSet};

use crate::models::{AggregatedRow, NormalizedRow};

/// Separator used when joining distinct dish and feature values.
pub const JOIN_SEPARATOR: &str = ", ";

/// Aggregate a filtered set. Rows without a restaurant name are skipped.
pub fn aggregate(rows: &[&NormalizedRow]) -> Vec<AggregatedRow> {
    let mut groups: BTreeMap<&str, GroupBuilder> = BTreeMap::new();

    for row in rows {
        if let Some(name) = row.name.as_deref() {
            groups.entry(name).or_default().add(row);
        }
    }

    groups
        .into_iter()
        .map(|(name, builder)| builder.build(name))
        .collect()
}

/// Accumulates one restaurant's rows.
#[derive(Default)]
struct GroupBuilder {
    address: Option<String>,
    top_dishes: DistinctValues,
    features: DistinctValues,
    price_for_two: Option<f64>,
    dining_rating: Mean,
    dining_rating_count: Sum,
    delivery_rating: Mean,
    delivery_rating_count: Sum,
}

impl GroupBuilder {
    fn add(&mut self, row: &NormalizedRow) {
        if self.address.is_none() {
            self.address = row.address.clone();
        }
        if self.price_for_two.is_none() {
            self.price_for_two = row.price_for_two;
        }
        self.top_dishes.push(row.top_dish.as_deref());
        self.features.push(row.feature.as_deref());
        self.dining_rating.push(row.dining_rating);
        self.dining_rating_count.push(row.dining_rating_count);
        self.delivery_rating.push(row.delivery_rating);
        self.delivery_rating_count.push(row.delivery_rating_count);
    }

    fn build(self, name: &str) -> AggregatedRow {
        AggregatedRow {
            name: name.to_string(),
            address: self.address,
            top_dishes: self.top_dishes.joined(),
            features: self.features.joined(),
            price_for_two: self.price_for_two,
            dining_rating: self.dining_rating.value(),
            dining_rating_count: self.dining_rating_count.value(),
            delivery_rating: self.delivery_rating.value(),
            delivery_rating_count: self.delivery_rating_count.value(),
        }
    }
}

#[derive(Default)]
struct DistinctValues {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl DistinctValues {
    fn push(&mut self, value: Option<&str>) {
        if let Some(v) = value {
            if self.seen.insert(v.to_string()) {
                self.ordered.push(v.to_string());
            }
        }
    }

    fn joined(&self) -> String {
        self.ordered.join(JOIN_SEPARATOR)
    }
}

#[derive(Default)]
struct Mean {
    total: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            self.total += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

#[derive(Default)]
struct Sum {
    total: Option<f64>,
}

impl Sum {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value.filter(|v| !v.is_nan()) {
            *self.total.get_or_insert(0.0) += v;
        }
    }

    fn value(&self) -> Option<f64> {
        self.total
    }
}
