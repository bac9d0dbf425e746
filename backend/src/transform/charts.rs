//! Chart payloads derived from aggregated rows.
//!
//! Three views are produced for the presentation layer:
//!
//! - [`price_view`] - bar chart of `Price for 2` per restaurant
//! - [`rating_view`] - grouped bars of dining and delivery ratings
//! - [`correlation_matrix`] - 3×3 Pearson matrix over price and ratings
//!
//! Only the data each chart needs is defined here, plus the labels the
//! dashboard shows. Missing values stay missing; correlations that are not
//! defined come out as NaN (serialized as `null`).

use serde::Serialize;

use crate::models::{AggregatedRow, DELIVERY_RATING, DINING_RATING, NAME, PRICE_FOR_TWO};

/// One bar of the price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub restaurant: String,
    pub price: Option<f64>,
}

/// Bar chart of price for two.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<PricePoint>,
}

/// One series of the rating chart, aligned with `RatingChart::restaurants`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSeries {
    pub name: String,
    pub color: String,
    pub values: Vec<Option<f64>>,
}

/// Grouped bar chart of dining vs delivery rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub restaurants: Vec<String>,
    pub series: Vec<RatingSeries>,
}

/// Symmetric correlation matrix with its labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationMatrix {
    pub title: String,
    pub columns: Vec<String>,
    /// Row-major, `values[i][j]` = corr(columns[i], columns[j]).
    pub values: Vec<Vec<f64>>,
    pub z_min: f64,
    pub z_max: f64,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// All three chart payloads for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    pub price: PriceChart,
    pub ratings: RatingChart,
    pub correlation: CorrelationMatrix,
}

impl ChartSet {
    pub fn from_rows(rows: &[AggregatedRow]) -> Self {
        Self {
            price: price_view(rows),
            ratings: rating_view(rows),
            correlation: correlation_matrix(rows),
        }
    }
}

pub fn price_view(rows: &[AggregatedRow]) -> PriceChart {
    PriceChart {
        title: "Price for 2 Comparison".to_string(),
        x_label: NAME.to_string(),
        y_label: "Price for 2 (₹)".to_string(),
        points: rows
            .iter()
            .map(|r| PricePoint {
                restaurant: r.name.clone(),
                price: r.price_for_two,
            })
            .collect(),
    }
}

pub fn rating_view(rows: &[AggregatedRow]) -> RatingChart {
    RatingChart {
        title: "Dining and Delivery Rating Comparison".to_string(),
        x_label: "Restaurant".to_string(),
        y_label: "Rating".to_string(),
        restaurants: rows.iter().map(|r| r.name.clone()).collect(),
        series: vec![
            RatingSeries {
                name: DINING_RATING.to_string(),
                color: "blue".to_string(),
                values: rows.iter().map(|r| r.dining_rating).collect(),
            },
            RatingSeries {
                name: DELIVERY_RATING.to_string(),
                color: "orange".to_string(),
                values: rows.iter().map(|r| r.delivery_rating).collect(),
            },
        ],
    }
}

/// Pearson correlation between price and both ratings, rounded to 2 places.
pub fn correlation_matrix(rows: &[AggregatedRow]) -> CorrelationMatrix {
    let columns: [(&str, Vec<Option<f64>>); 3] = [
        (PRICE_FOR_TWO, rows.iter().map(|r| r.price_for_two).collect()),
        (DINING_RATING, rows.iter().map(|r| r.dining_rating).collect()),
        (DELIVERY_RATING, rows.iter().map(|r| r.delivery_rating).collect()),
    ];

    let values = columns
        .iter()
        .map(|(_, xs)| {
            columns
                .iter()
                .map(|(_, ys)| round2(pearson(xs, ys)))
                .collect()
        })
        .collect();

    CorrelationMatrix {
        title: "Correlation: Price, Dining & Delivery".to_string(),
        columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
        values,
        z_min: -1.0,
        z_max: 1.0,
    }
}

/// Pearson coefficient over pairwise-complete observations.
///
/// NaN when fewer than two pairs remain or either side is constant.
pub fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

/// Round to 2 decimals, ties to even.
fn round2(value: f64) -> f64 {
    let scaled = value * 100.0;
    let mut rounded = scaled.round();
    if (rounded - scaled).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded -= scaled.signum();
    }
    rounded / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agg(name: &str, price: f64, dining: f64, delivery: f64) -> AggregatedRow {
        AggregatedRow {
            name: name.into(),
            address: None,
            top_dishes: String::new(),
            features: String::new(),
            price_for_two: Some(price),
            dining_rating: Some(dining),
            dining_rating_count: Some(1.0),
            delivery_rating: Some(delivery),
            delivery_rating_count: Some(1.0),
        }
    }

    #[test]
    fn test_price_view() {
        let rows = vec![agg("A", 500.0, 4.0, 3.5), agg("B", 800.0, 4.2, 3.9)];
        let chart = price_view(&rows);

        assert_eq!(chart.points.len(), 2);
        assert_eq!(chart.points[1].restaurant, "B");
        assert_eq!(chart.points[1].price, Some(800.0));
    }

    #[test]
    fn test_rating_view_aligned() {
        let rows = vec![agg("A", 500.0, 4.0, 3.5), agg("B", 800.0, 4.2, 3.9)];
        let chart = rating_view(&rows);

        assert_eq!(chart.restaurants, vec!["A", "B"]);
        assert_eq!(chart.series[0].name, "Dining Rating");
        assert_eq!(chart.series[0].values, vec![Some(4.0), Some(4.2)]);
        assert_eq!(chart.series[1].values, vec![Some(3.5), Some(3.9)]);
    }

    #[test]
    fn test_perfect_correlation() {
        let rows = vec![
            agg("A", 100.0, 1.0, 5.0),
            agg("B", 200.0, 2.0, 4.0),
            agg("C", 300.0, 3.0, 3.0),
        ];
        let m = correlation_matrix(&rows);

        assert_eq!(m.get(PRICE_FOR_TWO, DINING_RATING), Some(1.0));
        assert_eq!(m.get(PRICE_FOR_TWO, DELIVERY_RATING), Some(-1.0));
        assert_eq!(m.get(DINING_RATING, DINING_RATING), Some(1.0));
    }

    #[test]
    fn test_matrix_is_symmetric_and_rounded() {
        let rows = vec![
            agg("A", 300.0, 3.9, 4.1),
            agg("B", 650.0, 4.4, 3.8),
            agg("C", 450.0, 3.6, 4.0),
            agg("D", 1200.0, 4.7, 4.3),
        ];
        let m = correlation_matrix(&rows);

        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.values[i][j], m.values[j][i]);
                let scaled = m.values[i][j] * 100.0;
                assert!((scaled - scaled.round()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_constant_price_yields_nan() {
        let rows = vec![agg("A", 500.0, 4.0, 3.5), agg("B", 500.0, 4.2, 3.9)];
        let m = correlation_matrix(&rows);

        assert!(m.get(PRICE_FOR_TWO, DINING_RATING).unwrap().is_nan());
        assert!(m.get(DELIVERY_RATING, PRICE_FOR_TWO).unwrap().is_nan());
        assert!(m.get(PRICE_FOR_TWO, PRICE_FOR_TWO).unwrap().is_nan());
        assert_eq!(m.get(DINING_RATING, DELIVERY_RATING), Some(1.0));
    }

    #[test]
    fn test_single_row_undefined() {
        let m = correlation_matrix(&[agg("A", 500.0, 4.0, 3.5)]);
        assert!(m.values.iter().flatten().all(|v| v.is_nan()));
    }

    #[test]
    fn test_missing_values_use_complete_pairs() {
        let xs = vec![Some(1.0), None, Some(2.0), Some(3.0)];
        let ys = vec![Some(2.0), Some(100.0), Some(4.0), Some(6.0)];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_serializes_as_null() {
        let m = correlation_matrix(&[]);
        let json = serde_json::to_value(&m).unwrap();
        assert!(json["values"][0][1].is_null());
        assert_eq!(json["zMin"], -1.0);
    }

    #[test]
    fn test_round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(0.876), 0.88);
        assert!(round2(f64::NAN).is_nan());
    }
}
