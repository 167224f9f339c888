mod registry;

pub use registry::{formula_for, CategoryFormula, FormulaTerm, Polarity, FORMULAS};

use super::snapshot::{Table, TableError};
use std::collections::HashMap;
use std::fmt;

/// Fixed dampening applied to the mean of the Health category scores.
pub const HEALTH_DAMPENING: f64 = 0.7;

/// Score one category for one region on the 0..=1000 scale. `Ok(None)` means
/// the category has no registered formula and should be skipped silently;
/// lookup and parse failures surface as table errors for the caller to
/// degrade at node scope.
pub fn score_category(
    table: &Table,
    region_code: &str,
    category: &str,
) -> Result<Option<f64>, TableError> {
    let Some(formula) = formula_for(category) else {
        return Ok(None);
    };

    let mut sum = 0.0;
    for term in formula.terms {
        let value = table.number(term.attribute, region_code)?;
        sum += match term.polarity {
            Polarity::Positive => value,
            Polarity::Inverted => 1.0 - value,
        };
    }

    Ok(Some(sum / formula.terms.len() as f64 * 1000.0))
}

/// Score every Health category that has a formula. Failures are contained to
/// the failing category: it is left out of the map and the report shows the
/// not-applicable sentinel for its node.
pub fn score_health_categories(
    table: &Table,
    region_code: &str,
    categories: &[&str],
) -> HashMap<String, f64> {
    let mut scores = HashMap::new();
    for category in categories {
        match score_category(table, region_code, category) {
            Ok(Some(score)) => {
                scores.insert((*category).to_string(), score);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(category, region_code, %err, "category left unscored");
            }
        }
    }
    scores
}

/// Mean of the present category scores, dampened. The mean runs on full
/// precision; two-decimal formatting happens at report-assembly time.
pub fn aggregate_health(scores: &HashMap<String, f64>) -> Result<f64, ScoreError> {
    if scores.is_empty() {
        return Err(ScoreError::EmptyAggregation);
    }
    let mean = scores.values().sum::<f64>() / scores.len() as f64;
    Ok(mean * HEALTH_DAMPENING)
}

#[derive(Debug, PartialEq, Eq)]
pub enum ScoreError {
    EmptyAggregation,
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreError::EmptyAggregation => {
                write!(f, "no category scores available to aggregate")
            }
        }
    }
}

impl std::error::Error for ScoreError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::snapshot::Table;

    fn table_with(columns: &[(&str, f64)]) -> Table {
        let mut header = vec!["region_code".to_string()];
        let mut row = vec!["NL00".to_string()];
        for (column, value) in columns {
            header.push((*column).to_string());
            row.push(value.to_string());
        }
        Table::new("health_vioscore_table", header, vec![row]).expect("table builds")
    }

    #[test]
    fn smoker_score_spans_full_scale() {
        let none = table_with(&[("smoker", 0.0)]);
        let all = table_with(&[("smoker", 1.0)]);

        let high = score_category(&none, "NL00", "smoker")
            .expect("lookup succeeds")
            .expect("formula registered");
        let low = score_category(&all, "NL00", "smoker")
            .expect("lookup succeeds")
            .expect("formula registered");

        assert!((high - 1000.0).abs() < 1e-9);
        assert!(low.abs() < 1e-9);
    }

    #[test]
    fn drinking_at_ideal_polarity_scores_1000() {
        let table = table_with(&[
            ("meets_alcohol_guideline", 1.0),
            ("drinker", 0.0),
            ("heavy_drinker", 0.0),
            ("excessive_drinker", 0.0),
        ]);
        let score = score_category(&table, "NL00", "drinking")
            .expect("lookup succeeds")
            .expect("formula registered");
        assert!((score - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn every_formula_stays_within_scale_for_unit_inputs() {
        for formula in FORMULAS {
            for value in [0.0, 0.37, 1.0] {
                let columns: Vec<(&str, f64)> = formula
                    .terms
                    .iter()
                    .map(|term| (term.attribute, value))
                    .collect();
                let table = table_with(&columns);
                let score = score_category(&table, "NL00", formula.category)
                    .expect("lookup succeeds")
                    .expect("formula registered");
                assert!(
                    (0.0..=1000.0).contains(&score),
                    "{} out of range: {score}",
                    formula.category
                );
            }
        }
    }

    #[test]
    fn unregistered_category_is_skipped_without_error() {
        let table = table_with(&[("smoker", 0.5)]);
        let result = score_category(&table, "NL00", "greenery").expect("no lookup performed");
        assert!(result.is_none());
    }

    #[test]
    fn missing_column_surfaces_as_table_error() {
        let table = table_with(&[("smoker", 0.5)]);
        let err = score_category(&table, "NL00", "drinking").expect_err("columns absent");
        assert!(matches!(err, TableError::MissingColumn { .. }));
    }

    #[test]
    fn failing_category_is_left_out_of_the_health_map() {
        let table = table_with(&[("smoker", 0.2)]);
        let scores = score_health_categories(&table, "NL00", &["smoker", "drinking"]);
        assert_eq!(scores.len(), 1);
        assert!(scores.contains_key("smoker"));
    }

    #[test]
    fn aggregate_is_dampened_mean_of_present_scores() {
        let mut scores = HashMap::new();
        scores.insert("smoker".to_string(), 400.0);
        scores.insert("drinking".to_string(), 600.0);

        let aggregate = aggregate_health(&scores).expect("non-empty set");
        assert!((aggregate - 500.0 * HEALTH_DAMPENING).abs() < 1e-9);

        scores.insert("weight".to_string(), 1000.0);
        let raised = aggregate_health(&scores).expect("non-empty set");
        assert!(raised > aggregate, "adding a perfect score must raise the mean");
    }

    #[test]
    fn empty_aggregation_is_an_explicit_error() {
        let scores = HashMap::new();
        assert_eq!(
            aggregate_health(&scores).expect_err("empty set"),
            ScoreError::EmptyAggregation
        );
    }
}
