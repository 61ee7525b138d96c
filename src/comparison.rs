//! Multi-product comparison: ranking, savings and break-even points
//!
//! Works only on [`ValuationResult`]s, never on category internals, so
//! appliances, clothing and vehicles can be compared side by side.

use crate::error::ValuationError;
use crate::product::ProductInput;
use crate::valuation::{ValuationEngine, ValuationResult};
use serde::{Deserialize, Serialize};

/// Minimum number of products for a comparison
pub const MIN_COMPARISON_ENTRIES: usize = 2;

/// A ranked result annotated with savings against the most expensive entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub result: ValuationResult,
    pub savings: f64,
    pub savings_percentage: f64,
}

/// Point where two cumulative discounted cost curves cross
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEven {
    /// Fractional year of the crossing
    pub year: f64,
    /// Cumulative discounted cost at the crossing
    pub value: f64,
}

/// Sort ascending by total cost; needs at least two entries
pub fn rank_by_total_cost(
    mut results: Vec<ValuationResult>,
) -> Result<Vec<ValuationResult>, ValuationError> {
    if results.len() < MIN_COMPARISON_ENTRIES {
        return Err(ValuationError::InsufficientInput {
            required: MIN_COMPARISON_ENTRIES,
            actual: results.len(),
        });
    }

    results.sort_by(|a, b| a.total_cost.total_cmp(&b.total_cost));
    Ok(results)
}

/// Annotate each entry with its savings relative to the last (most expensive) one
pub fn savings_vs_most_expensive(ranked: &[ValuationResult]) -> Vec<RankedEntry> {
    let most_expensive = match ranked.last() {
        Some(last) => last.total_cost,
        None => return Vec::new(),
    };

    ranked
        .iter()
        .map(|result| {
            let savings = most_expensive - result.total_cost;
            let savings_percentage = if most_expensive != 0.0 {
                savings / most_expensive * 100.0
            } else {
                0.0
            };
            RankedEntry {
                result: result.clone(),
                savings,
                savings_percentage,
            }
        })
        .collect()
}

/// First crossing of the cumulative discounted cost curves of `a` and `b`
///
/// Returns `Ok(None)` when the curves do not cross within the shorter horizon.
pub fn break_even_point(
    a: &ValuationResult,
    b: &ValuationResult,
) -> Result<Option<BreakEven>, ValuationError> {
    let series_a = cumulative_series(a)?;
    let series_b = cumulative_series(b)?;

    let pairs: Vec<((u32, f64), (u32, f64))> = series_a.into_iter().zip(series_b).collect();

    for window in pairs.windows(2) {
        let ((year0, cum_a0), (_, cum_b0)) = window[0];
        let ((year1, cum_a1), (_, cum_b1)) = window[1];

        let diff0 = cum_a0 - cum_b0;
        let diff1 = cum_a1 - cum_b1;

        let crosses = diff0 != 0.0 && (diff1 == 0.0 || diff0.signum() != diff1.signum());
        if crosses {
            let t = diff0 / (diff0 - diff1);
            let year = year0 as f64 + t * (year1 as f64 - year0 as f64);
            let value = cum_a0 + t * (cum_a1 - cum_a0);
            return Ok(Some(BreakEven { year, value }));
        }
    }

    Ok(None)
}

fn cumulative_series(result: &ValuationResult) -> Result<Vec<(u32, f64)>, ValuationError> {
    result
        .yearly_breakdown
        .as_ref()
        .map(|b| b.cumulative_discounted())
        .ok_or_else(|| ValuationError::MissingBreakdown {
            label: result.label.clone(),
        })
}

/// One product in a comparison request
///
/// Either an already computed result or a raw record to be valued.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComparisonEntry {
    pub result: Option<ValuationResult>,
    pub product: Option<ProductInput>,
}

impl ComparisonEntry {
    pub fn from_result(result: ValuationResult) -> Self {
        Self {
            result: Some(result),
            product: None,
        }
    }

    pub fn from_product(product: ProductInput) -> Self {
        Self {
            result: None,
            product: Some(product),
        }
    }
}

/// Break-even of one product against the cheapest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakEvenPair {
    pub label: String,
    pub point: Option<BreakEven>,
}

/// Full comparison output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    /// Ascending by total cost
    pub ranked: Vec<RankedEntry>,

    /// Break-even of every other product against the cheapest
    pub break_even: Vec<BreakEvenPair>,
}

impl ComparisonReport {
    pub fn cheapest(&self) -> Option<&RankedEntry> {
        self.ranked.first()
    }

    pub fn most_expensive(&self) -> Option<&RankedEntry> {
        self.ranked.last()
    }
}

/// Comparison driver bound to a valuation engine
#[derive(Debug, Clone, Default)]
pub struct ComparisonEngine {
    engine: ValuationEngine,
}

impl ComparisonEngine {
    pub fn new(engine: ValuationEngine) -> Self {
        Self { engine }
    }

    /// Turn an entry into a result, valuing its record if needed
    pub fn resolve(&self, entry: &ComparisonEntry) -> Result<ValuationResult, ValuationError> {
        if let Some(result) = &entry.result {
            return Ok(result.clone());
        }

        match &entry.product {
            Some(product) if product.has_price_field() => Ok(self.engine.value(product)),
            Some(product) => Err(ValuationError::InvalidInput(format!(
                "comparison entry '{}' has no price and no computed result",
                product.label()
            ))),
            None => Err(ValuationError::InvalidInput(
                "comparison entry has neither a result nor a product".to_string(),
            )),
        }
    }

    /// Rank, annotate savings and compute break-even points against the cheapest
    pub fn compare(&self, entries: &[ComparisonEntry]) -> Result<ComparisonReport, ValuationError> {
        let results = entries
            .iter()
            .map(|entry| self.resolve(entry))
            .collect::<Result<Vec<_>, _>>()?;

        let ranked = rank_by_total_cost(results)?;
        let annotated = savings_vs_most_expensive(&ranked);

        let cheapest = &ranked[0];
        let mut break_even = Vec::new();
        for other in &ranked[1..] {
            match break_even_point(cheapest, other) {
                Ok(point) => break_even.push(BreakEvenPair {
                    label: other.label.clone(),
                    point,
                }),
                Err(err) => log::debug!("skipping break-even for '{}': {}", other.label, err),
            }
        }

        log::info!(
            "compared {} products, cheapest '{}' at {:.2}",
            ranked.len(),
            cheapest.label,
            cheapest.total_cost
        );

        Ok(ComparisonReport {
            ranked: annotated,
            break_even,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::ProductRecord;
    use crate::valuation::{CostCategory, ValuationKind, YearRow, YearlyBreakdown};
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    /// Result with a ledger of (year 0 purchase, level annual cost), undiscounted
    fn result(label: &str, purchase: f64, annual: f64, years: u32) -> ValuationResult {
        let rows = (0..=years)
            .map(|year| {
                let amount = if year == 0 { purchase } else { annual };
                let mut row = YearRow::new(year, 1.0);
                row.costs_by_category.insert(CostCategory::Purchase, amount);
                row.nominal_total = amount;
                row.discounted_total = amount;
                row
            })
            .collect();

        ValuationResult {
            label: label.to_string(),
            kind: ValuationKind::Appliance,
            purchase_price: purchase,
            components: BTreeMap::new(),
            total_cost: purchase + annual * years as f64,
            horizon_years: years,
            monthly_cost: None,
            yearly_breakdown: Some(YearlyBreakdown::from_rows(rows)),
            fallbacks: Vec::new(),
        }
    }

    fn priced(price: f64) -> ProductInput {
        ProductInput::Appliance(ProductRecord::with_price(price))
    }

    fn with_total(label: &str, total: f64) -> ValuationResult {
        let mut r = result(label, total, 0.0, 1);
        r.total_cost = total;
        r
    }

    #[test]
    fn test_rank_and_savings() {
        let ranked = rank_by_total_cost(vec![
            with_total("a", 800.0),
            with_total("b", 650.0),
            with_total("c", 900.0),
        ])
        .unwrap();

        let totals: Vec<f64> = ranked.iter().map(|r| r.total_cost).collect();
        assert_eq!(totals, vec![650.0, 800.0, 900.0]);

        let annotated = savings_vs_most_expensive(&ranked);
        assert_eq!(annotated[0].savings, 250.0);
        assert_relative_eq!(annotated[0].savings_percentage, 250.0 / 900.0 * 100.0);
        assert_eq!(annotated[2].savings, 0.0);
    }

    #[test]
    fn test_rank_needs_two() {
        let err = rank_by_total_cost(vec![with_total("only", 1.0)]).unwrap_err();
        assert_eq!(err, ValuationError::InsufficientInput { required: 2, actual: 1 });
    }

    #[test]
    fn test_break_even_crossing() {
        // A: 1000 up front, 50/year. B: 600 up front, 150/year.
        // Cumulative difference: 400, 300, 200, 100, 0 at year 4.
        let a = result("efficient", 1000.0, 50.0, 10);
        let b = result("cheap", 600.0, 150.0, 10);

        let point = break_even_point(&a, &b).unwrap().unwrap();
        assert_relative_eq!(point.year, 4.0, epsilon = 1e-12);
        assert_relative_eq!(point.value, 1200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_break_even_interpolates() {
        // Difference: 300, 180, 60, -60 -> crossing half way through year 2..3
        let a = result("a", 1000.0, 40.0, 5);
        let b = result("b", 700.0, 160.0, 5);

        let point = break_even_point(&a, &b).unwrap().unwrap();
        assert_relative_eq!(point.year, 2.5, epsilon = 1e-12);
        assert_relative_eq!(point.value, 1100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_break_even_none_when_always_cheaper() {
        let a = result("a", 500.0, 50.0, 10);
        let b = result("b", 800.0, 60.0, 10);
        assert_eq!(break_even_point(&a, &b).unwrap(), None);
    }

    #[test]
    fn test_break_even_within_shorter_horizon() {
        // Would cross at year 4, but B only runs 3 years
        let a = result("a", 1000.0, 50.0, 10);
        let b = result("b", 600.0, 150.0, 3);
        assert_eq!(break_even_point(&a, &b).unwrap(), None);
    }

    #[test]
    fn test_break_even_needs_breakdown() {
        let a = result("a", 500.0, 50.0, 10);
        let b = result("b", 800.0, 60.0, 10).without_breakdown();

        let err = break_even_point(&a, &b).unwrap_err();
        assert_eq!(err, ValuationError::MissingBreakdown { label: "b".to_string() });
    }

    #[test]
    fn test_compare_entries() {
        let engine = ComparisonEngine::default();
        let entries = vec![
            ComparisonEntry::from_product(priced(900.0)),
            ComparisonEntry::from_product(priced(400.0)),
            ComparisonEntry::from_result(with_total("precomputed", 5000.0)),
        ];

        let report = engine.compare(&entries).unwrap();
        assert_eq!(report.ranked.len(), 3);
        assert_eq!(report.cheapest().unwrap().result.purchase_price, 400.0);
        assert_eq!(report.most_expensive().unwrap().result.label, "precomputed");
        assert_eq!(report.break_even.len(), 2);
    }

    #[test]
    fn test_entry_without_price_or_result() {
        let engine = ComparisonEngine::default();
        let no_price =
            ComparisonEntry::from_product(ProductInput::Appliance(ProductRecord::default()));
        assert!(matches!(engine.resolve(&no_price), Err(ValuationError::InvalidInput(_))));
        assert!(matches!(
            engine.resolve(&ComparisonEntry::default()),
            Err(ValuationError::InvalidInput(_))
        ));
    }
}
