//! Year-by-year cost ledger
//!
//! Year 0 is the purchase event and always carries a discount factor of 1.

use super::discount::DiscountCurve;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cost category of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostCategory {
    Purchase,
    Energy,
    Maintenance,
    Washing,
    Depreciation,
    Fuel,
    Tax,
    Insurance,
}

impl CostCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostCategory::Purchase => "purchase",
            CostCategory::Energy => "energy",
            CostCategory::Maintenance => "maintenance",
            CostCategory::Washing => "washing",
            CostCategory::Depreciation => "depreciation",
            CostCategory::Fuel => "fuel",
            CostCategory::Tax => "tax",
            CostCategory::Insurance => "insurance",
        }
    }
}

/// A single year of the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRow {
    pub year: u32,

    /// Nominal (undiscounted) amounts by category
    pub costs_by_category: BTreeMap<CostCategory, f64>,

    pub discount_factor: f64,

    pub nominal_total: f64,

    pub discounted_total: f64,
}

impl YearRow {
    pub fn new(year: u32, discount_factor: f64) -> Self {
        Self {
            year,
            costs_by_category: BTreeMap::new(),
            discount_factor,
            nominal_total: 0.0,
            discounted_total: 0.0,
        }
    }

    /// Nominal amount booked under a category, 0 if none
    pub fn cost(&self, category: CostCategory) -> f64 {
        self.costs_by_category.get(&category).copied().unwrap_or(0.0)
    }

    fn refresh_totals(&mut self) {
        self.nominal_total = self.costs_by_category.values().sum();
        self.discounted_total = self.nominal_total * self.discount_factor;
    }
}

/// Ordered yearly ledger, one row per year from 0 to the horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearlyBreakdown {
    rows: Vec<YearRow>,
}

impl YearlyBreakdown {
    /// Empty rows for years 0..=horizon discounted on `curve`
    pub fn with_horizon(horizon_years: u32, curve: &DiscountCurve) -> Self {
        let rows = (0..=horizon_years)
            .map(|year| YearRow::new(year, curve.discount_factor(year)))
            .collect();
        Self { rows }
    }

    /// Build from pre-computed rows, sorted by year
    pub fn from_rows(mut rows: Vec<YearRow>) -> Self {
        rows.sort_by_key(|r| r.year);
        Self { rows }
    }

    /// Book a nominal amount; years beyond the horizon are ignored
    pub fn add(&mut self, year: u32, category: CostCategory, amount: f64) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.year == year) {
            *row.costs_by_category.entry(category).or_insert(0.0) += amount;
            row.refresh_totals();
        }
    }

    /// Book the same amount in every year from 1 to the horizon
    pub fn add_recurring(&mut self, category: CostCategory, annual_amount: f64) {
        for year in 1..=self.horizon() {
            self.add(year, category, annual_amount);
        }
    }

    /// Multiply every entry of a category by `factor`
    pub fn scale_category(&mut self, category: CostCategory, factor: f64) {
        for row in &mut self.rows {
            if let Some(amount) = row.costs_by_category.get_mut(&category) {
                *amount *= factor;
                row.refresh_totals();
            }
        }
    }

    pub fn rows(&self) -> &[YearRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Last year in the ledger
    pub fn horizon(&self) -> u32 {
        self.rows.last().map(|r| r.year).unwrap_or(0)
    }

    /// Running (year, cumulative discounted cost) series
    pub fn cumulative_discounted(&self) -> Vec<(u32, f64)> {
        let mut running = 0.0;
        self.rows
            .iter()
            .map(|row| {
                running += row.discounted_total;
                (row.year, running)
            })
            .collect()
    }

    pub fn total_discounted(&self) -> f64 {
        self.rows.iter().map(|r| r.discounted_total).sum()
    }

    pub fn total_nominal(&self) -> f64 {
        self.rows.iter().map(|r| r.nominal_total).sum()
    }

    /// Discounted total of one category across all years
    pub fn category_discounted(&self, category: CostCategory) -> f64 {
        self.rows
            .iter()
            .map(|r| r.cost(category) * r.discount_factor)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_year_zero_is_undiscounted() {
        let breakdown = YearlyBreakdown::with_horizon(3, &DiscountCurve::single_rate(0.1));
        assert_eq!(breakdown.len(), 4);
        assert_eq!(breakdown.rows()[0].discount_factor, 1.0);
        assert_relative_eq!(breakdown.rows()[1].discount_factor, 1.0 / 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_add_and_totals() {
        let mut breakdown = YearlyBreakdown::with_horizon(2, &DiscountCurve::single_rate(0.0));
        breakdown.add(0, CostCategory::Purchase, 500.0);
        breakdown.add_recurring(CostCategory::Energy, 90.0);
        breakdown.add(2, CostCategory::Maintenance, 50.0);
        breakdown.add(9, CostCategory::Maintenance, 1000.0);

        assert_eq!(breakdown.rows()[2].nominal_total, 140.0);
        assert_eq!(breakdown.total_nominal(), 730.0);
        assert_eq!(
            breakdown.cumulative_discounted(),
            vec![(0, 500.0), (1, 590.0), (2, 730.0)]
        );
    }

    #[test]
    fn test_scale_category() {
        let mut breakdown = YearlyBreakdown::with_horizon(2, &DiscountCurve::single_rate(0.0));
        breakdown.add(1, CostCategory::Maintenance, 100.0);
        breakdown.add(1, CostCategory::Energy, 10.0);
        breakdown.scale_category(CostCategory::Maintenance, 0.5);

        assert_eq!(breakdown.rows()[1].cost(CostCategory::Maintenance), 50.0);
        assert_eq!(breakdown.rows()[1].nominal_total, 60.0);
        assert_eq!(breakdown.category_discounted(CostCategory::Energy), 10.0);
    }
}
