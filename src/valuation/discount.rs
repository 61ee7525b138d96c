//! Time-value-of-money primitives
//!
//! Annual compounding, cash flows at the end of each year. No domain checks:
//! a rate of -1 divides by zero and the resulting infinity propagates.

use serde::{Deserialize, Serialize};

/// Present value of a single cash flow received `year` years from now
pub fn present_value(cash_flow: f64, rate: f64, year: i32) -> f64 {
    cash_flow / (1.0 + rate).powi(year)
}

/// Present value of a level annual cash flow paid at the end of years 1..=years
pub fn present_value_of_annuity(annual_cash_flow: f64, rate: f64, years: u32) -> f64 {
    if rate == 0.0 {
        return annual_cash_flow * years as f64;
    }

    (1..=years as i32)
        .map(|year| present_value(annual_cash_flow, rate, year))
        .sum()
}

/// Flat annual discount curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountCurve {
    /// Annual discount rate
    pub annual_rate: f64,
}

impl DiscountCurve {
    pub fn single_rate(annual_rate: f64) -> Self {
        Self { annual_rate }
    }

    /// Discount factor for a given year; 1.0 at year 0
    pub fn discount_factor(&self, year: u32) -> f64 {
        present_value(1.0, self.annual_rate, year as i32)
    }

    pub fn present_value(&self, cash_flow: f64, year: u32) -> f64 {
        present_value(cash_flow, self.annual_rate, year as i32)
    }

    pub fn pv_annuity(&self, annual_cash_flow: f64, years: u32) -> f64 {
        present_value_of_annuity(annual_cash_flow, self.annual_rate, years)
    }

    /// Present value of a stream of (year, amount) pairs
    pub fn pv_stream(&self, flows: &[(u32, f64)]) -> f64 {
        flows
            .iter()
            .map(|(year, amount)| self.present_value(*amount, *year))
            .sum()
    }
}

impl Default for DiscountCurve {
    fn default() -> Self {
        Self::single_rate(0.02)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_present_value() {
        assert_relative_eq!(present_value(110.0, 0.10, 1), 100.0, epsilon = 1e-10);
        assert_relative_eq!(present_value(121.0, 0.10, 2), 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_rate_is_identity() {
        for year in 0..30 {
            assert_eq!(present_value(250.0, 0.0, year), 250.0);
        }
        assert_eq!(present_value_of_annuity(75.5, 0.0, 12), 75.5 * 12.0);
    }

    #[test]
    fn test_strictly_decreasing_in_year() {
        let mut previous = present_value(1000.0, 0.03, 1);
        for year in 2..=40 {
            let pv = present_value(1000.0, 0.03, year);
            assert!(pv < previous, "year {} did not decrease", year);
            previous = pv;
        }
    }

    #[test]
    fn test_annuity_matches_closed_form() {
        // 100/year for 10 years at 5%: 100 * (1 - 1.05^-10) / 0.05
        let pv = present_value_of_annuity(100.0, 0.05, 10);
        let closed_form = 100.0 * (1.0 - 1.05_f64.powi(-10)) / 0.05;
        assert_relative_eq!(pv, closed_form, epsilon = 1e-9);
    }

    #[test]
    fn test_empty_annuity() {
        assert_eq!(present_value_of_annuity(500.0, 0.05, 0), 0.0);
    }

    #[test]
    fn test_rate_of_minus_one_is_not_guarded() {
        assert!(present_value(100.0, -1.0, 1).is_infinite());
    }

    #[test]
    fn test_curve_stream() {
        let curve = DiscountCurve::single_rate(0.04);
        assert_eq!(curve.discount_factor(0), 1.0);

        let pv = curve.pv_stream(&[(1, 104.0), (2, 108.16)]);
        assert_relative_eq!(pv, 200.0, epsilon = 1e-9);
    }
}
