//! Repair timing and discounted maintenance cost

use super::discount::present_value;

/// Years in which repairs fall, spread evenly inside the horizon
///
/// Repair `i` (1-indexed) lands at `round(i * horizon / (n + 1))`. Two repairs
/// may share a year; both are kept.
pub fn schedule_repair_years(expected_repairs: u32, horizon_years: u32) -> Vec<u32> {
    let spacing = horizon_years as f64 / (expected_repairs as f64 + 1.0);

    (1..=expected_repairs)
        .map(|i| (i as f64 * spacing).round() as u32)
        .collect()
}

/// Present value of one repair at each scheduled year
pub fn maintenance_cost_npv(
    repair_years: &[u32],
    average_repair_cost: f64,
    discount_rate: f64,
) -> f64 {
    repair_years
        .iter()
        .map(|&year| present_value(average_repair_cost, discount_rate, year as i32))
        .sum()
}

/// Record of a maintenance figure clamped to the purchase price
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaintenanceClamp {
    pub uncapped: f64,
    pub cap: f64,
}

/// Cap maintenance NPV at the purchase price
pub fn cap_at_price(maintenance_npv: f64, price: f64) -> (f64, Option<MaintenanceClamp>) {
    if maintenance_npv > price {
        (price, Some(MaintenanceClamp { uncapped: maintenance_npv, cap: price }))
    } else {
        (maintenance_npv, None)
    }
}
