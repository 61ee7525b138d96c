//! Energy cost model and label-class consumption estimates

use super::discount::present_value_of_annuity;
use crate::product::{EnergyClass, ProductCategory};

/// Consumption assumed when neither an explicit figure nor a table entry exists
pub const DEFAULT_ANNUAL_CONSUMPTION_KWH: f64 = 300.0;

// kWh/year by label class, A+++ through G
const REFRIGERATOR_KWH: [f64; 10] = [
    150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0,
];
const WASHING_MACHINE_KWH: [f64; 10] = [
    150.0, 175.0, 200.0, 225.0, 250.0, 275.0, 300.0, 325.0, 350.0, 375.0,
];
const DISHWASHER_KWH: [f64; 10] = [
    200.0, 230.0, 260.0, 290.0, 320.0, 350.0, 380.0, 410.0, 440.0, 470.0,
];
const DRYER_KWH: [f64; 10] = [175.0, 235.0, 300.0, 350.0, 425.0, 500.0, 575.0, 650.0, 725.0, 800.0];

/// Annual energy cost
pub fn annual_cost(consumption_kwh: f64, electricity_rate: f64) -> f64 {
    consumption_kwh * electricity_rate
}

/// Discounted energy cost over the horizon
pub fn lifetime_cost_npv(
    consumption_kwh: f64,
    electricity_rate: f64,
    discount_rate: f64,
    horizon_years: u32,
) -> f64 {
    present_value_of_annuity(
        annual_cost(consumption_kwh, electricity_rate),
        discount_rate,
        horizon_years,
    )
}

/// Table estimate for a category and class, `None` if either is not covered
pub fn table_consumption(category: ProductCategory, class: EnergyClass) -> Option<f64> {
    let table = match category {
        ProductCategory::Refrigerator => &REFRIGERATOR_KWH,
        ProductCategory::WashingMachine => &WASHING_MACHINE_KWH,
        ProductCategory::Dishwasher => &DISHWASHER_KWH,
        ProductCategory::Dryer => &DRYER_KWH,
        ProductCategory::Clothing | ProductCategory::Unknown => return None,
    };

    class.band_index().map(|idx| table[idx])
}

/// Estimated annual consumption; 300 kWh when the table has no entry
pub fn estimate_consumption(category: ProductCategory, class: EnergyClass) -> f64 {
    table_consumption(category, class).unwrap_or(DEFAULT_ANNUAL_CONSUMPTION_KWH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_annual_cost() {
        assert_relative_eq!(annual_cost(300.0, 0.30), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lifetime_npv_zero_rate() {
        assert_relative_eq!(lifetime_cost_npv(200.0, 0.25, 0.0, 10), 500.0, epsilon = 1e-12);
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(
            estimate_consumption(ProductCategory::Refrigerator, EnergyClass::APlusPlusPlus),
            150.0
        );
        assert_eq!(estimate_consumption(ProductCategory::Refrigerator, EnergyClass::G), 600.0);
        assert_eq!(estimate_consumption(ProductCategory::WashingMachine, EnergyClass::A), 225.0);
        assert_eq!(estimate_consumption(ProductCategory::Dishwasher, EnergyClass::B), 320.0);
        assert_eq!(estimate_consumption(ProductCategory::Dryer, EnergyClass::APlus), 300.0);
    }

    #[test]
    fn test_fallbacks() {
        assert_eq!(estimate_consumption(ProductCategory::Unknown, EnergyClass::A), 300.0);
        assert_eq!(estimate_consumption(ProductCategory::Dryer, EnergyClass::Unknown), 300.0);
        assert!(table_consumption(ProductCategory::Clothing, EnergyClass::A).is_none());
    }

    #[test]
    fn test_better_class_uses_less() {
        for category in [
            ProductCategory::Refrigerator,
            ProductCategory::WashingMachine,
            ProductCategory::Dishwasher,
            ProductCategory::Dryer,
        ] {
            let best = estimate_consumption(category, EnergyClass::APlusPlusPlus);
            let worst = estimate_consumption(category, EnergyClass::G);
            assert!(best < worst, "{:?}", category);
        }
    }
}
