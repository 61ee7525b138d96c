//! Lifetime cost valuation
//!
//! Each category has its own policy:
//! - **Appliances**: purchase price + discounted energy + discounted repairs
//!   (repairs capped at the purchase price)
//! - **Clothing**: purchase price + nominal washing cost over a material-derived lifespan
//! - **Vehicles**: depreciation + discounted fuel, tax, insurance and maintenance
//!
//! All policies are pure functions of the record and the preferences.
//!
//! # Example
//!
//! ```rust,ignore
//! use lifetime_cost::{Preferences, ProductRecord, ValuationEngine};
//!
//! let engine = ValuationEngine::new(Preferences::default());
//! let fridge = engine.value_appliance(&ProductRecord::with_price(649.0));
//! println!("Lifetime cost: {:.2}", fridge.total_lifetime_cost);
//! ```

pub mod discount;
pub mod energy;
pub mod maintenance;
mod breakdown;
mod result;
mod appliance;
mod clothing;
mod vehicle;

pub use breakdown::{CostCategory, YearRow, YearlyBreakdown};
pub use discount::{present_value, present_value_of_annuity, DiscountCurve};
pub use maintenance::MaintenanceClamp;
pub use result::{EnergySource, FallbackNote, RepairSource, ValuationKind, ValuationResult};
pub use appliance::{value_appliance, ApplianceValuation};
pub use clothing::{
    classify_material, value_clothing, ClothingValuation, MaterialProfile, QualityTier,
};
pub use vehicle::{value_vehicle, BrandTier, VehicleValuation};

use crate::error::ValuationError;
use crate::preferences::Preferences;
use crate::product::{ProductCategory, ProductInput, ProductRecord, VehicleRecord};
use chrono::Datelike;

/// Calendar year used for vehicle age when none is configured
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Valuation engine bound to one set of preferences
#[derive(Debug, Clone)]
pub struct ValuationEngine {
    preferences: Preferences,
    valuation_year: i32,
}

impl ValuationEngine {
    /// Engine valuing vehicles as of the current calendar year
    pub fn new(preferences: Preferences) -> Self {
        Self {
            preferences,
            valuation_year: current_year(),
        }
    }

    /// Fix the year used for vehicle age, for reproducible results
    pub fn with_valuation_year(mut self, year: i32) -> Self {
        self.valuation_year = year;
        self
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn valuation_year(&self) -> i32 {
        self.valuation_year
    }

    pub fn value_appliance(&self, record: &ProductRecord) -> ApplianceValuation {
        value_appliance(record, &self.preferences)
    }

    pub fn value_clothing(&self, record: &ProductRecord) -> ClothingValuation {
        value_clothing(record, &self.preferences)
    }

    pub fn value_vehicle(&self, record: &VehicleRecord) -> VehicleValuation {
        value_vehicle(record, &self.preferences, self.valuation_year)
    }

    /// Route a record to its category policy
    ///
    /// Appliance records tagged with the clothing category take the clothing path.
    pub fn value(&self, input: &ProductInput) -> ValuationResult {
        match input {
            ProductInput::Appliance(record) if record.product_type == ProductCategory::Clothing => {
                self.value_clothing(record).into()
            }
            ProductInput::Appliance(record) => self.value_appliance(record).into(),
            ProductInput::Clothing(record) => self.value_clothing(record).into(),
            ProductInput::Vehicle(record) => self.value_vehicle(record).into(),
        }
    }
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self::new(Preferences::default())
    }
}

/// Value a possibly-absent record under possibly-absent preferences
///
/// Absent preferences fall back to the built-in defaults; an absent record is
/// the only failure.
pub fn value_product(
    input: Option<&ProductInput>,
    preferences: Option<&Preferences>,
) -> Result<ValuationResult, ValuationError> {
    let input = input
        .ok_or_else(|| ValuationError::InvalidInput("no product record supplied".to_string()))?;
    let preferences = Preferences::resolve(preferences).into_owned();
    Ok(ValuationEngine::new(preferences).value(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::VehicleRecord;

    #[test]
    fn test_absent_record_is_an_error() {
        let err = value_product(None, None).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput(_)));
    }

    #[test]
    fn test_absent_preferences_use_defaults() {
        let input = ProductInput::Appliance(ProductRecord::with_price(500.0));
        let result = value_product(Some(&input), None).unwrap();

        assert_eq!(result.kind, ValuationKind::Appliance);
        assert_eq!(result.horizon_years, 10);
        assert_eq!(result.purchase_price, 500.0);
        assert!(result.yearly_breakdown.is_some());
        assert!(result.monthly_cost.is_none());
    }

    #[test]
    fn test_clothing_category_routes_to_clothing() {
        let engine = ValuationEngine::default();
        let record = ProductRecord {
            price: Some(60.0),
            product_type: ProductCategory::Clothing,
            material: Some("wool".to_string()),
            ..Default::default()
        };

        let result = engine.value(&ProductInput::Appliance(record));
        assert_eq!(result.kind, ValuationKind::Clothing);
        assert_eq!(result.horizon_years, 20);
    }

    #[test]
    fn test_vehicle_dispatch() {
        let engine = ValuationEngine::default().with_valuation_year(2026);
        let record = VehicleRecord {
            price: Some(15_000.0),
            year: Some(2020),
            ..Default::default()
        };

        let result = engine.value(&ProductInput::Vehicle(record));
        assert_eq!(result.kind, ValuationKind::Vehicle);
        assert_eq!(result.horizon_years, 5);
        assert!(result.component(CostCategory::Depreciation) > 0.0);
        assert_eq!(result.component(CostCategory::Energy), 0.0);
        assert_eq!(result.monthly_cost, Some(result.total_cost / 60.0));
    }
}
