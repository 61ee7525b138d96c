//! User-level economic assumptions
//!
//! Every lookup degrades to a named default: a category missing from a map
//! falls back to the `unknown` entry, then to a built-in constant.

pub mod loader;

use crate::product::{FuelType, ProductCategory};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Horizon used when neither the category nor `unknown` has a lifespan
pub const FALLBACK_LIFESPAN_YEARS: u32 = 10;

/// Repair profile used when neither the category nor `unknown` has one
pub const FALLBACK_MAINTENANCE: MaintenanceDefaults = MaintenanceDefaults::new(350.0, 2);

/// Petrol price used when the fuel price table has no petrol entry either
pub const FALLBACK_PETROL_PRICE: f64 = 1.8;

/// Per-category repair profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceDefaults {
    pub average_repair_cost: f64,
    pub expected_repairs: u32,
}

impl MaintenanceDefaults {
    pub const fn new(average_repair_cost: f64, expected_repairs: u32) -> Self {
        Self {
            average_repair_cost,
            expected_repairs,
        }
    }
}

/// Economic assumptions for a valuation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Currency per kWh
    pub electricity_rate: f64,

    /// Fractional annual discount rate
    pub discount_rate: f64,

    /// Expected lifespan in years by category
    pub appliance_lifespans: BTreeMap<ProductCategory, u32>,

    pub maintenance_cost_defaults: BTreeMap<ProductCategory, MaintenanceDefaults>,

    /// Vehicle holding period in years
    pub car_ownership_duration: u32,

    /// Kilometres driven per year
    pub annual_mileage: f64,

    /// Price per litre (combustion) or per kWh (electric)
    pub fuel_prices: BTreeMap<FuelType, f64>,

    /// Base annual insurance premium before risk and age adjustments
    pub car_insurance_annual: f64,

    /// Annual road tax used when the engine size is unknown
    pub car_tax_annual: f64,

    /// Mileage-based maintenance reference rate
    pub car_maintenance_per_km: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        let appliance_lifespans = BTreeMap::from([
            (ProductCategory::Refrigerator, 10),
            (ProductCategory::WashingMachine, 8),
            (ProductCategory::Dishwasher, 9),
            (ProductCategory::Dryer, 8),
            (ProductCategory::Clothing, 5),
            (ProductCategory::Unknown, 10),
        ]);

        let maintenance_cost_defaults = BTreeMap::from([
            (ProductCategory::Refrigerator, MaintenanceDefaults::new(200.0, 1)),
            (ProductCategory::WashingMachine, MaintenanceDefaults::new(180.0, 2)),
            (ProductCategory::Dishwasher, MaintenanceDefaults::new(160.0, 2)),
            (ProductCategory::Dryer, MaintenanceDefaults::new(170.0, 2)),
            (ProductCategory::Clothing, MaintenanceDefaults::new(0.0, 0)),
            (ProductCategory::Unknown, FALLBACK_MAINTENANCE),
        ]);

        let fuel_prices = BTreeMap::from([
            (FuelType::Petrol, 1.8),
            (FuelType::Diesel, 1.9),
            (FuelType::Electric, 0.25),
        ]);

        Self {
            electricity_rate: 0.30,
            discount_rate: 0.02,
            appliance_lifespans,
            maintenance_cost_defaults,
            car_ownership_duration: 5,
            annual_mileage: 15_000.0,
            fuel_prices,
            car_insurance_annual: 1000.0,
            car_tax_annual: 300.0,
            car_maintenance_per_km: 0.05,
        }
    }
}

impl Preferences {
    /// Use the supplied preferences, or the built-in defaults when absent
    pub fn resolve(preferences: Option<&Preferences>) -> Cow<'_, Preferences> {
        match preferences {
            Some(p) => Cow::Borrowed(p),
            None => Cow::Owned(Preferences::default()),
        }
    }

    /// Lifespan for a category: category entry, then `unknown`, then 10 years
    pub fn lifespan_for(&self, category: ProductCategory) -> u32 {
        self.appliance_lifespans
            .get(&category)
            .or_else(|| self.appliance_lifespans.get(&ProductCategory::Unknown))
            .copied()
            .unwrap_or(FALLBACK_LIFESPAN_YEARS)
    }

    /// Repair profile for a category, falling back to the `unknown` entry
    pub fn maintenance_defaults_for(
        &self,
        category: ProductCategory,
    ) -> Option<MaintenanceDefaults> {
        self.maintenance_cost_defaults
            .get(&category)
            .or_else(|| self.maintenance_cost_defaults.get(&ProductCategory::Unknown))
            .copied()
    }

    /// Fuel price for a type, falling back to the petrol price
    pub fn fuel_price(&self, fuel: FuelType) -> f64 {
        self.fuel_prices
            .get(&fuel)
            .or_else(|| self.fuel_prices.get(&FuelType::Petrol))
            .copied()
            .unwrap_or(FALLBACK_PETROL_PRICE)
    }

    /// Builder-style discount rate override
    pub fn with_discount_rate(mut self, rate: f64) -> Self {
        self.discount_rate = rate;
        self
    }

    /// Builder-style electricity rate override
    pub fn with_electricity_rate(mut self, rate: f64) -> Self {
        self.electricity_rate = rate;
        self
    }

    /// Human-readable warnings for values outside their conventional range
    ///
    /// Values are never rejected; the engine computes with whatever it is given.
    pub fn sanity_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(self.electricity_rate > 0.0) {
            warnings.push(format!("electricity rate {} is not positive", self.electricity_rate));
        }
        if !(0.0..=0.2).contains(&self.discount_rate) {
            warnings.push(format!("discount rate {} is outside 0..=0.2", self.discount_rate));
        }
        if self.car_ownership_duration == 0 {
            warnings
                .push("car ownership duration is zero; monthly cost will be undefined".to_string());
        }

        warnings
    }
}
