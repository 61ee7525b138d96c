//! Vehicle total cost of ownership
//!
//! Depreciation is realised over the holding period and is not discounted.
//! Fuel, tax, insurance and maintenance are level annual amounts discounted
//! over the ownership horizon.

use super::breakdown::{CostCategory, YearlyBreakdown};
use super::discount::{present_value_of_annuity, DiscountCurve};
use super::result::{resolve_price, FallbackNote, ValuationKind, ValuationResult};
use crate::preferences::Preferences;
use crate::product::{FuelConsumption, FuelType, VehicleRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Annual tax for battery-electric vehicles
pub const ELECTRIC_ANNUAL_TAX: f64 = 200.0;

const LUXURY_BRANDS: &[&str] = &[
    "bmw", "mercedes", "mercedes-benz", "audi", "porsche", "lexus", "jaguar", "land", "range",
    "maserati", "bentley", "tesla", "volvo", "infiniti",
];

const ECONOMY_BRANDS: &[&str] = &[
    "toyota", "honda", "hyundai", "kia", "skoda", "dacia", "suzuki", "mazda", "nissan", "seat",
    "fiat", "chevrolet",
];

/// Brand tier used for the maintenance multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandTier {
    Luxury,
    Economy,
    Standard,
}

impl BrandTier {
    /// Classify from the first word of the listing name
    pub fn from_brand(brand: Option<&str>) -> Self {
        match brand {
            Some(b) if LUXURY_BRANDS.contains(&b) => BrandTier::Luxury,
            Some(b) if ECONOMY_BRANDS.contains(&b) => BrandTier::Economy,
            _ => BrandTier::Standard,
        }
    }

    pub fn maintenance_multiplier(&self) -> f64 {
        match self {
            BrandTier::Luxury => 1.5,
            BrandTier::Economy => 0.8,
            BrandTier::Standard => 1.0,
        }
    }
}

/// Annual value retention factor; older cars lose value more slowly
pub fn decay_factor(car_age: i32) -> f64 {
    if car_age < 3 {
        0.85
    } else if car_age < 8 {
        0.90
    } else {
        0.95
    }
}

/// Annual road tax by engine size in litres
pub fn engine_tax(engine_size: f64) -> f64 {
    if engine_size < 1.6 {
        300.0
    } else if engine_size < 2.0 {
        400.0
    } else if engine_size < 3.0 {
        600.0
    } else {
        800.0
    }
}

/// Insurance age discount: x0.9 past 5 years, another x0.9 past 10
pub fn insurance_age_factor(car_age: i32) -> f64 {
    let mut factor = 1.0;
    if car_age > 5 {
        factor *= 0.9;
    }
    if car_age > 10 {
        factor *= 0.9;
    }
    factor
}

/// Annual maintenance before the brand multiplier
pub fn base_maintenance(car_age: i32) -> f64 {
    if car_age < 3 {
        500.0
    } else if car_age < 7 {
        800.0
    } else if car_age < 12 {
        1200.0
    } else {
        1800.0
    }
}

/// Typical consumption per 100 km when the listing has none
pub fn default_consumption(fuel: FuelType) -> FuelConsumption {
    match fuel {
        FuelType::Electric => FuelConsumption::Electric { kwh_per_100km: 18.0 },
        FuelType::Diesel => FuelConsumption::Volumetric { liters_per_100km: 5.5 },
        FuelType::Hybrid => FuelConsumption::Volumetric { liters_per_100km: 4.5 },
        FuelType::Petrol | FuelType::Unknown => {
            FuelConsumption::Volumetric { liters_per_100km: 7.0 }
        }
    }
}

/// Whether a consumption figure is in the unit the fuel is priced in
pub fn unit_matches(fuel: FuelType, consumption: FuelConsumption) -> bool {
    match consumption {
        FuelConsumption::Electric { .. } => fuel == FuelType::Electric,
        FuelConsumption::Volumetric { .. } => fuel != FuelType::Electric,
    }
}

/// Detailed vehicle valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleValuation {
    pub label: String,
    pub price: f64,
    pub car_age: i32,
    pub ownership_duration: u32,
    pub fuel_type: FuelType,
    pub fuel_consumption: FuelConsumption,
    pub brand_tier: BrandTier,

    pub decay_factor: f64,
    pub future_value: f64,
    pub total_depreciation: f64,

    pub annual_fuel_cost: f64,
    pub fuel_cost_npv: f64,
    pub annual_tax: f64,
    pub tax_npv: f64,
    pub annual_insurance: f64,
    pub insurance_npv: f64,
    pub annual_maintenance: f64,
    pub maintenance_npv: f64,

    /// annualMileage x carMaintenancePerKm, for display only
    pub mileage_maintenance_reference: f64,

    pub total_ownership_cost: f64,
    pub monthly_cost: f64,
    pub yearly_breakdown: YearlyBreakdown,
    pub fallbacks: Vec<FallbackNote>,
}

impl From<VehicleValuation> for ValuationResult {
    fn from(v: VehicleValuation) -> Self {
        let components = BTreeMap::from([
            (CostCategory::Depreciation, v.total_depreciation),
            (CostCategory::Fuel, v.fuel_cost_npv),
            (CostCategory::Tax, v.tax_npv),
            (CostCategory::Insurance, v.insurance_npv),
            (CostCategory::Maintenance, v.maintenance_npv),
        ]);

        ValuationResult {
            label: v.label,
            kind: ValuationKind::Vehicle,
            purchase_price: v.price,
            components,
            total_cost: v.total_ownership_cost,
            horizon_years: v.ownership_duration,
            monthly_cost: Some(v.monthly_cost),
            yearly_breakdown: Some(v.yearly_breakdown),
            fallbacks: v.fallbacks,
        }
    }
}

fn vehicle_default(field: &str, value: f64, label: &str, notes: &mut Vec<FallbackNote>) {
    FallbackNote::VehicleDefault {
        field: field.to_string(),
        value,
    }
    .record(label, notes);
}

/// Value a vehicle as of `valuation_year`
pub fn value_vehicle(
    record: &VehicleRecord,
    prefs: &Preferences,
    valuation_year: i32,
) -> VehicleValuation {
    let label = record.name.clone().unwrap_or_else(|| "vehicle".to_string());
    let mut fallbacks = Vec::new();

    let price = resolve_price(record.price, &label, &mut fallbacks);
    let duration = prefs.car_ownership_duration;
    let curve = DiscountCurve::single_rate(prefs.discount_rate);

    let car_age = match record.year {
        Some(year) => valuation_year - year,
        None => {
            vehicle_default("year", valuation_year as f64, &label, &mut fallbacks);
            0
        }
    };

    // A listing with no fuel type but an electric consumption figure is electric
    let fuel_type = match (record.fuel_type, record.fuel_consumption) {
        (FuelType::Unknown, Some(FuelConsumption::Electric { .. })) => FuelType::Electric,
        (fuel, _) => fuel,
    };

    // Depreciation
    let decay = decay_factor(car_age);
    let future_value = (price * decay.powi(duration as i32)).max(0.0);
    let total_depreciation = price - future_value;

    // Fuel; a figure in the other fuel's unit is replaced, never re-priced
    let fuel_consumption = match record.fuel_consumption {
        Some(c) if c.per_100km().is_finite() && unit_matches(fuel_type, c) => c,
        Some(c) if c.per_100km().is_finite() => {
            let fallback = default_consumption(fuel_type);
            let field = format!("fuelConsumption ({} for {} fuel)", c.unit(), fuel_type.as_str());
            vehicle_default(&field, fallback.per_100km(), &label, &mut fallbacks);
            fallback
        }
        _ => {
            let fallback = default_consumption(fuel_type);
            vehicle_default("fuelConsumption", fallback.per_100km(), &label, &mut fallbacks);
            fallback
        }
    };
    let annual_fuel_cost =
        fuel_consumption.per_100km() / 100.0 * prefs.annual_mileage * prefs.fuel_price(fuel_type);

    // Tax
    let annual_tax = if fuel_type == FuelType::Electric {
        ELECTRIC_ANNUAL_TAX
    } else {
        match record.engine_size.filter(|s| s.is_finite()) {
            Some(size) => engine_tax(size),
            None => {
                let tax = prefs.car_tax_annual;
                vehicle_default("engineSize (annual tax)", tax, &label, &mut fallbacks);
                tax
            }
        }
    };

    // Insurance
    let insurance_category = match record.insurance_category {
        Some(category) => category,
        None => {
            let category = Default::default();
            vehicle_default("insuranceCategory (multiplier)", 1.0, &label, &mut fallbacks);
            category
        }
    };
    let annual_insurance = prefs.car_insurance_annual
        * insurance_category.multiplier()
        * insurance_age_factor(car_age);

    // Maintenance
    let brand_tier = BrandTier::from_brand(record.brand().as_deref());
    let annual_maintenance = base_maintenance(car_age) * brand_tier.maintenance_multiplier();

    let annuity = |amount: f64| present_value_of_annuity(amount, prefs.discount_rate, duration);
    let fuel_cost_npv = annuity(annual_fuel_cost);
    let tax_npv = annuity(annual_tax);
    let insurance_npv = annuity(annual_insurance);
    let maintenance_npv = annuity(annual_maintenance);

    let total_ownership_cost =
        total_depreciation + fuel_cost_npv + tax_npv + insurance_npv + maintenance_npv;
    let monthly_cost = total_ownership_cost / (duration as f64 * 12.0);

    let mut yearly_breakdown = YearlyBreakdown::with_horizon(duration, &curve);
    yearly_breakdown.add(0, CostCategory::Depreciation, total_depreciation);
    yearly_breakdown.add_recurring(CostCategory::Fuel, annual_fuel_cost);
    yearly_breakdown.add_recurring(CostCategory::Tax, annual_tax);
    yearly_breakdown.add_recurring(CostCategory::Insurance, annual_insurance);
    yearly_breakdown.add_recurring(CostCategory::Maintenance, annual_maintenance);

    log::debug!(
        "{}: age {}, depreciation {:.2}, running costs {:.2}, total {:.2} ({:.2}/month)",
        label,
        car_age,
        total_depreciation,
        fuel_cost_npv + tax_npv + insurance_npv + maintenance_npv,
        total_ownership_cost,
        monthly_cost
    );

    VehicleValuation {
        label,
        price,
        car_age,
        ownership_duration: duration,
        fuel_type,
        fuel_consumption,
        brand_tier,
        decay_factor: decay,
        future_value,
        total_depreciation,
        annual_fuel_cost,
        fuel_cost_npv,
        annual_tax,
        tax_npv,
        annual_insurance,
        insurance_npv,
        annual_maintenance,
        maintenance_npv,
        mileage_maintenance_reference: prefs.annual_mileage * prefs.car_maintenance_per_km,
        total_ownership_cost,
        monthly_cost,
        yearly_breakdown,
        fallbacks,
    }
}
