//! Appliance lifetime cost: purchase + discounted energy + capped maintenance

use super::breakdown::{CostCategory, YearlyBreakdown};
use super::discount::DiscountCurve;
use super::energy;
use super::maintenance::{self, MaintenanceClamp};
use super::result::{
    resolve_price, EnergySource, FallbackNote, RepairSource, ValuationKind, ValuationResult,
};
use crate::preferences::{Preferences, FALLBACK_MAINTENANCE};
use crate::product::{ProductCategory, ProductRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Detailed appliance valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceValuation {
    pub label: String,
    pub category: ProductCategory,
    pub price: f64,

    /// Horizon in years
    pub lifespan: u32,

    pub annual_energy_consumption: f64,
    pub energy_source: EnergySource,
    pub annual_energy_cost: f64,
    pub energy_cost_npv: f64,

    pub average_repair_cost_used: f64,
    pub num_repairs_used: u32,
    pub repair_source: RepairSource,
    pub repair_years: Vec<u32>,

    /// Maintenance NPV after the price cap
    pub maintenance_cost_npv: f64,
    pub maintenance_clamp: Option<MaintenanceClamp>,

    pub total_lifetime_cost: f64,
    pub yearly_breakdown: YearlyBreakdown,
    pub fallbacks: Vec<FallbackNote>,
}

impl ApplianceValuation {
    pub fn was_clamped(&self) -> bool {
        self.maintenance_clamp.is_some()
    }
}

impl From<ApplianceValuation> for ValuationResult {
    fn from(v: ApplianceValuation) -> Self {
        let components = BTreeMap::from([
            (CostCategory::Purchase, v.price),
            (CostCategory::Energy, v.energy_cost_npv),
            (CostCategory::Maintenance, v.maintenance_cost_npv),
        ]);

        ValuationResult {
            label: v.label,
            kind: ValuationKind::Appliance,
            purchase_price: v.price,
            components,
            total_cost: v.total_lifetime_cost,
            horizon_years: v.lifespan,
            monthly_cost: None,
            yearly_breakdown: Some(v.yearly_breakdown),
            fallbacks: v.fallbacks,
        }
    }
}

/// Explicit consumption if numeric, else the label-class table, else 300 kWh
fn resolve_energy(record: &ProductRecord) -> (f64, EnergySource) {
    if let Some(kwh) = record.energy_consumption.filter(|k| k.is_finite()) {
        return (kwh, EnergySource::Explicit);
    }

    match energy::table_consumption(record.product_type, record.energy_efficiency_class) {
        Some(kwh) => (kwh, EnergySource::ClassEstimate),
        None => (energy::DEFAULT_ANNUAL_CONSUMPTION_KWH, EnergySource::Default),
    }
}

/// Explicit repair fields if numeric, else category defaults, else 350 x 2
fn resolve_repairs(record: &ProductRecord, prefs: &Preferences) -> (f64, u32, RepairSource) {
    let defaults = prefs
        .maintenance_defaults_for(record.product_type)
        .unwrap_or(FALLBACK_MAINTENANCE);

    let explicit_cost = record
        .average_repair_cost
        .filter(|c| c.is_finite() && *c >= 0.0);
    let explicit_count = record
        .expected_repairs
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32);

    match (explicit_cost, explicit_count) {
        (Some(cost), Some(count)) => (cost, count, RepairSource::Explicit),
        (cost, count) => (
            cost.unwrap_or(defaults.average_repair_cost),
            count.unwrap_or(defaults.expected_repairs),
            RepairSource::Default,
        ),
    }
}

/// Value an appliance record under the given preferences
pub fn value_appliance(record: &ProductRecord, prefs: &Preferences) -> ApplianceValuation {
    let label = record.name.clone().unwrap_or_else(|| record.product_type.as_str().to_string());
    let mut fallbacks = Vec::new();

    let category = record.product_type;
    let lifespan = prefs.lifespan_for(category);
    let price = resolve_price(record.price, &label, &mut fallbacks);
    let curve = DiscountCurve::single_rate(prefs.discount_rate);

    // Energy
    let (annual_energy_consumption, energy_source) = resolve_energy(record);
    if energy_source != EnergySource::Explicit {
        FallbackNote::EnergyEstimated {
            source: energy_source,
            kwh_per_year: annual_energy_consumption,
        }
        .record(&label, &mut fallbacks);
    }
    let annual_energy_cost = energy::annual_cost(annual_energy_consumption, prefs.electricity_rate);
    let energy_cost_npv = energy::lifetime_cost_npv(
        annual_energy_consumption,
        prefs.electricity_rate,
        prefs.discount_rate,
        lifespan,
    );

    // Maintenance
    let (average_repair_cost_used, num_repairs_used, repair_source) =
        resolve_repairs(record, prefs);
    if repair_source == RepairSource::Default {
        FallbackNote::RepairProfileDefaulted {
            average_repair_cost: average_repair_cost_used,
            expected_repairs: num_repairs_used,
        }
        .record(&label, &mut fallbacks);
    }
    let repair_years = maintenance::schedule_repair_years(num_repairs_used, lifespan);
    let uncapped = maintenance::maintenance_cost_npv(
        &repair_years,
        average_repair_cost_used,
        prefs.discount_rate,
    );
    let (maintenance_cost_npv, maintenance_clamp) = maintenance::cap_at_price(uncapped, price);
    if let Some(clamp) = maintenance_clamp {
        FallbackNote::MaintenanceClamped(clamp).record(&label, &mut fallbacks);
    }

    // Ledger
    let mut yearly_breakdown = YearlyBreakdown::with_horizon(lifespan, &curve);
    yearly_breakdown.add(0, CostCategory::Purchase, price);
    yearly_breakdown.add_recurring(CostCategory::Energy, annual_energy_cost);
    for &year in &repair_years {
        yearly_breakdown.add(year, CostCategory::Maintenance, average_repair_cost_used);
    }
    if maintenance_clamp.is_some() && uncapped > 0.0 {
        yearly_breakdown.scale_category(CostCategory::Maintenance, maintenance_cost_npv / uncapped);
    }

    let total_lifetime_cost = price + energy_cost_npv + maintenance_cost_npv;

    log::debug!(
        "{}: price {:.2} + energy {:.2} + maintenance {:.2} = {:.2} over {} years",
        label, price, energy_cost_npv, maintenance_cost_npv, total_lifetime_cost, lifespan
    );

    ApplianceValuation {
        label,
        category,
        price,
        lifespan,
        annual_energy_consumption,
        energy_source,
        annual_energy_cost,
        energy_cost_npv,
        average_repair_cost_used,
        num_repairs_used,
        repair_source,
        repair_years,
        maintenance_cost_npv,
        maintenance_clamp,
        total_lifetime_cost,
        yearly_breakdown,
        fallbacks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::EnergyClass;
    use approx::assert_relative_eq;

    fn fridge() -> ProductRecord {
        ProductRecord {
            name: Some("Fridge 300L".to_string()),
            price: Some(800.0),
            product_type: ProductCategory::Refrigerator,
            energy_consumption: Some(250.0),
            average_repair_cost: Some(120.0),
            expected_repairs: Some(1.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_explicit_fields() {
        let prefs = Preferences::default();
        let v = value_appliance(&fridge(), &prefs);

        assert_eq!(v.lifespan, 10);
        assert_eq!(v.energy_source, EnergySource::Explicit);
        assert_eq!(v.repair_source, RepairSource::Explicit);
        assert_eq!(v.repair_years, vec![5]);
        assert!(v.fallbacks.is_empty());

        let energy = 250.0 * 0.30 * (1.0 - 1.02_f64.powi(-10)) / 0.02;
        let repair = 120.0 / 1.02_f64.powi(5);
        assert_relative_eq!(v.energy_cost_npv, energy, epsilon = 1e-9);
        assert_relative_eq!(v.maintenance_cost_npv, repair, epsilon = 1e-9);
        assert_relative_eq!(v.total_lifetime_cost, 800.0 + energy + repair, epsilon = 1e-9);
    }

    #[test]
    fn test_price_only_uses_defaults() {
        let v = value_appliance(&ProductRecord::with_price(500.0), &Preferences::default());

        assert_eq!(v.category, ProductCategory::Unknown);
        assert_eq!(v.lifespan, 10);
        assert_eq!(v.annual_energy_consumption, 300.0);
        assert_eq!(v.energy_source, EnergySource::Default);
        assert_eq!(v.average_repair_cost_used, 350.0);
        assert_eq!(v.num_repairs_used, 2);
        assert_eq!(v.repair_source, RepairSource::Default);
    }

    #[test]
    fn test_class_estimate() {
        let record = ProductRecord {
            price: Some(600.0),
            product_type: ProductCategory::Dryer,
            energy_efficiency_class: EnergyClass::B,
            ..Default::default()
        };
        let v = value_appliance(&record, &Preferences::default());

        assert_eq!(v.annual_energy_consumption, 425.0);
        assert_eq!(v.energy_source, EnergySource::ClassEstimate);
        assert_eq!(v.lifespan, 8);
        assert_eq!(v.average_repair_cost_used, 170.0);
    }

    #[test]
    fn test_partial_repair_fields_fill_from_defaults() {
        let record = ProductRecord {
            price: Some(400.0),
            product_type: ProductCategory::Dishwasher,
            average_repair_cost: Some(90.0),
            ..Default::default()
        };
        let v = value_appliance(&record, &Preferences::default());

        assert_eq!(v.average_repair_cost_used, 90.0);
        assert_eq!(v.num_repairs_used, 2);
        assert_eq!(v.repair_source, RepairSource::Default);
    }

    #[test]
    fn test_maintenance_clamped_to_price() {
        let prefs = Preferences::default().with_discount_rate(0.0);
        let record = ProductRecord {
            price: Some(100.0),
            energy_consumption: Some(0.0),
            average_repair_cost: Some(150.0),
            expected_repairs: Some(1.0),
            ..Default::default()
        };
        let v = value_appliance(&record, &prefs);

        assert_eq!(v.maintenance_cost_npv, 100.0);
        assert!(v.was_clamped());
        assert_eq!(
            v.maintenance_clamp,
            Some(MaintenanceClamp { uncapped: 150.0, cap: 100.0 })
        );
        assert!(v
            .fallbacks
            .iter()
            .any(|n| matches!(n, FallbackNote::MaintenanceClamped(_))));

        // Ledger maintenance is scaled so it agrees with the capped figure
        assert_relative_eq!(
            v.yearly_breakdown.category_discounted(CostCategory::Maintenance),
            100.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_invalid_price_is_coerced() {
        let record = ProductRecord {
            price: Some(-20.0),
            ..Default::default()
        };
        let v = value_appliance(&record, &Preferences::default());

        assert_eq!(v.price, 0.0);
        assert!(v.fallbacks.contains(&FallbackNote::PriceCoerced { raw: Some(-20.0) }));
        // With a zero price every repair is clamped away
        assert_eq!(v.maintenance_cost_npv, 0.0);
    }

    #[test]
    fn test_breakdown_agrees_with_total() {
        let v = value_appliance(&fridge(), &Preferences::default());
        let rows = v.yearly_breakdown.rows();

        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].year, 0);
        assert_eq!(rows[0].discount_factor, 1.0);
        assert_eq!(rows[0].cost(CostCategory::Purchase), 800.0);
        assert_eq!(rows[5].cost(CostCategory::Maintenance), 120.0);
        assert_relative_eq!(
            v.yearly_breakdown.total_discounted(),
            v.total_lifetime_cost,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_idempotent() {
        let prefs = Preferences::default();
        let first = value_appliance(&fridge(), &prefs);
        let second = value_appliance(&fridge(), &prefs);
        assert_eq!(first, second);
        assert_eq!(first.total_lifetime_cost.to_bits(), second.total_lifetime_cost.to_bits());
    }
}
