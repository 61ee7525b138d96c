//! Clothing cost: lifespan from material, nominal washing cost
//!
//! Unlike appliances and vehicles this path is not discounted.

use super::breakdown::{CostCategory, YearlyBreakdown};
use super::discount::DiscountCurve;
use super::result::{resolve_price, FallbackNote, ValuationKind, ValuationResult};
use crate::preferences::Preferences;
use crate::product::{ProductCategory, ProductRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Cost of a single wash
pub const COST_PER_WASH: f64 = 0.5;

const WASHES_PER_YEAR_DELICATE: u32 = 60;
const WASHES_PER_YEAR_STANDARD: u32 = 40;

/// Garment quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    pub fn lifespan_years(&self) -> u32 {
        match self {
            QualityTier::Low => 5,
            QualityTier::Medium => 10,
            QualityTier::High => 20,
        }
    }
}

/// What the material text told us
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialProfile {
    /// `None` when neither a fabric nor a quality phrase matched
    pub quality: Option<QualityTier>,
    pub synthetic: bool,
}

/// Classify a free-text material description
///
/// Quality phrases ("cheap", "low quality", "high quality") win over the fabric.
pub fn classify_material(material: &str) -> MaterialProfile {
    let text = material.to_lowercase();
    let has = |needle: &str| text.contains(needle);

    let synthetic = has("polyester") || has("synthetic");

    let fabric = if has("wool") || has("cashmere") {
        Some(QualityTier::High)
    } else if has("cotton") || has("linen") {
        Some(QualityTier::Medium)
    } else if synthetic {
        Some(QualityTier::Low)
    } else {
        None
    };

    let quality = if has("cheap") || has("low quality") {
        Some(QualityTier::Low)
    } else if has("high quality") {
        Some(QualityTier::High)
    } else {
        fabric
    };

    MaterialProfile { quality, synthetic }
}

/// Detailed clothing valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClothingValuation {
    pub label: String,
    pub price: f64,
    pub quality: QualityTier,
    pub lifespan_years: u32,

    /// Purchase price spread over the lifespan
    pub annual_cost: f64,

    pub washes_per_year: u32,
    pub maintenance_cost: f64,
    pub total_lifetime_cost: f64,
    pub yearly_breakdown: YearlyBreakdown,
    pub fallbacks: Vec<FallbackNote>,
}

impl From<ClothingValuation> for ValuationResult {
    fn from(v: ClothingValuation) -> Self {
        let components = BTreeMap::from([
            (CostCategory::Purchase, v.price),
            (CostCategory::Washing, v.maintenance_cost),
        ]);

        ValuationResult {
            label: v.label,
            kind: ValuationKind::Clothing,
            purchase_price: v.price,
            components,
            total_cost: v.total_lifetime_cost,
            horizon_years: v.lifespan_years,
            monthly_cost: None,
            yearly_breakdown: Some(v.yearly_breakdown),
            fallbacks: v.fallbacks,
        }
    }
}

/// Value a garment; unrecognised material falls back to the clothing lifespan preference
pub fn value_clothing(record: &ProductRecord, prefs: &Preferences) -> ClothingValuation {
    let label = record.name.clone().unwrap_or_else(|| "clothing".to_string());
    let mut fallbacks = Vec::new();

    let price = resolve_price(record.price, &label, &mut fallbacks);
    let profile = classify_material(record.material.as_deref().unwrap_or(""));

    let (quality, lifespan_years) = match profile.quality {
        Some(tier) => (tier, tier.lifespan_years()),
        None => {
            let lifespan = prefs.lifespan_for(ProductCategory::Clothing);
            FallbackNote::MaterialUnrecognized { lifespan_years: lifespan }
                .record(&label, &mut fallbacks);
            (QualityTier::Medium, lifespan)
        }
    };

    let washes_per_year = if quality == QualityTier::Low || profile.synthetic {
        WASHES_PER_YEAR_DELICATE
    } else {
        WASHES_PER_YEAR_STANDARD
    };
    let annual_washing = washes_per_year as f64 * COST_PER_WASH;
    let maintenance_cost = annual_washing * lifespan_years as f64;
    let annual_cost = price / lifespan_years as f64;
    let total_lifetime_cost = price + maintenance_cost;

    let nominal = DiscountCurve::single_rate(0.0);
    let mut yearly_breakdown = YearlyBreakdown::with_horizon(lifespan_years, &nominal);
    yearly_breakdown.add(0, CostCategory::Purchase, price);
    yearly_breakdown.add_recurring(CostCategory::Washing, annual_washing);

    log::debug!(
        "{}: {:?} quality, {} years, price {:.2} + washing {:.2} = {:.2}",
        label, quality, lifespan_years, price, maintenance_cost, total_lifetime_cost
    );

    ClothingValuation {
        label,
        price,
        quality,
        lifespan_years,
        annual_cost,
        washes_per_year,
        maintenance_cost,
        total_lifetime_cost,
        yearly_breakdown,
        fallbacks,
    }
}
