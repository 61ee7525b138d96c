//! Product records and input loading

mod data;
mod lenient;
pub mod loader;

pub use data::{
    EnergyClass, FuelConsumption, FuelType, InsuranceCategory, ProductCategory, ProductRecord,
    VehicleRecord,
};
pub use loader::{
    load_inputs_json, load_products, load_products_from_reader, load_vehicles,
    load_vehicles_from_reader,
};

use serde::{Deserialize, Serialize};

/// Any record the engine can value, tagged by kind
///
/// ```json
/// {"kind": "appliance", "price": 649, "productType": "refrigerator"}
/// {"kind": "vehicle", "price": 18500, "year": 2021, "fuelType": "diesel"}
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductInput {
    Appliance(ProductRecord),
    Clothing(ProductRecord),
    Vehicle(VehicleRecord),
}

impl ProductInput {
    /// Display label for reports
    pub fn label(&self) -> String {
        let name = match self {
            ProductInput::Appliance(p) | ProductInput::Clothing(p) => p.name.clone(),
            ProductInput::Vehicle(v) => v.name.clone(),
        };
        name.unwrap_or_else(|| "unnamed product".to_string())
    }

    /// Whether the record carried a price field at all
    pub fn has_price_field(&self) -> bool {
        match self {
            ProductInput::Appliance(p) | ProductInput::Clothing(p) => p.price.is_some(),
            ProductInput::Vehicle(v) => v.price.is_some(),
        }
    }
}
