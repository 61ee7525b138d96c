//! Product and vehicle records as supplied by the input provider

use super::lenient;
use serde::{Deserialize, Serialize};

/// Product category used for lifespan, maintenance and energy lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProductCategory {
    Refrigerator,
    WashingMachine,
    Dishwasher,
    Dryer,
    Clothing,
    Unknown,
}

impl ProductCategory {
    /// Parse a free-form product type tag; anything unrecognised is `Unknown`
    pub fn from_tag(tag: &str) -> Self {
        let normalized: String = tag
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "refrigerator" | "fridge" | "freezer" | "fridgefreezer" => {
                ProductCategory::Refrigerator
            }
            "washingmachine" | "washer" => ProductCategory::WashingMachine,
            "dishwasher" => ProductCategory::Dishwasher,
            "dryer" | "tumbledryer" => ProductCategory::Dryer,
            "clothing" | "clothes" | "apparel" => ProductCategory::Clothing,
            _ => ProductCategory::Unknown,
        }
    }

    /// Tag used in preference documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Refrigerator => "refrigerator",
            ProductCategory::WashingMachine => "washingMachine",
            ProductCategory::Dishwasher => "dishwasher",
            ProductCategory::Dryer => "dryer",
            ProductCategory::Clothing => "clothing",
            ProductCategory::Unknown => "unknown",
        }
    }
}

impl Default for ProductCategory {
    fn default() -> Self {
        ProductCategory::Unknown
    }
}

impl From<String> for ProductCategory {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<ProductCategory> for String {
    fn from(category: ProductCategory) -> Self {
        category.as_str().to_string()
    }
}

/// EU energy label class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnergyClass {
    APlusPlusPlus,
    APlusPlus,
    APlus,
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    Unknown,
}

impl EnergyClass {
    /// Parse a label such as `"A+++"` or `"c"`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_uppercase().as_str() {
            "A+++" => EnergyClass::APlusPlusPlus,
            "A++" => EnergyClass::APlusPlus,
            "A+" => EnergyClass::APlus,
            "A" => EnergyClass::A,
            "B" => EnergyClass::B,
            "C" => EnergyClass::C,
            "D" => EnergyClass::D,
            "E" => EnergyClass::E,
            "F" => EnergyClass::F,
            "G" => EnergyClass::G,
            _ => EnergyClass::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyClass::APlusPlusPlus => "A+++",
            EnergyClass::APlusPlus => "A++",
            EnergyClass::APlus => "A+",
            EnergyClass::A => "A",
            EnergyClass::B => "B",
            EnergyClass::C => "C",
            EnergyClass::D => "D",
            EnergyClass::E => "E",
            EnergyClass::F => "F",
            EnergyClass::G => "G",
            EnergyClass::Unknown => "Unknown",
        }
    }

    /// Position in the A+++..G band, `None` for `Unknown`
    pub fn band_index(&self) -> Option<usize> {
        match self {
            EnergyClass::APlusPlusPlus => Some(0),
            EnergyClass::APlusPlus => Some(1),
            EnergyClass::APlus => Some(2),
            EnergyClass::A => Some(3),
            EnergyClass::B => Some(4),
            EnergyClass::C => Some(5),
            EnergyClass::D => Some(6),
            EnergyClass::E => Some(7),
            EnergyClass::F => Some(8),
            EnergyClass::G => Some(9),
            EnergyClass::Unknown => None,
        }
    }
}

impl Default for EnergyClass {
    fn default() -> Self {
        EnergyClass::Unknown
    }
}

impl From<String> for EnergyClass {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<EnergyClass> for String {
    fn from(class: EnergyClass) -> Self {
        class.as_str().to_string()
    }
}

/// Appliance or clothing record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRecord {
    /// Display name, carried through to results
    pub name: Option<String>,

    /// Purchase price; `None` means the field was absent, NaN that it was unreadable
    #[serde(deserialize_with = "lenient::price")]
    pub price: Option<f64>,

    pub product_type: ProductCategory,

    /// Annual consumption in kWh
    #[serde(deserialize_with = "lenient::number")]
    pub energy_consumption: Option<f64>,

    pub energy_efficiency_class: EnergyClass,

    #[serde(deserialize_with = "lenient::number")]
    pub average_repair_cost: Option<f64>,

    /// Expected repair count over the lifespan (fractional inputs are rounded)
    #[serde(deserialize_with = "lenient::number")]
    pub expected_repairs: Option<f64>,

    /// Free-text fabric description (clothing only)
    pub material: Option<String>,
}

impl ProductRecord {
    /// Minimal record with just a price
    pub fn with_price(price: f64) -> Self {
        Self {
            price: Some(price),
            ..Default::default()
        }
    }
}

/// Fuel type of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Unknown,
}

impl FuelType {
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "petrol" | "gasoline" | "gas" | "benzin" => FuelType::Petrol,
            "diesel" => FuelType::Diesel,
            "electric" | "ev" | "bev" => FuelType::Electric,
            "hybrid" | "phev" | "plug-in hybrid" => FuelType::Hybrid,
            _ => FuelType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Electric => "electric",
            FuelType::Hybrid => "hybrid",
            FuelType::Unknown => "unknown",
        }
    }
}

impl Default for FuelType {
    fn default() -> Self {
        FuelType::Unknown
    }
}

impl From<String> for FuelType {
    fn from(tag: String) -> Self {
        Self::from_tag(&tag)
    }
}

impl From<FuelType> for String {
    fn from(fuel: FuelType) -> Self {
        fuel.as_str().to_string()
    }
}

/// Fuel consumption with its unit made explicit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FuelConsumption {
    /// Combustion engines, litres per 100 km
    Volumetric {
        #[serde(rename = "litersPer100km")]
        liters_per_100km: f64,
    },
    /// Battery electric, kWh per 100 km
    Electric {
        #[serde(rename = "kWhPer100km")]
        kwh_per_100km: f64,
    },
}

impl FuelConsumption {
    /// Consumption per 100 km in the variant's own unit
    pub fn per_100km(&self) -> f64 {
        match self {
            FuelConsumption::Volumetric { liters_per_100km } => *liters_per_100km,
            FuelConsumption::Electric { kwh_per_100km } => *kwh_per_100km,
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            FuelConsumption::Volumetric { .. } => "L/100km",
            FuelConsumption::Electric { .. } => "kWh/100km",
        }
    }

    /// Wrap a bare figure in the unit implied by the fuel type
    pub fn for_fuel(fuel: FuelType, per_100km: f64) -> Self {
        match fuel {
            FuelType::Electric => FuelConsumption::Electric { kwh_per_100km: per_100km },
            _ => FuelConsumption::Volumetric { liters_per_100km: per_100km },
        }
    }
}

/// Insurance risk band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsuranceCategory {
    Low,
    Medium,
    High,
}

impl InsuranceCategory {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "low" => Some(InsuranceCategory::Low),
            "medium" => Some(InsuranceCategory::Medium),
            "high" => Some(InsuranceCategory::High),
            _ => None,
        }
    }

    /// Multiplier applied to the base premium
    pub fn multiplier(&self) -> f64 {
        match self {
            InsuranceCategory::Low => 0.8,
            InsuranceCategory::Medium => 1.0,
            InsuranceCategory::High => 1.3,
        }
    }
}

impl Default for InsuranceCategory {
    fn default() -> Self {
        InsuranceCategory::Medium
    }
}

/// Vehicle listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleRecord {
    /// Listing title; the first word is read as the brand
    pub name: Option<String>,

    #[serde(deserialize_with = "lenient::price")]
    pub price: Option<f64>,

    /// Manufacture year
    #[serde(deserialize_with = "lenient::year")]
    pub year: Option<i32>,

    /// Odometer reading in km
    #[serde(deserialize_with = "lenient::number")]
    pub mileage: Option<f64>,

    pub fuel_type: FuelType,

    pub fuel_consumption: Option<FuelConsumption>,

    /// Engine displacement in litres
    #[serde(deserialize_with = "lenient::number")]
    pub engine_size: Option<f64>,

    /// Unrecognised tags deserialize to `None` and take the default band
    #[serde(deserialize_with = "lenient::insurance")]
    pub insurance_category: Option<InsuranceCategory>,
}

impl VehicleRecord {
    /// First word of the name, lowercased
    pub fn brand(&self) -> Option<String> {
        self.name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .map(|word| word.to_ascii_lowercase())
    }
}
