//! Lifetime Cost - total cost of ownership for appliances, clothing and vehicles
//!
//! This library provides:
//! - Time-value-of-money discounting (present value, level annuities)
//! - Category-specific cost models (energy, repairs, washing, depreciation, fuel, tax, insurance)
//! - Year-by-year discounted cost ledgers
//! - Multi-product ranking and break-even analysis
//! - Sensitivity runs over discount and electricity rates

pub mod error;
pub mod preferences;
pub mod product;
pub mod valuation;
pub mod comparison;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoadError, ValuationError};
pub use preferences::Preferences;
pub use product::{ProductInput, ProductRecord, VehicleRecord};
pub use valuation::{value_product, ValuationEngine, ValuationResult, YearlyBreakdown};
pub use comparison::{ComparisonEngine, ComparisonEntry, ComparisonReport};
pub use scenario::SensitivityRunner;
