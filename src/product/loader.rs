//! Load product and vehicle records from CSV and JSON files
//!
//! CSV columns mirror the JSON field names and every column may be blank. Cells
//! that cannot be interpreted degrade the same way as in JSON input: unknown
//! tags become `Unknown` or the default band, unreadable numbers are dropped,
//! and an unreadable price is kept as NaN so it is coerced with a note. Only a
//! row with no data in any column is rejected.

use super::lenient::{insurance_from_text, number_from_text, price_from_text};
use super::{
    EnergyClass, FuelConsumption, FuelType, ProductCategory, ProductInput, ProductRecord,
    VehicleRecord,
};
use crate::error::LoadError;
use csv::Reader;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Raw CSV row for appliances and clothing
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductCsvRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    energy_consumption: Option<String>,
    #[serde(default)]
    energy_efficiency_class: Option<String>,
    #[serde(default)]
    average_repair_cost: Option<String>,
    #[serde(default)]
    expected_repairs: Option<String>,
    #[serde(default)]
    material: Option<String>,
}

impl ProductCsvRow {
    fn to_record(self, row: usize) -> Result<ProductRecord, LoadError> {
        let cells = [
            &self.name,
            &self.price,
            &self.product_type,
            &self.energy_consumption,
            &self.energy_efficiency_class,
            &self.average_repair_cost,
            &self.expected_repairs,
            &self.material,
        ];
        reject_empty_row(&cells, row)?;

        Ok(ProductRecord {
            name: non_blank(self.name),
            price: non_blank(self.price).and_then(|p| price_from_text(&p)),
            product_type: non_blank(self.product_type)
                .map(|t| ProductCategory::from_tag(&t))
                .unwrap_or_default(),
            energy_consumption: parse_number(self.energy_consumption, row, "energyConsumption"),
            energy_efficiency_class: non_blank(self.energy_efficiency_class)
                .map(|c| EnergyClass::from_label(&c))
                .unwrap_or_default(),
            average_repair_cost: parse_number(self.average_repair_cost, row, "averageRepairCost"),
            expected_repairs: parse_number(self.expected_repairs, row, "expectedRepairs"),
            material: non_blank(self.material),
        })
    }
}

/// Raw CSV row for vehicles; `fuelConsumption` is a bare figure whose unit
/// follows the fuel type
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleCsvRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    mileage: Option<String>,
    #[serde(default)]
    fuel_type: Option<String>,
    #[serde(default)]
    fuel_consumption: Option<String>,
    #[serde(default)]
    engine_size: Option<String>,
    #[serde(default)]
    insurance_category: Option<String>,
}

impl VehicleCsvRow {
    fn to_record(self, row: usize) -> Result<VehicleRecord, LoadError> {
        let cells = [
            &self.name,
            &self.price,
            &self.year,
            &self.mileage,
            &self.fuel_type,
            &self.fuel_consumption,
            &self.engine_size,
            &self.insurance_category,
        ];
        reject_empty_row(&cells, row)?;

        let fuel_type = non_blank(self.fuel_type)
            .map(|f| FuelType::from_tag(&f))
            .unwrap_or_default();

        let year = parse_number(self.year, row, "year")
            .filter(|y| y.is_finite())
            .map(|y| y.round() as i32);

        Ok(VehicleRecord {
            name: non_blank(self.name),
            price: non_blank(self.price).and_then(|p| price_from_text(&p)),
            year,
            mileage: parse_number(self.mileage, row, "mileage"),
            fuel_type,
            fuel_consumption: parse_number(self.fuel_consumption, row, "fuelConsumption")
                .map(|value| FuelConsumption::for_fuel(fuel_type, value)),
            engine_size: parse_number(self.engine_size, row, "engineSize"),
            insurance_category: non_blank(self.insurance_category)
                .and_then(|tag| insurance_from_text(&tag)),
        })
    }
}

fn non_blank(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_number(field: Option<String>, row: usize, column: &str) -> Option<f64> {
    non_blank(field).and_then(|text| number_from_text(&text, &format!("row {} {}", row, column)))
}

fn reject_empty_row(cells: &[&Option<String>], row: usize) -> Result<(), LoadError> {
    if cells.iter().all(|cell| cell.as_deref().map_or(true, |c| c.trim().is_empty())) {
        return Err(LoadError::InvalidRecord {
            row,
            reason: "row has no values".to_string(),
        });
    }
    Ok(())
}

/// Load appliance/clothing records from a CSV file
pub fn load_products<P: AsRef<Path>>(path: P) -> Result<Vec<ProductRecord>, LoadError> {
    load_products_from_reader(File::open(path)?)
}

/// Load appliance/clothing records from any reader
pub fn load_products_from_reader<R: Read>(reader: R) -> Result<Vec<ProductRecord>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: ProductCsvRow = result?;
        records.push(row.to_record(index + 1)?);
    }

    log::debug!("loaded {} product records", records.len());
    Ok(records)
}

/// Load vehicle records from a CSV file
pub fn load_vehicles<P: AsRef<Path>>(path: P) -> Result<Vec<VehicleRecord>, LoadError> {
    load_vehicles_from_reader(File::open(path)?)
}

/// Load vehicle records from any reader
pub fn load_vehicles_from_reader<R: Read>(reader: R) -> Result<Vec<VehicleRecord>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut records = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: VehicleCsvRow = result?;
        records.push(row.to_record(index + 1)?);
    }

    log::debug!("loaded {} vehicle records", records.len());
    Ok(records)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<ProductInput>),
    One(ProductInput),
}

/// Load tagged product inputs from a JSON file holding one object or an array
pub fn load_inputs_json<P: AsRef<Path>>(path: P) -> Result<Vec<ProductInput>, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let inputs = match serde_json::from_reader(reader)? {
        OneOrMany::Many(inputs) => inputs,
        OneOrMany::One(input) => vec![input],
    };
    Ok(inputs)
}
