use lifetime_cost::product::{
    load_inputs_json, load_products, load_vehicles, FuelType, InsuranceCategory, ProductInput,
};
use lifetime_cost::valuation::{CostCategory, FallbackNote};
use lifetime_cost::{LoadError, Preferences, SensitivityRunner};
use std::fs;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("lifetime_cost_{}_{}", std::process::id(), name));
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn preferences_file_overrides_defaults() {
    let path = temp_file(
        "prefs.json",
        r#"{"electricityRate": 0.42, "carOwnershipDuration": 8,
            "applianceLifespans": {"dryer": 12}}"#,
    );

    let prefs = Preferences::from_json_path(&path).unwrap();
    assert_eq!(prefs.electricity_rate, 0.42);
    assert_eq!(prefs.car_ownership_duration, 8);
    assert_eq!(prefs.discount_rate, 0.02);

    fs::remove_file(path).ok();
}

#[test]
fn missing_preferences_file_is_io_error() {
    let err = Preferences::from_json_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn json_inputs_accept_single_object_or_array() {
    let single = temp_file(
        "single.json",
        r#"{"kind": "appliance", "price": 499, "productType": "washer"}"#,
    );
    let many = temp_file(
        "many.json",
        r#"[
            {"kind": "clothing", "name": "Tee", "price": 12, "material": "cotton"},
            {"kind": "vehicle", "name": "Nissan Leaf", "price": 21000, "year": 2021,
             "fuelType": "electric", "fuelConsumption": {"type": "electric", "kWhPer100km": 17}}
        ]"#,
    );

    let one = load_inputs_json(&single).unwrap();
    assert_eq!(one.len(), 1);
    assert!(matches!(one[0], ProductInput::Appliance(_)));

    let two = load_inputs_json(&many).unwrap();
    assert_eq!(two.len(), 2);
    match &two[1] {
        ProductInput::Vehicle(v) => assert_eq!(v.fuel_type, FuelType::Electric),
        other => panic!("expected vehicle, got {:?}", other),
    }

    fs::remove_file(single).ok();
    fs::remove_file(many).ok();
}

#[test]
fn scraped_json_degrades_instead_of_failing() {
    let path = temp_file(
        "scraped.json",
        r#"[
            {"kind": "vehicle", "name": "Ford Focus", "price": 15000, "year": 2019,
             "fuelType": "petrol", "engineSize": "1.5", "insuranceCategory": "Medium"},
            {"kind": "vehicle", "name": "Opel Astra", "price": "9.500,00", "year": 2016,
             "fuelType": "diesel", "insuranceCategory": "unknown"},
            {"kind": "appliance", "name": "Washer", "price": "499", "expectedRepairs": "2",
             "productType": "washer"},
            {"kind": "appliance", "name": "Dryer", "price": "ask in store", "productType": "dryer"}
        ]"#,
    );

    let inputs = load_inputs_json(&path).unwrap();
    assert_eq!(inputs.len(), 4);
    match (&inputs[0], &inputs[1]) {
        (ProductInput::Vehicle(focus), ProductInput::Vehicle(astra)) => {
            assert_eq!(focus.insurance_category, Some(InsuranceCategory::Medium));
            assert_eq!(focus.engine_size, Some(1.5));
            assert_eq!(astra.insurance_category, None);
            assert_eq!(astra.price, Some(9500.0));
        }
        other => panic!("expected vehicles, got {:?}", other),
    }

    let results = SensitivityRunner::default().with_valuation_year(2026).run_batch(&inputs);

    // Unknown insurance band falls back to medium and says so
    assert!(results[1].fallbacks.iter().any(|note| matches!(
        note,
        FallbackNote::VehicleDefault { field, .. } if field.starts_with("insuranceCategory")
    )));

    // Textual numbers are read, not rejected
    assert_eq!(results[2].purchase_price, 499.0);
    assert!(results[2].component(CostCategory::Maintenance) > 0.0);

    // Unreadable price is coerced with a note, and still counts as a price field
    assert_eq!(results[3].purchase_price, 0.0);
    assert!(results[3]
        .fallbacks
        .iter()
        .any(|note| matches!(note, FallbackNote::PriceCoerced { .. })));
    assert!(inputs[3].has_price_field());

    fs::remove_file(path).ok();
}

#[test]
fn csv_batch_values_every_row() {
    let products = temp_file(
        "products.csv",
        "name,price,productType,energyConsumption,energyEfficiencyClass\n\
         Fridge A,650,refrigerator,,A+++\n\
         Fridge B,480,refrigerator,,D\n\
         Mystery,,toaster,,\n",
    );
    let vehicles = temp_file(
        "vehicles.csv",
        "name,price,year,fuelType,fuelConsumption,engineSize,insuranceCategory\n\
         Toyota Yaris,15000,2020,hybrid,4.1,1.5,low\n",
    );

    let records = load_products(&products).unwrap();
    let inputs: Vec<ProductInput> = records.into_iter().map(ProductInput::Appliance).collect();
    let mut all = inputs;
    all.extend(load_vehicles(&vehicles).unwrap().into_iter().map(ProductInput::Vehicle));

    let results = SensitivityRunner::default().with_valuation_year(2026).run_batch(&all);
    assert_eq!(results.len(), 4);

    // Missing price is coerced, not fatal
    assert_eq!(results[2].purchase_price, 0.0);
    assert!(results[2].has_fallbacks());

    // Better label class -> lower energy component
    let energy = |i: usize| results[i].component(CostCategory::Energy);
    assert!(energy(0) < energy(1));
    assert!(results[3].total_cost > 0.0);

    fs::remove_file(products).ok();
    fs::remove_file(vehicles).ok();
}
