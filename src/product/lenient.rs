//! Tolerant field parsing for scraped records
//!
//! Numbers may arrive as JSON numbers or as text such as `"499"`, `"€1,299.00"`
//! or `"12,5"`. Text that cannot be read is logged and dropped so the valuation
//! falls back to its defaults; an unreadable price is kept as NaN so the price
//! coercion still sees that a price was supplied.

use super::InsuranceCategory;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

const CURRENCY_MARKS: &[char] = &['€', '$', '£', '¥'];

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Read a numeric amount from free text, `None` if it is not a number
pub(crate) fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .trim_matches(|c: char| CURRENCY_MARKS.contains(&c) || c.is_whitespace())
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect();

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // "1,299.00" or "1.299,00": the last separator is the decimal point
        (Some(comma), Some(dot)) if comma < dot => cleaned.replace(',', ""),
        (Some(_), Some(_)) => cleaned.replace('.', "").replace(',', "."),
        // "1,299" groups thousands, "12,5" is a decimal comma
        (Some(comma), None) if cleaned.len() - comma - 1 == 3 => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };

    normalized.parse::<f64>().ok()
}

/// Interpret an optional cell; unreadable text is logged and becomes `None`
pub(crate) fn number_from_text(text: &str, field: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let parsed = parse_amount(text);
    if parsed.is_none() {
        log::warn!("{} '{}' is not a number, ignoring it", field, text);
    }
    parsed
}

/// Like [`number_from_text`], but an unreadable price stays present as NaN
pub(crate) fn price_from_text(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(number_from_text(text, "price").unwrap_or(f64::NAN))
}

pub(crate) fn insurance_from_text(text: &str) -> Option<InsuranceCategory> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let category = InsuranceCategory::from_tag(text);
    if category.is_none() {
        log::warn!("unknown insurance category '{}', using default", text);
    }
    category
}

fn raw_number(raw: Option<RawValue>, field: &str) -> Option<f64> {
    match raw? {
        RawValue::Number(n) => Some(n),
        RawValue::Text(text) => number_from_text(&text, field),
        RawValue::Other(_) => {
            log::warn!("{} is neither a number nor text, ignoring it", field);
            None
        }
    }
}

pub(crate) fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(raw_number(raw, "numeric field"))
}

pub(crate) fn price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        None => None,
        Some(RawValue::Number(n)) => Some(n),
        Some(RawValue::Text(text)) => price_from_text(&text),
        Some(RawValue::Other(_)) => Some(f64::NAN),
    })
}

pub(crate) fn year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawValue>::deserialize(deserializer)?;
    Ok(raw_number(raw, "year")
        .filter(|y| y.is_finite())
        .map(|y| y.round() as i32))
}

pub(crate) fn insurance<'de, D>(deserializer: D) -> Result<Option<InsuranceCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawValue>::deserialize(deserializer)? {
        Some(RawValue::Text(text)) => insurance_from_text(&text),
        Some(_) => {
            log::warn!("insurance category is not text, using default");
            None
        }
        None => None,
    })
}
