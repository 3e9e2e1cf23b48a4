// src/job_extraction/structured.rs
//! schema.org `JobPosting` extraction from embedded JSON-LD.

use super::types::JobFields;
use crate::utils::{strip_html, truncate_chars};
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

pub const NOTES_MAX_CHARS: usize = 300;
const DEFAULT_CURRENCY: &str = "$";
const JOB_POSTING_TYPE: &str = "JobPosting";

/// Returns fields from the first `JobPosting` node found in any parseable
/// JSON-LD block, in document order.
pub fn extract_job_posting(html: &str) -> Option<JobFields> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).ok()?;

    document.select(&selector).find_map(|script| {
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(data) => find_job_posting(&data).map(map_job_posting),
            Err(e) => {
                debug!("Skipping unparseable JSON-LD block: {}", e);
                None
            }
        }
    })
}

fn find_job_posting(data: &Value) -> Option<&Value> {
    match data {
        Value::Array(items) => items.iter().find_map(find_job_posting),
        Value::Object(map) => {
            if is_job_posting(data) {
                Some(data)
            } else {
                map.get("@graph").and_then(find_job_posting)
            }
        }
        _ => None,
    }
}

fn is_job_posting(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == JOB_POSTING_TYPE,
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str() == Some(JOB_POSTING_TYPE)),
        _ => false,
    }
}

fn map_job_posting(posting: &Value) -> JobFields {
    JobFields {
        company: extract_company(posting.get("hiringOrganization")),
        location: extract_location(posting.get("jobLocation")),
        salary: extract_salary(posting.get("baseSalary")),
        notes: posting
            .get("description")
            .and_then(Value::as_str)
            .map(|description| truncate_chars(&strip_html(description), NOTES_MAX_CHARS))
            .filter(|notes| !notes.is_empty()),
        deadline: posting.get("validThrough").and_then(scalar_to_string),
    }
}

fn extract_company(organization: Option<&Value>) -> Option<String> {
    match organization? {
        Value::String(name) => non_empty(name),
        org => org.get("name").and_then(scalar_to_string),
    }
}

fn extract_location(location: Option<&Value>) -> Option<String> {
    let place = match location? {
        Value::Array(places) => places.first()?,
        place => place,
    };
    let address = place.get("address")?;

    address
        .get("addressLocality")
        .and_then(scalar_to_string)
        .or_else(|| address.get("addressRegion").and_then(scalar_to_string))
}

/// Formats `baseSalary` as `"$50000"` or `"$40000 - $60000"`.
pub fn extract_salary(base_salary: Option<&Value>) -> Option<String> {
    let base = base_salary?;
    if !base.is_object() {
        return None;
    }

    let currency = base
        .get("currency")
        .and_then(scalar_to_string)
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let quantity = base.get("value");

    let single = match quantity {
        Some(v) if v.is_object() => v.get("value").and_then(scalar_to_string),
        Some(v) => scalar_to_string(v),
        None => None,
    };
    if let Some(amount) = single {
        return Some(format!("{}{}", currency, amount));
    }

    let range_source = quantity.filter(|v| v.is_object()).unwrap_or(base);
    let min = range_source.get("minValue").and_then(scalar_to_string);
    let max = range_source.get("maxValue").and_then(scalar_to_string);

    match (min, max) {
        (Some(min), Some(max)) => Some(format!("{}{} - {}{}", currency, min, currency, max)),
        _ => None,
    }
}

/// Strings and non-zero numbers, rendered the way a person would type them.
pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_empty(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                (u != 0).then(|| u.to_string())
            } else {
                let f = n.as_f64()?;
                if f == 0.0 || !f.is_finite() {
                    None
                } else if f.fract() == 0.0 && f.abs() < 1e15 {
                    Some(format!("{}", f as i64))
                } else {
                    Some(f.to_string())
                }
            }
        }
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
