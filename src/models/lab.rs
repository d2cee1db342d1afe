use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::enums::ResultStatus;

/// Low/high bounds of the clinically normal interval for one test.
/// Either bound may be absent when the report (or the model) omits it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReferenceRange {
    #[serde(default, deserialize_with = "lenient_number")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub high: Option<f64>,
}

impl ReferenceRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: Some(low),
            high: Some(high),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.low.is_some() && self.high.is_some()
    }
}

/// One structured result as returned by the normalization model.
/// Deliberately has no status: any status the model emits is dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord {
    pub name: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient_unit")]
    pub unit: String,
    #[serde(default, deserialize_with = "lenient_range")]
    pub ref_range: ReferenceRange,
}

/// A fully resolved lab result. `status` is always computed locally
/// from `value` and `ref_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub name: String,
    pub value: Option<f64>,
    pub unit: String,
    pub ref_range: ReferenceRange,
    pub status: ResultStatus,
}

impl ResultRecord {
    pub fn from_partial(partial: PartialRecord, status: ResultStatus) -> Self {
        Self {
            name: partial.name,
            value: partial.value,
            unit: partial.unit,
            ref_range: partial.ref_range,
            status,
        }
    }
}

/// Accept a JSON number or a numeric string ("10.2", "11,200").
/// Anything else, including non-finite values, becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(number_from_value))
}

fn lenient_unit<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    })
}

/// Accept `{low, high}`, `null`, or a textual range such as `"12.0 - 16.0"`.
fn lenient_range<'de, D>(deserializer: D) -> Result<ReferenceRange, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Object(map)) => ReferenceRange {
            low: map.get("low").and_then(number_from_value),
            high: map.get("high").and_then(number_from_value),
        },
        Some(Value::String(text)) => parse_range_text(&text),
        _ => ReferenceRange::default(),
    })
}

fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Split "low-high" (also "low – high", "low to high"). A leading minus on
/// the low bound is kept.
fn parse_range_text(text: &str) -> ReferenceRange {
    let normalized = text.replace(['–', '—'], "-").replace(" to ", "-");
    let trimmed = normalized.trim();
    let split_at = trimmed
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '-')
        .map(|(i, _)| i);

    match split_at {
        Some(i) => {
            let parse = |s: &str| {
                let s = s.trim().replace(',', "");
                s.parse::<f64>().ok().filter(|n| n.is_finite())
            };
            ReferenceRange {
                low: parse(&trimmed[..i]),
                high: parse(&trimmed[i + 1..]),
            }
        }
        None => ReferenceRange::default(),
    }
}
