//! Canonical test-name vocabulary and physiological plausibility limits.

use crate::models::PartialRecord;

/// Synonym → canonical name. Matched case-insensitively on the whole,
/// trimmed name.
const ALIASES: &[(&str, &str)] = &[
    // Hematology
    ("white blood cell count", "WBC"),
    ("white blood cells", "WBC"),
    ("white cell count", "WBC"),
    ("leukocytes", "WBC"),
    ("leucocytes", "WBC"),
    ("wbc count", "WBC"),
    ("red blood cell count", "RBC"),
    ("red blood cells", "RBC"),
    ("erythrocytes", "RBC"),
    ("rbc count", "RBC"),
    ("platelet count", "Platelets"),
    ("platelets count", "Platelets"),
    ("plt", "Platelets"),
    ("thrombocytes", "Platelets"),
    ("plaquettes", "Platelets"),
    ("hgb", "Hemoglobin"),
    ("hb", "Hemoglobin"),
    ("haemoglobin", "Hemoglobin"),
    ("hémoglobine", "Hemoglobin"),
    ("hct", "Hematocrit"),
    ("haematocrit", "Hematocrit"),
    ("packed cell volume", "Hematocrit"),
    // Chemistry
    ("blood glucose", "Glucose"),
    ("fasting glucose", "Glucose"),
    ("glycémie", "Glucose"),
    ("glycated hemoglobin", "HbA1c"),
    ("hemoglobin a1c", "HbA1c"),
    ("a1c", "HbA1c"),
    ("blood urea nitrogen", "BUN"),
    ("serum creatinine", "Creatinine"),
    ("créatinine", "Creatinine"),
    ("na", "Sodium"),
    ("k", "Potassium"),
    ("sgpt", "ALT"),
    ("alanine aminotransferase", "ALT"),
    ("sgot", "AST"),
    ("aspartate aminotransferase", "AST"),
    ("alkaline phosphatase", "ALP"),
    ("total cholesterol", "Cholesterol"),
    ("cholestérol", "Cholesterol"),
    ("hdl cholesterol", "HDL"),
    ("ldl cholesterol", "LDL"),
    ("thyroid stimulating hormone", "TSH"),
    ("c-reactive protein", "CRP"),
];

/// Map a name to its canonical form, or return it trimmed.
pub fn canonical_test_name(name: &str) -> String {
    let trimmed = name.trim();
    let lower = trimmed.to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Wide "life-compatible" limits, NOT reference ranges. A value outside
/// them almost certainly comes from a misread or fabricated result.
struct PlausibleRange {
    test_name: &'static str,
    unit: &'static str,
    min: f64,
    max: f64,
}

const PLAUSIBILITY: &[PlausibleRange] = &[
    PlausibleRange { test_name: "potassium", unit: "mmol/l", min: 0.5, max: 15.0 },
    PlausibleRange { test_name: "sodium", unit: "mmol/l", min: 80.0, max: 200.0 },
    PlausibleRange { test_name: "glucose", unit: "mmol/l", min: 0.5, max: 60.0 },
    PlausibleRange { test_name: "glucose", unit: "mg/dl", min: 9.0, max: 1100.0 },
    PlausibleRange { test_name: "hba1c", unit: "%", min: 2.0, max: 20.0 },
    PlausibleRange { test_name: "hemoglobin", unit: "g/dl", min: 1.0, max: 25.0 },
    PlausibleRange { test_name: "hematocrit", unit: "%", min: 5.0, max: 75.0 },
    PlausibleRange { test_name: "platelets", unit: "10^9/l", min: 1.0, max: 2000.0 },
    PlausibleRange { test_name: "wbc", unit: "10^9/l", min: 0.1, max: 500.0 },
    PlausibleRange { test_name: "wbc", unit: "/ul", min: 100.0, max: 500_000.0 },
    PlausibleRange { test_name: "creatinine", unit: "umol/l", min: 5.0, max: 2000.0 },
    PlausibleRange { test_name: "creatinine", unit: "mg/dl", min: 0.05, max: 25.0 },
    PlausibleRange { test_name: "tsh", unit: "miu/l", min: 0.01, max: 200.0 },
    PlausibleRange { test_name: "crp", unit: "mg/l", min: 0.0, max: 500.0 },
];

/// Describe why `record`'s value is physiologically implausible, if it is.
pub fn implausibility(record: &PartialRecord) -> Option<String> {
    let value = record.value?;
    let name = record.name.to_lowercase();
    let unit = normalize_unit(&record.unit);

    PLAUSIBILITY
        .iter()
        .filter(|r| name == r.test_name && unit == r.unit)
        .find_map(|r| {
            if value < r.min {
                Some(format!("value {value} below physiological minimum {}", r.min))
            } else if value > r.max {
                Some(format!("value {value} above physiological maximum {}", r.max))
            } else {
                None
            }
        })
}

/// Lowercase, drop spaces, and spell both micro signs (U+00B5, U+03BC) as `u`.
fn normalize_unit(unit: &str) -> String {
    unit.to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if matches!(c, '\u{00B5}' | '\u{03BC}') { 'u' } else { c })
        .collect()
}
