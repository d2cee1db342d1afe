use crate::models::ResultRecord;

/// Key under which the extraction stage returns candidate lines.
pub const CANDIDATE_LINES_KEY: &str = "tests_raw";

pub const REPORT_SYSTEM_PROMPT: &str = r#"
You are a lab report assistant. You work ONLY with the text you are given.

RULES (ABSOLUTE, NO EXCEPTIONS):
1. Use ONLY information explicitly present in the input.
2. NEVER invent, infer or add test results.
3. NEVER give a diagnosis, treatment advice or clinical opinion.
4. Reply with valid JSON only. No prose before or after it.
"#;

/// Stage 1: raw report text → one line per test result.
pub fn build_extraction_prompt(raw_text: &str) -> String {
    format!(
        r#"<document>
{raw_text}
</document>

The document above is a medical lab report, possibly produced by OCR.
1. Correct obvious transcription errors (e.g. "Hemog1obin" → "Hemoglobin", "l0.2" → "10.2").
2. Discard headers, footers, watermarks, page numbers and patient details (name, ID, dates of birth, addresses).
3. Merge fragments that belong to one result into a single line (name, value, unit, reference range).
4. Output one string per distinct test result, in document order.

Return ONLY this JSON object:
{{"{CANDIDATE_LINES_KEY}": ["<result line>", "..."]}}"#
    )
}

/// Stage 2: candidate lines → structured records without status.
pub fn build_normalization_prompt(lines: &[String]) -> String {
    let lines_json = serde_json::to_string(lines).unwrap_or_else(|_| "[]".into());
    format!(
        r#"Convert each string in the array below into one JSON object with EXACTLY these fields:
- "name": string, the standardized test name (e.g. "WBC" for White Blood Cell Count, "Platelets" for Platelet Count, "Hemoglobin" for Hgb/Hb)
- "value": number
- "unit": string
- "ref_range": {{"low": number, "high": number}}

Do NOT include a "status" field. Use null for anything not present in the string.
Keep the order of the input array.

Array: {lines_json}

Return ONLY the JSON array of objects."#
    )
}

/// Stage 3: resolved records → patient-facing summary.
pub fn build_summary_prompt(records: &[ResultRecord]) -> String {
    let data = serde_json::to_string(records).unwrap_or_else(|_| "[]".into());
    let abnormal = records.iter().filter(|r| r.status.is_abnormal()).count();
    format!(
        r#"Based on these structured lab results, write a simple, reassuring, patient-friendly summary.
The "status" field of each result is authoritative; do not re-judge it.

Return ONLY a JSON object with exactly two keys:
1. "summary": ONE short sentence summarizing the key findings. If any result is low or high, mention it.
2. "explanations": an array with exactly {abnormal} strings, one plain one-line explanation per result whose status is "low" or "high", in the same order. Use an empty array if there are none.

IMPORTANT: Do NOT give medical advice or a diagnosis. Do not tell the reader to take, stop or change anything.
Keep explanations general (e.g. "High WBC can occur with infections.").

Data: {data}"#
    )
}
