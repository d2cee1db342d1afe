use std::sync::LazyLock;

use regex::Regex;

use super::{Violation, ViolationCategory};

struct SafetyPattern {
    regex: Regex,
    category: ViolationCategory,
    reason: &'static str,
}

fn pattern(regex: &str, category: ViolationCategory, reason: &'static str) -> SafetyPattern {
    SafetyPattern {
        regex: Regex::new(regex).expect("Invalid safety regex pattern"),
        category,
        reason,
    }
}

/// Language a lab summary must never use. Result descriptions ("your
/// hemoglobin is below its range") are fine; conclusions about the
/// reader's health and instructions to act are not.
static SAFETY_PATTERNS: LazyLock<Vec<SafetyPattern>> = LazyLock::new(|| {
    use ViolationCategory::*;
    vec![
        pattern(
            r"(?i)\byou\s+(?:have|are\s+suffering\s+from)\s+(?:a\s+|an\s+)?(?:been\s+diagnosed\s+with\s+)?(?:anemia|anaemia|diabetes|infection|leukemia|cancer|kidney\s+disease|liver\s+disease|disease|disorder|condition)\b",
            DiagnosticLanguage,
            "Direct diagnosis: 'you have [condition]'",
        ),
        pattern(
            r"(?i)\byou\s+(?:likely|probably|possibly|may)\s+have\b",
            DiagnosticLanguage,
            "Speculative diagnosis: 'you likely have'",
        ),
        pattern(
            r"(?i)\bthis\s+(?:means|indicates|suggests|confirms)\s+(?:that\s+)?you\s+have\b",
            DiagnosticLanguage,
            "Indirect diagnosis: 'this means you have'",
        ),
        pattern(
            r"(?i)\byou\s+(?:are|have\s+been)\s+diagnosed\b",
            DiagnosticLanguage,
            "Diagnosis claim",
        ),
        pattern(
            r"(?i)\byou(?:'re|\s+are)\s+(?:a\s+)?(?:diabetic|anemic|anaemic)\b",
            DiagnosticLanguage,
            "Direct label: 'you are diabetic'",
        ),
        pattern(
            r"(?i)\byou\s+should\s+(?:take|stop|start|increase|decrease|change|switch|discontinue|avoid|reduce|eat)\b",
            PrescriptiveLanguage,
            "Direct prescription: 'you should [take/stop/...]'",
        ),
        pattern(
            r"(?i)\bI\s+(?:would\s+)?(?:recommend|suggest|advise)\b",
            PrescriptiveLanguage,
            "Advisory language: 'I recommend'",
        ),
        pattern(
            r"(?i)\byou\s+(?:need|must)\s+to\s+(?:take|stop|start|increase|decrease)\b",
            PrescriptiveLanguage,
            "Obligation: 'you need to take'",
        ),
        pattern(
            r"(?i)\b(?:do\s+not|don't)\s+(?:take|stop\s+taking)\b",
            PrescriptiveLanguage,
            "Medication directive: 'do not take'",
        ),
        pattern(
            r"(?i)\b(?:try|consider)\s+(?:taking|stopping|starting|reducing|increasing)\b",
            PrescriptiveLanguage,
            "Soft prescription: 'consider taking'",
        ),
        pattern(
            r"(?i)\b(?:dangerous|life[- ]threatening|fatal|deadly|lethal)\b",
            AlarmLanguage,
            "Alarm word: dangerous/life-threatening",
        ),
        pattern(
            r"(?i)\b(?:emergency|urgent(?:ly)?|immediately)\b",
            AlarmLanguage,
            "Urgency word: emergency/immediately",
        ),
        pattern(
            r"(?i)\bcall\s+(?:911|an\s+ambulance)\b",
            AlarmLanguage,
            "Emergency call directive",
        ),
        pattern(
            r"(?i)\bgo\s+to\s+(?:the\s+)?(?:ER|hospital|A&E)\b",
            AlarmLanguage,
            "ER directive: 'go to the hospital'",
        ),
    ]
});

/// Scan text for diagnostic, prescriptive and alarm language.
pub fn scan_keywords(text: &str) -> Vec<Violation> {
    let mut violations: Vec<Violation> = SAFETY_PATTERNS
        .iter()
        .flat_map(|sp| {
            sp.regex.find_iter(text).map(move |m| Violation {
                category: sp.category,
                matched_text: m.as_str().to_string(),
                offset: m.start(),
                length: m.len(),
                reason: sp.reason,
            })
        })
        .collect();

    deduplicate_violations(&mut violations);
    violations
}

/// Drop violations fully contained in an earlier, longer one.
fn deduplicate_violations(violations: &mut Vec<Violation>) {
    violations.sort_by_key(|v| (v.offset, std::cmp::Reverse(v.length)));
    let mut kept: Vec<Violation> = Vec::with_capacity(violations.len());
    for v in violations.drain(..) {
        let contained = kept
            .iter()
            .any(|k| v.offset >= k.offset && v.offset + v.length <= k.offset + k.length);
        if !contained {
            kept.push(v);
        }
    }
    *violations = kept;
}
