// Clean report text before it is embedded in a model prompt.
// Removes invisible Unicode, drops prompt-injection lines, normalizes
// whitespace and caps the length.

/// Maximum report text sent to the model (characters).
const MAX_INPUT_LENGTH: usize = 50_000;

/// Line prefixes that impersonate a chat role or an instruction channel.
const ROLE_MARKERS: &[&str] = &[
    "system:",
    "assistant:",
    "user:",
    "[system]",
    "[assistant]",
    "[inst]",
    "[/inst]",
    "<<sys>>",
    "note to ai:",
    "instructions:",
    "system update:",
];

/// Phrases that try to override the extraction instructions.
const OVERRIDE_PHRASES: &[&str] = &[
    "ignore previous instructions",
    "ignore all instructions",
    "ignore the above instructions",
    "disregard your instructions",
    "disregard all instructions",
    "forget your instructions",
    "forget all instructions",
    "new instructions:",
    "override:",
    "please also add",
];

const INSTRUCTION_TAGS: &[&str] = &["<instruction", "</instruction", "<system", "</system"];

/// Result of cleaning one report.
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedText {
    pub text: String,
    /// Lines dropped as likely prompt injection.
    pub removed_lines: usize,
    pub truncated: bool,
}

/// Clean `raw` for prompt embedding. Injection findings are logged by
/// count only; report content never reaches the log.
pub fn sanitize_report_text(raw: &str, report_id: &str) -> SanitizedText {
    let visible = remove_invisible_chars(raw);
    let (kept, removed_lines) = drop_injection_lines(&visible);

    if removed_lines > 0 {
        tracing::warn!(
            report_id = %report_id,
            removed_lines,
            "Injection patterns detected and removed from report input"
        );
    }

    let normalized = normalize_whitespace(&kept);
    let char_count = normalized.chars().count();
    let truncated = char_count > MAX_INPUT_LENGTH;
    let text = if truncated {
        tracing::warn!(
            report_id = %report_id,
            length = char_count,
            "Report text exceeds input limit, truncating"
        );
        truncate_at_word(&normalized, MAX_INPUT_LENGTH)
    } else {
        normalized
    };

    SanitizedText {
        text,
        removed_lines,
        truncated,
    }
}

/// Remove zero-width, bidi-control and other non-whitespace control
/// characters. Space, tab and newlines survive.
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(*c, ' ' | '\n' | '\t' | '\r') {
                return true;
            }
            let invisible = matches!(
                *c,
                '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2060}'..='\u{2064}' | '\u{FEFF}'
            );
            !invisible && !c.is_control()
        })
        .collect()
}

fn is_injection_line(lower: &str) -> bool {
    ROLE_MARKERS.iter().any(|m| lower.starts_with(m))
        || INSTRUCTION_TAGS.iter().any(|t| lower.starts_with(t))
        || OVERRIDE_PHRASES.iter().any(|p| lower.contains(p))
}

/// Drop injection lines. An override phrase split across two lines is
/// caught by checking each line joined with its successor; both lines are
/// dropped in that case.
fn drop_injection_lines(text: &str) -> (String, usize) {
    let lines: Vec<&str> = text.lines().collect();
    let lowered: Vec<String> = lines.iter().map(|l| l.trim().to_lowercase()).collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut removed = 0usize;
    let mut i = 0;

    while i < lines.len() {
        if is_injection_line(&lowered[i]) {
            removed += 1;
            i += 1;
            continue;
        }

        if let Some(next) = lowered.get(i + 1) {
            if !is_injection_line(next) {
                let joined = format!("{} {}", lowered[i], next);
                if OVERRIDE_PHRASES.iter().any(|p| joined.contains(p)) {
                    removed += 2;
                    i += 2;
                    continue;
                }
            }
        }

        kept.push(lines[i]);
        i += 1;
    }

    (kept.join("\n"), removed)
}

/// Trim each line and collapse runs of blank lines to one.
fn normalize_whitespace(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && out.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last() == Some(&"") {
        out.pop();
    }
    out.join("\n")
}

/// Cut at the last whitespace within the first `max_chars` characters.
fn truncate_at_word(text: &str, max_chars: usize) -> String {
    let end = text
        .char_indices()
        .nth(max_chars)
        .map_or(text.len(), |(i, _)| i);
    let head = &text[..end];
    match head.rfind(char::is_whitespace) {
        Some(pos) => head[..pos].to_string(),
        None => head.to_string(),
    }
}
