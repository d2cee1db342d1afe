//! Post-model output cleanup. Runs before JSON parsing and before the
//! keyword scan.

use std::sync::LazyLock;

use regex::Regex;

static UNUSED_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<unused\d+>").expect("valid regex"));

/// Strip model-specific artifacts from raw output:
/// a leading `<unusedN>thought\n...` reasoning block (Gemma family) and
/// any stray `<unusedN>` tokens.
pub fn sanitize_llm_output(raw: &str) -> String {
    let mut text = raw;

    if let Some(idx) = text.find("<unused") {
        if let Some(thought) = text[idx..].find("thought\n") {
            text = &text[idx + thought + "thought\n".len()..];
        }
    }

    UNUSED_TOKEN_RE.replace_all(text, "").trim().to_string()
}
