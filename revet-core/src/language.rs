//! Language classification heuristics.
//!
//! Two independent strategies, used only when the caller supplies no explicit
//! language: a file-extension table and an ordered set of content signature
//! checks. Both are deliberately cheap syntactic guesses, not parsers — they
//! are allowed to be wrong and serve only as a last resort.

use regex::Regex;
use std::sync::OnceLock;

/// How much of the sample the content classifier inspects.
const CONTENT_SAMPLE_CHARS: usize = 1200;

/// Extension to language tag table, checked in order.
const EXTENSION_TABLE: &[(&str, &str)] = &[
    (".py", "python"),
    (".js", "javascript"),
    (".jsx", "javascript"),
    (".ts", "javascript"),
    (".tsx", "javascript"),
    (".cpp", "cpp"),
    (".cc", "cpp"),
    (".cxx", "cpp"),
    (".c", "c"),
    (".java", "java"),
    (".txt", "text"),
];

fn content_checks() -> &'static [(Regex, &'static str)] {
    static CHECKS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    CHECKS.get_or_init(|| {
        // Ordered: the first matching signature wins, so an #include line
        // short-circuits before any import-style check can fire.
        vec![
            (Regex::new(r"(?m)^\s*#include\s*<").unwrap(), "cpp"),
            (
                Regex::new(r"(?m)^\s*def\s+\w+\(|^\s*import\s+\w+").unwrap(),
                "python",
            ),
            (
                Regex::new(r"(?m)^\s*function\s+\w+\(|console\.log\(").unwrap(),
                "javascript",
            ),
            (
                Regex::new(r"(?m)^\s*public\s+class\s+\w+|System\.out\.println").unwrap(),
                "java",
            ),
            (Regex::new(r"(?m)^\s*int\s+main\s*\(").unwrap(), "c"),
        ]
    })
}

/// Classify a language from a file name's extension.
///
/// Unknown or missing extensions map to `"text"`.
pub fn classify_by_file_name(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    EXTENSION_TABLE
        .iter()
        .find(|(ext, _)| lowered.ends_with(ext))
        .map(|(_, lang)| *lang)
        .unwrap_or("text")
}

/// Classify a language from a code sample's leading content.
///
/// Inspects only the first 1200 characters and applies ordered signature
/// checks; no match maps to `"text"`. Deterministic and pure.
pub fn classify_by_content(code: &str) -> &'static str {
    let end = code
        .char_indices()
        .nth(CONTENT_SAMPLE_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(code.len());
    let sample = &code[..end];

    content_checks()
        .iter()
        .find(|(pattern, _)| pattern.is_match(sample))
        .map(|(_, lang)| *lang)
        .unwrap_or("text")
}

/// Classify from whichever hint is available.
///
/// A non-empty file name wins over content; neither present maps to
/// `"text"`. This is the independently callable utility surfaced by the
/// crate root.
pub fn classify(file_name: Option<&str>, content: Option<&str>) -> &'static str {
    match (file_name, content) {
        (Some(name), _) if !name.trim().is_empty() => classify_by_file_name(name),
        (_, Some(code)) => classify_by_content(code),
        _ => "text",
    }
}

/// Count non-blank lines of code.
pub fn count_code_lines(code: &str) -> usize {
    code.lines().filter(|line| !line.trim().is_empty()).count()
}
