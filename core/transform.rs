use once_cell::sync::Lazy;
use regex::Regex;

/// Extensions (without the leading dot) whose whitespace is semantic and must
/// survive normalization: indentation-sensitive languages and markup.
pub static WHITESPACE_DEPENDENT_EXTENSIONS: &[&str] = &[
    "py",     // Python
    "yaml",   // YAML
    "yml",    // YAML
    "jade",   // Jade/Pug
    "haml",   // Haml
    "slim",   // Slim
    "coffee", // CoffeeScript
    "pug",    // Pug
    "styl",   // Stylus
    "gd",     // Godot
];

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

pub fn is_whitespace_dependent(extension: &str) -> bool {
    let extension = extension.trim_start_matches('.');
    WHITESPACE_DEPENDENT_EXTENSIONS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(extension))
}

/// Collapses every whitespace run to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Replaces every literal triple-backtick run with an escaped form so the
/// surrounding fence in the rendered document can never be closed early.
/// Idempotent: the escaped form contains no triple-backtick sequence.
pub fn escape_triple_backticks(content: &str) -> String {
    content.replace("```", "\\`\\`\\`")
}
