use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating MIME type strings on attached documents
    /// - Valid: "application/pdf", "image/png", "application/vnd.ms-excel"
    /// - Invalid: "pdf", "/pdf", "application/", "application pdf"
    pub static ref MIME_TYPE_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9!#$&^_.+-]*/[a-zA-Z0-9][a-zA-Z0-9!#$&^_.+-]*$").unwrap();
}

/// Trim a free-text field, mapping blank input to `None`.
pub fn normalize_optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
