//! Field validation
//!
//! Shared helpers for the mutation pipeline: an accumulator that maps
//! field names to human-readable violation messages, plus the individual
//! validators the entity schemas are built from. Validation never
//! mutates; a submission with any recorded violation is rejected whole.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use url::Url;

/// Field name to violation messages, accumulated across a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct FieldErrors(HashMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against a field.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|v| v.as_slice())
    }

    pub fn into_map(self) -> HashMap<String, Vec<String>> {
        self.0
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut fields: Vec<&String> = self.0.keys().collect();
        fields.sort();
        let joined = fields
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "invalid fields: {joined}")
    }
}

/// Require a minimum trimmed length; records `message` on violation and
/// returns the trimmed value when it passes.
pub fn min_len<'a>(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&'a str>,
    min: usize,
    message: &str,
) -> Option<&'a str> {
    let trimmed = value.unwrap_or("").trim();
    if trimmed.chars().count() < min {
        errors.push(field, message);
        return None;
    }
    Some(trimmed)
}

/// Require a well-formed absolute http(s) URL.
pub fn required_url(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    let raw = value.unwrap_or("").trim();
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url.into()),
        _ => {
            errors.push(field, "Must be a valid URL");
            None
        }
    }
}

/// Like [`required_url`], but blank input is accepted as absent.
pub fn optional_url(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None | Some("") => None,
        other => required_url(errors, field, other),
    }
}

/// Require a parseable date. Accepts RFC 3339 timestamps or bare
/// `YYYY-MM-DD` dates (midnight UTC).
pub fn required_date(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
) -> Option<DateTime<Utc>> {
    let raw = value.unwrap_or("").trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Some(midnight.and_utc());
        }
    }
    errors.push(field, "Invalid date format");
    None
}

/// Require a positive integer (≥ min).
pub fn required_u32(
    errors: &mut FieldErrors,
    field: &str,
    value: Option<&str>,
    min: u32,
    message: &str,
) -> Option<u32> {
    match value.unwrap_or("").trim().parse::<u32>() {
        Ok(n) if n >= min => Some(n),
        _ => {
            errors.push(field, message);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_len_counts_chars() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            min_len(&mut errors, "title", Some("Hi"), 3, "too short"),
            None
        );
        assert_eq!(errors.get("title"), Some(&["too short".to_string()][..]));

        let mut errors = FieldErrors::new();
        assert_eq!(
            min_len(&mut errors, "title", Some("  Workshop A  "), 3, "too short"),
            Some("Workshop A")
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn test_required_url() {
        let mut errors = FieldErrors::new();
        assert!(required_url(&mut errors, "link", Some("https://example.com/x")).is_some());
        assert!(errors.is_empty());

        assert!(required_url(&mut errors, "link", Some("not a url")).is_none());
        assert!(required_url(&mut errors, "link", Some("ftp://example.com")).is_none());
        assert!(required_url(&mut errors, "link", None).is_none());
        assert_eq!(errors.get("link").map(<[String]>::len), Some(3));
    }

    #[test]
    fn test_optional_url_accepts_blank() {
        let mut errors = FieldErrors::new();
        assert_eq!(optional_url(&mut errors, "website", None), None);
        assert_eq!(optional_url(&mut errors, "website", Some("")), None);
        assert!(errors.is_empty());

        assert!(optional_url(&mut errors, "website", Some("nope")).is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_required_date_formats() {
        let mut errors = FieldErrors::new();
        assert!(required_date(&mut errors, "date", Some("2025-08-02T00:00:00.000Z")).is_some());
        assert!(required_date(&mut errors, "date", Some("2025-08-02")).is_some());
        assert!(errors.is_empty());

        assert!(required_date(&mut errors, "date", Some("next tuesday")).is_none());
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_required_u32() {
        let mut errors = FieldErrors::new();
        assert_eq!(
            required_u32(&mut errors, "durationDays", Some("3"), 1, "bad"),
            Some(3)
        );
        assert_eq!(
            required_u32(&mut errors, "durationDays", Some("0"), 1, "bad"),
            None
        );
        assert_eq!(
            required_u32(&mut errors, "durationDays", Some("x"), 1, "bad"),
            None
        );
        assert_eq!(errors.get("durationDays").map(<[String]>::len), Some(2));
    }
}
