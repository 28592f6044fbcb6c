//! Form submission parsing
//!
//! Admin mutations arrive as `application/x-www-form-urlencoded` bodies.
//! This module turns the raw body into a flat field map: string values
//! and repeated fields only, no nesting. Everything downstream
//! (validation, preconditions) works against [`FormSubmission`], never
//! the wire bytes.

use std::borrow::Cow;
use std::collections::HashMap;

/// A parsed form submission: field name to one or more values.
#[derive(Debug, Clone, Default)]
pub struct FormSubmission {
    fields: HashMap<String, Vec<String>>,
}

impl FormSubmission {
    /// Parse a url-encoded body.
    ///
    /// Undecodable percent-escapes keep their raw text rather than
    /// failing the whole submission; validation will reject the field
    /// value if it matters.
    pub fn parse(body: &str) -> Self {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (name, value) = match pair.split_once('=') {
                Some((n, v)) => (n, v),
                None => (pair, ""),
            };
            let name = decode_component(name);
            let value = decode_component(value);
            fields.entry(name.into_owned()).or_default().push(value.into_owned());
        }
        Self { fields }
    }

    /// First value of a field, trimmed; `None` if absent.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(|v| v.trim())
    }

    /// First value of a field, trimmed; `None` if absent or blank.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// All values of a repeated field, trimmed, blanks dropped.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.fields
            .get(name)
            .map(|values| {
                values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Checkbox semantics: present with value "on" or "true".
    pub fn get_flag(&self, name: &str) -> bool {
        matches!(self.get(name), Some("on") | Some("true"))
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let mut fields: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in pairs {
            fields
                .entry((*name).to_string())
                .or_default()
                .push((*value).to_string());
        }
        Self { fields }
    }
}

/// Decode one url-encoded component: `+` means space, then
/// percent-decoding.
fn decode_component(raw: &str) -> Cow<'_, str> {
    let plus_decoded = raw.replace('+', " ");
    match urlencoding::decode(&plus_decoded) {
        Ok(decoded) => Cow::Owned(decoded.into_owned()),
        Err(_) => Cow::Owned(plus_decoded),
    }
}
