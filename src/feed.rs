//! Pricing feed parsing and navigation
//!
//! The published feeds are JavaScript files of the form
//!
//! ```text
//! /* comment block */
//! callback({"vers":0.01,"config":{"regions":[ ... ]}});
//! ```
//!
//! This module strips that envelope, parses the JSON body, and walks down to
//! the size entries of one region. Compute feeds nest entries as
//! `instanceTypes[*].sizes[*]`; database and cache feeds as `types[*].tiers[*]`.
//!
//! Older feeds are object literals with unquoted keys. When strict parsing
//! fails the keys are quoted and parsing is retried once.

use crate::error::{PricingError, Result};
use crate::types::ServiceKind;
use serde_json::Value;
use tracing::debug;

/// One size/tier entry from a feed, kept as raw JSON for the record builder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSizeEntry(Value);

impl RawSizeEntry {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Field as text. Numbers are rendered, anything else is treated as absent.
    pub fn text(&self, key: &str) -> Option<String> {
        scalar_text(self.0.get(key)?)
    }

    /// First labeled value column (`valueColumns[0]`), present on compute sizes.
    pub fn first_value_column(&self) -> Option<&Value> {
        self.0.get("valueColumns")?.as_array()?.first()
    }

    /// The `prices.USD` leaf: from the first value column when the entry has
    /// value columns, otherwise from the entry itself.
    pub fn usd_price(&self) -> Option<String> {
        let holder = self.first_value_column().unwrap_or(&self.0);
        scalar_text(holder.get("prices")?.get("USD")?)
    }
}

/// Render a JSON string or number as text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Strip comments and the callback wrapper, returning the JSON body.
pub fn unwrap_envelope(text: &str) -> Option<&str> {
    let body = skip_leading_comments(text);

    if body.starts_with('{') {
        return Some(body.trim_end().trim_end_matches(';').trim_end());
    }

    let re = regex::Regex::new(r"(?s)^[A-Za-z_$][\w$.]*\s*\((.*)\)\s*;?\s*$").ok()?;
    re.captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn skip_leading_comments(mut text: &str) -> &str {
    loop {
        text = text.trim_start();
        if let Some(rest) = text.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) => text = &rest[end + 2..],
                None => return "",
            }
        } else if let Some(rest) = text.strip_prefix("//") {
            text = rest.find('\n').map(|end| &rest[end..]).unwrap_or("");
        } else {
            return text;
        }
    }
}

/// Quote bare object-literal keys: `{vers:0.01,config:{` -> `{"vers":0.01,"config":{`.
///
/// Only identifiers directly after `{` or `,` and followed by `:` are keys.
/// String literals are copied untouched, so a value like `"1 x 80,ssd:nvme"`
/// survives.
fn quote_bare_keys(body: &str) -> String {
    let mut out = String::with_capacity(body.len() + body.len() / 4);
    let mut chars = body.char_indices().peekable();
    let mut in_string = false;
    let mut escaped = false;
    let mut key_position = false;

    while let Some((start, c)) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if key_position && is_identifier_start(c) {
            let mut end = start + c.len_utf8();
            while let Some(&(i, next)) = chars.peek() {
                if !is_identifier_char(next) {
                    break;
                }
                end = i + next.len_utf8();
                chars.next();
            }

            let ident = &body[start..end];
            if body[end..].trim_start().starts_with(':') {
                out.push('"');
                out.push_str(ident);
                out.push('"');
            } else {
                out.push_str(ident);
            }
            key_position = false;
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                key_position = false;
            }
            '{' | ',' => key_position = true,
            c if c.is_whitespace() => {}
            _ => key_position = false,
        }
        out.push(c);
    }

    out
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Parse a padded feed into a JSON document.
pub fn parse_feed(text: &str) -> Result<Value> {
    let body = unwrap_envelope(text)
        .ok_or_else(|| PricingError::malformed("feed is neither JSON nor a callback(...) envelope"))?;

    match serde_json::from_str::<Value>(body) {
        Ok(doc) => Ok(doc),
        Err(strict_err) => {
            debug!("Strict JSON parse failed ({}), retrying with quoted keys", strict_err);
            serde_json::from_str::<Value>(&quote_bare_keys(body))
                .map_err(|e| PricingError::malformed(format!("invalid JSON: {}", e)))
        }
    }
}

/// The top-level `config.regions` array.
pub fn regions(doc: &Value) -> Result<&Vec<Value>> {
    doc.get("config")
        .and_then(|config| config.get("regions"))
        .and_then(Value::as_array)
        .ok_or_else(|| PricingError::malformed("missing config.regions array"))
}

/// Find the region entry whose `region` field equals `region` exactly.
pub fn find_region<'a>(doc: &'a Value, region: &str) -> Result<Option<&'a Value>> {
    Ok(regions(doc)?
        .iter()
        .find(|entry| entry.get("region").and_then(Value::as_str) == Some(region)))
}

/// Extract the size/tier entries for one region of a feed.
///
/// An unknown region is not an error; it yields an empty list.
pub fn extract(feed_text: &str, region: &str, service: ServiceKind) -> Result<Vec<RawSizeEntry>> {
    let doc = parse_feed(feed_text)?;
    extract_from_document(&doc, region, service)
}

/// Same as [`extract`] for an already parsed document.
pub fn extract_from_document(
    doc: &Value,
    region: &str,
    service: ServiceKind,
) -> Result<Vec<RawSizeEntry>> {
    let Some(region_entry) = find_region(doc, region)? else {
        debug!("Region {} not present in {} feed", region, service);
        return Ok(Vec::new());
    };

    let (group_key, entries_key) = service.entry_path();
    let entries: Vec<RawSizeEntry> = array_at(region_entry, group_key)
        .flat_map(|group| array_at(group, entries_key))
        .cloned()
        .map(RawSizeEntry::new)
        .collect();

    debug!(
        "Found {} {} entries for region {}",
        entries.len(),
        service,
        region
    );
    Ok(entries)
}

fn array_at<'a>(value: &'a Value, key: &str) -> std::slice::Iter<'a, Value> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .unwrap_or_default()
}
