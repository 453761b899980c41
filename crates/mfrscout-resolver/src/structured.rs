//! schema.org JSON-LD extraction: manufacturer name and address.
//!
//! Pages embed zero or more `<script type="application/ld+json">` blocks.
//! Some sites concatenate several documents in one block with no separator
//! (`{...}{...}`); those are split on the `}{` boundary and each fragment is
//! re-wrapped and parsed on its own.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#)
        .expect("valid json-ld script regex")
});
static FRAGMENT_BOUNDARY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\}\s*\{").expect("valid fragment boundary regex"));

const PRODUCT_TYPES: [&str; 2] = ["Product", "ProductInformation"];

/// A postal address as published in structured data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostalAddress {
    Structured {
        street: Option<String>,
        locality: Option<String>,
        region: Option<String>,
        postal_code: Option<String>,
        country: Option<String>,
    },
    Text(String),
}

impl PostalAddress {
    /// Street, locality, region, postal code, country joined with `", "`,
    /// skipping empty parts. `None` when nothing is left.
    #[must_use]
    pub fn compose(&self) -> Option<String> {
        let composed = match self {
            Self::Structured {
                street,
                locality,
                region,
                postal_code,
                country,
            } => [street, locality, region, postal_code, country]
                .into_iter()
                .filter_map(|part| part.as_deref().map(str::trim))
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            Self::Text(text) => text.trim().to_string(),
        };
        (!composed.is_empty()).then_some(composed)
    }
}

/// An organization as named by a structured-data record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Party {
    pub name: Option<String>,
    pub address: Option<PostalAddress>,
}

/// The record kinds the name extractor cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredRecord {
    /// `Product` / `ProductInformation`; `manufacturer` falls back to `brand`.
    Product { manufacturer: Option<Party> },
    Organization(Party),
    Company(Party),
    Unknown,
}

impl StructuredRecord {
    /// The party this record names, if it is one of the accepted kinds.
    ///
    /// A product without a usable `manufacturer`/`brand` does not match.
    #[must_use]
    pub fn party(&self) -> Option<&Party> {
        match self {
            Self::Product { manufacturer } => manufacturer.as_ref(),
            Self::Organization(party) | Self::Company(party) => Some(party),
            Self::Unknown => None,
        }
    }
}

/// Name and composed address taken together from the first matching record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredMatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Parse every JSON-LD block in `html` into JSON values, in document order.
///
/// Blocks that fail to parse even after fragment splitting contribute
/// nothing; `failed_blocks` counts them for the caller's logs.
#[must_use]
pub fn parse_json_ld_blocks(html: &str) -> ParsedBlocks {
    let mut parsed = ParsedBlocks::default();
    for cap in SCRIPT_RE.captures_iter(html) {
        let raw = cap.get(1).map_or("", |m| m.as_str()).trim();
        if raw.is_empty() {
            continue;
        }
        let values = parse_block(raw);
        if values.is_empty() {
            parsed.failed_blocks += 1;
        }
        parsed.values.extend(values);
    }
    parsed
}

#[derive(Debug, Default)]
pub struct ParsedBlocks {
    pub values: Vec<Value>,
    pub failed_blocks: usize,
}

/// Parse one script body, recovering concatenated documents.
pub(crate) fn parse_block(raw: &str) -> Vec<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(raw) {
        return vec![value];
    }

    let parts: Vec<&str> = FRAGMENT_BOUNDARY_RE.split(raw).collect();
    if parts.len() < 2 {
        return Vec::new();
    }

    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .filter_map(|(i, part)| {
            let wrapped = if i == 0 {
                format!("{part}}}")
            } else if i == last {
                format!("{{{part}")
            } else {
                format!("{{{part}}}")
            };
            match serde_json::from_str::<Value>(&wrapped) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!(fragment = i, error = %e, "discarding unparseable JSON-LD fragment");
                    None
                }
            }
        })
        .collect()
}

/// Flatten top-level arrays and `@graph` containers into candidate objects,
/// preserving document order.
fn flatten_candidates(values: &[Value]) -> Vec<&Value> {
    let mut out = Vec::new();
    for value in values {
        let items: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };
        for item in items {
            out.push(item);
            if let Some(graph) = item.get("@graph").and_then(Value::as_array) {
                out.extend(graph.iter());
            }
        }
    }
    out
}

/// Classify one JSON-LD object.
#[must_use]
pub fn to_record(item: &Value) -> StructuredRecord {
    let Some(map) = item.as_object() else {
        return StructuredRecord::Unknown;
    };
    let type_node = map.get("@type").or_else(|| map.get("type"));
    let has_type = |wanted: &[&str]| type_matches(type_node, wanted);

    if has_type(&PRODUCT_TYPES) {
        let manufacturer = map
            .get("manufacturer")
            .and_then(party_from_value)
            .or_else(|| map.get("brand").and_then(party_from_value));
        return StructuredRecord::Product { manufacturer };
    }
    if has_type(&["Organization"]) {
        return StructuredRecord::Organization(party_from_object(item));
    }
    if has_type(&["Company"]) {
        return StructuredRecord::Company(party_from_object(item));
    }
    StructuredRecord::Unknown
}

/// All records in `values`, in document order.
#[must_use]
pub fn records(values: &[Value]) -> Vec<StructuredRecord> {
    flatten_candidates(values).into_iter().map(to_record).collect()
}

/// First Product/Organization/Company record that names a party.
#[must_use]
pub fn first_match(values: &[Value]) -> Option<StructuredMatch> {
    flatten_candidates(values)
        .into_iter()
        .map(to_record)
        .find_map(|record| {
            record.party().map(|party| StructuredMatch {
                name: party
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .map(str::to_string),
                address: party.address.as_ref().and_then(PostalAddress::compose),
            })
        })
}

fn type_matches(type_node: Option<&Value>, wanted: &[&str]) -> bool {
    let is_wanted = |s: &str| wanted.iter().any(|w| s.eq_ignore_ascii_case(w));
    match type_node {
        Some(Value::String(s)) => is_wanted(s),
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).any(is_wanted),
        _ => false,
    }
}

/// `manufacturer` / `brand` may be an object or a bare name string.
fn party_from_value(value: &Value) -> Option<Party> {
    match value {
        Value::Object(_) => Some(party_from_object(value)),
        Value::String(name) if !name.trim().is_empty() => Some(Party {
            name: Some(name.trim().to_string()),
            address: None,
        }),
        _ => None,
    }
}

fn party_from_object(value: &Value) -> Party {
    Party {
        name: value.get("name").and_then(Value::as_str).map(str::to_string),
        address: value.get("address").and_then(address_from_value),
    }
}

fn address_from_value(value: &Value) -> Option<PostalAddress> {
    match value {
        Value::String(text) => Some(PostalAddress::Text(text.clone())),
        Value::Object(_) => {
            let field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
            // addressCountry is sometimes a {"@type": "Country", "name": ...} node.
            let country = field("addressCountry").or_else(|| {
                value
                    .get("addressCountry")
                    .and_then(|c| c.get("name"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
            Some(PostalAddress::Structured {
                street: field("streetAddress"),
                locality: field("addressLocality"),
                region: field("addressRegion"),
                postal_code: field("postalCode"),
                country,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "structured_test.rs"]
mod tests;
