//! Searchable text extraction from FHIR resources.
//!
//! A resource is indexed under two stored texts:
//!
//! - the narrative: the XHTML of the `Narrative` element (`text.div`) reduced
//!   to plain text, entities decoded
//! - the content: every human-readable string value, ordered by key, with
//!   ids, references and URIs left out
//!
//! The narrative is not repeated in the content.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern is valid"));

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#(\d{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));")
        .expect("entity pattern is valid")
});

/// Schemes of string values that address something rather than describe it.
const URI_PREFIXES: [&str; 4] = ["http://", "https://", "urn:", "data:"];

/// Narrative and content text of a resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchableText {
    /// Narrative text with markup stripped.
    pub narrative: String,
    /// All string content, space separated.
    pub content: String,
}

impl SearchableText {
    /// Extracts both texts from a resource.
    pub fn from_resource(resource: &Value) -> Self {
        let narrative = resource
            .get("text")
            .and_then(narrative_div)
            .map(xhtml_to_text)
            .unwrap_or_default();

        let mut walker = ContentWalker::default();
        walker.visit(resource);

        Self {
            narrative,
            content: walker.parts.join(" "),
        }
    }

    /// Returns true if neither text has content.
    pub fn is_empty(&self) -> bool {
        self.narrative.is_empty() && self.content.is_empty()
    }
}

/// The `div` of a `Narrative` element.
fn narrative_div(element: &Value) -> Option<&str> {
    element.get("div").and_then(Value::as_str)
}

/// Reduces an XHTML fragment to whitespace-normalized plain text.
fn xhtml_to_text(xhtml: &str) -> String {
    let without_tags = MARKUP.replace_all(xhtml, " ");
    let decoded = ENTITY.replace_all(&without_tags, |caps: &regex::Captures<'_>| {
        decode_entity(caps).unwrap_or_else(|| caps[0].to_string())
    });
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entity(caps: &regex::Captures<'_>) -> Option<String> {
    let code = if let Some(dec) = caps.get(1) {
        dec.as_str().parse::<u32>().ok()?
    } else if let Some(hex) = caps.get(2) {
        u32::from_str_radix(hex.as_str(), 16).ok()?
    } else {
        let named = match caps.get(3)?.as_str() {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            "nbsp" => ' ',
            _ => return None,
        };
        return Some(named.to_string());
    };
    char::from_u32(code).map(String::from)
}

/// Collects searchable strings from a JSON tree.
#[derive(Debug, Default)]
struct ContentWalker<'a> {
    parts: Vec<&'a str>,
}

impl<'a> ContentWalker<'a> {
    fn visit(&mut self, value: &'a Value) {
        match value {
            Value::String(s) if is_descriptive(s) => self.parts.push(s),
            Value::Array(items) => items.iter().for_each(|item| self.visit(item)),
            Value::Object(fields) => self.visit_object(fields),
            _ => {}
        }
    }

    fn visit_object(&mut self, fields: &'a Map<String, Value>) {
        for (key, value) in fields {
            if !is_searchable_key(key) {
                continue;
            }
            // a Narrative has its own stored text; a plain `text` string stays
            if key == "text" && narrative_div(value).is_some() {
                continue;
            }
            self.visit(value);
        }
    }
}

/// Keys holding identifiers or plumbing rather than text.
fn is_searchable_key(key: &str) -> bool {
    !matches!(
        key,
        "resourceType" | "id" | "meta" | "extension" | "modifierExtension" | "url" | "reference"
    )
}

fn is_descriptive(value: &str) -> bool {
    !value.trim().is_empty() && !URI_PREFIXES.iter().any(|prefix| value.starts_with(prefix))
}
