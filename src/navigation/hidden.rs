//! Hidden-state carrier
//!
//! The catalog keeps its session state in a block of hidden inputs on every
//! page. The block is a `div` (or, in some responses, a `field` element)
//! whose id is `win<N>divPSHIDDENFIELDS`.

use crate::transport::Document;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

const CONTAINER_SUFFIX: &str = "divPSHIDDENFIELDS";

/// Extracts the hidden field map of a document
pub fn extract_hidden_fields(document: &Document) -> BTreeMap<String, String> {
    hidden_fields_in(&document.html())
}

/// Extracts the hidden field map from an already parsed page
///
/// Returns an empty map when the page has no hidden block. Inputs without a
/// name are ignored; inputs without a value carry an empty string.
///
/// # Arguments
///
/// * `html` - Parsed page
///
/// # Returns
///
/// Field name to value, in name order
pub fn hidden_fields_in(html: &Html) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();

    let Some(container) = find_container(html) else {
        return fields;
    };

    let Ok(input_selector) = Selector::parse("input[name]") else {
        return fields;
    };

    for input in container.select(&input_selector) {
        if let Some(name) = input.value().attr("name") {
            let value = input.value().attr("value").unwrap_or_default();
            fields.insert(name.to_string(), value.to_string());
        }
    }

    fields
}

fn find_container(html: &Html) -> Option<ElementRef<'_>> {
    for tag in ["div", "field"] {
        let selector = Selector::parse(&format!("{}[id$=\"{}\"]", tag, CONTAINER_SUFFIX)).ok()?;
        if let Some(found) = html
            .select(&selector)
            .find(|el| el.value().id().is_some_and(is_container_id))
        {
            return Some(found);
        }
    }
    None
}

fn is_container_id(id: &str) -> bool {
    id.strip_prefix("win")
        .and_then(|rest| rest.strip_suffix(CONTAINER_SUFFIX))
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}
