//! Small helpers shared by the glue code and templates.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::{BuildHasher, Hash};

use serde_json::{Map, Value};

/// Removes `key` and hands back its value. A missing key is not an error:
/// the map is left untouched and `None` comes back.
pub fn pop<K, Q, V, S>(collection: &mut HashMap<K, V, S>, key: &Q) -> Option<V>
where
    K: Borrow<Q> + Eq + Hash,
    Q: Eq + Hash + ?Sized,
    S: BuildHasher,
{
    collection.remove(key)
}

/// Same as [`pop`] for JSON objects.
pub fn pop_json(collection: &mut Map<String, Value>, key: &str) -> Option<Value> {
    collection.remove(key)
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
#[path = "../tests/unit/utils.rs"]
mod tests;
