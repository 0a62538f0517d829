//! Placeholder substitution and body editing helpers.

use super::parser::{Segment, parse};
use std::collections::{HashMap, HashSet};

/// Substitute `{{name}}` tokens in `body` using `values`.
///
/// Unknown names are left as `{{name}}` so partial renders are inspectable.
/// Every placeholder is resolved against the original body in one pass;
/// text coming from a value is never scanned again.
pub fn render(body: &str, values: &HashMap<String, String>) -> String {
    let segments = parse(body);

    let capacity: usize = segments
        .iter()
        .map(|s| match s.name() {
            Some(name) => values.get(name).map_or(s.text().len(), String::len),
            None => s.text().len(),
        })
        .sum();

    let mut out = String::with_capacity(capacity);

    for seg in &segments {
        match seg.name().and_then(|name| values.get(name)) {
            Some(v) => out.push_str(v),
            None => out.push_str(seg.text()),
        }
    }

    out
}

/// Distinct placeholder names in `body` with no entry in `values`.
pub fn unresolved<'a>(body: &'a str, values: &HashMap<String, String>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    parse(body)
        .into_iter()
        .filter_map(|s| s.name())
        .filter(|name| !values.contains_key(*name) && seen.insert(*name))
        .collect()
}

/// Replace the character range `start..end` of `body` with `{{name}}`.
///
/// Offsets count chars, not bytes, and are clamped to the body; an `end`
/// before `start` collapses to an insertion at `start`. Returns the new body
/// and the char offset just past the inserted token.
pub fn insert_placeholder(body: &str, start: usize, end: usize, name: &str) -> (String, usize) {
    let char_len = body.chars().count();
    let start = start.min(char_len);
    let end = end.clamp(start, char_len);

    let byte_at = |idx: usize| {
        body.char_indices()
            .nth(idx)
            .map_or(body.len(), |(b, _)| b)
    };

    let token = format!("{{{{{name}}}}}");
    let mut out = String::with_capacity(body.len() + token.len());
    out.push_str(&body[..byte_at(start)]);
    out.push_str(&token);
    out.push_str(&body[byte_at(end)..]);

    (out, start + token.chars().count())
}
