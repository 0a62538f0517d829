//! Minimal `{{name}}` template parser.

use std::collections::HashSet;

/// A parsed segment of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text to emit verbatim.
    Lit(&'a str),
    /// Full placeholder token, delimiters included (`{{name}}`).
    Var(&'a str),
}

impl<'a> Segment<'a> {
    /// Exact source text of the segment.
    pub fn text(&self) -> &'a str {
        match *self {
            Segment::Lit(t) | Segment::Var(t) => t,
        }
    }

    /// Placeholder name without delimiters; `None` for literals.
    ///
    /// Names are not trimmed: `{{ a }}` is named ` a `.
    pub fn name(&self) -> Option<&'a str> {
        match *self {
            Segment::Lit(_) => None,
            Segment::Var(t) => Some(&t[2..t.len() - 2]),
        }
    }
}

/// Parse a template string into a lossless sequence of [`Segment`]s.
///
/// A placeholder is `{{`, one or more characters other than `{` and `}`, then
/// `}}`. Anything else (single braces, `{{}}`, unclosed or nested braces) is
/// literal text. Matches are leftmost and non-overlapping, so `{{{a}}}` yields
/// `{`, `{{a}}`, `}`.
///
/// Returns borrowed slices into `input`; empty literals are never emitted.
pub fn parse(input: &str) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut lit_start = 0;
    let mut i = 0;

    while i + 1 < bytes.len() {
        if bytes[i] != b'{' || bytes[i + 1] != b'{' {
            i += 1;
            continue;
        }

        match placeholder_end(bytes, i) {
            Some(end) => {
                if lit_start < i {
                    segments.push(Segment::Lit(&input[lit_start..i]));
                }
                segments.push(Segment::Var(&input[i..end]));
                lit_start = end;
                i = end;
            }
            None => i += 1,
        }
    }

    if lit_start < input.len() {
        segments.push(Segment::Lit(&input[lit_start..]));
    }

    segments
}

/// Byte offset just past the `}}` of a placeholder opening at `open`.
///
/// Braces are ASCII, so every offset returned lies on a char boundary.
fn placeholder_end(bytes: &[u8], open: usize) -> Option<usize> {
    let name_start = open + 2;
    let name_len = bytes[name_start..]
        .iter()
        .position(|&b| b == b'{' || b == b'}')?;

    if name_len == 0 {
        return None;
    }

    let close = name_start + name_len;
    (bytes[close] == b'}' && bytes.get(close + 1) == Some(&b'}')).then_some(close + 2)
}

/// Distinct placeholder names in order of first appearance.
pub fn extract_variables(body: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    parse(body)
        .iter()
        .filter_map(Segment::name)
        .filter(|name| seen.insert(*name))
        .map(str::to_owned)
        .collect()
}

/// One `{{name}}` token per line, in the given order.
pub fn placeholders_body<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(|n| format!("{{{{{}}}}}", n.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
