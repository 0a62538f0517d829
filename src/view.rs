//! Terminal presentation of templates.

use crate::engine::{Segment, highlight};
use crate::template::Template;
use colored::Colorize;

/// Template body with placeholders emphasised. Delimiters are kept so the
/// output reads the same with colors off.
pub fn highlighted(body: &str) -> String {
    highlight(body)
        .iter()
        .map(|seg| match seg {
            Segment::Lit(t) => (*t).to_owned(),
            Segment::Var(t) => t.cyan().bold().to_string(),
        })
        .collect()
}

/// One-line summary used by `list`.
pub fn row(tpl: &Template) -> String {
    let star = if tpl.favorite { "*" } else { " " };
    format!(
        "{star} {:>3}  {} {}  [{}]  {}",
        tpl.id,
        tpl.icon().symbol(),
        tpl.title.bold(),
        tpl.category,
        tpl.variables.as_slice().join(", ").dimmed(),
    )
}

/// Multi-line detail used by `show`.
pub fn detail(tpl: &Template) -> String {
    let mut out = format!(
        "{} {}  (#{})\n",
        tpl.icon().symbol(),
        tpl.title.bold(),
        tpl.id
    );
    if !tpl.description.is_empty() {
        out.push_str(&format!("{}\n", tpl.description));
    }
    out.push_str(&format!("category:  {}\n", tpl.category));
    out.push_str(&format!("favorite:  {}\n", if tpl.favorite { "yes" } else { "no" }));
    out.push_str(&format!("variables: {}\n\n", tpl.variables.as_slice().join(", ")));
    out.push_str(&highlighted(&tpl.body));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn highlighted_without_color_is_the_body() {
        plain();
        let body = "A {{x}} B {y} {{";
        assert_eq!(highlighted(body), body);
    }

    #[test]
    fn detail_lists_fields_then_body() {
        plain();
        let tpl = &seed::builtin().unwrap()[0];
        let text = detail(tpl);
        assert!(text.starts_with("🐞 Debug Code  (#1)\n"));
        assert!(text.contains("variables: code, error, context\n"));
        assert!(text.ends_with(&tpl.body));
    }

    #[test]
    fn row_marks_favorites() {
        plain();
        let tpl = &seed::builtin().unwrap()[0];
        assert!(row(tpl).starts_with("*   1  🐞 Debug Code  [Debugging]"));
    }
}
