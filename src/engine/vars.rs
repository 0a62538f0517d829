//! Declared variable lists and sample values.

use super::parser::extract_variables;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// User-facing validation failures. None of these are fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Variable name cannot be empty")]
    EmptyName,

    #[error("Variable already exists: {0}")]
    DuplicateName(String),

    #[error("No variable at index {index} (template has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Prompt template is required")]
    EmptyBody,
}

/// Ordered set of declared variable names: no duplicates, no blank names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct VariableList(Vec<String>);

impl VariableList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name`. The list is unchanged on error.
    ///
    /// Matching is case-sensitive and exact; the name is stored as given.
    pub fn add(&mut self, name: &str) -> Result<(), ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if self.contains(name) {
            return Err(ValidationError::DuplicateName(name.to_owned()));
        }
        self.0.push(name.to_owned());
        Ok(())
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Result<String, ValidationError> {
        if index >= self.0.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.0.len(),
            });
        }
        Ok(self.0.remove(index))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|v| v == name)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl TryFrom<Vec<String>> for VariableList {
    type Error = ValidationError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        let mut list = Self::new();
        for name in &names {
            list.add(name)?;
        }
        Ok(list)
    }
}

impl From<VariableList> for Vec<String> {
    fn from(list: VariableList) -> Self {
        list.0
    }
}

/// Canned preview value for a variable, keyed on its lower-cased name.
pub fn sample_value(name: &str) -> String {
    let canned = match name.to_lowercase().as_str() {
        "code" => "function add(a, b) {\n  return a + b;\n}",
        "error" => "TypeError: Cannot read property \"length\" of undefined",
        "context" => "This function is used in a React component to calculate totals",
        "component" => "function UserProfile({ user }) {\n  return <div>{user.name}</div>;\n}",
        "objective" => "Improve performance and add error handling",
        "language" => "JavaScript",
        "query" => "SELECT * FROM users WHERE created_at > NOW() - INTERVAL 1 DAY",
        "database_type" => "PostgreSQL",
        _ => return format!("Sample {name} value"),
    };
    canned.to_owned()
}

/// Rebuild a sample-value map after the variable list changed.
///
/// Entries for removed names are dropped, non-empty existing values are kept,
/// and every other name is seeded with [`sample_value`].
pub fn sync_samples<S: AsRef<str>>(
    variables: &[S],
    previous: &HashMap<String, String>,
) -> HashMap<String, String> {
    variables
        .iter()
        .map(|v| {
            let name = v.as_ref();
            let value = previous
                .get(name)
                .filter(|s| !s.is_empty())
                .cloned()
                .unwrap_or_else(|| sample_value(name));
            (name.to_owned(), value)
        })
        .collect()
}

/// Declared names in order, then names found only in `body`.
pub fn effective_variables(declared: &[String], body: &str) -> Vec<String> {
    let mut out = declared.to_vec();
    out.extend(
        extract_variables(body)
            .into_iter()
            .filter(|name| !declared.contains(name)),
    );
    out
}

/// Placeholders used in `body` that are not declared.
pub fn undeclared(declared: &[String], body: &str) -> Vec<String> {
    extract_variables(body)
        .into_iter()
        .filter(|name| !declared.contains(name))
        .collect()
}

/// Declared names that never appear as a placeholder in `body`.
pub fn unused(declared: &[String], body: &str) -> Vec<String> {
    let used = extract_variables(body);
    declared
        .iter()
        .filter(|name| !used.contains(*name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(names: &[&str]) -> VariableList {
        let owned: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        VariableList::try_from(owned).unwrap()
    }

    #[test]
    fn add_appends_in_order() {
        let mut vars = list(&["code"]);
        vars.add("error").unwrap();
        assert_eq!(vars.as_slice(), ["code", "error"]);
    }

    #[test]
    fn add_rejects_blank_names() {
        let mut vars = list(&["code"]);
        assert_eq!(vars.add(""), Err(ValidationError::EmptyName));
        assert_eq!(vars.add("   "), Err(ValidationError::EmptyName));
        assert_eq!(vars.as_slice(), ["code"]);
    }

    #[test]
    fn add_rejects_exact_duplicates_only() {
        let mut vars = list(&["code"]);
        assert_eq!(
            vars.add("code"),
            Err(ValidationError::DuplicateName("code".into()))
        );
        assert_eq!(vars.as_slice(), ["code"]);

        vars.add("Code").unwrap();
        assert_eq!(vars.as_slice(), ["code", "Code"]);
    }

    #[test]
    fn remove_by_index() {
        let mut vars = list(&["a", "b", "c"]);
        assert_eq!(vars.remove(1).unwrap(), "b");
        assert_eq!(vars.as_slice(), ["a", "c"]);
    }

    #[test]
    fn remove_out_of_range_leaves_list_alone() {
        let mut vars = list(&["a"]);
        assert_eq!(
            vars.remove(3),
            Err(ValidationError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(vars.as_slice(), ["a"]);
    }

    #[test]
    fn conversion_enforces_invariants() {
        let dup = vec!["a".to_owned(), "a".to_owned()];
        assert!(VariableList::try_from(dup).is_err());

        let blank = vec!["a".to_owned(), " ".to_owned()];
        assert_eq!(VariableList::try_from(blank), Err(ValidationError::EmptyName));
    }

    #[test]
    fn known_sample_values_ignore_case() {
        assert_eq!(sample_value("LANGUAGE"), "JavaScript");
        assert_eq!(sample_value("database_type"), "PostgreSQL");
        assert!(sample_value("Code").starts_with("function add"));
    }

    #[test]
    fn unknown_sample_value_keeps_original_name() {
        assert_eq!(sample_value("Framework"), "Sample Framework value");
    }

    #[test]
    fn sync_keeps_edits_and_seeds_new_names() {
        let mut prev = HashMap::new();
        prev.insert("code".to_owned(), "mine".to_owned());
        prev.insert("error".to_owned(), String::new());
        prev.insert("gone".to_owned(), "x".to_owned());

        let synced = sync_samples(&["code", "error", "language"], &prev);
        assert_eq!(synced.len(), 3);
        assert_eq!(synced["code"], "mine");
        assert_eq!(synced["error"], sample_value("error"));
        assert_eq!(synced["language"], "JavaScript");
        assert!(!synced.contains_key("gone"));
    }

    #[test]
    fn effective_is_union_declared_first() {
        let declared = vec!["b".to_owned(), "unused".to_owned()];
        let body = "{{a}} {{b}} {{c}}";
        assert_eq!(effective_variables(&declared, body), ["b", "unused", "a", "c"]);
        assert_eq!(undeclared(&declared, body), ["a", "c"]);
        assert_eq!(unused(&declared, body), ["unused"]);
    }
}
