//! Built-in templates written to a fresh store.

use crate::engine::{ValidationError, VariableList};
use crate::template::Template;

struct Seed {
    title: &'static str,
    description: &'static str,
    category: &'static str,
    variables: &'static [&'static str],
    favorite: bool,
    body: &'static str,
}

const SEEDS: &[Seed] = &[
    Seed {
        title: "Debug Code",
        description: "Analyze and fix bugs in your code",
        category: "Debugging",
        variables: &["code", "error", "context"],
        favorite: true,
        body: "I need help debugging the following code:

{{code}}

I'm getting this error:
{{error}}

Additional context:
{{context}}

Please explain what's wrong and how to fix it.",
    },
    Seed {
        title: "Explain Code",
        description: "Get a detailed explanation of code functionality",
        category: "Learning",
        variables: &["code", "language"],
        favorite: false,
        body: "Please explain the following code in detail:

{{code}}

Programming language: {{language}}

I'd like to understand:
1. What this code does
2. How it works step by step
3. Any patterns or techniques used
4. Potential improvements or optimizations",
    },
    Seed {
        title: "Refactor React Component",
        description: "Improve and optimize React components",
        category: "Refactoring",
        variables: &["component", "objective"],
        favorite: true,
        body: "Please help me refactor this React component:

{{component}}

My objective is to: {{objective}}

Please provide the refactored code with explanations of what you changed and why.",
    },
    Seed {
        title: "Optimize SQL Query",
        description: "Improve performance of database queries",
        category: "Database",
        variables: &["query", "database_type", "constraints"],
        favorite: false,
        body: "I need help optimizing this SQL query:

{{query}}

Database: {{database_type}}

Additional constraints or requirements:
{{constraints}}

Please provide an optimized version of this query with explanations of the changes made and why they improve performance.",
    },
    Seed {
        title: "Generate Unit Tests",
        description: "Create comprehensive unit tests for your code",
        category: "Testing",
        variables: &["code", "framework", "coverage_level"],
        favorite: false,
        body: "Please generate unit tests for the following code:

{{code}}

Testing framework: {{framework}}
Desired coverage level: {{coverage_level}}

Please include tests for edge cases and error conditions.",
    },
];

/// The built-in templates with ids `1..=5`.
pub fn builtin() -> Result<Vec<Template>, ValidationError> {
    SEEDS
        .iter()
        .zip(1..)
        .map(|(s, id)| {
            let names: Vec<String> = s.variables.iter().map(|v| v.to_string()).collect();
            Ok(Template {
                id,
                title: s.title.to_owned(),
                description: s.description.to_owned(),
                category: s.category.to_owned(),
                body: s.body.to_owned(),
                variables: VariableList::try_from(names)?,
                favorite: s.favorite,
                icon: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{extract_variables, unused};

    #[test]
    fn seeds_declare_exactly_their_placeholders() {
        for tpl in builtin().unwrap() {
            assert_eq!(
                extract_variables(&tpl.body),
                tpl.variables.as_slice(),
                "{}",
                tpl.title
            );
            assert!(unused(tpl.variables.as_slice(), &tpl.body).is_empty());
        }
    }

    #[test]
    fn seeds_pass_template_validation() {
        for tpl in builtin().unwrap() {
            let draft = crate::template::Draft {
                title: tpl.title.clone(),
                body: tpl.body.clone(),
                variables: tpl.variables.clone(),
                ..Default::default()
            };
            assert!(draft.into_template(tpl.id).is_ok(), "{}", tpl.title);
        }
    }

    #[test]
    fn seed_ids_are_sequential() {
        let ids: Vec<u64> = builtin().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, [1, 2, 3, 4, 5]);
    }
}
