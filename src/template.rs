//! Template descriptor plus the list-level helpers the front end needs.

use crate::engine::{ValidationError, VariableList};
use serde::{Deserialize, Serialize};

/// A stored prompt template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub body: String,
    #[serde(default)]
    pub variables: VariableList,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconKind>,
}

impl Template {
    /// Explicit icon, or the one implied by the category.
    pub fn icon(&self) -> IconKind {
        self.icon
            .unwrap_or_else(|| IconKind::for_category(&self.category))
    }
}

/// Known icon kinds. Resolved to a glyph only at display time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Bug,
    Code,
    Wrench,
    Database,
    Flask,
    #[default]
    Star,
}

impl IconKind {
    pub fn for_category(category: &str) -> Self {
        match category {
            "Debugging" => Self::Bug,
            "Learning" => Self::Code,
            "Refactoring" => Self::Wrench,
            "Database" => Self::Database,
            "Testing" => Self::Flask,
            _ => Self::Star,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Bug => "🐞",
            Self::Code => "⌨",
            Self::Wrench => "🔧",
            Self::Database => "🛢",
            Self::Flask => "⚗",
            Self::Star => "★",
        }
    }
}

/// Fields for a template that has not been assigned an id yet.
#[derive(Clone, Debug, Default)]
pub struct Draft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub body: String,
    pub variables: VariableList,
    pub favorite: bool,
    pub icon: Option<IconKind>,
}

impl Draft {
    pub fn into_template(self, id: u64) -> Result<Template, ValidationError> {
        check_title(&self.title)?;
        check_body(&self.body)?;
        Ok(Template {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            body: self.body,
            variables: self.variables,
            favorite: self.favorite,
            icon: self.icon,
        })
    }
}

/// Partial update; `None` leaves a field untouched. The id is never patched.
#[derive(Clone, Debug, Default)]
pub struct Patch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub body: Option<String>,
    pub favorite: Option<bool>,
    pub icon: Option<IconKind>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.body.is_none()
            && self.favorite.is_none()
            && self.icon.is_none()
    }

    /// Apply to `tpl`; on error `tpl` is left unchanged.
    pub fn apply(self, tpl: &mut Template) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            check_title(title)?;
        }
        if let Some(body) = &self.body {
            check_body(body)?;
        }
        if let Some(title) = self.title {
            tpl.title = title;
        }
        if let Some(description) = self.description {
            tpl.description = description;
        }
        if let Some(category) = self.category {
            tpl.category = category;
        }
        if let Some(body) = self.body {
            tpl.body = body;
        }
        if let Some(favorite) = self.favorite {
            tpl.favorite = favorite;
        }
        if let Some(icon) = self.icon {
            tpl.icon = Some(icon);
        }
        Ok(())
    }
}

fn check_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

fn check_body(body: &str) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        return Err(ValidationError::EmptyBody);
    }
    Ok(())
}

/// List filter: every set criterion must match.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Case-insensitive substring of title, description or any variable name.
    pub query: Option<String>,
    /// Exact category label.
    pub category: Option<String>,
    pub favorites_only: bool,
}

impl Filter {
    pub fn matches(&self, tpl: &Template) -> bool {
        let matches_query = self.query.as_deref().is_none_or(|q| {
            let q = q.to_lowercase();
            tpl.title.to_lowercase().contains(&q)
                || tpl.description.to_lowercase().contains(&q)
                || tpl.variables.iter().any(|v| v.to_lowercase().contains(&q))
        });

        let matches_category = self
            .category
            .as_deref()
            .is_none_or(|c| tpl.category == c);

        matches_query && matches_category && (!self.favorites_only || tpl.favorite)
    }
}

/// Distinct categories in first-seen order.
pub fn categories(templates: &[Template]) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for tpl in templates {
        if !out.contains(&tpl.category.as_str()) {
            out.push(&tpl.category);
        }
    }
    out
}
