//! Template collection and its persistence backends.

pub mod file;
pub mod seed;

use crate::engine::ValidationError;
use crate::template::{Draft, Filter, Patch, Template};
use anyhow::Result;
use thiserror::Error;
use tracing::debug;

pub use file::FileStore;

/// Whole-collection persistence. The collection is always replaced at once.
pub trait TemplateStore {
    fn load(&self) -> Result<Vec<Template>>;
    fn save(&mut self, templates: &[Template]) -> Result<()>;
}

/// Keeps the collection in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    templates: Vec<Template>,
}

impl MemoryStore {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self) -> Result<Vec<Template>> {
        Ok(self.templates.clone())
    }

    fn save(&mut self, templates: &[Template]) -> Result<()> {
        self.templates = templates.to_vec();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LibraryError {
    #[error("Template not found: {0}")]
    NotFound(u64),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// The in-memory template collection, backed by an injected store.
pub struct Library<S: TemplateStore> {
    store: S,
    templates: Vec<Template>,
    dirty: bool,
}

impl<S: TemplateStore> Library<S> {
    pub fn open(store: S) -> Result<Self> {
        let templates = store.load()?;
        debug!(count = templates.len(), "library loaded");
        Ok(Self {
            store,
            templates,
            dirty: false,
        })
    }

    pub fn list(&self) -> &[Template] {
        &self.templates
    }

    pub fn filter<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a Template> + 'a {
        self.templates.iter().filter(move |t| filter.matches(t))
    }

    pub fn categories(&self) -> Vec<&str> {
        crate::template::categories(&self.templates)
    }

    pub fn get(&self, id: u64) -> Result<&Template, LibraryError> {
        self.templates
            .iter()
            .find(|t| t.id == id)
            .ok_or(LibraryError::NotFound(id))
    }

    /// Append a new template with id `max(ids) + 1`.
    pub fn create(&mut self, draft: Draft) -> Result<&Template, LibraryError> {
        let id = self.templates.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let tpl = draft.into_template(id)?;
        debug!(id, title = %tpl.title, "template created");
        self.templates.push(tpl);
        self.dirty = true;
        Ok(&self.templates[self.templates.len() - 1])
    }

    pub fn update(&mut self, id: u64, patch: Patch) -> Result<&Template, LibraryError> {
        let tpl = self.get_mut(id)?;
        patch.apply(tpl)?;
        self.dirty = true;
        self.get(id)
    }

    /// Remove the template; the others keep their relative order.
    pub fn delete(&mut self, id: u64) -> Result<Template, LibraryError> {
        let idx = self.position(id)?;
        self.dirty = true;
        Ok(self.templates.remove(idx))
    }

    /// Flip the favorite flag and return the new value.
    pub fn toggle_favorite(&mut self, id: u64) -> Result<bool, LibraryError> {
        let tpl = self.get_mut(id)?;
        tpl.favorite = !tpl.favorite;
        let now = tpl.favorite;
        self.dirty = true;
        Ok(now)
    }

    pub fn add_variable(&mut self, id: u64, name: &str) -> Result<(), LibraryError> {
        self.get_mut(id)?.variables.add(name)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_variable(&mut self, id: u64, index: usize) -> Result<String, LibraryError> {
        let removed = self.get_mut(id)?.variables.remove(index)?;
        self.dirty = true;
        Ok(removed)
    }

    /// Persist the collection if anything changed since it was loaded.
    pub fn commit(&mut self) -> Result<()> {
        if !self.dirty {
            debug!("library unchanged; skipping save");
            return Ok(());
        }
        self.store.save(&self.templates)?;
        self.dirty = false;
        Ok(())
    }

    fn position(&self, id: u64) -> Result<usize, LibraryError> {
        self.templates
            .iter()
            .position(|t| t.id == id)
            .ok_or(LibraryError::NotFound(id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Template, LibraryError> {
        let idx = self.position(id)?;
        Ok(&mut self.templates[idx])
    }
}
