//! TOML-file store with atomic temp-file → rename saves.

use super::{TemplateStore, seed};
use crate::template::Template;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tempfile::Builder;
use tracing::{debug, info};

/// On-disk layout: a single `[[templates]]` array.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    templates: Vec<Template>,
}

#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    seed_builtin: bool,
}

impl FileStore {
    /// `seed_builtin` decides what a missing file loads as: the built-in
    /// templates, or nothing.
    pub fn new(path: impl Into<PathBuf>, seed_builtin: bool) -> Self {
        Self {
            path: path.into(),
            seed_builtin,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TemplateStore for FileStore {
    fn load(&self) -> Result<Vec<Template>> {
        let src = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), seeded = self.seed_builtin, "store file absent");
                if !self.seed_builtin {
                    return Ok(Vec::new());
                }
                return seed::builtin().context("build built-in templates");
            }
            Err(e) => return Err(e).with_context(|| format!("read {}", self.path.display())),
        };

        let file: StoreFile =
            toml::from_str(&src).with_context(|| format!("parse {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = file.templates.len(), "store loaded");
        Ok(file.templates)
    }

    /// Write to a temp file beside the target, fsync, then rename over it.
    fn save(&mut self, templates: &[Template]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;

        let doc = StoreFile {
            templates: templates.to_vec(),
        };
        let text = toml::to_string(&doc).context("serialize templates")?;

        let mut tmp = Builder::new()
            .prefix(".templates.")
            .suffix(".toml")
            .tempfile_in(dir)
            .context("create temp store file")?;
        tmp.write_all(text.as_bytes())
            .context("write temp store file")?;
        tmp.as_file().sync_all().context("sync temp store file")?;

        // Same directory, same filesystem: the rename is atomic.
        tmp.persist(&self.path)
            .with_context(|| format!("rename temp file -> {}", self.path.display()))?;

        info!(path = %self.path.display(), count = templates.len(), "store saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::VariableList;
    use crate::template::IconKind;

    #[test]
    fn missing_file_loads_seed_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.toml");

        assert_eq!(FileStore::new(&path, true).load().unwrap().len(), 5);
        assert!(FileStore::new(&path, false).load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/templates.toml");

        let mut templates = seed::builtin().unwrap();
        templates.push(Template {
            id: 9,
            title: "Quotes \"and\" 'ticks'".into(),
            description: String::new(),
            category: "Misc".into(),
            body: "line one\n\ttabbed {{x}}\n''' triple '''\n\"\"\" too".into(),
            variables: VariableList::try_from(vec!["x".to_owned(), "y z".to_owned()]).unwrap(),
            favorite: true,
            icon: Some(IconKind::Wrench),
        });

        let mut store = FileStore::new(&path, false);
        store.save(&templates).unwrap();
        assert_eq!(store.load().unwrap(), templates);
    }

    #[test]
    fn save_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.toml");
        let mut store = FileStore::new(&path, false);

        store.save(&seed::builtin().unwrap()).unwrap();
        store.save(&seed::builtin().unwrap()[..2]).unwrap();
        assert_eq!(store.load().unwrap().len(), 2);

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name() != "templates.toml")
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn empty_collection_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("t.toml"), true);
        store.save(&[]).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn duplicate_variables_on_disk_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.toml");
        fs::write(
            &path,
            "[[templates]]\nid = 1\ntitle = \"t\"\nbody = \"\"\nvariables = [\"a\", \"a\"]\n",
        )
        .unwrap();
        assert!(FileStore::new(&path, false).load().is_err());
    }
}
