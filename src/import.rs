//! Bulk import of prompt files from a directory tree.

use crate::engine::{VariableList, extract_variables};
use crate::template::Draft;
use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, warn};
use walkdir::WalkDir;

const EXTENSIONS: [&str; 2] = ["prompt", "txt"];
const FALLBACK_CATEGORY: &str = "Imported";

/// Build one draft per prompt file under `dir`, in path order.
///
/// Variables are whatever placeholders the file body uses. The category is
/// `category` when given, else the file's parent directory name. Blank files
/// are skipped.
pub fn import_dir(dir: &Path, category: Option<&str>) -> Result<Vec<Draft>> {
    if !dir.is_dir() {
        bail!("import directory not found: {}", dir.display());
    }

    let mut drafts = Vec::new();
    for path in prompt_files(dir) {
        let body = fs::read_to_string(&path)
            .with_context(|| format!("read prompt {}", path.display()))?;
        if body.trim().is_empty() {
            warn!(path = %path.display(), "skipping empty prompt file");
            continue;
        }
        let draft = Draft {
            title: title_from(&path),
            category: category
                .map(str::to_owned)
                .unwrap_or_else(|| category_from(dir, &path)),
            variables: declared_from(&body)?,
            body,
            ..Draft::default()
        };
        debug!(path = %path.display(), title = %draft.title, "prompt file read");
        drafts.push(draft);
    }
    Ok(drafts)
}

/// Walk `dir` and return all prompt files, sorted.
fn prompt_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| {
            e.file_type().is_file()
                && e.path()
                    .extension()
                    .and_then(|x| x.to_str())
                    .is_some_and(|x| EXTENSIONS.contains(&x))
        })
        .map(|e| e.into_path())
        .collect()
}

/// Placeholders in `body`, minus whitespace-only names like `{{ }}`.
fn declared_from(body: &str) -> Result<VariableList> {
    let names: Vec<String> = extract_variables(body)
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .collect();
    Ok(VariableList::try_from(names)?)
}

/// `fix_null-deref.prompt` → `fix null deref`.
fn title_from(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_default()
}

/// Name of the directory holding `path`, unless that is the import root.
fn category_from(root: &Path, path: &Path) -> String {
    path.parent()
        .filter(|p| *p != root)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_owned())
}
