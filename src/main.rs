//! `promptdeck` — manage prompt templates with `{{variable}}` placeholders.
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::{collections::HashMap, path::PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod ctx;
mod engine;
mod import;
mod store;
mod template;
mod util;
mod view;

use config::Settings;
use ctx::Ctx;
use engine::VariableList;
use store::{FileStore, Library, MemoryStore, TemplateStore};
use template::{Draft, Filter, IconKind, Patch};

#[derive(Parser)]
#[command(name = "promptdeck", about = "Prompt template manager")]
struct Cli {
    /// Template store file (overrides config.toml)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Work on the built-in templates in memory; nothing is saved
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    plain: bool,

    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List templates, optionally filtered
    List {
        /// Case-insensitive match on title, description or variable names
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        favorites: bool,
    },

    /// List categories in use
    Categories,

    /// Show a template with its placeholders highlighted
    Show { id: u64 },

    /// Create a template
    New {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "General")]
        category: String,
        /// Template body; defaults to one placeholder per declared variable
        #[arg(long, required_unless_present = "vars")]
        body: Option<String>,
        /// Declare a variable (repeatable)
        #[arg(long = "var")]
        vars: Vec<String>,
        #[arg(long, value_enum)]
        icon: Option<IconKind>,
        #[arg(long)]
        favorite: bool,
    },

    /// Edit fields, variables or the body of a template
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        body: Option<String>,
        #[arg(long, value_enum)]
        icon: Option<IconKind>,
        /// Declare a variable (repeatable)
        #[arg(long = "add-var")]
        add_vars: Vec<String>,
        /// Drop the variable at this index of the current list (repeatable)
        #[arg(long = "remove-var")]
        remove_vars: Vec<usize>,
        /// Insert `{{NAME}}` into the body at `--at`
        #[arg(long, value_name = "NAME", requires = "at")]
        insert: Option<String>,
        /// Char offset for `--insert`
        #[arg(long, requires = "insert")]
        at: Option<usize>,
        /// End of a char range replaced by `--insert`
        #[arg(long, requires = "insert")]
        to: Option<usize>,
    },

    /// Delete a template
    Delete { id: u64 },

    /// Toggle the favorite flag
    Fav { id: u64 },

    /// Compare declared variables with the placeholders in the body
    Vars { id: u64 },

    /// Fill a template's placeholders and print the result
    Render {
        id: u64,
        /// NAME=VALUE (repeatable)
        #[arg(long = "set", value_parser = util::parse_assignment)]
        set: Vec<(String, String)>,
        /// Fill unset variables with sample values
        #[arg(long)]
        sample: bool,
    },

    /// Render an ad-hoc body without touching the store
    Preview {
        #[arg(long)]
        body: String,
        /// NAME=VALUE (repeatable)
        #[arg(long = "set", value_parser = util::parse_assignment)]
        set: Vec<(String, String)>,
        /// Fill unset placeholders with sample values
        #[arg(long)]
        sample: bool,
    },

    /// Create templates from *.prompt / *.txt files under a directory
    Import {
        dir: PathBuf,
        /// Category for every imported template (default: parent dir name)
        #[arg(long)]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.plain {
        colored::control::set_override(false);
    }

    // Only the config file and the default store path depend on $HOME.
    let ctx = Ctx::new();
    let settings = load_settings(ctx.as_ref().ok())?;

    if cli.ephemeral {
        let seeds = store::seed::builtin().context("build built-in templates")?;
        let store = MemoryStore::new(seeds);
        let mut lib = Library::open(store).context("open library")?;
        return run(&mut lib, cli.cmd, &settings);
    }

    let path = store_path(cli.store, &settings, ctx)?;
    let store = FileStore::new(path, settings.seed_builtin);
    debug!(store = %store.path().display(), "using file store");

    let mut lib = Library::open(store).context("open library")?;
    run(&mut lib, cli.cmd, &settings)
}

fn load_settings(ctx: Option<&Ctx>) -> Result<Settings> {
    let Some(ctx) = ctx else {
        debug!("no config directory; using default settings");
        return Ok(Settings::default());
    };
    debug!(config = %ctx.config_dir.display(), data = %ctx.data_dir.display(), "paths resolved");
    Settings::load(&ctx.config_file).context("load settings")
}

/// `--store`, then `store` from config.toml, then the data dir default.
fn store_path(cli_store: Option<PathBuf>, settings: &Settings, ctx: Result<Ctx>) -> Result<PathBuf> {
    if let Some(path) = cli_store.or_else(|| settings.store.clone()) {
        return Ok(path);
    }
    Ok(ctx.context("resolve default store path")?.store_file)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run<S: TemplateStore>(lib: &mut Library<S>, cmd: Cmd, settings: &Settings) -> Result<()> {
    match cmd {
        Cmd::List {
            search,
            category,
            favorites,
        } => {
            let filter = Filter {
                query: search,
                category,
                favorites_only: favorites,
            };
            let mut shown = 0;
            for tpl in lib.filter(&filter) {
                println!("{}", view::row(tpl));
                shown += 1;
            }
            if shown == 0 {
                println!("No templates found.");
            }
            Ok(())
        }

        Cmd::Categories => {
            for category in lib.categories() {
                println!("{category}");
            }
            Ok(())
        }

        Cmd::Show { id } => {
            println!("{}", view::detail(lib.get(id)?));
            Ok(())
        }

        Cmd::New {
            title,
            description,
            category,
            body,
            vars,
            icon,
            favorite,
        } => {
            let variables = declare(&vars)?;
            let body = body.unwrap_or_else(|| engine::placeholders_body(variables.as_slice()));
            let draft = Draft {
                title,
                description,
                category,
                body,
                variables,
                favorite,
                icon,
            };
            let id = lib.create(draft)?.id;
            lib.commit().context("save templates")?;
            println!("Created template #{id}");
            Ok(())
        }

        Cmd::Edit {
            id,
            title,
            description,
            category,
            body,
            icon,
            add_vars,
            remove_vars,
            insert,
            at,
            to,
        } => {
            cmd_edit(
                lib,
                id,
                Patch {
                    title,
                    description,
                    category,
                    body,
                    favorite: None,
                    icon,
                },
                VarEdits {
                    add: add_vars,
                    remove: remove_vars,
                    insert: insert.map(|name| (name, at.unwrap_or(0), to)),
                },
            )?;
            println!("{}", view::detail(lib.get(id)?));
            Ok(())
        }

        Cmd::Delete { id } => {
            let removed = lib.delete(id)?;
            lib.commit().context("save templates")?;
            println!("Deleted template #{id} ({})", removed.title);
            Ok(())
        }

        Cmd::Fav { id } => {
            let now = lib.toggle_favorite(id)?;
            lib.commit().context("save templates")?;
            let verb = if now { "Added to" } else { "Removed from" };
            println!("{verb} favorites: #{id}");
            Ok(())
        }

        Cmd::Vars { id } => {
            let tpl = lib.get(id)?;
            let declared = tpl.variables.as_slice();
            let report = [
                ("declared", declared.to_vec()),
                ("in body", engine::extract_variables(&tpl.body)),
                ("undeclared", engine::undeclared(declared, &tpl.body)),
                ("unused", engine::unused(declared, &tpl.body)),
                ("effective", engine::effective_variables(declared, &tpl.body)),
            ];
            for (label, names) in report {
                println!("{label:<11}{}", names.join(", "));
            }
            Ok(())
        }

        Cmd::Render { id, set, sample } => {
            let tpl = lib.get(id)?;
            let names = engine::effective_variables(tpl.variables.as_slice(), &tpl.body);
            let values = fill_values(&names, set, sample || settings.render.fill_samples);
            println!("{}", render_checked(&tpl.body, &values));
            Ok(())
        }

        Cmd::Preview { body, set, sample } => {
            let names = engine::extract_variables(&body);
            let values = fill_values(&names, set, sample || settings.render.fill_samples);
            println!("{}", render_checked(&body, &values));
            Ok(())
        }

        Cmd::Import { dir, category } => {
            let drafts = import::import_dir(&dir, category.as_deref())
                .with_context(|| format!("import {}", dir.display()))?;
            let count = drafts.len();
            for draft in drafts {
                let tpl = lib.create(draft)?;
                println!("Imported #{} {}", tpl.id, tpl.title);
            }
            lib.commit().context("save templates")?;
            info!(count, dir = %dir.display(), "import finished");
            Ok(())
        }
    }
}

#[derive(Default)]
struct VarEdits {
    add: Vec<String>,
    /// Indices into the list as it was before this edit.
    remove: Vec<usize>,
    /// Name, start, optional end of the replaced range.
    insert: Option<(String, usize, Option<usize>)>,
}

/// Apply field, body and variable edits in that order, then save. Nothing is
/// saved if any step fails.
fn cmd_edit<S: TemplateStore>(
    lib: &mut Library<S>,
    id: u64,
    patch: Patch,
    edits: VarEdits,
) -> Result<()> {
    if !patch.is_empty() {
        lib.update(id, patch)?;
    }

    if let Some((name, start, end)) = edits.insert {
        let tpl = lib.get(id)?;
        if !tpl.variables.contains(&name) && !edits.add.contains(&name) {
            warn!(variable = %name, "inserting a placeholder that is not declared");
        }
        let (body, cursor) =
            engine::insert_placeholder(&tpl.body, start, end.unwrap_or(start), &name);
        debug!(cursor, "placeholder inserted");
        lib.update(
            id,
            Patch {
                body: Some(body),
                ..Patch::default()
            },
        )?;
    }

    let mut remove = edits.remove;
    remove.sort_unstable_by(|a, b| b.cmp(a));
    remove.dedup();
    for index in remove {
        let name = lib.remove_variable(id, index)?;
        debug!(variable = %name, index, "variable removed");
    }

    for name in &edits.add {
        lib.add_variable(id, name)
            .with_context(|| format!("add variable '{name}'"))?;
    }

    lib.commit().context("save templates")
}

/// Build a variable list from CLI names, reporting the first invalid one.
fn declare(names: &[String]) -> Result<VariableList> {
    let mut vars = VariableList::new();
    for name in names {
        vars.add(name)
            .with_context(|| format!("declare variable '{name}'"))?;
    }
    Ok(vars)
}

/// Supplied values, topped up with sample values when `sample` is set.
///
/// With `sample`, an empty supplied value also falls back to the sample.
fn fill_values(
    names: &[String],
    set: Vec<(String, String)>,
    sample: bool,
) -> HashMap<String, String> {
    let given = util::values_map(set);
    if !sample {
        return given;
    }
    engine::sync_samples(names, &given)
}

fn render_checked(body: &str, values: &HashMap<String, String>) -> String {
    let missing = engine::unresolved(body, values);
    if !missing.is_empty() {
        warn!(missing = %missing.join(", "), "placeholders left unfilled");
    }
    engine::render(body, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn library() -> Library<MemoryStore> {
        Library::open(MemoryStore::new(store::seed::builtin().unwrap())).unwrap()
    }

    fn names<S: TemplateStore>(lib: &Library<S>, id: u64) -> Vec<String> {
        lib.get(id).unwrap().variables.as_slice().to_vec()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn new_needs_a_body_or_a_variable() {
        assert!(Cli::try_parse_from(["promptdeck", "new", "--title", "X"]).is_err());
        assert!(Cli::try_parse_from(["promptdeck", "new", "--title", "X", "--var", "a"]).is_ok());
        assert!(Cli::try_parse_from(["promptdeck", "new", "--title", "X", "--body", "b"]).is_ok());
    }

    #[test]
    fn remove_indices_refer_to_the_original_list() {
        let mut lib = library();
        let edits = VarEdits {
            remove: vec![0, 2, 0],
            ..VarEdits::default()
        };
        cmd_edit(&mut lib, 1, Patch::default(), edits).unwrap();
        assert_eq!(names(&lib, 1), ["error"]);
    }

    #[test]
    fn insert_then_remove_then_add() {
        let mut lib = library();
        let edits = VarEdits {
            add: vec!["stack".into()],
            remove: vec![0],
            insert: Some(("stack".into(), 0, None)),
        };
        cmd_edit(&mut lib, 1, Patch::default(), edits).unwrap();

        let tpl = lib.get(1).unwrap();
        assert!(tpl.body.starts_with("{{stack}}I need help debugging"));
        assert_eq!(names(&lib, 1), ["error", "context", "stack"]);
    }

    #[test]
    fn failed_edit_saves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.toml");
        FileStore::new(&path, false)
            .save(&store::seed::builtin().unwrap())
            .unwrap();

        let mut lib = Library::open(FileStore::new(&path, false)).unwrap();
        let patch = Patch {
            title: Some("Renamed".into()),
            ..Patch::default()
        };
        let edits = VarEdits {
            add: vec!["code".into()],
            ..VarEdits::default()
        };
        assert!(cmd_edit(&mut lib, 1, patch, edits).is_err());

        let reopened = Library::open(FileStore::new(&path, false)).unwrap();
        let tpl = reopened.get(1).unwrap();
        assert_eq!(tpl.title, "Debug Code");
        assert_eq!(names(&reopened, 1), ["code", "error", "context"]);
    }

    #[test]
    fn empty_value_falls_back_to_sample_only_when_sampling() {
        let names = ["code".to_owned()];
        let set = || vec![("code".to_owned(), String::new())];

        let sampled = fill_values(&names, set(), true);
        assert_eq!(sampled["code"], engine::sample_value("code"));

        let plain = fill_values(&names, set(), false);
        assert_eq!(plain["code"], "");
    }

    #[test]
    fn sampling_keeps_supplied_values() {
        let names = ["code".to_owned(), "language".to_owned()];
        let values = fill_values(&names, vec![("code".into(), "x = 1".into())], true);
        assert_eq!(values["code"], "x = 1");
        assert_eq!(values["language"], "JavaScript");
    }

    #[test]
    fn render_checked_leaves_missing_placeholders() {
        let values = fill_values(&[], vec![("a".into(), "1".into())], false);
        assert_eq!(render_checked("{{a}} {{b}}", &values), "1 {{b}}");
    }

    #[test]
    fn settings_default_without_a_config_dir() {
        assert_eq!(load_settings(None).unwrap(), Settings::default());
    }

    #[test]
    fn explicit_store_needs_no_home() {
        let no_home = || Err(anyhow::anyhow!("$HOME is not set"));
        let settings = Settings::default();

        let path = store_path(Some("/tmp/t.toml".into()), &settings, no_home()).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/t.toml"));

        let configured = Settings {
            store: Some("/srv/prompts.toml".into()),
            ..Settings::default()
        };
        let path = store_path(None, &configured, no_home()).unwrap();
        assert_eq!(path, PathBuf::from("/srv/prompts.toml"));

        assert!(store_path(None, &settings, no_home()).is_err());
    }

    #[test]
    fn default_store_lives_in_the_data_dir() {
        let ctx = Ctx::at("/c".into(), "/d".into());
        let path = store_path(None, &Settings::default(), Ok(ctx)).unwrap();
        assert_eq!(path, PathBuf::from("/d/promptdeck/templates.toml"));
    }
}
