//! Small helpers shared by the command handlers.

use anyhow::{Result, bail};
use std::collections::HashMap;

/// Parse a `name=value` argument. Only the first `=` splits; the value may be
/// empty or contain further `=` signs.
pub fn parse_assignment(arg: &str) -> Result<(String, String)> {
    match arg.split_once('=') {
        Some((name, _)) if name.is_empty() => bail!("missing variable name in '{arg}'"),
        Some((name, value)) => Ok((name.to_owned(), value.to_owned())),
        None => bail!("expected NAME=VALUE, got '{arg}'"),
    }
}

/// Collect `--set` pairs; a later assignment to the same name wins.
pub fn values_map(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    pairs.into_iter().collect()
}
