//! `.gitignore` lines as exclusion patterns
//!
//! Only literal characters, dots and `*` wildcards are understood. Negation
//! (`!`), directory-only markers (trailing `/`), anchoring (leading `/`) and
//! `**` pass through the translation literally and will not behave the way
//! git treats them.

use crate::{Error, Result};
use std::path::Path;

/// Name of the ignore file read from the sync source root.
pub const GITIGNORE: &str = ".gitignore";

/// Turn one `.gitignore` entry into a regular expression.
///
/// Surrounding whitespace is trimmed, `.` is escaped and `*` becomes `.*`.
/// Blank and comment lines are the caller's responsibility.
pub fn gitignore_entry_to_regex(entry: &str) -> String {
    entry.trim().replace('.', r"\.").replace('*', ".*")
}

/// Whether a line carries a pattern rather than a comment or nothing.
pub fn is_pattern_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && !line.starts_with('#')
}

/// Translate every pattern line of ignore-file content, in order.
pub fn parse_gitignore(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| is_pattern_line(line))
        .map(gitignore_entry_to_regex)
        .collect()
}

/// Read `dir/.gitignore` and translate its pattern lines.
///
/// A missing file yields no patterns.
pub fn read_gitignore(dir: &Path) -> Result<Vec<String>> {
    let ignore_path = dir.join(GITIGNORE);
    if !ignore_path.is_file() {
        return Ok(Vec::new());
    }
    let content =
        std::fs::read_to_string(&ignore_path).map_err(|e| Error::sync(&ignore_path, e))?;
    Ok(parse_gitignore(&content))
}
