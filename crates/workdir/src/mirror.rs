//! Make a target directory's contents match a source directory
//!
//! Paths are matched against exclusion patterns relative to the root being
//! walked, with `/` separators. Patterns are anchored at the start of the
//! path but not at the end, so `build` also excludes `build.log`. An excluded
//! directory is not descended into. Excluded entries are never copied and
//! never purged from the target.

use crate::{Error, Result, checksum, path};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Compiled exclusion patterns.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    patterns: Vec<Regex>,
}

impl Exclusions {
    /// Compile a list of regular expressions.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(&format!("^(?:{p})")).map_err(|source| Error::InvalidPattern {
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Whether a `/`-separated relative path matches any pattern.
    pub fn is_excluded(&self, relative: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(relative))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// What a mirror run changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Directories created in the target, the target itself included
    pub dirs_created: usize,
    /// Files that did not exist in the target
    pub files_copied: usize,
    /// Files rewritten because their content changed
    pub files_updated: usize,
    /// Target entries removed because the source no longer has them
    pub purged: usize,
    /// Source entries skipped by exclusion
    pub skipped: usize,
}

impl SyncReport {
    /// Whether the run left the target untouched.
    pub fn is_unchanged(&self) -> bool {
        self.dirs_created == 0
            && self.files_copied == 0
            && self.files_updated == 0
            && self.purged == 0
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} directories created, {} files copied, {} files updated, {} purged, {} skipped",
            self.dirs_created, self.files_copied, self.files_updated, self.purged, self.skipped
        )
    }
}

/// A configured mirror from `source` into `target`.
#[derive(Debug)]
pub struct Mirror<'a> {
    source: &'a Path,
    target: &'a Path,
    exclusions: &'a Exclusions,
    create: bool,
    purge: bool,
}

impl<'a> Mirror<'a> {
    /// Copy-and-purge into a target that must already exist.
    pub fn new(source: &'a Path, target: &'a Path, exclusions: &'a Exclusions) -> Self {
        Self {
            source,
            target,
            exclusions,
            create: false,
            purge: true,
        }
    }

    /// Create the target (and its parents) when it is missing.
    pub fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Remove target entries that are absent from the source.
    pub fn purge(mut self, purge: bool) -> Self {
        self.purge = purge;
        self
    }

    pub fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        self.check_source()?;
        if path::is_within(self.source, self.target) {
            return Err(Error::sync(
                self.source,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!(
                        "source lies within target {}; purging would destroy it",
                        self.target.display()
                    ),
                ),
            ));
        }
        self.prepare_target(&mut report)?;

        let nested = nested_target(self.source, self.target);
        let seen = self.copy_tree(nested.as_deref(), &mut report)?;
        if self.purge {
            self.purge_stale(&seen, &mut report)?;
        }

        tracing::info!("{}", report);
        Ok(report)
    }

    fn check_source(&self) -> Result<()> {
        let meta = fs::metadata(self.source).map_err(|e| Error::sync(self.source, e))?;
        if !meta.is_dir() {
            return Err(Error::sync(
                self.source,
                io::Error::new(io::ErrorKind::InvalidInput, "source is not a directory"),
            ));
        }
        Ok(())
    }

    fn prepare_target(&self, report: &mut SyncReport) -> Result<()> {
        match fs::metadata(self.target) {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(Error::sync(
                self.target,
                io::Error::new(io::ErrorKind::AlreadyExists, "target is not a directory"),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound && self.create => {
                tracing::debug!("creating {}", self.target.display());
                fs::create_dir_all(self.target).map_err(|e| Error::sync(self.target, e))?;
                report.dirs_created += 1;
                Ok(())
            }
            Err(e) => Err(Error::sync(self.target, e)),
        }
    }

    /// Copy new and changed entries, returning every relative path that
    /// survived exclusion.
    fn copy_tree(
        &self,
        nested: Option<&Path>,
        report: &mut SyncReport,
    ) -> Result<HashSet<PathBuf>> {
        let mut seen = HashSet::new();
        let mut walker = WalkDir::new(self.source)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| walk_error(e, self.source))?;
            let rel = relative(entry.path(), self.source)?;
            let is_dir = entry.file_type().is_dir();

            if nested == Some(rel) || self.exclusions.is_excluded(&path::to_slash(rel)) {
                tracing::debug!("excluding {}", path::to_slash(rel));
                report.skipped += 1;
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }

            let dest = self.target.join(rel);
            if is_dir {
                sync_dir(&dest, report)?;
            } else {
                sync_file(entry.path(), &dest, report)?;
            }
            seen.insert(rel.to_path_buf());
        }

        Ok(seen)
    }

    fn purge_stale(&self, seen: &HashSet<PathBuf>, report: &mut SyncReport) -> Result<()> {
        let mut stale = Vec::new();
        let mut walker = WalkDir::new(self.target)
            .min_depth(1)
            .follow_links(false)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|e| walk_error(e, self.target))?;
            let rel = relative(entry.path(), self.target)?;
            let is_dir = entry.file_type().is_dir();

            if self.exclusions.is_excluded(&path::to_slash(rel)) {
                if is_dir {
                    walker.skip_current_dir();
                }
                continue;
            }
            if !seen.contains(rel) {
                stale.push((entry.path().to_path_buf(), is_dir));
                if is_dir {
                    walker.skip_current_dir();
                }
            }
        }

        for (stale_path, is_dir) in stale {
            tracing::debug!("purging {}", stale_path.display());
            let removed = if is_dir {
                fs::remove_dir_all(&stale_path)
            } else {
                fs::remove_file(&stale_path)
            };
            removed.map_err(|e| Error::sync(&stale_path, e))?;
            report.purged += 1;
        }
        Ok(())
    }
}

fn relative<'p>(entry: &'p Path, root: &Path) -> Result<&'p Path> {
    entry.strip_prefix(root).map_err(|_| {
        Error::sync(
            entry,
            io::Error::other(format!("entry is outside {}", root.display())),
        )
    })
}

fn walk_error(err: walkdir::Error, root: &Path) -> Error {
    let at = err.path().unwrap_or(root).to_path_buf();
    Error::sync(at, io::Error::from(err))
}

/// The target's path relative to the source, when the target lies inside it.
fn nested_target(source: &Path, target: &Path) -> Option<PathBuf> {
    let source = dunce::canonicalize(source).ok()?;
    let target = dunce::canonicalize(target).ok()?;
    target
        .strip_prefix(&source)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .map(Path::to_path_buf)
}

fn sync_dir(dest: &Path, report: &mut SyncReport) -> Result<()> {
    match fs::symlink_metadata(dest) {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            tracing::debug!("replacing file {} with a directory", dest.display());
            fs::remove_file(dest).map_err(|e| Error::sync(dest, e))?;
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::sync(dest, e)),
    }
    fs::create_dir_all(dest).map_err(|e| Error::sync(dest, e))?;
    report.dirs_created += 1;
    Ok(())
}

fn sync_file(src: &Path, dest: &Path, report: &mut SyncReport) -> Result<()> {
    match fs::symlink_metadata(dest) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            copy(src, dest)?;
            report.files_copied += 1;
        }
        Err(e) => return Err(Error::sync(dest, e)),
        Ok(meta) if meta.is_dir() => {
            tracing::debug!("replacing directory {} with a file", dest.display());
            fs::remove_dir_all(dest).map_err(|e| Error::sync(dest, e))?;
            copy(src, dest)?;
            report.files_copied += 1;
        }
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::remove_file(dest).map_err(|e| Error::sync(dest, e))?;
            copy(src, dest)?;
            report.files_updated += 1;
        }
        Ok(meta) => {
            if needs_update(src, dest, &meta)? {
                copy(src, dest)?;
                report.files_updated += 1;
            }
        }
    }
    Ok(())
}

fn needs_update(src: &Path, dest: &Path, dest_meta: &fs::Metadata) -> Result<bool> {
    let src_meta = fs::metadata(src).map_err(|e| Error::sync(src, e))?;
    if src_meta.len() != dest_meta.len() {
        return Ok(true);
    }
    // Equal timestamps fall through to the content check
    let newer = match (src_meta.modified(), dest_meta.modified()) {
        (Ok(s), Ok(d)) => s >= d,
        // No timestamps on this platform: fall back to content
        _ => true,
    };
    if !newer {
        return Ok(false);
    }
    let same = checksum::same_content(src, dest).map_err(|e| Error::sync(src, e))?;
    Ok(!same)
}

fn copy(src: &Path, dest: &Path) -> Result<()> {
    tracing::debug!("copying {} to {}", src.display(), dest.display());
    fs::copy(src, dest).map_err(|e| Error::sync(dest, e))?;
    Ok(())
}
