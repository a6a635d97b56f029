//! Canned source layouts.

use std::fs;
use std::path::Path;

/// Write `module.py`, `module.pyc` and a `.gitignore` containing `*.pyc`
/// into `dir`.
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn python_module_source(dir: &Path) {
    fs::write(dir.join("module.py"), "")
        .unwrap_or_else(|e| panic!("python_module_source: failed to write module.py: {e}"));
    fs::write(dir.join("module.pyc"), "")
        .unwrap_or_else(|e| panic!("python_module_source: failed to write module.pyc: {e}"));
    fs::write(dir.join(".gitignore"), "*.pyc")
        .unwrap_or_else(|e| panic!("python_module_source: failed to write .gitignore: {e}"));
}

/// Write a small nested project into `dir`:
///
/// ```text
/// .gitignore        (# build output / *.log / target)
/// README.md
/// src/lib.py
/// src/pkg/mod.py
/// src/pkg/debug.log
/// target/out.bin
/// ```
///
/// # Panics
/// Panics if the filesystem operations fail.
pub fn nested_project_source(dir: &Path) {
    let files = [
        (".gitignore", "# build output\n*.log\n\ntarget\n"),
        ("README.md", "# project\n"),
        ("src/lib.py", "import pkg\n"),
        ("src/pkg/mod.py", "VALUE = 1\n"),
        ("src/pkg/debug.log", "noise\n"),
        ("target/out.bin", "\0\0\0"),
    ];
    for (rel, content) in files {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("nested_project_source: failed to create {}: {e}", parent.display())
            });
        }
        fs::write(&path, content).unwrap_or_else(|e| {
            panic!("nested_project_source: failed to write {}: {e}", path.display())
        });
    }
}
