//! Tests for populating the working directory from a source tree

use pretty_assertions::assert_eq;
use std::fs;
use workdir::{Error, Options, SyncArgs, Workdir};
use workdir_test_utils::fixtures::{nested_project_source, python_module_source};
use workdir_test_utils::{TestTree, listing};

/// A source tree and a separate, not yet existing, target.
fn setup() -> (TestTree, TestTree, Workdir) {
    let source = TestTree::new();
    let scratch = TestTree::new();
    let wd = Workdir::new(
        Options::new()
            .with_path(scratch.path("work"))
            .unwrap()
            .with_sourcedir(source.root()),
    );
    (source, scratch, wd)
}

mod gitignore {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn honored_by_default() {
        let (source, scratch, wd) = setup();
        python_module_source(source.root());
        scratch.assert_file_not_exists("work");

        wd.sync(SyncArgs::new()).unwrap();

        assert!(scratch.path("work/module.py").is_file());
        scratch.assert_file_not_exists("work/module.pyc");
    }

    #[test]
    fn ignored_when_disabled_per_call() {
        let (source, scratch, wd) = setup();
        python_module_source(source.root());

        wd.sync(SyncArgs::new().exclude_gitignore_entries(false))
            .unwrap();

        assert!(scratch.path("work/module.py").is_file());
        assert!(scratch.path("work/module.pyc").is_file());
    }

    #[test]
    fn ignored_when_disabled_in_options() {
        let (source, scratch, mut wd) = setup();
        python_module_source(source.root());
        wd.options_mut().sync_exclude_gitignore_entries = false;

        wd.sync(SyncArgs::new()).unwrap();

        assert!(scratch.path("work/module.pyc").is_file());
    }

    #[test]
    fn per_call_override_beats_options() {
        let (source, scratch, mut wd) = setup();
        python_module_source(source.root());
        wd.options_mut().sync_exclude_gitignore_entries = false;

        wd.sync(SyncArgs::new().exclude_gitignore_entries(true))
            .unwrap();

        scratch.assert_file_not_exists("work/module.pyc");
    }

    #[test]
    fn nested_project_listing() {
        let (source, scratch, wd) = setup();
        nested_project_source(source.root());

        let report = wd.sync(SyncArgs::new()).unwrap();

        insta::assert_snapshot!(listing(&scratch.path("work")).join("\n"), @r"
        .gitignore
        README.md
        src/
        src/lib.py
        src/pkg/
        src/pkg/mod.py
        ");
        assert_eq!(report.files_copied, 4);
        // src/pkg/debug.log and the target/ directory
        assert_eq!(report.skipped, 2);
    }
}

mod explicit_patterns {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn explicit_pattern_without_gitignore() {
        let (source, scratch, wd) = setup();
        python_module_source(source.root());

        wd.sync(
            SyncArgs::new()
                .exclude_gitignore_entries(false)
                .exclude_regex_list([r".*\.py$"]),
        )
        .unwrap();

        scratch.assert_file_not_exists("work/module.py");
        assert!(scratch.path("work/module.pyc").is_file());
    }

    #[test]
    fn stored_list_used_when_none_given() {
        let (source, scratch, mut wd) = setup();
        source.file("keep.txt", "k").file("drop.tmp", "d");
        wd.options_mut()
            .sync_exclude_regex_list
            .push(r".*\.tmp".into());

        wd.sync(SyncArgs::new()).unwrap();

        assert!(scratch.path("work/keep.txt").is_file());
        scratch.assert_file_not_exists("work/drop.tmp");
    }

    #[test]
    fn empty_list_falls_back_to_stored_list() {
        let (source, scratch, mut wd) = setup();
        source.file("drop.tmp", "d");
        wd.options_mut()
            .sync_exclude_regex_list
            .push(r".*\.tmp".into());

        wd.sync(SyncArgs::new().exclude_regex_list(Vec::<String>::new()))
            .unwrap();

        scratch.assert_file_not_exists("work/drop.tmp");
    }

    #[test]
    fn stored_list_is_not_extended_by_gitignore() {
        let (source, _scratch, mut wd) = setup();
        python_module_source(source.root());
        wd.options_mut().sync_exclude_regex_list = vec!["dist".into()];

        wd.sync(SyncArgs::new()).unwrap();
        wd.sync(SyncArgs::new()).unwrap();

        assert_eq!(wd.options().sync_exclude_regex_list, vec!["dist"]);
    }

    #[test]
    fn excluded_directory_is_not_descended() {
        let (source, scratch, wd) = setup();
        source
            .file("__pycache__/module.cpython.pyc", "x")
            .file("pkg/__init__.py", "");

        wd.sync(SyncArgs::new().exclude_regex_list(["__pycache__"]))
            .unwrap();

        assert_eq!(
            listing(&scratch.path("work")),
            vec!["pkg/", "pkg/__init__.py"]
        );
    }

    #[test]
    fn invalid_pattern_changes_nothing() {
        let (source, scratch, wd) = setup();
        source.file("a.txt", "a");

        let err = wd
            .sync(SyncArgs::new().exclude_regex_list(["(unclosed"]))
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPattern { .. }), "got {err:?}");
        scratch.assert_file_not_exists("work");
    }
}

mod mirroring {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn second_sync_without_changes_is_unchanged() {
        let (source, _scratch, wd) = setup();
        nested_project_source(source.root());

        let first = wd.sync(SyncArgs::new()).unwrap();
        let second = wd.sync(SyncArgs::new()).unwrap();

        assert!(!first.is_unchanged());
        assert!(second.is_unchanged(), "second sync changed: {second}");
    }

    #[test]
    fn changed_files_are_updated() {
        let (source, scratch, wd) = setup();
        source.file("config.txt", "v1");
        wd.sync(SyncArgs::new()).unwrap();

        source.file("config.txt", "version two");
        let report = wd.sync(SyncArgs::new()).unwrap();

        assert_eq!(report.files_updated, 1);
        scratch.assert_file_contains("work/config.txt", "version two");
    }

    #[test]
    fn same_size_edits_are_updated() {
        let (source, scratch, wd) = setup();
        source.file("config.txt", "aaaa");
        wd.sync(SyncArgs::new()).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        source.file("config.txt", "bbbb");
        let report = wd.sync(SyncArgs::new()).unwrap();

        assert_eq!(report.files_updated, 1);
        scratch.assert_file_contains("work/config.txt", "bbbb");
    }

    #[test]
    fn identical_rewrite_is_unchanged() {
        let (source, scratch, wd) = setup();
        source.file("config.txt", "aaaa");
        wd.sync(SyncArgs::new()).unwrap();

        std::thread::sleep(std::time::Duration::from_millis(20));
        source.file("config.txt", "aaaa");
        let report = wd.sync(SyncArgs::new()).unwrap();

        assert!(report.is_unchanged(), "rewrite changed: {report}");
        scratch.assert_file_contains("work/config.txt", "aaaa");
    }

    #[test]
    fn empty_sourcedir_falls_back_to_stored_sourcedir() {
        let (source, scratch, wd) = setup();
        source.file("only_in_source.txt", "s");

        wd.sync(SyncArgs::new().sourcedir("")).unwrap();

        scratch.assert_file_exists("work/only_in_source.txt");
        assert_eq!(listing(&scratch.path("work")), vec!["only_in_source.txt"]);
    }

    #[test]
    fn removed_source_entries_are_purged() {
        let (source, scratch, wd) = setup();
        source.file("a.txt", "a").file("old/b.txt", "b");
        wd.sync(SyncArgs::new()).unwrap();

        fs::remove_file(source.path("a.txt")).unwrap();
        fs::remove_dir_all(source.path("old")).unwrap();
        scratch.file("work/stray.txt", "s");
        let report = wd.sync(SyncArgs::new()).unwrap();

        assert_eq!(report.purged, 3);
        assert!(listing(&scratch.path("work")).is_empty());
    }

    #[test]
    fn excluded_target_entries_survive_purge() {
        let (source, scratch, wd) = setup();
        source.gitignore("*.log").file("app.py", "");
        scratch.file("work/run.log", "keep me");

        wd.sync(SyncArgs::new()).unwrap();

        scratch.assert_file_contains("work/run.log", "keep me");
        assert!(scratch.path("work/app.py").is_file());
    }

    #[test]
    fn kind_changes_are_replaced() {
        let (source, scratch, wd) = setup();
        source.file("entry", "file");
        scratch.file("work/entry/inner.txt", "dir");

        wd.sync(SyncArgs::new()).unwrap();

        scratch.assert_file_contains("work/entry", "file");
    }

    #[test]
    fn target_inside_source_is_skipped() {
        let source = TestTree::new();
        python_module_source(source.root());
        let wd = Workdir::new(
            Options::new()
                .with_path(source.path("test_sync"))
                .unwrap()
                .with_sourcedir(source.root()),
        );

        wd.sync(SyncArgs::new()).unwrap();
        wd.sync(SyncArgs::new()).unwrap();

        assert_eq!(
            listing(&source.path("test_sync")),
            vec![".gitignore", "module.py"]
        );
    }

    #[test]
    fn source_inside_target_is_rejected() {
        let tree = TestTree::new();
        tree.file("src/a.txt", "a").file("other.txt", "o");
        let wd = Workdir::new(
            Options::new()
                .with_path(tree.root())
                .unwrap()
                .with_sourcedir(tree.path("src")),
        );

        let err = wd.sync(SyncArgs::new()).unwrap_err();

        assert!(matches!(err, Error::Sync { .. }), "got {err:?}");
        tree.assert_file_exists("other.txt");
    }

    #[test]
    fn missing_source_is_a_sync_error() {
        let (source, scratch, wd) = setup();
        let missing = source.path("nope");

        let err = wd.sync(SyncArgs::new().sourcedir(&missing)).unwrap_err();

        assert!(matches!(err, Error::Sync { .. }), "got {err:?}");
        scratch.assert_file_not_exists("work");
    }

    #[test]
    fn creates_missing_parents_of_target() {
        let source = TestTree::new();
        let scratch = TestTree::new();
        source.file("a.txt", "a");
        let wd = Workdir::new(Options::new().with_path(scratch.path("x/y/z")).unwrap());

        wd.sync(SyncArgs::new().sourcedir(source.root())).unwrap();

        assert!(scratch.path("x/y/z/a.txt").is_file());
    }
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    fn is_root() -> bool {
        match std::process::Command::new("id").arg("-u").output() {
            Ok(output) => String::from_utf8_lossy(&output.stdout).trim() == "0",
            Err(_) => false,
        }
    }

    #[test]
    fn unreadable_source_file_is_a_sync_error() {
        if is_root() {
            eprintln!("Skipping test: running as root bypasses permission checks");
            return;
        }
        let (source, _scratch, wd) = setup();
        source.file("secret.txt", "s");
        fs::set_permissions(source.path("secret.txt"), Permissions::from_mode(0o000)).unwrap();

        let result = wd.sync(SyncArgs::new());

        let _ = fs::set_permissions(source.path("secret.txt"), Permissions::from_mode(0o644));
        assert!(matches!(result, Err(Error::Sync { .. })), "got {result:?}");
    }

    #[test]
    fn symlinked_files_are_copied_as_files() {
        let (source, scratch, wd) = setup();
        source.file("real.txt", "content");
        std::os::unix::fs::symlink(source.path("real.txt"), source.path("link.txt")).unwrap();

        wd.sync(SyncArgs::new()).unwrap();

        let meta = fs::symlink_metadata(scratch.path("work/link.txt")).unwrap();
        assert!(meta.is_file());
        scratch.assert_file_contains("work/link.txt", "content");
    }
}
