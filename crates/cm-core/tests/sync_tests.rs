//! Tests for the SyncEngine operations against temporary trees

use std::fs;

use cm_core::{Config, Error, SyncDirection};
use cm_test_utils::{TestRoots, touch_forward};
use pretty_assertions::assert_eq;

mod add_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_single_file_preserves_mtime() {
        let roots = TestRoots::new();
        let real = roots.write_real("etc/app.conf", "port = 80\n");
        let engine = roots.engine();

        let report = engine.add(&real).unwrap();

        assert!(report.success());
        assert_eq!(report.direction, SyncDirection::ToOverlay);
        assert_eq!(report.transfers.len(), 1);
        assert_eq!(report.transfers[0].from, real);
        assert_eq!(report.transfers[0].to, roots.overlay("etc/app.conf"));
        roots.assert_overlay_contains("etc/app.conf", "port = 80");
        assert!(cm_fs::quick_diff(roots.overlay("etc/app.conf"), &real));
    }

    #[test]
    fn test_add_directory_copies_every_file() {
        let roots = TestRoots::new();
        roots.write_real("etc/a.conf", "a");
        roots.write_real("etc/nested/b.conf", "b");
        roots.write_real("var/other", "c");
        let engine = roots.engine();

        let report = engine.add(roots.real("etc")).unwrap();

        assert_eq!(report.transfers.len(), 2);
        roots.assert_in_overlay("etc/a.conf");
        roots.assert_in_overlay("etc/nested/b.conf");
        roots.assert_not_in_overlay("var/other");
    }

    #[test]
    fn test_add_relative_argument_resolves_against_cwd() {
        let roots = TestRoots::new();
        roots.write_real("etc/app.conf", "x");
        let engine = roots.engine();

        engine.add("etc/app.conf").unwrap();

        roots.assert_in_overlay("etc/app.conf");
    }

    #[test]
    fn test_add_overwrites_existing_overlay_copy() {
        let roots = TestRoots::new();
        roots.write_real("etc/app.conf", "new contents");
        roots.write_overlay("etc/app.conf", "old");
        let engine = roots.engine();

        engine.add(roots.real("etc/app.conf")).unwrap();

        assert_eq!(roots.read_overlay("etc/app.conf"), "new contents");
    }

    #[test]
    fn test_add_missing_path_is_skipped() {
        let roots = TestRoots::new();
        let engine = roots.engine();
        let missing = roots.real("etc/nothing");

        let report = engine.add(&missing).unwrap();

        assert!(report.success());
        assert!(report.transfers.is_empty());
        assert_eq!(report.skipped, vec![missing]);
    }

    #[test]
    fn test_add_outside_real_root_is_rejected() {
        let roots = TestRoots::new();
        let engine = roots.engine();

        let err = engine.add(roots.overlay_root().join("x")).unwrap_err();

        assert!(
            matches!(err, Error::Fs(cm_fs::Error::NotUnderRoot { .. })),
            "got: {err}"
        );
    }

    #[test]
    fn test_add_never_copies_overlay_into_itself() {
        let roots = TestRoots::new();
        let overlay_root = roots.real("opt/cm");
        fs::create_dir_all(&overlay_root).unwrap();
        roots.write_real("opt/cm/etc/tracked", "t");
        roots.write_real("etc/app.conf", "a");
        let engine = roots.engine_with(Config {
            overlay_root: overlay_root.clone(),
            ..roots.config()
        });

        let report = engine.add(roots.real_root()).unwrap();

        assert!(report.success());
        assert_eq!(report.transfers.len(), 1);
        assert!(overlay_root.join("etc/app.conf").is_file());
        assert!(!overlay_root.join("opt").exists());
    }

    #[test]
    fn test_add_argument_inside_overlay_is_skipped() {
        let roots = TestRoots::new();
        let overlay_root = roots.real("opt/cm");
        roots.write_real("opt/cm/etc/tracked", "t");
        let engine = roots.engine_with(Config {
            overlay_root: overlay_root.clone(),
            ..roots.config()
        });

        let report = engine.add(overlay_root.join("etc")).unwrap();

        assert!(report.success());
        assert!(report.transfers.is_empty());
        assert_eq!(report.skipped, vec![overlay_root.join("etc")]);
        assert!(!overlay_root.join("opt").exists());
    }

    #[test]
    fn test_add_stops_at_first_failure() {
        let roots = TestRoots::new();
        roots.write_real("etc/a.conf", "a");
        roots.write_real("etc/b.conf", "b");
        // The overlay copy of `etc` is a plain file, so no parent can be made.
        roots.write_overlay("etc", "blocker");
        let engine = roots.engine();

        let report = engine.add(roots.real("etc")).unwrap();

        assert!(!report.success());
        assert!(report.transfers.is_empty());
        assert_eq!(report.errors.len(), 1);
        let failure = &report.errors[0];
        assert_eq!(failure.source.parent(), Some(roots.real("etc").as_path()));
        let name = failure.source.file_name().unwrap();
        assert_eq!(failure.path, roots.overlay("etc").join(name));
        assert_eq!(roots.read_overlay("etc"), "blocker");
    }
}

mod remove_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remove_deletes_overlay_only() {
        let roots = TestRoots::new();
        roots.write_both("etc/app.conf", "x");
        let engine = roots.engine();

        let removed = engine.remove(roots.real("etc/app.conf")).unwrap();

        assert_eq!(removed, roots.overlay("etc/app.conf"));
        roots.assert_not_in_overlay("etc/app.conf");
        roots.assert_real_contains("etc/app.conf", "x");
    }

    #[test]
    fn test_remove_directory_subtree() {
        let roots = TestRoots::new();
        roots.write_overlay("etc/a", "a");
        roots.write_overlay("etc/sub/b", "b");
        let engine = roots.engine();

        engine.remove(roots.real("etc")).unwrap();

        roots.assert_not_in_overlay("etc");
    }

    #[test]
    fn test_remove_missing_succeeds() {
        let roots = TestRoots::new();
        let engine = roots.engine();

        engine.remove(roots.real("etc/nothing")).unwrap();
    }
}

mod list_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_returns_real_paths() {
        let roots = TestRoots::new();
        roots.write_overlay("etc/a", "a");
        roots.write_overlay("etc/sub/b", "b");
        let engine = roots.engine();

        let mut listed = engine.list(roots.real("etc")).unwrap();
        listed.sort();

        assert_eq!(listed, vec![roots.real("etc/a"), roots.real("etc/sub/b")]);
    }

    #[test]
    fn test_list_empty_directory_is_empty() {
        let roots = TestRoots::new();
        fs::create_dir_all(roots.overlay("etc")).unwrap();
        let engine = roots.engine();

        assert!(engine.list(roots.real("etc")).unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_overlay_parent_is_empty() {
        let roots = TestRoots::new();
        let engine = roots.engine();

        assert!(engine.list(roots.real("no/such/dir")).unwrap().is_empty());
    }
}

mod pull_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pull_copies_differing_file_and_backs_up() {
        let roots = TestRoots::new();
        roots.write_real("etc/app.conf", "live");
        roots.write_overlay("etc/app.conf", "tracked version");
        let engine = roots.engine();

        let report = engine.pull(roots.real("etc")).unwrap();

        assert!(report.success());
        assert_eq!(report.transfers.len(), 1);
        let transfer = &report.transfers[0];
        assert_eq!(transfer.from, roots.overlay("etc/app.conf"));
        assert_eq!(transfer.to, roots.real("etc/app.conf"));
        assert_eq!(transfer.backup, Some(roots.real("etc/app.conf~")));
        assert_eq!(roots.read_real("etc/app.conf"), "tracked version");
        assert_eq!(roots.read_real("etc/app.conf~"), "live");
    }

    #[test]
    fn test_pull_without_backup() {
        let roots = TestRoots::new();
        roots.write_real("etc/app.conf", "live");
        roots.write_overlay("etc/app.conf", "tracked version");
        let engine = roots.engine_with(Config {
            no_backup: true,
            ..roots.config()
        });

        let report = engine.pull(roots.real("etc/app.conf")).unwrap();

        assert_eq!(report.transfers[0].backup, None);
        assert!(!roots.real("etc/app.conf~").exists());
    }

    #[test]
    fn test_pull_creates_missing_real_file() {
        let roots = TestRoots::new();
        roots.write_overlay("etc/new/app.conf", "fresh");
        let engine = roots.engine();

        let report = engine.pull(roots.real("etc")).unwrap();

        assert_eq!(report.transfers.len(), 1);
        assert_eq!(report.transfers[0].backup, None);
        assert_eq!(roots.read_real("etc/new/app.conf"), "fresh");
    }

    #[test]
    fn test_pull_never_removes_real_files() {
        let roots = TestRoots::new();
        roots.write_real("etc/untracked", "keep me");
        roots.write_overlay("etc/tracked", "t");
        let engine = roots.engine();

        engine.pull(roots.real("etc")).unwrap();

        roots.assert_real_contains("etc/untracked", "keep me");
    }

    #[test]
    fn test_pull_skips_identical_pairs() {
        let roots = TestRoots::new();
        roots.write_both("etc/same", "same");
        let engine = roots.engine();

        let report = engine.pull(roots.real_root()).unwrap();

        assert!(report.is_empty());
        assert!(!roots.real("etc/same~").exists());
    }

    #[test]
    fn test_pull_with_no_overlay_entry_does_nothing() {
        let roots = TestRoots::new();
        roots.write_real("etc/app.conf", "x");
        let engine = roots.engine();

        let report = engine.pull(roots.real("etc")).unwrap();

        assert!(report.is_empty());
    }

    #[test]
    fn test_pulled_file_matches_on_next_pending() {
        let roots = TestRoots::new();
        roots.write_real("etc/app.conf", "live");
        roots.write_overlay("etc/app.conf", "tracked version");
        let engine = roots.engine();

        engine.pull(roots.real("etc")).unwrap();
        let pending = engine.pending(roots.real("etc")).unwrap();

        assert!(pending.pairs.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_pull_symlink_mode_links_into_overlay() {
        let roots = TestRoots::new();
        roots.write_real("etc/app.conf", "live");
        roots.write_overlay("etc/app.conf", "tracked version");
        let engine = roots.engine_with(Config {
            symlink: true,
            ..roots.config()
        });

        let report = engine.pull(roots.real("etc/app.conf")).unwrap();

        assert!(report.transfers[0].linked);
        let real = roots.real("etc/app.conf");
        assert!(fs::symlink_metadata(&real).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_link(&real).unwrap(), roots.overlay("etc/app.conf"));
        assert_eq!(roots.read_real("etc/app.conf~"), "live");
    }

    #[test]
    fn test_pull_continues_after_file_failure() {
        let roots = TestRoots::new();
        roots.write_overlay("a/blocked/x.conf", "x");
        roots.write_overlay("b/ok.conf", "ok");
        // A real file where the overlay has a directory.
        roots.write_real("a/blocked", "file");
        let engine = roots.engine();

        let report = engine.pull(roots.real_root()).unwrap();

        assert!(!report.success());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].source, roots.overlay("a/blocked/x.conf"));
        assert_eq!(report.errors[0].path, roots.real("a/blocked/x.conf"));
        assert_eq!(report.transfers.len(), 1);
        assert_eq!(roots.read_real("b/ok.conf"), "ok");
        assert_eq!(roots.read_real("a/blocked"), "file");
    }
}

mod push_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_push_updates_overlay_from_real() {
        let roots = TestRoots::new();
        roots.write_both("etc/app.conf", "v1");
        roots.write_real("etc/app.conf", "version two");
        let engine = roots.engine();

        let report = engine.push(roots.real("etc")).unwrap();

        assert!(report.success());
        assert_eq!(report.direction, SyncDirection::ToOverlay);
        assert_eq!(report.transfers.len(), 1);
        assert_eq!(roots.read_overlay("etc/app.conf"), "version two");
        assert!(!roots.overlay("etc/app.conf~").exists());
    }

    #[test]
    fn test_push_picks_up_mtime_only_change() {
        let roots = TestRoots::new();
        roots.write_both("etc/app.conf", "same");
        touch_forward(roots.real("etc/app.conf"), 60);
        let engine = roots.engine();

        let report = engine.push(roots.real("etc/app.conf")).unwrap();

        assert_eq!(report.transfers.len(), 1);
        assert!(cm_fs::quick_diff(
            roots.overlay("etc/app.conf"),
            roots.real("etc/app.conf")
        ));
    }

    #[test]
    fn test_push_leaves_overlay_only_file_alone() {
        let roots = TestRoots::new();
        roots.write_overlay("etc/only-here", "o");
        let engine = roots.engine();

        let report = engine.push(roots.real("etc")).unwrap();

        assert!(report.transfers.is_empty());
        assert_eq!(report.skipped, vec![roots.overlay("etc/only-here")]);
        roots.assert_overlay_contains("etc/only-here", "o");
    }

    #[test]
    fn test_push_never_creates_new_overlay_files() {
        let roots = TestRoots::new();
        roots.write_both("etc/tracked", "t");
        roots.write_real("etc/untracked", "u");
        let engine = roots.engine();

        engine.push(roots.real("etc")).unwrap();

        roots.assert_not_in_overlay("etc/untracked");
    }

    #[test]
    fn test_push_continues_after_file_failure() {
        let roots = TestRoots::new();
        // The overlay tracks a file where the real side now has a directory.
        roots.write_overlay("a/blocked", "o");
        roots.write_real("a/blocked/x.conf", "x");
        roots.write_both("b/ok.conf", "v1");
        roots.write_real("b/ok.conf", "version two");
        let engine = roots.engine();

        let report = engine.push(roots.real_root()).unwrap();

        assert!(!report.success());
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].source, roots.real("a/blocked"));
        assert_eq!(report.errors[0].path, roots.overlay("a/blocked"));
        assert_eq!(report.transfers.len(), 1);
        assert_eq!(roots.read_overlay("b/ok.conf"), "version two");
        roots.assert_overlay_contains("a/blocked", "o");
    }
}

mod pending_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pending_missing_target() {
        let roots = TestRoots::new();
        let engine = roots.engine();

        let pending = engine.pending(roots.real("etc")).unwrap();

        assert!(pending.missing);
        assert_eq!(pending.target, roots.overlay("etc"));
        assert_eq!(pending.compared, 0);
    }

    #[test]
    fn test_pending_counts_compared_and_differing() {
        let roots = TestRoots::new();
        roots.write_both("etc/same", "s");
        roots.write_overlay("etc/changed", "overlay side");
        roots.write_real("etc/changed", "real");
        let engine = roots.engine();

        let pending = engine.pending(roots.real("etc")).unwrap();

        assert!(!pending.missing);
        assert_eq!(pending.compared, 2);
        assert_eq!(pending.pairs.len(), 1);
        assert_eq!(pending.pairs[0].overlay, roots.overlay("etc/changed"));
        assert_eq!(pending.pairs[0].real, roots.real("etc/changed"));
    }

    #[test]
    fn test_pending_root_argument_maps_to_overlay_root() {
        let roots = TestRoots::new();
        let engine = roots.engine();

        let pending = engine.pending(roots.real_root()).unwrap();

        assert_eq!(pending.target, roots.overlay_root());
        assert!(!pending.missing);
    }
}
