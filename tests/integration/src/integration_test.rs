//! End-to-end integration test for a dotfiles project
//!
//! This test exercises the complete flow: config discovery -> loading with
//! interpolation -> reconciliation -> restore.

#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};

use dk_core::{
    Config, ConfigLocator, Gate, InterpolationContext, LinkStatus, ReconcileOutcome, Reconciler,
    ReconciliationPlan,
};
use dk_fs::{Filesystem, RealFs};
use dk_test_utils::{RecordingReporter, ScriptedConfirmer, TestHome};

/// Copy the fixture project into `home/repo` and return its canonical path
fn setup_project(home: &TestHome) -> PathBuf {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/dotfiles");
    let project = home.path("repo");
    RealFs.copy_tree(&fixture, &project).unwrap();
    fs::canonicalize(project).unwrap()
}

fn load(home: &TestHome, project: &Path) -> Config {
    let locator = ConfigLocator::new(project, home.root())
        .with_env_override(None)
        .with_home_dir(Some(home.root().to_path_buf()))
        .with_config_dir(None);
    let path = locator.locate().unwrap().expect("fixture config is discovered");
    assert_eq!(path, project.join("dotkeeper.yml"));

    let ctx = InterpolationContext::new().with_project_root(locator.project_root());
    Config::load(&path, &ctx).unwrap()
}

#[test]
fn test_discover_and_classify_fixture() {
    let home = TestHome::new();
    let project = setup_project(&home);
    home.write(".bashrc", "# distro default");

    let config = load(&home, &project);
    assert_eq!(config.links().len(), 3);

    let plan = ReconciliationPlan::classify(&RealFs, &home.resolver(), config.links());
    assert_eq!(plan.nonlink.len(), 1);
    assert_eq!(plan.missing.len(), 2);
    assert_eq!(plan.missing_targets(), vec![project.join("git/gitconfig")]);
}

#[test]
fn test_apply_fixture_then_reject_and_restore() {
    let home = TestHome::new();
    let project = setup_project(&home);
    home.write(".bashrc", "# distro default");
    let config = load(&home, &project);
    let paths = home.resolver();

    // Accept the missing target and the apply, then reject the result
    let mut confirmer = ScriptedConfirmer::new(&[true, true, false]);
    let mut reporter = RecordingReporter::new();
    let outcome = Reconciler::new(&RealFs, &paths, &mut confirmer, &mut reporter)
        .run(config.links())
        .unwrap();

    assert_eq!(
        confirmer.asked,
        vec![
            Gate::ContinueWithMissingTargets,
            Gate::ApplyChanges,
            Gate::KeepChanges
        ]
    );
    assert_eq!(
        outcome,
        ReconcileOutcome::Restored {
            restored: 1,
            skipped: 0,
            removed: 3,
        }
    );
    assert_eq!(home.read(".bashrc"), "# distro default");
    // New links and the `.config` directory made for them are gone again
    assert!(!home.occupied(".config"));
    assert!(!home.occupied(".gitconfig"));
}

#[test]
fn test_apply_fixture_and_keep() {
    let home = TestHome::new();
    let project = setup_project(&home);
    fs::create_dir_all(project.join("git")).unwrap();
    fs::write(project.join("git/gitconfig"), "[user]\n").unwrap();
    let config = load(&home, &project);
    let paths = home.resolver();

    let mut confirmer = ScriptedConfirmer::new(&[true, true]);
    let mut reporter = RecordingReporter::new();
    let outcome = Reconciler::new(&RealFs, &paths, &mut confirmer, &mut reporter)
        .run(config.links())
        .unwrap();

    assert_eq!(outcome, ReconcileOutcome::Applied { changed: 3 });
    assert_eq!(home.read(".config/nvim/lua/plugins.lua"), "return {}\n");

    let plan = ReconciliationPlan::classify(&RealFs, &paths, config.links());
    assert!(plan.rows().all(|link| link.status == LinkStatus::Correct));
}
