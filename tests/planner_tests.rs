// Integration tests for batch planning over real directories

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use voice_rename::{Action, BatchPlanner, ConfigBuilder, InvocationError, Mode, OperationStatus};

fn touch(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"").unwrap();
    path
}

fn planner(root: &Path, mode: Mode, recursive: bool) -> BatchPlanner {
    let config = ConfigBuilder::new()
        .directory(root)
        .mode(mode)
        .recursive(recursive)
        .build()
        .unwrap();
    BatchPlanner::new(config)
}

fn listing(dir: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            out.extend(listing(&path));
        } else {
            out.push(path);
        }
    }
    out.sort();
    out
}

#[test]
fn test_non_recursive_only_reads_root() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Alice_Greeting.mp3");
    fs::create_dir(dir.path().join("sub")).unwrap();
    touch(&dir.path().join("sub"), "Bob_Hello.mp3");

    let batch = planner(dir.path(), Mode::Rename, false).plan().unwrap();

    assert_eq!(batch.operations.len(), 1);
    assert_eq!(
        batch.operations[0].target(),
        Some(dir.path().join("[Greeting]Alice - 01 Greeting.mp3").as_path())
    );
}

#[test]
fn test_recursive_descends_and_targets_stay_beside_source() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Alice_Greeting.mp3");
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    touch(&sub, "EX_Bob_Hello.mp3");

    let batch = planner(dir.path(), Mode::Rename, true).plan().unwrap();

    assert_eq!(batch.planned_count(), 2);
    let targets: Vec<_> = batch.operations.iter().filter_map(|op| op.target()).collect();
    assert!(targets.contains(&sub.join("[Hello]Bob - 02 Hello EX.mp3").as_path()));
}

#[test]
fn test_other_extensions_are_ignored() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Alice_Greeting.wav");
    touch(dir.path(), "notes.txt");
    touch(dir.path(), "Bob_Hello.MP3");

    let batch = planner(dir.path(), Mode::Rename, false).plan().unwrap();

    assert_eq!(batch.operations.len(), 1);
    assert_eq!(batch.operations[0].source, dir.path().join("Bob_Hello.MP3"));
}

#[test]
fn test_unmatched_files_are_skipped_with_diagnostic() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Alice_Greeting.mp3");
    let odd = touch(dir.path(), "a_b_c_d.mp3");

    let batch = planner(dir.path(), Mode::Rename, false).plan().unwrap();

    assert_eq!(batch.planned_count(), 1);
    assert_eq!(batch.skipped_count(), 1);
    assert_eq!(
        batch.skip_diagnostics(),
        vec![format!("Skipped: '{}' - does not match expected pattern", odd.display())]
    );
}

#[test]
fn test_tag_mode_plans_tag_records() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "[Greeting]Alice - 01 Hello.mp3");
    touch(dir.path(), "Alice_Greeting.mp3");

    let batch = planner(dir.path(), Mode::WriteTags, false).plan().unwrap();

    assert_eq!(batch.planned_count(), 1);
    let tags = batch
        .operations
        .iter()
        .find_map(|op| match &op.action {
            Some(Action::WriteTags { tags }) => Some(tags.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(tags.album(), "Greeting");
    assert_eq!(tags.performer(), "Alice");
    assert_eq!(tags.track_number(), 1);
    assert_eq!(tags.track_title(), "Hello (Alice)");
}

#[test]
fn test_collision_flags_both_sources() {
    let dir = TempDir::new().unwrap();
    let leading = touch(dir.path(), "01_Alice_Greeting.mp3");
    let plain = touch(dir.path(), "Alice_Greeting.mp3");
    touch(dir.path(), "Bob_Hello.mp3");

    let batch = planner(dir.path(), Mode::Rename, false).plan().unwrap();

    assert!(batch.has_collisions());
    assert_eq!(batch.collisions.len(), 1);
    let collision = &batch.collisions[0];
    assert_eq!(collision.target, dir.path().join("[Greeting]Alice - 01 Greeting.mp3"));
    // walk is sorted by name, so "01_" comes first
    assert_eq!(collision.primary, leading);
    assert_eq!(collision.colliders, vec![plain]);

    assert_eq!(batch.planned_count(), 1);
    for op in &batch.operations {
        if op.source.file_name().unwrap() != "Bob_Hello.mp3" {
            assert!(matches!(&op.status, OperationStatus::Skipped(r) if r.contains("collides")));
        }
    }
}

#[test]
fn test_planning_does_not_mutate() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "Alice_Greeting.mp3");
    touch(dir.path(), "EX_Alice_Greeting.mp3");
    let before = listing(dir.path());

    let batch = planner(dir.path(), Mode::Rename, true).plan().unwrap();

    assert_eq!(batch.planned_count(), 2);
    assert_eq!(listing(dir.path()), before);
}

#[test]
fn test_missing_root_is_invalid_invocation() {
    let dir = TempDir::new().unwrap();
    let err = planner(&dir.path().join("nope"), Mode::Rename, false).plan().unwrap_err();
    assert!(matches!(err, InvocationError::DirectoryNotFound(_)));
}

#[test]
fn test_file_root_is_invalid_invocation() {
    let dir = TempDir::new().unwrap();
    let file = touch(dir.path(), "Alice_Greeting.mp3");
    let err = planner(&file, Mode::Rename, false).plan().unwrap_err();
    assert!(matches!(err, InvocationError::NotADirectory(_)));
}

#[test]
fn test_full_width_solidus_never_nests_target() {
    let dir = TempDir::new().unwrap();
    let source = touch(dir.path(), "Alice_Ａ／Ｂ.mp3");
    touch(dir.path(), "Bob_Hello.mp3");

    let batch = planner(dir.path(), Mode::Rename, false).plan().unwrap();

    let op = batch.operations.iter().find(|op| op.source == source).unwrap();
    assert_eq!(
        op.status,
        OperationStatus::Skipped("target name contains a path separator".to_string())
    );
    assert!(op.target().is_none());
    assert_eq!(batch.planned_count(), 1);
    for target in batch.operations.iter().filter_map(|op| op.target()) {
        assert_eq!(target.parent(), Some(dir.path()));
    }
}
