// Recovery snapshots across simulated crashes

mod common;

use std::time::Duration;

use common::fixtures::TestFixture;
use common::harness::EditorTestHarness;
use trust::app::{PendingInput, Response};

const PAST_INTERVAL: Duration = Duration::from_secs(121);

#[test]
fn test_crash_then_restore() {
    let fixture = TestFixture::new("draft.txt", "v1\n").unwrap();
    let mut crashed = EditorTestHarness::with_recovery().unwrap();
    crashed.editor_mut().open_path(&fixture.path).unwrap();
    crashed.run_all(&["a", "v2", "."]);
    assert_eq!(crashed.advance_and_tick(PAST_INTERVAL), 1);

    // No shutdown: the first session is abandoned with its snapshot on disk
    let mut next = crashed.restart().unwrap();
    let Response::Batch(responses) = next.editor_mut().open_path(&fixture.path).unwrap() else {
        panic!("expected the open message and a restore question");
    };
    let Response::Question(question) = &responses[1] else {
        panic!("expected a restore question");
    };
    assert!(question.contains("2 lines"), "{question}");
    assert!(matches!(
        next.editor().pending(),
        Some(PendingInput::ConfirmRecovery { .. })
    ));

    next.run("y").unwrap();
    assert_eq!(next.lines(), ["v1", "v2"]);
    assert!(next.is_dirty());
    assert_eq!(fixture.read_content().unwrap(), "v1\n", "the file itself is untouched");
}

#[test]
fn test_clean_exit_leaves_no_snapshots() {
    let mut harness = EditorTestHarness::with_recovery().unwrap();
    harness.run_all(&["a", "scratch", "."]);
    harness.advance_and_tick(PAST_INTERVAL);
    assert_eq!(harness.output("recover").lines().count(), 1);

    harness.editor_mut().shutdown();
    let mut next = harness.restart().unwrap();
    assert_eq!(next.output("recover"), "no recovery snapshots\n");
}

#[test]
fn test_unnamed_buffer_recovered_by_number() {
    let mut crashed = EditorTestHarness::with_recovery().unwrap();
    crashed.run_all(&["a", "unsaved", "work", "."]);
    crashed.advance_and_tick(PAST_INTERVAL);

    let mut next = crashed.restart().unwrap();
    next.run("recover 1").unwrap();
    assert_eq!(next.lines(), ["unsaved", "work"]);
    assert_eq!(next.output("recover"), "no recovery snapshots\n");
}

#[test]
fn test_snapshot_not_written_before_interval() {
    let mut harness = EditorTestHarness::with_recovery().unwrap();
    harness.run_all(&["a", "x", "."]);
    assert_eq!(harness.advance_and_tick(Duration::from_secs(30)), 0);
    assert_eq!(harness.advance_and_tick(Duration::from_secs(91)), 1);
}

#[test]
fn test_interrupt_keeps_offered_snapshot() {
    let fixture = TestFixture::new("k.txt", "base\n").unwrap();
    let mut crashed = EditorTestHarness::with_recovery().unwrap();
    crashed.editor_mut().open_path(&fixture.path).unwrap();
    crashed.run("d 1").unwrap();
    crashed.advance_and_tick(PAST_INTERVAL);

    let mut next = crashed.restart().unwrap();
    next.editor_mut().open_path(&fixture.path).unwrap();
    assert_eq!(
        next.editor_mut().interrupt(),
        Response::Text(vec!["(snapshot kept)".into()])
    );
    assert_eq!(next.lines(), ["base"]);
    assert_eq!(next.output("recover").lines().count(), 1);
}
