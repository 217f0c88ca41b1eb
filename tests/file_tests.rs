// Opening, saving, switching buffers and quitting

mod common;

use std::fs;

use common::fixtures::TestFixture;
use common::harness::EditorTestHarness;
use trust::app::{PendingInput, Response};
use trust::error::{EditorError, Warning};

#[test]
fn test_open_edit_save_roundtrip() {
    let fixture = TestFixture::new("notes.txt", "alpha\r\nbeta\ngamma").unwrap();
    let mut harness = EditorTestHarness::new().unwrap();

    let opened = harness.run(&format!("open {}", fixture.path.display())).unwrap();
    assert_eq!(
        opened,
        Response::Message(format!("opened {} (3 lines)", fixture.path.display()))
    );
    assert_eq!(harness.lines(), ["alpha", "beta", "gamma"]);
    assert!(!harness.is_dirty());

    harness.run_all(&["d 2", "a", "delta", "."]);
    assert!(harness.is_dirty());
    harness.run("w").unwrap();
    assert!(!harness.is_dirty());

    // Saved with LF terminators, including the last line
    assert_eq!(fixture.read_content().unwrap(), "alpha\ngamma\ndelta\n");

    let mut reopened = EditorTestHarness::new().unwrap();
    reopened.editor_mut().open_path(&fixture.path).unwrap();
    assert_eq!(reopened.lines(), ["alpha", "gamma", "delta"]);
}

#[test]
fn test_save_keeps_backup_of_previous_contents() {
    let fixture = TestFixture::new("b.txt", "old\n").unwrap();
    let mut harness = EditorTestHarness::new().unwrap();
    harness.editor_mut().open_path(&fixture.path).unwrap();
    harness.run_all(&["c 1", "new", ".", "w"]);

    assert_eq!(fixture.read_content().unwrap(), "new\n");
    let backup = fs::read_to_string(fixture.dir().join("b.txt~")).unwrap();
    assert_eq!(backup, "old\n");
}

#[test]
fn test_open_missing_file_starts_empty() {
    let fixture = TestFixture::missing("fresh.txt").unwrap();
    let mut harness = EditorTestHarness::new().unwrap();
    let response = harness.editor_mut().open_path(&fixture.path).unwrap();
    assert_eq!(
        response,
        Response::Message(format!("(new) {}", fixture.path.display()))
    );
    assert!(harness.lines().is_empty());
    assert!(!fixture.path.exists(), "nothing is created until the first write");

    harness.run_all(&["a", "first", ".", "w"]);
    assert_eq!(fixture.read_content().unwrap(), "first\n");
}

#[test]
fn test_write_without_name_then_with_name() {
    let mut harness = EditorTestHarness::new().unwrap();
    harness.run_all(&["a", "x", "."]);
    assert!(matches!(harness.run("w"), Err(EditorError::NoFileName)));

    let target = harness.path("out.txt");
    harness.run(&format!("write {}", target.display())).unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "x\n");

    // The buffer now remembers its path
    harness.run_all(&["a", "y", ".", "w"]);
    assert_eq!(fs::read_to_string(&target).unwrap(), "x\ny\n");
}

#[test]
fn test_failed_write_keeps_buffer_dirty() {
    let mut harness = EditorTestHarness::new().unwrap();
    harness.run_all(&["a", "x", "."]);
    let target = harness.path("no/such/dir/out.txt");
    let err = harness.run(&format!("w {}", target.display())).unwrap_err();
    assert!(matches!(err, EditorError::Io { .. }));
    assert!(harness.is_dirty());
    assert!(harness.editor().registry().current().path().is_none());
}

#[test]
fn test_wq_failure_keeps_session_running() {
    let mut harness = EditorTestHarness::new().unwrap();
    harness.run_all(&["a", "x", "."]);
    assert!(matches!(harness.run("wq"), Err(EditorError::NoFileName)));
    assert!(harness.editor().pending().is_none());
    assert_eq!(harness.lines(), ["x"]);
}

#[test]
fn test_wq_saves_then_quits() {
    let fixture = TestFixture::new("q.txt", "").unwrap();
    let mut harness = EditorTestHarness::new().unwrap();
    harness.editor_mut().open_path(&fixture.path).unwrap();
    harness.run_all(&["a", "done", "."]);
    assert_eq!(harness.run("wq").unwrap(), Response::Quit);
    assert_eq!(fixture.read_content().unwrap(), "done\n");
}

#[test]
fn test_quit_with_unsaved_changes_asks_first() {
    let mut harness = EditorTestHarness::new().unwrap();
    assert_eq!(harness.run("q").unwrap(), Response::Quit);

    harness.run_all(&["a", "x", "."]);
    let response = harness.run("q").unwrap();
    assert_eq!(
        response,
        Response::Warning(Warning::DirtyQuit {
            buffers: vec!["(unnamed)".into()]
        })
    );
    assert!(matches!(harness.editor().pending(), Some(PendingInput::ConfirmQuit)));

    // Anything but yes cancels
    assert_eq!(
        harness.run("nope").unwrap(),
        Response::Text(vec!["(quit cancelled)".into()])
    );
    assert_eq!(harness.lines(), ["x"]);

    harness.run("quit").unwrap();
    assert_eq!(harness.run("YES").unwrap(), Response::Quit);
}

#[test]
fn test_force_quit_skips_confirmation() {
    let mut harness = EditorTestHarness::new().unwrap();
    harness.run_all(&["a", "x", "."]);
    assert_eq!(harness.run("q!").unwrap(), Response::Quit);
}

#[test]
fn test_buffer_cycling_wraps() {
    let mut harness = EditorTestHarness::new().unwrap();
    assert_eq!(harness.output("bnext"), "(only one buffer)\n");

    harness.run_all(&["a", "first", "."]);
    harness.run_all(&["new", "a", "second", "."]);
    harness.run_all(&["new", "a", "third", "."]);
    assert_eq!(harness.lines(), ["third"]);

    harness.run("bnext").unwrap();
    assert_eq!(harness.lines(), ["first"]);
    harness.run("bprev").unwrap();
    assert_eq!(harness.lines(), ["third"]);
    harness.run_all(&["bprev", "bprev", "bprev"]);
    assert_eq!(harness.lines(), ["third"]);

    assert_eq!(
        harness.output("lsb"),
        "  1 (unnamed) +\n  2 (unnamed) +\n* 3 (unnamed) +\n"
    );
}

#[test]
fn test_quit_lists_every_dirty_buffer() {
    let first = TestFixture::new("one.txt", "1\n").unwrap();
    let mut harness = EditorTestHarness::new().unwrap();
    harness.editor_mut().open_path(&first.path).unwrap();
    harness.run_all(&["d 1", "new", "a", "x", ".", "bnext"]);

    let Response::Warning(Warning::DirtyQuit { buffers }) = harness.run("q").unwrap() else {
        panic!("expected a dirty-quit warning");
    };
    assert_eq!(buffers, vec![first.path.display().to_string(), "(unnamed)".into()]);
}

#[test]
fn test_undo_is_per_buffer() {
    let mut harness = EditorTestHarness::new().unwrap();
    harness.run_all(&["a", "one", "."]);
    harness.run_all(&["new", "a", "two", "."]);
    harness.run_all(&["bprev", "undo"]);
    assert!(harness.lines().is_empty());
    harness.run("bnext").unwrap();
    assert_eq!(harness.lines(), ["two"]);
}

#[test]
fn test_open_same_file_switches_to_it() {
    let fixture = TestFixture::new("s.txt", "s\n").unwrap();
    let mut harness = EditorTestHarness::new().unwrap();
    harness.editor_mut().open_path(&fixture.path).unwrap();
    harness.run_all(&["a", "edited", ".", "new"]);
    let response = harness.editor_mut().open_path(&fixture.path).unwrap();
    assert_eq!(
        response,
        Response::Message(format!("switched to {}", fixture.path.display()))
    );
    assert_eq!(harness.lines(), ["s", "edited"]);
    assert_eq!(harness.editor().registry().len(), 2);
}

#[test]
fn test_tilde_expands_to_home() {
    let mut harness = EditorTestHarness::new().unwrap();
    fs::create_dir_all(harness.path("home")).unwrap();
    fs::write(harness.path("home/h.txt"), "from home\n").unwrap();
    harness.run("open ~/h.txt").unwrap();
    assert_eq!(harness.lines(), ["from home"]);
}

#[test]
fn test_info_reports_counts_and_state() {
    let mut harness = EditorTestHarness::new().unwrap();
    harness.run_all(&["a", "héllo", "wörld", ".", "new", "bprev"]);
    assert_eq!(
        harness.output("info"),
        "file: (unnamed) *\n  lines: 2\n  chars: 12\n  buffer: 1 of 2\n  undo: 1 step(s), redo: 0 step(s)\n  theme: default\n"
    );
}
