//! Tests for the line-edit state machine

use crate::constants::limits::LINE_CAPACITY;
use crate::key::Key;
use crate::line_edit::{EditOutcome, LineEdit};

#[test]
fn test_begin_places_cursor_at_end() {
    let edit = LineEdit::begin(3, b"hello");
    assert_eq!(edit.line(), 3);
    assert_eq!(edit.cursor(), 5);
    assert_eq!(edit.bytes(), b"hello");
}

#[test]
fn test_left_right_bounds() {
    let mut edit = LineEdit::begin(1, b"ab");
    assert_eq!(edit.apply_key(Key::Right), EditOutcome::CursorMoved);
    assert_eq!(edit.cursor(), 2);

    edit.apply_key(Key::Left);
    edit.apply_key(Key::Left);
    assert_eq!(edit.cursor(), 0);
    edit.apply_key(Key::Left);
    assert_eq!(edit.cursor(), 0);
}

#[test]
fn test_insert_at_cursor() {
    let mut edit = LineEdit::begin(1, b"ac");
    edit.apply_key(Key::Left);
    assert_eq!(edit.apply_key(Key::Char(b'b')), EditOutcome::CursorMoved);
    assert_eq!(edit.bytes(), b"abc");
    assert_eq!(edit.cursor(), 2);
}

#[test]
fn test_backspace_deletes_before_cursor() {
    let mut edit = LineEdit::begin(1, b"abc");
    edit.apply_key(Key::Left);
    assert_eq!(edit.apply_key(Key::Backspace), EditOutcome::CursorMoved);
    assert_eq!(edit.bytes(), b"ac");
    assert_eq!(edit.cursor(), 1);
}

#[test]
fn test_backspace_at_start_is_ignored() {
    let mut edit = LineEdit::begin(1, b"x");
    edit.apply_key(Key::Left);
    assert_eq!(edit.apply_key(Key::Backspace), EditOutcome::Ignored);
    assert_eq!(edit.bytes(), b"x");
}

#[test]
fn test_insert_stops_at_capacity() {
    let full = vec![b'z'; LINE_CAPACITY];
    let mut edit = LineEdit::begin(1, &full);
    assert_eq!(edit.apply_key(Key::Char(b'y')), EditOutcome::Ignored);
    assert_eq!(edit.bytes().len(), LINE_CAPACITY);
}

#[test]
fn test_enter_commits_current_bytes() {
    let mut edit = LineEdit::begin(1, b"ab");
    edit.apply_key(Key::Char(b'c'));
    match edit.apply_key(Key::Enter) {
        EditOutcome::Commit(bytes) => assert_eq!(bytes, b"abc"),
        other => panic!("expected commit, got {other:?}"),
    }
}

#[test]
fn test_escape_cancels() {
    let mut edit = LineEdit::begin(1, b"ab");
    edit.apply_key(Key::Char(b'c'));
    assert_eq!(edit.apply_key(Key::Escape), EditOutcome::Cancel);
}

#[test]
fn test_up_down_are_ignored() {
    let mut edit = LineEdit::begin(1, b"ab");
    assert_eq!(edit.apply_key(Key::Up), EditOutcome::Ignored);
    assert_eq!(edit.apply_key(Key::Down), EditOutcome::Ignored);
}
