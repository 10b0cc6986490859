//! Tests for the line buffer and silent mutators

use crate::buffer::LineBuffer;
use crate::constants::limits::BUFFER_CAPACITY;

#[test]
fn test_from_bytes_terminated() {
    let buf = LineBuffer::from_bytes(b"alpha\nbeta\ngamma\n");
    assert_eq!(buf.line_count(), 3);
    assert_eq!(buf.line(1), Some(&b"alpha"[..]));
    assert_eq!(buf.line(2), Some(&b"beta"[..]));
    assert_eq!(buf.line(3), Some(&b"gamma"[..]));
    assert_eq!(buf.to_bytes(), b"alpha\nbeta\ngamma\n");
}

#[test]
fn test_from_bytes_unterminated_final_line() {
    let buf = LineBuffer::from_bytes(b"alpha\nbeta");
    assert_eq!(buf.line_count(), 2);
    assert_eq!(buf.line(2), Some(&b"beta"[..]));
    assert_eq!(buf.to_bytes(), b"alpha\nbeta");
}

#[test]
fn test_empty_buffer_has_zero_lines() {
    let buf = LineBuffer::from_bytes(b"");
    assert_eq!(buf.line_count(), 0);
    assert!(buf.is_empty());
    assert_eq!(buf.to_bytes(), b"");
}

#[test]
fn test_lone_newline_is_one_empty_line() {
    let buf = LineBuffer::from_bytes(b"\n");
    assert_eq!(buf.line_count(), 1);
    assert_eq!(buf.line(1), Some(&b""[..]));
    assert_eq!(buf.to_bytes(), b"\n");
}

#[test]
fn test_insert_after_middle() {
    let mut buf = LineBuffer::from_bytes(b"alpha\nbeta\ngamma\n");
    buf.insert_after(1, b"");
    assert_eq!(buf.line_count(), 4);
    assert_eq!(buf.to_bytes(), b"alpha\n\nbeta\ngamma\n");
}

#[test]
fn test_insert_after_zero_prepends() {
    let mut buf = LineBuffer::from_bytes(b"alpha\nbeta\n");
    buf.insert_after(0, b"zero");
    assert_eq!(buf.line_count(), 3);
    assert_eq!(buf.to_bytes(), b"zero\nalpha\nbeta\n");
}

#[test]
fn test_insert_after_end_appends() {
    let mut buf = LineBuffer::from_bytes(b"alpha\n");
    buf.insert_after(9, b"omega");
    assert_eq!(buf.line_count(), 2);
    assert_eq!(buf.to_bytes(), b"alpha\nomega\n");
}

#[test]
fn test_insert_after_unterminated_end_adds_newlines() {
    let mut buf = LineBuffer::from_bytes(b"alpha");
    buf.insert_after(1, b"omega");
    assert_eq!(buf.line_count(), 2);
    assert_eq!(buf.to_bytes(), b"alpha\nomega\n");
}

#[test]
fn test_delete_middle_line() {
    let mut buf = LineBuffer::from_bytes(b"alpha\nbeta\ngamma\n");
    buf.delete_line(2);
    assert_eq!(buf.line_count(), 2);
    assert_eq!(buf.to_bytes(), b"alpha\ngamma\n");
}

#[test]
fn test_delete_first_line_shifts() {
    let mut buf = LineBuffer::from_bytes(b"alpha\nbeta\ngamma\n");
    buf.delete_line(1);
    assert_eq!(buf.line(1), Some(&b"beta"[..]));
    assert_eq!(buf.to_bytes(), b"beta\ngamma\n");
}

#[test]
fn test_delete_unterminated_last_line_takes_leading_newline() {
    let mut buf = LineBuffer::from_bytes(b"alpha\nbeta");
    buf.delete_line(2);
    assert_eq!(buf.line_count(), 1);
    assert_eq!(buf.to_bytes(), b"alpha");
}

#[test]
fn test_delete_refuses_single_line() {
    let mut buf = LineBuffer::from_bytes(b"alpha\n");
    buf.delete_line(1);
    assert_eq!(buf.line_count(), 1);
    assert_eq!(buf.to_bytes(), b"alpha\n");
}

#[test]
fn test_replace_line_preserves_newline() {
    let mut buf = LineBuffer::from_bytes(b"alpha\nbeta\ngamma\n");
    buf.replace_line(2, b"BETA");
    assert_eq!(buf.line_count(), 3);
    assert_eq!(buf.to_bytes(), b"alpha\nBETA\ngamma\n");
}

#[test]
fn test_replace_unterminated_last_line() {
    let mut buf = LineBuffer::from_bytes(b"alpha\nbeta");
    buf.replace_line(2, b"B");
    assert_eq!(buf.to_bytes(), b"alpha\nB");
}

#[test]
fn test_apply_snapshot_is_idempotent() {
    let mut buf = LineBuffer::new();
    buf.apply_snapshot(b"one\ntwo\n");
    let first = buf.to_bytes();
    buf.apply_snapshot(b"one\ntwo\n");
    assert_eq!(buf.to_bytes(), first);
    assert_eq!(buf.line_count(), 2);
}

#[test]
fn test_insert_then_delete_round_trip() {
    let original = b"alpha\nbeta\ngamma\n";
    let mut buf = LineBuffer::from_bytes(original);
    buf.insert_after(2, b"delta");
    buf.delete_line(3);
    assert_eq!(buf.to_bytes(), original);
}

#[test]
fn test_capacity_truncates_payload() {
    let big = vec![b'x'; BUFFER_CAPACITY];
    let mut buf = LineBuffer::from_bytes(&big);
    let before = buf.byte_len();
    assert!(before <= BUFFER_CAPACITY);

    buf.insert_after(1, b"overflow");
    // The line is inserted but its payload is truncated to fit
    assert_eq!(buf.line_count(), 2);
    assert!(buf.byte_len() <= BUFFER_CAPACITY + 1);
}

#[test]
fn test_byte_len_matches_serialized_len() {
    for sample in [
        &b"alpha\nbeta\ngamma\n"[..],
        &b"alpha\nbeta"[..],
        &b"\n"[..],
        &b""[..],
        &b"one"[..],
    ] {
        let buf = LineBuffer::from_bytes(sample);
        assert_eq!(buf.byte_len(), buf.to_bytes().len());
    }
}
