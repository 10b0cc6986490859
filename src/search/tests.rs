//! Tests for the search engine

use crate::buffer::LineBuffer;
use crate::search::{count_matches, search_forward, SearchState};

fn sample() -> LineBuffer {
    LineBuffer::from_bytes(b"alpha\nbeta\ngamma\n")
}

#[test]
fn test_count_matches_single_byte_term() {
    let buf = sample();
    assert_eq!(count_matches(&buf, b"a"), 5);
    assert_eq!(count_matches(&buf, b"ta"), 1);
    assert_eq!(count_matches(&buf, b"zz"), 0);
}

#[test]
fn test_count_matches_non_overlapping() {
    let buf = LineBuffer::from_bytes(b"aaaa\n");
    assert_eq!(count_matches(&buf, b"aa"), 2);
}

#[test]
fn test_count_matches_does_not_straddle_newline() {
    let buf = LineBuffer::from_bytes(b"ab\ncd\n");
    assert_eq!(count_matches(&buf, b"bc"), 0);
}

#[test]
fn test_search_forward_from_start() {
    let buf = sample();
    assert_eq!(search_forward(&buf, b"a", 1, 0), Some((1, 0)));
}

#[test]
fn test_search_forward_continues_within_line() {
    let buf = sample();
    assert_eq!(search_forward(&buf, b"a", 1, 1), Some((1, 4)));
}

#[test]
fn test_search_forward_moves_to_later_line() {
    let buf = sample();
    assert_eq!(search_forward(&buf, b"a", 1, 5), Some((2, 3)));
    assert_eq!(search_forward(&buf, b"gam", 1, 0), Some((3, 0)));
}

#[test]
fn test_search_forward_wraps_to_first_match() {
    let buf = sample();
    // Past the last match in the buffer
    assert_eq!(search_forward(&buf, b"a", 3, 5), Some((1, 0)));
}

#[test]
fn test_search_forward_wrap_excludes_start_position() {
    let buf = LineBuffer::from_bytes(b"xyz\n");
    // Only match is at (1, 0); starting exactly there finds it forward
    assert_eq!(search_forward(&buf, b"xyz", 1, 0), Some((1, 0)));
    // Starting past it wraps and finds it again before the start offset
    assert_eq!(search_forward(&buf, b"xyz", 1, 1), Some((1, 0)));
}

#[test]
fn test_search_forward_no_match() {
    let buf = sample();
    assert_eq!(search_forward(&buf, b"omega", 1, 0), None);
    assert_eq!(search_forward(&buf, b"", 1, 0), None);
}

#[test]
fn test_cycle_visits_every_counted_match() {
    let buf = sample();
    let term = b"a";
    let total = count_matches(&buf, term);

    let mut seen = Vec::new();
    let first = search_forward(&buf, term, 1, 0).unwrap();
    let (mut line, mut offset) = first;
    loop {
        if seen.contains(&(line, offset)) {
            break;
        }
        seen.push((line, offset));
        let next = search_forward(&buf, term, line, offset + term.len()).unwrap();
        line = next.0;
        offset = next.1;
    }

    assert_eq!(seen.len(), total);
    assert_eq!((line, offset), first);
}

#[test]
fn test_advance_match_wraps() {
    let mut state = SearchState::default();
    state.total_matches = 3;
    state.current_match = 1;
    state.advance_match();
    assert_eq!(state.current_match, 2);
    state.advance_match();
    assert_eq!(state.current_match, 3);
    state.advance_match();
    assert_eq!(state.current_match, 1);
}

#[test]
fn test_set_term_bounds_length() {
    let mut state = SearchState::default();
    let long = vec![b'q'; 500];
    state.set_term(&long);
    assert_eq!(state.term.len(), crate::constants::limits::SEARCH_TERM_MAX);
}
