//! Substring search over the line buffer
//!
//! Literal, forward, cyclic search. Matches never straddle a newline: each
//! line is scanned against its own bytes only. Counting and navigation use
//! the same non-overlapping left-to-right scan, so `count_matches` always
//! agrees with the cycle `search_forward` walks.

use crate::buffer::LineBuffer;
use crate::constants::limits::SEARCH_TERM_MAX;

/// Per-file search state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    /// Whether search navigation is active
    pub active: bool,
    /// Current term, bounded by `SEARCH_TERM_MAX`
    pub term: Vec<u8>,
    /// 1-indexed line of the current hit
    pub result_line: usize,
    /// 0-indexed byte offset of the current hit within its line
    pub result_offset: usize,
    /// Total matches in the buffer for `term`
    pub total_matches: usize,
    /// 1-indexed position of the current hit among all matches
    pub current_match: usize,
}

impl SearchState {
    /// Reset to the inactive state
    pub fn clear(&mut self) {
        *self = SearchState::default();
    }

    /// Install a bounded copy of the term
    pub fn set_term(&mut self, term: &[u8]) {
        self.term = term[..term.len().min(SEARCH_TERM_MAX)].to_vec();
    }

    /// Advance `current_match`, wrapping back to 1 past the last match
    pub fn advance_match(&mut self) {
        if self.total_matches == 0 {
            self.current_match = 0;
        } else if self.current_match >= self.total_matches {
            self.current_match = 1;
        } else {
            self.current_match += 1;
        }
    }
}

/// First occurrence of `term` in `line` at byte offset >= `from`
fn find_in_line(line: &[u8], term: &[u8], from: usize) -> Option<usize> {
    if term.is_empty() || line.len() < term.len() {
        return None;
    }
    let last_start = line.len() - term.len();
    let mut pos = from;
    while pos <= last_start {
        if &line[pos..pos + term.len()] == term {
            return Some(pos);
        }
        pos += 1;
    }
    None
}

/// Offsets of every non-overlapping occurrence of `term` within one line
#[must_use]
pub fn line_matches(line: &[u8], term: &[u8]) -> Vec<usize> {
    let mut hits = Vec::new();
    let mut pos = 0;
    while let Some(hit) = find_in_line(line, term, pos) {
        hits.push(hit);
        pos = hit + term.len();
    }
    hits
}

/// Total non-overlapping occurrences of `term` across the whole buffer
#[must_use]
pub fn count_matches(buffer: &LineBuffer, term: &[u8]) -> usize {
    if term.is_empty() {
        return 0;
    }
    (1..=buffer.line_count())
        .map(|line_no| line_matches(buffer.line(line_no).unwrap_or(&[]), term).len())
        .sum()
}

/// First occurrence at or after `(start_line, start_offset)`, wrapping to
/// the top and scanning back up to (but not including) the start position
#[must_use]
pub fn search_forward(
    buffer: &LineBuffer,
    term: &[u8],
    start_line: usize,
    start_offset: usize,
) -> Option<(usize, usize)> {
    let total = buffer.line_count();
    if term.is_empty() || total == 0 {
        return None;
    }
    let start_line = start_line.clamp(1, total);

    // Remainder of the starting line, then every following line
    if let Some(line) = buffer.line(start_line) {
        if let Some(hit) = find_in_line(line, term, start_offset) {
            return Some((start_line, hit));
        }
    }
    for line_no in start_line + 1..=total {
        if let Some(hit) = find_in_line(buffer.line(line_no)?, term, 0) {
            return Some((line_no, hit));
        }
    }

    // Wrap: top of the buffer up to the starting position
    for line_no in 1..start_line {
        if let Some(hit) = find_in_line(buffer.line(line_no)?, term, 0) {
            return Some((line_no, hit));
        }
    }
    if let Some(line) = buffer.line(start_line) {
        if let Some(hit) = find_in_line(line, term, 0) {
            if hit < start_offset {
                return Some((start_line, hit));
            }
        }
    }

    None
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
