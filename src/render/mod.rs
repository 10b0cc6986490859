//! Viewport rendering
//!
//! Paints a fixed-height window of the buffer framed by a header and a
//! footer. Overlays are composed per visible line in a fixed order: search
//! match highlights first, then remote peer markers inserted immediately
//! before the byte at their column. The local cursor line carries a gutter
//! marker. Span composition is pure so it can be tested without a terminal.

use crate::constants::limits::{MAX_PEERS, VISIBLE_LINES};
use crate::constants::ui;
use crate::document::Document;
use crate::line_edit::LineEdit;
use crate::live::LiveRole;
use crate::search::line_matches;
use crate::term::{Color, ColorTerminal, TerminalBackend};

/// Width of the line-number gutter, including the cursor marker
const GUTTER_WIDTH: usize = 6;

/// Visual classification of a run of bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    /// Part of a search match
    Match,
    /// Part of the current search match
    CurrentMatch,
    /// A remote peer marker, not buffer content
    Peer,
}

/// One run of bytes with a single style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub text: Vec<u8>,
}

/// What the editor loop wants painted besides the document
pub struct RenderContext<'a> {
    /// Live Share role and self id, when a session is up
    pub live: Option<(LiveRole, usize)>,
    /// Active slot index and slot count
    pub slot: usize,
    pub slots: usize,
    /// Inline message for the prompt line
    pub message: Option<&'a str>,
    /// Line edit in progress, drawn over its buffer line
    pub edit: Option<&'a LineEdit>,
}

/// Compose the styled spans for one buffer line
///
/// Match ranges come from the active search term; peer markers are rendered
/// as `[id]`, collapsing to `[+]` when several peers share a column. Peers
/// past the end of the line sit at end-of-line.
#[must_use]
pub fn compose_line(doc: &Document, line_no: usize, self_id: usize) -> Vec<Span> {
    let line = doc.buffer.line(line_no).unwrap_or(&[]);

    let matches = if doc.search.active && !doc.search.term.is_empty() {
        line_matches(line, &doc.search.term)
    } else {
        Vec::new()
    };
    let term_len = doc.search.term.len();

    // Peer markers grouped by clamped column
    let mut marker_cols: Vec<(usize, Vec<usize>)> = Vec::new();
    for id in 1..=MAX_PEERS {
        if id == self_id {
            continue;
        }
        let (peer_line, peer_col) = doc.peer_cursors[id];
        if peer_line != line_no {
            continue;
        }
        let col = peer_col.min(line.len());
        match marker_cols.iter_mut().find(|(c, _)| *c == col) {
            Some((_, ids)) => ids.push(id),
            None => marker_cols.push((col, vec![id])),
        }
    }
    marker_cols.sort_by_key(|(col, _)| *col);

    let mut spans = Vec::new();
    let mut marker_iter = marker_cols.iter().peekable();
    let mut pos = 0;

    while pos <= line.len() {
        if let Some((col, ids)) = marker_iter.peek() {
            if *col == pos {
                let text = if ids.len() == 1 {
                    format!("[{}]", ids[0]).into_bytes()
                } else {
                    b"[+]".to_vec()
                };
                spans.push(Span {
                    kind: SpanKind::Peer,
                    text,
                });
                marker_iter.next();
                continue;
            }
        }
        if pos == line.len() {
            break;
        }

        // Stretch of plain or highlighted bytes up to the next boundary
        let in_match = matches
            .iter()
            .find(|&&m| pos >= m && pos < m + term_len)
            .copied();
        let kind = match in_match {
            Some(m) => {
                if doc.search.result_line == line_no && doc.search.result_offset == m {
                    SpanKind::CurrentMatch
                } else {
                    SpanKind::Match
                }
            }
            None => SpanKind::Plain,
        };
        let run_end = match in_match {
            Some(m) => m + term_len,
            None => {
                let next_match = matches.iter().find(|&&m| m > pos).copied();
                let next_marker = marker_iter.peek().map(|(c, _)| *c);
                [Some(line.len()), next_match, next_marker]
                    .into_iter()
                    .flatten()
                    .min()
                    .unwrap_or(line.len())
            }
        };
        let run_end = run_end.min(line.len()).max(pos + 1);

        // Markers can split a highlighted run
        let run_end = match marker_iter.peek().map(|(c, _)| *c) {
            Some(col) if col > pos && col < run_end => col,
            _ => run_end,
        };

        spans.push(Span {
            kind,
            text: line[pos..run_end].to_vec(),
        });
        pos = run_end;
    }

    spans
}

/// Header text: file name, cursor position, slot and session status
#[must_use]
pub fn header_line(doc: &Document, ctx: &RenderContext<'_>) -> String {
    let live = match ctx.live {
        Some((LiveRole::Host, id)) => format!("  [host #{id}]"),
        Some((LiveRole::Joiner, 0)) => "  [joining...]".to_string(),
        Some((LiveRole::Joiner, id)) => format!("  [peer #{id}]"),
        None => String::new(),
    };
    let slot = if ctx.slots > 1 {
        format!("  (file {}/{})", ctx.slot + 1, ctx.slots)
    } else {
        String::new()
    };
    format!(
        "{}  {}/{}{}{}",
        doc.display_name(),
        doc.current_line,
        doc.total_lines,
        slot,
        live
    )
}

/// Footer text: search status while searching, keymap otherwise
#[must_use]
pub fn footer_line(doc: &Document, editing: bool) -> String {
    if doc.search.active {
        let term = String::from_utf8_lossy(&doc.search.term).into_owned();
        if doc.search.total_matches == 0 {
            format!("no matches for \"{term}\"  esc:clear")
        } else {
            format!(
                "match {}/{} \"{}\"  n:next  esc:clear",
                doc.search.current_match, doc.search.total_matches, term
            )
        }
    } else if editing {
        ui::KEYMAP_EDIT.to_string()
    } else {
        ui::KEYMAP_NORMAL.to_string()
    }
}

/// Paint the full screen
pub fn render<T: TerminalBackend + ColorTerminal>(
    term: &mut T,
    doc: &Document,
    ctx: &RenderContext<'_>,
) -> Result<(), String> {
    let self_id = ctx.live.map_or(0, |(_, id)| id);

    term.hide_cursor()?;
    term.move_cursor(0, 0)?;
    term.clear_to_end_of_line()?;
    term.set_foreground_color(Color::Cyan)?;
    term.write(header_line(doc, ctx).as_bytes())?;
    term.reset_colors()?;

    for row in 0..VISIBLE_LINES {
        let line_no = doc.row_offset + row;
        term.move_cursor(row as u16 + 1, 0)?;
        term.clear_to_end_of_line()?;
        if line_no > doc.total_lines {
            continue;
        }

        let marker = if line_no == doc.current_line { '>' } else { ' ' };
        term.set_foreground_color(Color::DarkGrey)?;
        term.write(format!("{marker}{line_no:4} ").as_bytes())?;
        term.reset_colors()?;

        match ctx.edit {
            Some(edit) if edit.line() == line_no => {
                term.write(edit.bytes())?;
            }
            _ => {
                for span in compose_line(doc, line_no, self_id) {
                    match span.kind {
                        SpanKind::Plain => term.write(&span.text)?,
                        SpanKind::Match => {
                            term.set_background_color(Color::DarkGrey)?;
                            term.write(&span.text)?;
                            term.reset_colors()?;
                        }
                        SpanKind::CurrentMatch => {
                            term.set_background_color(Color::Yellow)?;
                            term.set_foreground_color(Color::Black)?;
                            term.write(&span.text)?;
                            term.reset_colors()?;
                        }
                        SpanKind::Peer => {
                            term.set_foreground_color(Color::Magenta)?;
                            term.write(&span.text)?;
                            term.reset_colors()?;
                        }
                    }
                }
            }
        }
    }

    let footer_row = VISIBLE_LINES as u16 + 1;
    term.move_cursor(footer_row, 0)?;
    term.clear_to_end_of_line()?;
    term.set_foreground_color(Color::DarkGrey)?;
    term.write(footer_line(doc, ctx.edit.is_some()).as_bytes())?;
    term.reset_colors()?;

    term.move_cursor(footer_row + 1, 0)?;
    term.clear_to_end_of_line()?;
    if let Some(message) = ctx.message {
        term.set_foreground_color(Color::Yellow)?;
        term.write(message.as_bytes())?;
        term.reset_colors()?;
    }

    // A line edit owns the hardware cursor
    if let Some(edit) = ctx.edit {
        if edit.line() >= doc.row_offset && edit.line() < doc.row_offset + VISIBLE_LINES {
            let row = (edit.line() - doc.row_offset + 1) as u16;
            term.move_cursor(row, (GUTTER_WIDTH + edit.cursor()) as u16)?;
            term.show_cursor()?;
        }
    }

    term.flush()
}
