//! Crossterm implementation of the terminal backend
//!
//! Drawing commands are queued into an in-memory frame and handed to the
//! terminal in a single write on `flush`, so a repaint never reaches the
//! screen half-finished. Only `init` and `deinit` talk to stdout directly.

use crossterm::{
    cursor, execute,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    queue,
    style::{ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::Duration;

use crate::key::Key;
use crate::term::{Color, ColorTerminal, Size, TerminalBackend};

/// Backend that batches a whole frame before touching the terminal
pub struct CrosstermBackend {
    /// Pending frame: queued escape sequences and text
    frame: Vec<u8>,
    /// Raw mode and the alternate screen are up
    active: bool,
}

impl CrosstermBackend {
    pub fn new() -> Result<Self, String> {
        Ok(CrosstermBackend {
            frame: Vec::with_capacity(4096),
            active: false,
        })
    }
}

fn ioerr(op: &'static str) -> impl FnOnce(io::Error) -> String {
    move |e| format!("{op} ({e})")
}

impl TerminalBackend for CrosstermBackend {
    fn init(&mut self) -> Result<(), String> {
        terminal::enable_raw_mode().map_err(ioerr("could not enable raw mode"))?;
        // Raw mode is up; from here on the alternate screen hides everything
        execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)
            .map_err(ioerr("could not switch screens"))?;
        self.active = true;
        Ok(())
    }

    fn deinit(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        // Undo init in reverse; nothing useful to do about failures here
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }

    fn poll(&mut self, timeout: Duration) -> Result<bool, String> {
        event::poll(timeout).map_err(ioerr("input poll broke"))
    }

    fn read_key(&mut self) -> Result<Option<Key>, String> {
        let ev = event::read().map_err(ioerr("input read broke"))?;
        Ok(match ev {
            Event::Key(key) if key.kind != event::KeyEventKind::Release => {
                translate_key_event(key)
            }
            Event::Resize(cols, rows) => Some(Key::Resize(cols, rows)),
            _ => None,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), String> {
        self.frame.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), String> {
        let mut out = io::stdout();
        out.write_all(&self.frame)
            .and_then(|()| out.flush())
            .map_err(ioerr("frame write broke"))?;
        self.frame.clear();
        Ok(())
    }

    fn get_size(&self) -> Result<Size, String> {
        let (cols, rows) = terminal::size().map_err(ioerr("size query broke"))?;
        Ok(Size { rows, cols })
    }

    fn clear_screen(&mut self) -> Result<(), String> {
        queue!(
            self.frame,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )
        .map_err(ioerr("queueing clear broke"))
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), String> {
        queue!(self.frame, cursor::MoveTo(col, row)).map_err(ioerr("queueing move broke"))
    }

    fn hide_cursor(&mut self) -> Result<(), String> {
        queue!(self.frame, cursor::Hide).map_err(ioerr("queueing hide broke"))
    }

    fn show_cursor(&mut self) -> Result<(), String> {
        queue!(self.frame, cursor::Show).map_err(ioerr("queueing show broke"))
    }

    fn clear_to_end_of_line(&mut self) -> Result<(), String> {
        queue!(self.frame, terminal::Clear(ClearType::UntilNewLine))
            .map_err(ioerr("queueing line clear broke"))
    }
}

impl ColorTerminal for CrosstermBackend {
    fn set_foreground_color(&mut self, color: Color) -> Result<(), String> {
        queue!(self.frame, SetForegroundColor(paint(color)))
            .map_err(ioerr("queueing color broke"))
    }

    fn set_background_color(&mut self, color: Color) -> Result<(), String> {
        queue!(self.frame, SetBackgroundColor(paint(color)))
            .map_err(ioerr("queueing color broke"))
    }

    fn reset_colors(&mut self) -> Result<(), String> {
        queue!(self.frame, ResetColor).map_err(ioerr("queueing color broke"))
    }
}

fn paint(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as Ct;
    match color {
        Color::Default => Ct::Reset,
        Color::Black => Ct::Black,
        Color::Yellow => Ct::Yellow,
        Color::Cyan => Ct::Cyan,
        Color::Magenta => Ct::Magenta,
        Color::DarkGrey => Ct::DarkGrey,
        Color::White => Ct::White,
    }
}

/// Translate a crossterm key event into an editor key
/// Returns None for keys the editor does not react to
fn translate_key_event(event: KeyEvent) -> Option<Key> {
    let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
    match event.code {
        KeyCode::Char(c) => {
            if ctrl {
                return None;
            }
            let b = c as u32;
            if (0x20..=0x7E).contains(&b) {
                Some(Key::Char(b as u8))
            } else {
                None
            }
        }
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => {
            if ctrl {
                Some(Key::CtrlLeft)
            } else {
                Some(Key::Left)
            }
        }
        KeyCode::Right => {
            if ctrl {
                Some(Key::CtrlRight)
            } else {
                Some(Key::Right)
            }
        }
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::Esc => Some(Key::Escape),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
