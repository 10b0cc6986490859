//! Tests for crossterm key translation

use crate::key::Key;
use crate::term::crossterm::translate_key_event;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

#[test]
fn test_printable_bytes_pass_through() {
    assert_eq!(
        translate_key_event(press(KeyCode::Char('n'), KeyModifiers::NONE)),
        Some(Key::Char(b'n'))
    );
    assert_eq!(
        translate_key_event(press(KeyCode::Char(' '), KeyModifiers::NONE)),
        Some(Key::Char(b' '))
    );
    assert_eq!(
        translate_key_event(press(KeyCode::Char('~'), KeyModifiers::NONE)),
        Some(Key::Char(b'~'))
    );
}

#[test]
fn test_non_ascii_chars_are_ignored() {
    assert_eq!(
        translate_key_event(press(KeyCode::Char('é'), KeyModifiers::NONE)),
        None
    );
}

#[test]
fn test_arrows_and_ctrl_arrows() {
    assert_eq!(
        translate_key_event(press(KeyCode::Up, KeyModifiers::NONE)),
        Some(Key::Up)
    );
    assert_eq!(
        translate_key_event(press(KeyCode::Down, KeyModifiers::NONE)),
        Some(Key::Down)
    );
    assert_eq!(
        translate_key_event(press(KeyCode::Left, KeyModifiers::CONTROL)),
        Some(Key::CtrlLeft)
    );
    assert_eq!(
        translate_key_event(press(KeyCode::Right, KeyModifiers::CONTROL)),
        Some(Key::CtrlRight)
    );
}

#[test]
fn test_editing_keys() {
    assert_eq!(
        translate_key_event(press(KeyCode::Enter, KeyModifiers::NONE)),
        Some(Key::Enter)
    );
    assert_eq!(
        translate_key_event(press(KeyCode::Backspace, KeyModifiers::NONE)),
        Some(Key::Backspace)
    );
    assert_eq!(
        translate_key_event(press(KeyCode::Esc, KeyModifiers::NONE)),
        Some(Key::Escape)
    );
}

#[test]
fn test_ctrl_char_is_ignored() {
    assert_eq!(
        translate_key_event(press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        None
    );
}
