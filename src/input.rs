//! Key bindings per screen.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Effect, Screen};
use crate::quiz::{Mode, Phase};

/// Apply a key press to the app and return the work it asks for.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Vec<Effect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        app.quit();
        return Vec::new();
    }

    match &app.screen {
        Screen::Sentence { quiz, .. } => {
            let (mode, phase) = (quiz.mode(), quiz.phase());
            handle_sentence_input(app, key.code, ctrl, mode, phase)
        }
        Screen::Kana { .. } | Screen::WordPic { .. } => handle_choice_input(app, key.code),
        Screen::LoadFailed { .. } => handle_failed_input(app, key.code),
        _ => handle_menu_input(app, key.code),
    }
}

fn handle_menu_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Tab => app.toggle(),
        KeyCode::Enter | KeyCode::Char(' ') => return app.activate(),
        KeyCode::Esc | KeyCode::Backspace => app.back(),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        _ => {}
    }
    Vec::new()
}

fn handle_failed_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => app.retry(),
        other => handle_menu_input(app, other),
    }
}

fn handle_choice_input(app: &mut App, key: KeyCode) -> Vec<Effect> {
    match key {
        KeyCode::Char(c @ '1'..='9') => app.choose(digit_index(c)),
        other => handle_menu_input(app, other),
    }
}

fn handle_sentence_input(
    app: &mut App,
    key: KeyCode,
    ctrl: bool,
    mode: Mode,
    phase: Phase,
) -> Vec<Effect> {
    match key {
        KeyCode::Char('t') if ctrl => app.hint(),
        KeyCode::Char('g') if ctrl => return app.check(),
        KeyCode::Esc => app.back(),
        KeyCode::Tab => app.toggle(),
        KeyCode::Up => app.move_cursor(-1),
        KeyCode::Down => app.move_cursor(1),
        KeyCode::Left if mode == Mode::Easy => app.move_cursor(-1),
        KeyCode::Right if mode == Mode::Easy => app.move_cursor(1),
        KeyCode::Enter => return app.activate(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(c) if !ctrl && app.is_typing() => app.type_char(c),
        KeyCode::Char('n') if phase == Phase::Reviewing => app.next_question(),
        KeyCode::Char('c') if phase == Phase::Answering => return app.check(),
        KeyCode::Char(c @ '1'..='9') if mode == Mode::Easy => app.clear_slot(digit_index(c)),
        KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Char('q') | KeyCode::Char('Q') => app.quit(),
        _ => {}
    }
    Vec::new()
}

fn digit_index(c: char) -> usize {
    c.to_digit(10).map_or(0, |d| d as usize).saturating_sub(1)
}
