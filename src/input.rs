use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Focus, Intent, View};

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn handle_key(app: &mut App, key: KeyEvent) -> Flow {
    if key.kind == KeyEventKind::Release {
        return Flow::Continue;
    }

    // ctrl+c quits from anywhere, including the editors
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }

    if app.view == View::Help {
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            _ => app.toggle_help(),
        }
        return Flow::Continue;
    }

    if app.focus != Focus::Controls {
        edit_focused(app, key);
        return Flow::Continue;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char(' ') | KeyCode::Enter => app.dispatch(Intent::StartPause),
        KeyCode::Char('r') => app.dispatch(Intent::Reset),
        KeyCode::Char('s') => app.dispatch(Intent::Skip),
        KeyCode::Char('w') => app.dispatch(Intent::ChangeWord),
        KeyCode::Char('t') => app.dispatch(Intent::ChangeTheme),
        KeyCode::Char('a') => {
            app.focus_associations();
        }
        KeyCode::Char('n') => app.focus_notes(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Tab => app.cycle_focus(),
        _ => {}
    }

    Flow::Continue
}

fn edit_focused(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.focus = Focus::Controls;
            return;
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return;
        }
        _ => {}
    }

    let Some(buffer) = app.focused_buffer_mut() else {
        return;
    };

    match key.code {
        KeyCode::Char(c) => buffer.insert(c),
        KeyCode::Enter => buffer.newline(),
        KeyCode::Backspace => buffer.backspace(),
        KeyCode::Delete => buffer.delete(),
        KeyCode::Left => buffer.move_left(),
        KeyCode::Right => buffer.move_right(),
        KeyCode::Up => buffer.move_up(),
        KeyCode::Down => buffer.move_down(),
        KeyCode::Home => buffer.move_home(),
        KeyCode::End => buffer.move_end(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SilentNotifier;
    use crate::pools::{ContentPools, SupportedLanguage};
    use crate::runtime::FixedTicker;

    fn app() -> App {
        App::new(
            ContentPools::builtin(SupportedLanguage::English).unwrap(),
            Some(2),
            Box::new(SilentNotifier),
            &FixedTicker::per_second(),
        )
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_space_toggles_clock() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.is_running);
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.session.is_running);
    }

    #[test]
    fn test_skip_and_reset_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.session.phase_index, 1);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session.phase_index, 0);
        assert_eq!(app.session.elapsed_secs, 0);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
        assert_eq!(press(&mut app, KeyCode::Esc), Flow::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        app.focus_notes();
        assert_eq!(handle_key(&mut app, ctrl_c), Flow::Quit);
    }

    #[test]
    fn test_typing_goes_to_notes_not_controls() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.focus, Focus::Notes);
        for c in "rsq ".chars() {
            assert_eq!(press(&mut app, KeyCode::Char(c)), Flow::Continue);
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.notes.buffer().text(), "rsq ");
        assert!(!app.session.is_running);
        assert_eq!(app.session.phase_index, 0);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::Controls);
    }

    #[test]
    fn test_arrow_keys_move_between_note_lines() {
        let mut app = app();
        press(&mut app, KeyCode::Char('n'));
        for c in "abc".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('d'));

        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Char('X'));
        assert_eq!(app.notes.buffer().text(), "aXbc\nd");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char('Y'));
        assert_eq!(app.notes.buffer().text(), "aXbc\ndY");
    }

    #[test]
    fn test_associations_key_only_in_warm_up() {
        let mut app = app();
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus, Focus::Associations);
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.associations.text(), "x");
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('s'));
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus, Focus::Controls);
    }

    #[test]
    fn test_help_view_swallows_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.view, View::Help);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.view, View::Session);
        assert_eq!(app.session.phase_index, 0);
    }

    #[test]
    fn test_change_keys_keep_prompts_in_pools() {
        let mut app = app();
        press(&mut app, KeyCode::Char('w'));
        press(&mut app, KeyCode::Char('t'));
        assert!(app.pools().words.entries().contains(&app.prompts.word));
        assert!(app
            .pools()
            .expression_themes
            .entries()
            .contains(&app.prompts.expression_theme));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let mut key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        handle_key(&mut app, key);
        assert!(!app.session.is_running);
    }
}
