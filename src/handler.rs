use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    if !app.panel_open {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit(),
            KeyCode::Enter | KeyCode::Char('o') => app.toggle_panel(),
            _ => {}
        }
        return;
    }

    if app.search.focused {
        handle_search_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => app.close_panel(),
        KeyCode::Char('/') => app.search.focused = true,
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Left | KeyCode::Right | KeyCode::Enter => app.toggle_expand_at_cursor(),
        KeyCode::Char(' ') => app.toggle_selection_at_cursor(),
        KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.select_all();
            app.set_status_message("all items selected".into());
        }
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.reset_selection();
            app.set_status_message("selection cleared".into());
        }
        _ => {}
    }
}

/// Keystrokes while the search box has focus.
fn handle_search_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            if app.search.query.is_empty() {
                app.search.focused = false;
            } else {
                app.search_clear();
            }
        }
        KeyCode::Enter | KeyCode::Tab | KeyCode::Down => app.search.focused = false,
        KeyCode::Backspace => app.search_delete_char(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_input_char(c);
        }
        _ => {}
    }
}

/// Handle a mouse event: a left press outside the open panel closes it.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
        app.handle_click(mouse.column, mouse.row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tree::store::{sample_raw, TreeStore};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::layout::Rect;
    use tokio::sync::mpsc::unbounded_channel;

    fn setup_app() -> App {
        let (tx, _rx) = unbounded_channel();
        let mut app = App::new(&AppConfig::default(), tx);
        let mut store = TreeStore::new();
        store.initialize(&sample_raw());
        let data = store.data().to_vec();
        app.store = store;
        app.on_tree_data(data);
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn q_quits_when_panel_closed() {
        let mut app = setup_app();
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn enter_opens_panel() {
        let mut app = setup_app();
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(app.panel_open);
    }

    #[test]
    fn esc_closes_panel_before_quitting() {
        let mut app = setup_app();
        app.panel_open = true;
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.panel_open);
        assert!(!app.should_quit);
    }

    #[test]
    fn space_toggles_checkbox_with_cascade() {
        let mut app = setup_app();
        app.panel_open = true;
        handle_key_event(&mut app, key(KeyCode::Char(' ')));
        assert_eq!(app.selection.len(), 4);
    }

    #[test]
    fn ctrl_a_selects_all_ctrl_r_resets() {
        let mut app = setup_app();
        app.panel_open = true;
        handle_key_event(&mut app, ctrl('a'));
        assert_eq!(app.selection.len(), 8);
        handle_key_event(&mut app, ctrl('r'));
        assert!(app.selection.is_empty());
    }

    #[tokio::test]
    async fn slash_focuses_search_and_chars_feed_the_query() {
        let mut app = setup_app();
        app.panel_open = true;
        handle_key_event(&mut app, key(KeyCode::Char('/')));
        assert!(app.search.focused);
        handle_key_event(&mut app, key(KeyCode::Char('1')));
        handle_key_event(&mut app, key(KeyCode::Char('-')));
        assert_eq!(app.search.query, "1-");
        handle_key_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.search.query, "1");
    }

    #[tokio::test]
    async fn esc_in_search_clears_then_unfocuses() {
        let mut app = setup_app();
        app.panel_open = true;
        app.search.focused = true;
        app.search_input_char('x');
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.search.query.is_empty());
        assert!(app.search.focused);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.search.focused);
    }

    #[test]
    fn navigation_moves_cursor() {
        let mut app = setup_app();
        app.panel_open = true;
        handle_key_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.cursor, 1);
        handle_key_event(&mut app, key(KeyCode::Up));
        assert_eq!(app.cursor, 0);
        handle_key_event(&mut app, key(KeyCode::End));
        assert_eq!(app.cursor, 7);
        handle_key_event(&mut app, key(KeyCode::Home));
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn left_right_fold_the_group() {
        let mut app = setup_app();
        app.panel_open = true;
        handle_key_event(&mut app, key(KeyCode::Left));
        assert_eq!(app.visible_rows().len(), 5);
        handle_key_event(&mut app, key(KeyCode::Right));
        assert_eq!(app.visible_rows().len(), 8);
    }

    #[test]
    fn outside_press_closes_the_panel() {
        let mut app = setup_app();
        app.panel_open = true;
        app.mount_panel(Rect::new(10, 5, 40, 10));
        let press = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, press);
        assert!(!app.panel_open);
    }

    #[test]
    fn inside_press_keeps_the_panel() {
        let mut app = setup_app();
        app.panel_open = true;
        app.mount_panel(Rect::new(10, 5, 40, 10));
        let press = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 12,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse_event(&mut app, press);
        assert!(app.panel_open);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = setup_app();
        app.panel_open = true;
        app.search.focused = true;
        handle_key_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }
}
