use crate::application::{App, AppMode};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Search => Self::handle_search_mode(app, key),
            AppMode::Confirm(_) => Self::handle_confirm_mode(app, key),
            AppMode::ExportCsv => Self::handle_export_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('d') => app.request_delete(),
                KeyCode::Char('e') => app.start_csv_export(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Tab | KeyCode::Enter | KeyCode::Char('i') => app.start_editing(),
            KeyCode::Char('a') => app.add_student(),
            KeyCode::Char('u') => app.request_update(),
            KeyCode::Char('d') | KeyCode::Delete => app.request_delete(),
            KeyCode::Char('C') => app.request_clear_all(),
            KeyCode::Char('s') => app.cycle_sort_key(),
            KeyCode::Char('/') => app.start_search(),
            KeyCode::F(1) | KeyCode::Char('?') => app.show_help(),
            KeyCode::Esc => {
                app.clear_selection();
                app.status_message = None;
            }
            // 'q' is handled by the main loop
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter | KeyCode::Esc => app.finish_editing(),
            KeyCode::Tab | KeyCode::Down => app.focus_field(app.focused_field.next()),
            KeyCode::BackTab | KeyCode::Up => app.focus_field(app.focused_field.previous()),
            _ => {
                Self::edit_buffer(app, key);
            }
        }
    }

    fn handle_search_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.finish_search(),
            KeyCode::Esc => app.cancel_search(),
            _ => {
                // Live search as the user types
                if Self::edit_buffer(app, key) {
                    app.perform_search();
                }
            }
        }
    }

    fn handle_confirm_mode(app: &mut App, key: KeyCode) {
        app.confirm(matches!(key, KeyCode::Char('y') | KeyCode::Char('Y')));
    }

    fn handle_export_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => app.submit_csv_export(),
            KeyCode::Esc => app.cancel_filename_input(),
            _ => {
                Self::edit_buffer(app, key);
            }
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.help_scroll = app.help_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    /// Applies a line-editing key to the active input buffer.
    ///
    /// Returns whether the buffer's text changed.
    fn edit_buffer(app: &mut App, key: KeyCode) -> bool {
        let mut cursor = app.cursor_position;
        let Some(buffer) = app.input_buffer_mut() else {
            return false;
        };
        let len = buffer.chars().count();
        cursor = cursor.min(len);

        let changed = match key {
            KeyCode::Backspace if cursor > 0 => {
                buffer.remove(byte_index(buffer, cursor - 1));
                cursor -= 1;
                true
            }
            KeyCode::Delete if cursor < len => {
                buffer.remove(byte_index(buffer, cursor));
                true
            }
            KeyCode::Left => {
                cursor = cursor.saturating_sub(1);
                false
            }
            KeyCode::Right => {
                cursor = (cursor + 1).min(len);
                false
            }
            KeyCode::Home => {
                cursor = 0;
                false
            }
            KeyCode::End => {
                cursor = len;
                false
            }
            KeyCode::Char(c) => {
                buffer.insert(byte_index(buffer, cursor), c);
                cursor += 1;
                true
            }
            _ => false,
        };

        app.cursor_position = cursor;
        changed
    }
}

fn byte_index(s: &str, char_pos: usize) -> usize {
    s.char_indices().nth(char_pos).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{DEFAULT_STORE_FILE, FormField, PendingAction, StudentStore};
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        let (store, load_error) = StudentStore::open(dir.path().join(DEFAULT_STORE_FILE));
        App::new(store, load_error)
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn add_via_keys(app: &mut App, fields: [&str; 4]) {
        press(app, KeyCode::Tab);
        for (i, value) in fields.iter().enumerate() {
            if i > 0 {
                press(app, KeyCode::Tab);
            }
            type_text(app, value);
        }
        press(app, KeyCode::Tab);
        press(app, KeyCode::Enter);
        press(app, KeyCode::Char('a'));
    }

    #[test]
    fn test_add_student_with_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        add_via_keys(&mut app, ["s1", "Alice", "20", "A"]);

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.students.len(), 1);
        assert_eq!(app.store.get("s1").unwrap().age, 20);
        assert_eq!(app.focused_field, FormField::Id);
    }

    #[test]
    fn test_editing_field_navigation() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Tab);
        assert!(matches!(app.mode, AppMode::Editing));
        assert_eq!(app.focused_field, FormField::Id);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_field, FormField::Name);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_field, FormField::Grade);

        press(&mut app, KeyCode::Esc);
        assert!(matches!(app.mode, AppMode::Normal));
    }

    #[test]
    fn test_line_editing_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);

        type_text(&mut app, "Zoë");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.name, "Zo");

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('J'));
        assert_eq!(app.form.name, "Jo");

        press(&mut app, KeyCode::End);
        type_text(&mut app, "é");
        assert_eq!(app.form.name, "Joé");
        assert_eq!(app.cursor_position, 3);
    }

    #[test]
    fn test_normal_mode_letters_are_not_typed() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Char('x'));

        assert_eq!(app.form, crate::application::StudentForm::default());
    }

    #[test]
    fn test_live_search_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add_via_keys(&mut app, ["s1", "Alice", "20", "A"]);
        add_via_keys(&mut app, ["s2", "Bob", "21", "B"]);
        add_via_keys(&mut app, ["s3", "Cal", "22", "C"]);

        press(&mut app, KeyCode::Char('/'));
        assert!(matches!(app.mode, AppMode::Search));
        type_text(&mut app, "al");
        assert_eq!(app.students.len(), 2);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.students.len(), 3);

        type_text(&mut app, "bob");
        press(&mut app, KeyCode::Enter);
        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.students.len(), 1);

        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.students.len(), 3);
    }

    #[test]
    fn test_delete_confirmation_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add_via_keys(&mut app, ["s1", "Alice", "20", "A"]);
        add_via_keys(&mut app, ["s2", "Bob", "21", "B"]);

        press(&mut app, KeyCode::Down);
        InputHandler::handle_key_event(&mut app, KeyCode::Char('d'), KeyModifiers::CONTROL);
        assert_eq!(app.mode, AppMode::Confirm(PendingAction::Delete("s1".to_string())));

        press(&mut app, KeyCode::Char('n'));
        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.students.len(), 2);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.students.len(), 1);
        assert_eq!(app.students[0].id, "s2");
    }

    #[test]
    fn test_clear_all_keys() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        add_via_keys(&mut app, ["s1", "Alice", "20", "A"]);

        press(&mut app, KeyCode::Char('C'));
        assert_eq!(app.mode, AppMode::Confirm(PendingAction::ClearAll));
        press(&mut app, KeyCode::Char('Y'));

        assert!(app.store.is_empty());
    }

    #[test]
    fn test_sort_key_binding() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Char('s'));

        assert_eq!(app.sort_key(), crate::domain::SortKey::Name);
    }

    #[test]
    fn test_csv_export_key_binding() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        assert!(matches!(app.mode, AppMode::ExportCsv));
        assert_eq!(app.filename_input, "students.csv");

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.filename_input, "students.csvx");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        assert!(matches!(app.mode, AppMode::Normal));
        assert_eq!(app.pending_export.as_deref(), Some(std::path::Path::new("students.csv")));
    }

    #[test]
    fn test_export_cancel() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        InputHandler::handle_key_event(&mut app, KeyCode::Char('e'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Esc);

        assert!(matches!(app.mode, AppMode::Normal));
        assert!(app.filename_input.is_empty());
        assert!(app.pending_export.is_none());
    }

    #[test]
    fn test_help_scrolling() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);

        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.mode, AppMode::Help));
        press(&mut app, KeyCode::PageDown);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 4);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.help_scroll, 0);
        press(&mut app, KeyCode::Char('q'));
        assert!(matches!(app.mode, AppMode::Normal));
    }
}
