//! Application state for the terminal roster.
//!
//! This module contains the interactive state machine that sits between the
//! key handler and the [`StudentStore`]: the visible list, the details form,
//! pending confirmations and status reporting.

use crate::application::StudentStore;
use crate::domain::{RosterError, RosterResult, SortKey, Student};
use std::path::PathBuf;

/// Default destination offered by the export prompt.
pub const DEFAULT_EXPORT_FILE: &str = "students.csv";

/// Represents the current mode of the application.
///
/// The mode determines how key presses are interpreted and which prompt or
/// popup is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    /// List navigation and shortcuts
    Normal,
    /// Typing into the details form
    Editing,
    /// Typing a live search query
    Search,
    /// Waiting for a yes/no answer before a destructive action
    Confirm(PendingAction),
    /// Typing the CSV export destination
    ExportCsv,
    /// Help popup is displayed
    Help,
}

/// A destructive action held until the user confirms it.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Delete(String),
    Update(String),
    ClearAll,
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            PendingAction::Delete(id) => format!("Delete student {}?", id),
            PendingAction::Update(id) => format!("Update student {}?", id),
            PendingAction::ClearAll => "Are you sure you want to clear all students?".to_string(),
        }
    }
}

/// Fields of the details form, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Id,
    Name,
    Age,
    Grade,
}

impl FormField {
    pub const ALL: [FormField; 4] = [FormField::Id, FormField::Name, FormField::Age, FormField::Grade];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Id => "ID",
            FormField::Name => "Name",
            FormField::Age => "Age",
            FormField::Grade => "Grade",
        }
    }

    pub fn next(self) -> Self {
        match self {
            FormField::Id => FormField::Name,
            FormField::Name => FormField::Age,
            FormField::Age => FormField::Grade,
            FormField::Grade => FormField::Id,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::Id => FormField::Grade,
            FormField::Name => FormField::Id,
            FormField::Age => FormField::Name,
            FormField::Grade => FormField::Age,
        }
    }
}

/// Text entered in the details form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentForm {
    pub id: String,
    pub name: String,
    pub age: String,
    pub grade: String,
}

impl StudentForm {
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Id => &self.id,
            FormField::Name => &self.name,
            FormField::Age => &self.age,
            FormField::Grade => &self.grade,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Id => &mut self.id,
            FormField::Name => &mut self.name,
            FormField::Age => &mut self.age,
            FormField::Grade => &mut self.grade,
        }
    }

    pub fn fill_from(&mut self, student: &Student) {
        self.id = student.id.clone();
        self.name = student.name.clone();
        self.age = student.age.to_string();
        self.grade = student.grade.clone();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Main application state containing the store and UI state.
#[derive(Debug)]
pub struct App {
    /// The record store; the only owner of the collection
    pub store: StudentStore,
    /// Current application mode
    pub mode: AppMode,
    /// Records currently shown in the list
    pub students: Vec<Student>,
    /// Index into `students` of the highlighted row
    pub selected: Option<usize>,
    /// Details form contents
    pub form: StudentForm,
    /// Form field receiving keystrokes in editing mode
    pub focused_field: FormField,
    /// Cursor position, in characters, within the active input buffer
    pub cursor_position: usize,
    /// Live search query; empty means the full sorted list is shown
    pub search_query: String,
    /// Input buffer for the export destination
    pub filename_input: String,
    /// Export destination waiting to be run by the event loop
    pub pending_export: Option<PathBuf>,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
}

impl App {
    /// Wraps an opened store. A load error from opening it is shown once on
    /// the status bar.
    pub fn new(store: StudentStore, load_error: Option<RosterError>) -> Self {
        let status_message = match load_error {
            Some(RosterError::CorruptedStore(_)) => {
                Some("Corrupted data file. Starting fresh.".to_string())
            }
            Some(e) => Some(format!("Could not load data: {}", e)),
            None => Some("Ready - press Tab to start typing in the ID field".to_string()),
        };

        let mut app = Self {
            store,
            mode: AppMode::Normal,
            students: Vec::new(),
            selected: None,
            form: StudentForm::default(),
            focused_field: FormField::default(),
            cursor_position: 0,
            search_query: String::new(),
            filename_input: String::new(),
            pending_export: None,
            help_scroll: 0,
            status_message,
        };
        app.refresh_list();
        app
    }

    /// The key the store was last sorted by; `id` before any sort.
    pub fn sort_key(&self) -> SortKey {
        self.store.sort_key().unwrap_or_default()
    }

    /// Reloads the visible list from the store.
    ///
    /// The store is re-sorted by the current key first, so an active search
    /// lists its matches in that order too.
    pub fn refresh_list(&mut self) {
        let key = self.sort_key();
        self.store.view(Some(key));
        self.students = if self.search_query.is_empty() {
            self.store.view(None).to_vec()
        } else {
            self.store.search(&self.search_query)
        };
        self.selected = match self.selected {
            _ if self.students.is_empty() => None,
            Some(i) => Some(i.min(self.students.len() - 1)),
            None => None,
        };
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.selected.and_then(|i| self.students.get(i))
    }

    /// Re-sorts the store by `key` and refreshes the list.
    pub fn sort_by(&mut self, key: SortKey) {
        self.store.view(Some(key));
        self.refresh_list();
        self.status_message = Some(format!("Sorted by {}", key));
    }

    /// Moves to the next sort key.
    pub fn cycle_sort_key(&mut self) {
        let next = self.sort_key().next();
        self.sort_by(next);
    }

    pub fn select_next(&mut self) {
        let next = match self.selected {
            Some(i) if i + 1 < self.students.len() => i + 1,
            Some(i) => i,
            None if !self.students.is_empty() => 0,
            None => return,
        };
        self.select(next);
    }

    pub fn select_previous(&mut self) {
        let previous = match self.selected {
            Some(i) => i.saturating_sub(1),
            None if !self.students.is_empty() => 0,
            None => return,
        };
        self.select(previous);
    }

    /// Highlights a row and copies its fields into the form.
    pub fn select(&mut self, index: usize) {
        if let Some(student) = self.students.get(index) {
            self.form.fill_from(student);
            self.selected = Some(index);
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.form.clear();
        self.focused_field = FormField::Id;
    }

    /// Switches to editing mode with the cursor at the end of the focused field.
    pub fn start_editing(&mut self) {
        self.mode = AppMode::Editing;
        self.cursor_position = self.form.field(self.focused_field).chars().count();
        self.status_message = None;
    }

    pub fn finish_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    pub fn focus_field(&mut self, field: FormField) {
        self.focused_field = field;
        self.cursor_position = self.form.field(field).chars().count();
    }

    /// The text buffer that receives keystrokes in the current mode.
    pub fn input_buffer_mut(&mut self) -> Option<&mut String> {
        match self.mode {
            AppMode::Editing => Some(self.form.field_mut(self.focused_field)),
            AppMode::Search => Some(&mut self.search_query),
            AppMode::ExportCsv => Some(&mut self.filename_input),
            _ => None,
        }
    }

    /// Submits the form as a new record.
    pub fn add_student(&mut self) {
        let result = self.store.add(&self.form.id, &self.form.name, &self.form.age, &self.form.grade);
        self.finish_mutation(result, "Student added successfully!");
    }

    /// Asks for confirmation before updating the selected record from the form.
    pub fn request_update(&mut self) {
        if self.selected_student().is_none() {
            self.status_message = Some("Select a student to update".to_string());
            return;
        }
        self.mode = AppMode::Confirm(PendingAction::Update(self.form.id.clone()));
    }

    /// Asks for confirmation before deleting the selected record.
    pub fn request_delete(&mut self) {
        match self.selected_student() {
            Some(student) => {
                self.mode = AppMode::Confirm(PendingAction::Delete(student.id.clone()));
            }
            None => self.status_message = Some("Select a student to delete".to_string()),
        }
    }

    pub fn request_clear_all(&mut self) {
        self.mode = AppMode::Confirm(PendingAction::ClearAll);
    }

    /// Resolves the pending confirmation. Declining leaves everything as it was.
    pub fn confirm(&mut self, accepted: bool) {
        let action = match &self.mode {
            AppMode::Confirm(action) => action.clone(),
            _ => return,
        };
        self.mode = AppMode::Normal;
        if !accepted {
            self.status_message = Some("Cancelled".to_string());
            return;
        }

        match action {
            PendingAction::Update(id) => {
                let result = self.store.update(
                    &id,
                    Some(self.form.name.as_str()),
                    Some(self.form.age.as_str()),
                    Some(self.form.grade.as_str()),
                );
                self.finish_mutation(result, "Student updated!");
            }
            PendingAction::Delete(id) => {
                let result = self.store.delete(&id).map(|_| ());
                self.finish_mutation(result, "Student deleted!");
            }
            PendingAction::ClearAll => {
                let result = self.store.clear_all(true).map(|_| ());
                self.finish_mutation(result, "All students cleared!");
            }
        }
    }

    /// Refreshes the list and reports the outcome of a store mutation.
    ///
    /// A save failure still refreshes the list, because the change stays in
    /// memory even though it never reached the file.
    fn finish_mutation(&mut self, result: RosterResult<()>, success: &str) {
        match result {
            Ok(()) => {
                self.refresh_list();
                self.clear_selection();
                self.status_message = Some(success.to_string());
            }
            Err(RosterError::Io(e)) => {
                self.refresh_list();
                self.status_message = Some(format!("Failed to save data: {}", e));
            }
            Err(e) => {
                self.status_message = Some(format!("Error: {}", e));
            }
        }
    }

    pub fn start_search(&mut self) {
        self.mode = AppMode::Search;
        self.cursor_position = self.search_query.chars().count();
        self.status_message = None;
    }

    /// Re-runs the query after every keystroke.
    pub fn perform_search(&mut self) {
        self.selected = None;
        self.refresh_list();
    }

    /// Leaves search mode keeping the filtered list.
    pub fn finish_search(&mut self) {
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
        if !self.search_query.is_empty() {
            self.status_message = Some(format!("{} match(es) for '{}'", self.students.len(), self.search_query));
        }
    }

    /// Leaves search mode and restores the full list.
    pub fn cancel_search(&mut self) {
        self.mode = AppMode::Normal;
        self.search_query.clear();
        self.cursor_position = 0;
        self.perform_search();
    }

    /// Switches to CSV export mode to prompt for a destination.
    pub fn start_csv_export(&mut self) {
        self.mode = AppMode::ExportCsv;
        self.filename_input = DEFAULT_EXPORT_FILE.to_string();
        self.cursor_position = self.filename_input.chars().count();
        self.status_message = None;
    }

    /// Returns the filename input if not empty, otherwise the default.
    pub fn get_csv_export_filename(&self) -> String {
        if self.filename_input.is_empty() {
            DEFAULT_EXPORT_FILE.to_string()
        } else {
            self.filename_input.clone()
        }
    }

    /// Queues the export for the event loop, which owns the terminal and can
    /// redraw the progress gauge between rows.
    pub fn submit_csv_export(&mut self) {
        self.pending_export = Some(PathBuf::from(self.get_csv_export_filename()));
        self.cancel_filename_input();
    }

    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn set_csv_export_result(&mut self, path: &std::path::Path, result: RosterResult<usize>) {
        self.status_message = Some(match result {
            Ok(rows) => format!("Exported {} student(s) to {}", rows, path.display()),
            Err(RosterError::EmptyCollection) => "No students to export!".to_string(),
            Err(e) => format!("Failed to export: {}", e),
        });
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }
}
