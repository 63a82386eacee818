use crate::application::{App, AppMode, FormField};
use crate::domain::Student;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
    Frame,
};

/// Draws the whole screen. `export_progress` is the percentage of an export
/// in flight, if any.
pub fn render_ui(f: &mut Frame, app: &App, export_progress: Option<f64>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(34)])
        .split(chunks[1]);

    render_header(f, app, chunks[0]);
    render_student_list(f, app, body[0]);
    render_form(f, app, body[1]);
    render_progress(f, export_progress, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    match &app.mode {
        AppMode::Help => render_help_popup(f, app.help_scroll),
        AppMode::Confirm(action) => render_confirm_popup(f, &action.prompt()),
        _ => {}
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "roster - Student Records | {} student(s) | File: {}",
        app.store.len(),
        app.store.path().display()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn grade_style(student: &Student) -> Style {
    if student.is_honours() {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn render_student_list(f: &mut Frame, app: &App, area: Rect) {
    let header_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let header = Row::new(["ID", "Name", "Age", "Grade"].map(|h| Cell::from(h).style(header_style))).height(1);

    // Keep the selected row on screen
    let visible_rows = area.height.saturating_sub(3) as usize;
    let offset = match app.selected {
        Some(i) if visible_rows > 0 && i >= visible_rows => i + 1 - visible_rows,
        _ => 0,
    };

    let rows: Vec<Row> = app
        .students
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_rows.max(1))
        .map(|(i, student)| {
            let style = if app.selected == Some(i) {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                grade_style(student)
            };
            Row::new(vec![
                Cell::from(student.id.clone()),
                Cell::from(student.name.clone()),
                Cell::from(student.age.to_string()),
                Cell::from(student.grade.clone()),
            ])
            .style(style)
        })
        .collect();

    let title = if app.search_query.is_empty() {
        format!("Students (sorted by {})", app.sort_key())
    } else {
        format!("Search '{}' ({} matches)", app.search_query, app.students.len())
    };

    let widths = [
        Constraint::Percentage(20),
        Constraint::Percentage(45),
        Constraint::Percentage(15),
        Constraint::Percentage(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);

    f.render_widget(table, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let editing = matches!(app.mode, AppMode::Editing);
    let mut lines = Vec::new();

    for field in FormField::ALL {
        let focused = editing && field == app.focused_field;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_style = if focused {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default()
        };
        let value = app.form.field(field);
        let value = if focused {
            with_cursor(value, app.cursor_position)
        } else {
            value.to_string()
        };

        lines.push(Line::from(Span::styled(format!("{}:", field.label()), label_style)));
        lines.push(Line::from(Span::styled(format!(" {}", value), value_style)));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "a: add | u: update selected",
        Style::default().fg(Color::DarkGray),
    )));

    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Student Details"));
    f.render_widget(form, area);
}

fn with_cursor(value: &str, cursor: usize) -> String {
    let mut shown: String = value.chars().take(cursor).collect();
    shown.push('|');
    shown.extend(value.chars().skip(cursor));
    shown
}

fn render_progress(f: &mut Frame, export_progress: Option<f64>, area: Rect) {
    let percent = export_progress.unwrap_or(0.0).clamp(0.0, 100.0);
    let label = match export_progress {
        Some(p) => format!("Exporting... {:.0}%", p),
        None => String::new(),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::LightBlue).bg(Color::Black))
        .ratio(percent / 100.0)
        .label(label);
    f.render_widget(gauge, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match &app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "Tab: edit form | a: add | u: update | d: delete | C: clear all | /: search | s: sort | Ctrl+E: export CSV | ?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => format!(
            "Editing {} (Tab/Shift+Tab: next/previous field, Enter/Esc: done)",
            app.focused_field.label()
        ),
        AppMode::Search => format!("Search: {} (Enter to keep results, Esc to clear)", app.search_query),
        AppMode::Confirm(action) => format!("{} (y/n)", action.prompt()),
        AppMode::ExportCsv => format!("Export CSV as: {} (Enter to export, Esc to cancel)", app.filename_input),
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Search => Style::default().fg(Color::Yellow),
            AppMode::Confirm(_) => Style::default().fg(Color::Red),
            AppMode::ExportCsv => Style::default().fg(Color::Magenta),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(input, area);
}

fn render_confirm_popup(f: &mut Frame, prompt: &str) {
    let area = f.area();
    let width = (prompt.chars().count().max(26) as u16 + 6).min(area.width);
    let popup_area = Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(5) / 2,
        width,
        height: 5.min(area.height),
    };

    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(vec![Line::from(prompt.to_string()), Line::from(""), Line::from("y: yes | any other key: no")])
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .style(Style::default().fg(Color::White));
    f.render_widget(popup, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("roster Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"ROSTER - STUDENT RECORDS

=== RECORDS ===
Every student has an ID, Name, Age and Grade.
• ID, Name and Grade are required
• IDs must be unique
• Age must be a positive whole number
Rows with grade A or B are shown in green, all others in red.

=== THE DETAILS FORM ===
Tab / Enter / i  Start typing in the form
Tab, ↓           Next field
Shift+Tab, ↑     Previous field
Enter / Esc      Stop typing
a                Add the form as a new student
u                Update the selected student from the form
                 Empty fields keep their current value
                 Nothing changes if any field is invalid

=== THE LIST ===
↑↓ or j/k        Select a student (copies it into the form)
s                Cycle sort key: id → name → age → grade
/                Live search by ID or Name (case-insensitive)
                 Enter keeps the results, Esc clears the search
Esc              Clear the selection and the form

=== DESTRUCTIVE ACTIONS ===
d / Delete / Ctrl+D  Delete the selected student
C                    Clear all students
                     Both ask for confirmation: press y to proceed

=== FILES ===
Every change is written to the data file immediately (JSON).
Ctrl+E           Export the list to CSV in its current order
                 Columns: ID,Name,Age,Grade

=== HELP NAVIGATION ===
↑↓ or j/k        Scroll help text up/down one line
Page Up/Down     Scroll help text up/down 5 lines
Home             Jump to top of help text
Esc/F1/?/q       Close this help window

q                Quit"#;
