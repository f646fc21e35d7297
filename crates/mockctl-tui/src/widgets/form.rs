//! Field cursor and text buffers for record edit forms.
//!
//! Every keystroke is written through `EditController::set_field`, so
//! the working copy only ever holds values that parsed. The raw text a
//! user typed stays in the buffer, with the parse error beside it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use mockctl_core::{EditController, EditSession, FieldKind, FieldSpec, Flag, Record};

use crate::theme;

const LABEL_WIDTH: usize = 18;

#[derive(Debug, Clone)]
pub struct FormState {
    fields: &'static [FieldSpec],
    /// Screen-specific rows shown after the record fields.
    extra_rows: usize,
    cursor: usize,
    buffers: Vec<String>,
    errors: Vec<Option<String>>,
}

/// One rendered form row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
    /// Differs from the loaded record.
    pub modified: bool,
    pub error: Option<String>,
    /// Typed into rather than toggled or cycled.
    pub text_input: bool,
}

impl FormState {
    pub fn for_record<R: Record>(extra_rows: usize) -> Self {
        Self {
            fields: R::FIELDS,
            extra_rows,
            cursor: 0,
            buffers: vec![String::new(); R::FIELDS.len()],
            errors: vec![None; R::FIELDS.len()],
        }
    }

    /// Reset buffers from a freshly loaded record.
    pub fn load<R: Record>(&mut self, record: &R) {
        self.buffers = self.fields.iter().map(|f| record.field_text(f.name)).collect();
        self.errors = vec![None; self.fields.len()];
        self.cursor = self.cursor.min(self.row_count().saturating_sub(1));
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn row_count(&self) -> usize {
        self.fields.len() + self.extra_rows
    }

    /// Index of the screen-specific row under the cursor, if any.
    pub fn extra_row(&self) -> Option<usize> {
        self.cursor.checked_sub(self.fields.len())
    }

    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(Option::is_some)
    }

    /// Move the cursor or edit the focused field. Returns `false` when
    /// the key was not used.
    pub fn handle_key<R: Record>(&mut self, key: KeyEvent, edit: &mut EditController<R>) -> bool {
        let rows = self.row_count();
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.cursor = (self.cursor + 1) % rows;
                return true;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.cursor = (self.cursor + rows - 1) % rows;
                return true;
            }
            _ => {}
        }

        let Some(spec) = self.fields.get(self.cursor).copied() else {
            return false;
        };
        let Some(current) = edit.session().map(|s| s.working().field_text(spec.name)) else {
            return false;
        };
        let typing = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();

        let next = match (spec.kind, key.code) {
            (FieldKind::Flag, KeyCode::Char(' ') | KeyCode::Enter) => {
                let flag = current.parse::<Flag>().unwrap_or(Flag::No);
                flag.toggled().as_str().to_owned()
            }
            (FieldKind::Choice(options), KeyCode::Char(' ') | KeyCode::Right) => {
                cycle(options, &current, 1)
            }
            (FieldKind::Choice(options), KeyCode::Left) => cycle(options, &current, -1),
            (FieldKind::Text | FieldKind::Number | FieldKind::List, KeyCode::Char(c))
                if typing =>
            {
                let mut buffer = self.buffers[self.cursor].clone();
                buffer.push(c);
                buffer
            }
            (FieldKind::Text | FieldKind::Number | FieldKind::List, KeyCode::Backspace) => {
                let mut buffer = self.buffers[self.cursor].clone();
                buffer.pop();
                buffer
            }
            _ => return false,
        };

        self.errors[self.cursor] = edit.set_field(spec.name, &next).err().map(|e| e.to_string());
        self.buffers[self.cursor] = next;
        true
    }

    /// Rows for the record fields, in form order.
    pub fn rows<R: Record>(&self, session: &EditSession<R>) -> Vec<FieldRow> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let text_input = matches!(
                    spec.kind,
                    FieldKind::Text | FieldKind::Number | FieldKind::List
                );
                FieldRow {
                    label: spec.label.to_owned(),
                    value: if text_input {
                        self.buffers.get(i).cloned().unwrap_or_default()
                    } else {
                        session.working().field_text(spec.name)
                    },
                    modified: session.working().field(spec.name)
                        != session.original().field(spec.name),
                    error: self.errors.get(i).cloned().flatten(),
                    text_input,
                }
            })
            .collect()
    }
}

/// The option `step` places after `current`, wrapping around.
fn cycle(options: &[&str], current: &str, step: isize) -> String {
    let len = options.len();
    if len == 0 {
        return current.to_owned();
    }
    let next = match options.iter().position(|o| o.eq_ignore_ascii_case(current)) {
        Some(i) => (i + len).saturating_add_signed(step) % len,
        None => 0,
    };
    options[next].to_owned()
}

/// Draw `rows` as label/value lines with the cursor row highlighted.
pub fn render_rows(frame: &mut Frame, area: Rect, rows: &[FieldRow], cursor: usize) {
    let mut lines = Vec::with_capacity(rows.len() * 2);
    for (i, row) in rows.iter().enumerate() {
        let focused = i == cursor;
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            theme::table_selected()
        } else {
            Style::default().fg(theme::BORDER_GRAY)
        };
        let value_style = if row.error.is_some() {
            theme::error_text()
        } else if row.modified {
            theme::modified_value()
        } else {
            theme::table_row()
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(theme::ELECTRIC_PURPLE)),
            Span::styled(format!("{:<LABEL_WIDTH$}", row.label), label_style),
            Span::styled(row.value.clone(), value_style),
        ];
        if focused && row.text_input {
            spans.push(Span::styled("█", Style::default().fg(theme::NEON_CYAN)));
        }
        if row.modified {
            spans.push(Span::styled(
                " •",
                Style::default()
                    .fg(theme::ELECTRIC_YELLOW)
                    .add_modifier(Modifier::BOLD),
            ));
        }
        lines.push(Line::from(spans));

        if let Some(error) = &row.error {
            lines.push(Line::from(Span::styled(
                format!("  {:LABEL_WIDTH$}{error}", ""),
                theme::error_text(),
            )));
        }
    }
    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::stub_admin;
    use mockctl_core::{RecordId, Service, ServiceAction, ServiceNewController};
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text<R: Record>(form: &mut FormState, edit: &mut EditController<R>, text: &str) {
        for c in text.chars() {
            assert!(form.handle_key(key(KeyCode::Char(c)), edit));
        }
    }

    async fn action_editor() -> (FormState, EditController<ServiceAction>) {
        let admin = stub_admin(None);
        let mut edit = admin.service_action_edit();
        edit.activate(RecordId::new(1)).await;
        let mut form = FormState::for_record::<ServiceAction>(0);
        form.load(edit.session().unwrap().working());
        (form, edit)
    }

    #[tokio::test]
    async fn bad_number_keeps_buffer_and_working_copy_apart() {
        let (mut form, mut edit) = action_editor().await;
        form.handle_key(key(KeyCode::Down), &mut edit);

        type_text(&mut form, &mut edit, "x");
        assert!(form.has_errors());
        assert_eq!(edit.session().unwrap().working().thresholdms, 100);

        form.handle_key(key(KeyCode::Backspace), &mut edit);
        type_text(&mut form, &mut edit, "5");
        assert!(!form.has_errors());
        assert_eq!(edit.session().unwrap().working().thresholdms, 1005);

        let rows = form.rows(edit.session().unwrap());
        assert_eq!(rows[1].value, "1005");
        assert!(rows[1].modified);
        assert!(!rows[0].modified);
    }

    #[tokio::test]
    async fn editing_back_to_the_original_is_clean() {
        let (mut form, mut edit) = action_editor().await;
        type_text(&mut form, &mut edit, "X");
        assert!(!edit.is_clean());
        form.handle_key(key(KeyCode::Backspace), &mut edit);
        assert!(edit.is_clean());
    }

    #[tokio::test]
    async fn flags_toggle_and_choices_cycle() {
        let admin = stub_admin(None);
        let mut controller = ServiceNewController::new(admin, None);
        let edit: &mut EditController<Service> = &mut controller;
        let mut form = FormState::for_record::<Service>(2);
        form.load(edit.session().unwrap().working());

        // typeRequest
        form.handle_key(key(KeyCode::Down), edit);
        form.handle_key(key(KeyCode::Down), edit);
        let before = edit.session().unwrap().working().type_request.clone();
        form.handle_key(key(KeyCode::Char(' ')), edit);
        assert_ne!(edit.session().unwrap().working().type_request, before);
        form.handle_key(key(KeyCode::Left), edit);
        assert_eq!(edit.session().unwrap().working().type_request, before);

        // recordData defaults to yes on a new service
        for _ in 0..6 {
            form.handle_key(key(KeyCode::Down), edit);
        }
        assert_eq!(form.cursor(), 8);
        form.handle_key(key(KeyCode::Char(' ')), edit);
        assert_eq!(edit.session().unwrap().working().record_data, Flag::No);

        // selector rows belong to the screen
        form.handle_key(key(KeyCode::Down), edit);
        form.handle_key(key(KeyCode::Down), edit);
        assert_eq!(form.extra_row(), Some(0));
        assert!(!form.handle_key(key(KeyCode::Char(' ')), edit));
    }

    #[test]
    fn cycle_wraps_both_ways() {
        let options = ["GET", "POST", "PUT"];
        assert_eq!(cycle(&options, "put", 1), "GET");
        assert_eq!(cycle(&options, "GET", -1), "PUT");
        assert_eq!(cycle(&options, "TRACE", 1), "GET");
    }
}
