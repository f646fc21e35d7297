//! Paginated, sortable, filterable table over a [`ListController`].
//!
//! The pane owns only cursor and input state; paging, sorting and
//! filtering live in the controller's table view so every front end
//! shares the same semantics.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};

use mockctl_core::{
    CoreError, ListController, ListState, Record, SortDirection, SortSpec, TableParams,
};

use crate::action::Action;
use crate::screens::hints_line;
use crate::theme;

#[derive(Debug, Default)]
pub struct ListPane {
    selected: usize,
    /// Filter being typed, if the filter prompt is open.
    filter_input: Option<String>,
}

/// What to draw in one frame.
pub struct PaneView<'a, R: Record> {
    pub title: &'a str,
    /// `None` while a background task holds the controller.
    pub list: Option<&'a ListController<R>>,
    pub throbber: &'a ThrobberState,
    /// Extra status line (e.g. regeneration progress).
    pub status: Option<Line<'a>>,
    pub hints: &'a [(&'a str, &'a str)],
}

impl ListPane {
    #[cfg(test)]
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn captures_input(&self) -> bool {
        self.filter_input.is_some()
    }

    /// Handle a key against `list`. Returns an action when the key asks
    /// for one (opening a row).
    pub fn handle_key<R: Record>(
        &mut self,
        key: KeyEvent,
        list: &mut ListController<R>,
    ) -> Option<Action> {
        if let Some(input) = self.filter_input.as_mut() {
            match key.code {
                KeyCode::Esc => {
                    self.filter_input = None;
                    apply_filter(list, None);
                    self.selected = 0;
                }
                KeyCode::Enter => self.filter_input = None,
                KeyCode::Backspace => {
                    input.pop();
                    let term = input.clone();
                    apply_filter(list, Some(term));
                    self.selected = 0;
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    let term = input.clone();
                    apply_filter(list, Some(term));
                    self.selected = 0;
                }
                _ => {}
            }
            return None;
        }

        let row_count = list.rows().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < row_count {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
                if let Some(table) = list.table_mut() {
                    table.next_page();
                }
                self.selected = 0;
            }
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
                if let Some(table) = list.table_mut() {
                    table.prev_page();
                }
                self.selected = 0;
            }
            KeyCode::Char('/') => {
                let current = list
                    .table()
                    .and_then(|table| table.params().filter.clone())
                    .unwrap_or_default();
                self.filter_input = Some(current);
            }
            KeyCode::Char('s') => {
                if let Some(table) = list.table_mut() {
                    let next = next_sort_column::<R>(table.params().sorting.as_ref());
                    table.set_sorting(Some(SortSpec::asc(next)));
                }
            }
            KeyCode::Char('S') => {
                if let Some(table) = list.table_mut() {
                    let reversed = table
                        .params()
                        .sorting
                        .as_ref()
                        .map_or_else(|| SortSpec::desc("name"), SortSpec::reversed);
                    table.set_sorting(Some(reversed));
                }
            }
            KeyCode::Enter => {
                let row = list.rows().get(self.selected.min(row_count.saturating_sub(1)))?;
                return Some(Action::Navigate(row.edit_route(list.scope())));
            }
            _ => {}
        }
        None
    }

    pub fn render<R: Record>(&self, frame: &mut Frame, area: Rect, view: PaneView<'_, R>) {
        let count = view
            .list
            .and_then(ListController::table)
            .map(|table| format!(" ({})", table.total()))
            .unwrap_or_default();
        let block = Block::default()
            .title(format!(" {}{count} ", view.title))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Min(1),    // table
            Constraint::Length(1), // status
            Constraint::Length(1), // footer / filter prompt
            Constraint::Length(1), // hints
        ])
        .split(inner);

        match view.list {
            Some(list) if list.state() == ListState::Ready => {
                self.render_table(frame, layout[0], list);
            }
            Some(list) if list.state() == ListState::Failed => {
                let message = list
                    .error()
                    .map(CoreError::payload)
                    .unwrap_or_else(|| "request failed".into());
                let text = vec![
                    Line::from(Span::styled("  Failed to load", theme::error_text())),
                    Line::from(""),
                    Line::from(Span::styled(format!("  {message}"), theme::table_row())),
                ];
                frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), layout[0]);
            }
            _ => {
                let throbber = Throbber::default()
                    .label("  Loading…")
                    .style(Style::default().fg(theme::NEON_CYAN))
                    .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
                frame.render_stateful_widget(throbber, layout[0], &mut view.throbber.clone());
            }
        }

        if let Some(status) = view.status {
            frame.render_widget(Paragraph::new(status), layout[1]);
        }

        let footer = match &self.filter_input {
            Some(input) => Line::from(vec![
                Span::styled("  / ", Style::default().fg(theme::ELECTRIC_PURPLE)),
                Span::styled(input.as_str(), Style::default().fg(theme::NEON_CYAN)),
                Span::styled("█", Style::default().fg(theme::NEON_CYAN)),
                Span::styled("  Esc clear  Enter done", theme::key_hint()),
            ]),
            None => Line::from(Span::styled(
                view.list
                    .and_then(ListController::table)
                    .map(|table| format!("  {}", footer_text(table.params())))
                    .unwrap_or_default(),
                theme::key_hint(),
            )),
        };
        frame.render_widget(Paragraph::new(footer), layout[2]);

        frame.render_widget(Paragraph::new(hints_line(view.hints)), layout[3]);
    }

    fn render_table<R: Record>(&self, frame: &mut Frame, area: Rect, list: &ListController<R>) {
        let sorting = list.table().and_then(|table| table.params().sorting.clone());
        let header = Row::new(R::COLUMNS.iter().map(|column| {
            let marker = match &sorting {
                Some(spec) if spec.field == *column => match spec.direction {
                    SortDirection::Asc => " ▲",
                    SortDirection::Desc => " ▼",
                },
                _ => "",
            };
            Cell::from(format!("{}{marker}", column_label::<R>(column))).style(theme::table_header())
        }));

        let rows = list.rows();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("  No matching rows", theme::key_hint())),
                area,
            );
            return;
        }

        let selected = self.selected.min(rows.len() - 1);
        let body: Vec<Row> = rows
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let is_selected = i == selected;
                let cells = R::COLUMNS.iter().enumerate().map(|(c, column)| {
                    let text = record.field_text(column);
                    if c == 0 {
                        let prefix = if is_selected { "▸" } else { " " };
                        Cell::from(format!("{prefix}{text}")).style(
                            Style::default().fg(theme::NEON_CYAN).add_modifier(if is_selected {
                                Modifier::BOLD
                            } else {
                                Modifier::empty()
                            }),
                        )
                    } else {
                        Cell::from(text)
                    }
                });
                Row::new(cells).style(if is_selected {
                    theme::table_selected()
                } else {
                    theme::table_row()
                })
            })
            .collect();

        let widths: Vec<Constraint> = R::COLUMNS
            .iter()
            .enumerate()
            .map(|(i, _)| if i == 0 { Constraint::Min(16) } else { Constraint::Fill(1) })
            .collect();

        frame.render_widget(Table::new(body, widths).header(header), area);
    }
}

fn apply_filter<R: Record>(list: &mut ListController<R>, term: Option<String>) {
    list.set_filter(term);
    if let Some(table) = list.table_mut() {
        table.set_page(1);
    }
}

/// Column after the currently sorted one, wrapping around.
fn next_sort_column<R: Record>(current: Option<&SortSpec>) -> &'static str {
    let index = current
        .and_then(|spec| R::COLUMNS.iter().position(|c| *c == spec.field))
        .map_or(0, |i| (i + 1) % R::COLUMNS.len());
    R::COLUMNS[index]
}

fn column_label<R: Record>(name: &'static str) -> &'static str {
    R::FIELDS
        .iter()
        .find(|field| field.name == name)
        .map_or(name, |field| field.label)
}

/// "page 2/3 · 24 rows · sort name asc · filter "soap""
pub fn footer_text(params: &TableParams) -> String {
    let mut text = format!(
        "page {}/{} · {} rows",
        params.page,
        params.page_count(),
        params.total
    );
    if let Some(sort) = &params.sorting {
        text.push_str(&format!(" · sort {sort}"));
    }
    if let Some(filter) = &params.filter {
        text.push_str(&format!(" · filter {filter:?}"));
    }
    text
}
