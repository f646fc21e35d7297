//! Service action editor. Service actions are created by regeneration,
//! so there is no "new" route and no delete.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use mockctl_core::{Admin, EditController, RecordId, Route, ServiceAction};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{hints_line, spawn_task};
use crate::theme;
use crate::widgets::form::{FormState, render_rows};
use crate::widgets::overlay::render_alert;

const HINTS: &[(&str, &str)] = &[("Tab", "move"), ("Ctrl+S", "save"), ("Esc", "back")];

struct ActionEditor {
    controller: EditController<ServiceAction>,
    form: FormState,
}

impl ActionEditor {
    async fn activate(&mut self, id: RecordId) {
        self.controller.activate(id).await;
        if let Some(session) = self.controller.session() {
            self.form.load(session.working());
        }
    }
}

pub struct ServiceActionFormScreen {
    admin: Admin,
    editor: Option<Arc<Mutex<ActionEditor>>>,
    saving: bool,
    discard_warned: bool,
    throbber: ThrobberState,
    action_tx: Option<UnboundedSender<Action>>,
}

impl ServiceActionFormScreen {
    pub fn new(admin: Admin) -> Self {
        Self {
            admin,
            editor: None,
            saving: false,
            discard_warned: false,
            throbber: ThrobberState::default(),
            action_tx: None,
        }
    }

    fn open(&mut self, id: RecordId) {
        let editor = Arc::new(Mutex::new(ActionEditor {
            controller: self.admin.service_action_edit(),
            form: FormState::for_record::<ServiceAction>(0),
        }));
        self.editor = Some(Arc::clone(&editor));
        self.saving = false;
        self.discard_warned = false;
        spawn_task(self.action_tx.as_ref(), async move {
            editor.lock().await.activate(id).await;
            None
        });
    }

    fn save(&mut self, shared: Arc<Mutex<ActionEditor>>) {
        self.saving = true;
        spawn_task(self.action_tx.as_ref(), async move {
            shared.lock().await.controller.save().await.ok()?;
            Some(Action::Notify(Notification::success("Service action saved")))
        });
    }

    fn handle_editor_key(
        &mut self,
        key: KeyEvent,
        shared: &Arc<Mutex<ActionEditor>>,
    ) -> Option<Action> {
        let Ok(mut guard) = shared.try_lock() else {
            return None;
        };
        let editor = &mut *guard;

        if editor.controller.alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                editor.controller.dismiss_alert();
            }
            return None;
        }
        if editor.controller.session().is_none() {
            return (key.code == KeyCode::Esc).then_some(Action::Navigate(Route::ServiceActions));
        }

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if editor.form.has_errors() {
                    return Some(Action::Notify(Notification::warning(
                        "Fix the highlighted fields before saving",
                    )));
                }
                drop(guard);
                self.save(Arc::clone(shared));
                None
            }
            KeyCode::Esc => {
                if !editor.controller.is_clean() && !self.discard_warned {
                    self.discard_warned = true;
                    return Some(Action::Notify(Notification::warning(
                        "Unsaved changes, press Esc again to discard",
                    )));
                }
                Some(Action::Navigate(Route::ServiceActions))
            }
            _ => {
                self.discard_warned = false;
                editor.form.handle_key(key, &mut editor.controller);
                None
            }
        }
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, editor: &ActionEditor) {
        let title = match editor.controller.session() {
            Some(session) => format!(" Edit Service Action #{} ", session.original().id),
            None => " Edit Service Action ".to_owned(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if let Some(error) = editor.controller.load_error() {
            let text = vec![
                Line::from(Span::styled("  Failed to load service action", theme::error_text())),
                Line::from(""),
                Line::from(Span::styled(format!("  {}", error.payload()), theme::table_row())),
                Line::from(""),
                hints_line(&[("Esc", "back")]),
            ];
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
            return;
        }
        let Some(session) = editor.controller.session() else {
            self.render_spinner(frame, inner, "  Loading…");
            return;
        };

        let [fields, state, hints] = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        render_rows(frame, fields, &editor.form.rows(session), editor.form.cursor());
        let dirty = if session.is_clean() {
            Span::styled("  no changes", theme::key_hint())
        } else {
            Span::styled("  ● unsaved changes", theme::modified_value())
        };
        frame.render_widget(Paragraph::new(Line::from(dirty)), state);
        frame.render_widget(Paragraph::new(hints_line(HINTS)), hints);

        if let Some(alert) = editor.controller.alert() {
            render_alert(frame, area, alert);
        }
    }

    fn render_spinner(&self, frame: &mut Frame, area: Rect, label: &'static str) {
        let throbber = Throbber::default()
            .label(label)
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
    }
}

impl Component for ServiceActionFormScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Some(shared) = self.editor.clone() else {
            return Ok(None);
        };
        Ok(self.handle_editor_key(key, &shared))
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RouteChanged(Route::EditServiceAction { id }) => self.open(*id),
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(shared) = &self.editor else {
            return;
        };
        match shared.try_lock() {
            Ok(editor) => self.render_editor(frame, area, &editor),
            Err(_) if self.saving => self.render_spinner(frame, area, "  Saving…"),
            Err(_) => self.render_spinner(frame, area, "  Loading…"),
        }
    }

    fn captures_input(&self) -> bool {
        true
    }
}
