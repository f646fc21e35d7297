//! New and edit service form.
//!
//! Both routes share one screen: the record fields come from the
//! generic form widget, followed by the environment and mock-group
//! selectors. Editing an existing service adds delete.

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

use mockctl_core::{
    Admin, BusMessage, EditController, RecordId, Route, Service, ServiceEditController,
    ServiceForm, ServiceNewController,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{hints_line, spawn_task};
use crate::theme;
use crate::widgets::form::{FieldRow, FormState, render_rows};
use crate::widgets::overlay::{render_alert, render_confirm};

const ENVIRONMENT_ROW: usize = 0;
const MOCK_GROUP_ROW: usize = 1;
const SELECTOR_ROWS: usize = 2;

enum ServiceController {
    New(ServiceNewController),
    Edit(ServiceEditController),
}

impl ServiceController {
    fn form(&self) -> &ServiceForm {
        match self {
            Self::New(c) => c,
            Self::Edit(c) => c,
        }
    }

    fn form_mut(&mut self) -> &mut ServiceForm {
        match self {
            Self::New(c) => c,
            Self::Edit(c) => c,
        }
    }
}

struct ServiceEditor {
    controller: ServiceController,
    form: FormState,
}

impl ServiceEditor {
    fn new(controller: ServiceController) -> Self {
        Self {
            controller,
            form: FormState::for_record::<Service>(SELECTOR_ROWS),
        }
    }

    async fn activate(&mut self, id: Option<RecordId>) {
        match (&mut self.controller, id) {
            (ServiceController::New(c), _) => c.activate().await,
            (ServiceController::Edit(c), Some(id)) => c.activate(id).await,
            (ServiceController::Edit(_), None) => {}
        }
        if let Some(session) = self.controller.form().session() {
            self.form.load(session.working());
        }
    }

    fn title(&self) -> String {
        let group = self.controller.form().scope().unwrap_or("all");
        match &self.controller {
            ServiceController::New(_) => format!("New Service · {group}"),
            ServiceController::Edit(c) => match c.session() {
                Some(session) => format!("Edit Service #{} · {group}", session.original().id),
                None => format!("Edit Service · {group}"),
            },
        }
    }

    fn selector_rows(&self) -> Vec<FieldRow> {
        let form = self.controller.form();
        let reference = form.reference();
        let Some(session) = form.session() else {
            return Vec::new();
        };
        let (working, original) = (session.working(), session.original());
        vec![
            FieldRow {
                label: "Environment".into(),
                value: selector_value(
                    reference.selected_environment().map(|e| e.name.as_str()),
                    reference.environments().len(),
                ),
                modified: working.environment_name != original.environment_name,
                error: None,
                text_input: false,
            },
            FieldRow {
                label: "Mock group".into(),
                value: selector_value(
                    reference.selected_mock_group().map(|g| g.name.as_str()),
                    reference.mock_groups().len(),
                ),
                modified: working.mock_group_id != original.mock_group_id,
                error: None,
                text_input: false,
            },
        ]
    }

    /// Only the new-service form follows group changes.
    fn handle_bus(&mut self, message: &BusMessage) {
        if let ServiceController::New(controller) = &mut self.controller {
            controller.handle(message);
        }
    }
}

fn selector_value(selected: Option<&str>, options: usize) -> String {
    format!("{}  ({options} options)", selected.unwrap_or("(none)"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Busy {
    Loading,
    Saving,
    Deleting,
}

impl Busy {
    fn label(self) -> &'static str {
        match self {
            Self::Loading => "  Loading…",
            Self::Saving => "  Saving…",
            Self::Deleting => "  Deleting…",
        }
    }
}

pub struct ServiceFormScreen {
    admin: Admin,
    editor: Option<Arc<Mutex<ServiceEditor>>>,
    busy: Busy,
    confirm_delete: bool,
    /// Esc was pressed once with unsaved changes.
    discard_warned: bool,
    throbber: ThrobberState,
    action_tx: Option<UnboundedSender<Action>>,
}

impl ServiceFormScreen {
    pub fn new(admin: Admin) -> Self {
        Self {
            admin,
            editor: None,
            busy: Busy::Loading,
            confirm_delete: false,
            discard_warned: false,
            throbber: ThrobberState::default(),
            action_tx: None,
        }
    }

    fn install(&mut self, editor: ServiceEditor) -> Arc<Mutex<ServiceEditor>> {
        let shared = Arc::new(Mutex::new(editor));
        self.editor = Some(Arc::clone(&shared));
        self.confirm_delete = false;
        self.discard_warned = false;
        shared
    }

    /// Pass a bus message to the editor. While a load or save holds the
    /// editor, the message waits for the lock instead of being dropped.
    fn reload(&self, message: &BusMessage) {
        let Some(shared) = self.editor.clone() else {
            return;
        };
        if let Ok(mut editor) = shared.try_lock() {
            editor.handle_bus(message);
            return;
        }
        let message = message.clone();
        spawn_task(self.action_tx.as_ref(), async move {
            shared.lock().await.handle_bus(&message);
            None
        });
    }

    fn open(&mut self, route: &Route) {
        let (controller, id) = match route {
            Route::NewService { group } => (
                ServiceController::New(self.admin.service_new(Some(group.clone()))),
                None,
            ),
            Route::EditService { id, group } => (
                ServiceController::Edit(self.admin.service_edit(Some(group.clone()))),
                Some(*id),
            ),
            _ => return,
        };
        let shared = self.install(ServiceEditor::new(controller));
        self.busy = Busy::Loading;
        spawn_task(self.action_tx.as_ref(), async move {
            shared.lock().await.activate(id).await;
            None
        });
    }

    fn save(&mut self, shared: Arc<Mutex<ServiceEditor>>) {
        self.busy = Busy::Saving;
        spawn_task(self.action_tx.as_ref(), async move {
            let mut editor = shared.lock().await;
            let created = matches!(editor.controller, ServiceController::New(_));
            editor.controller.form_mut().save().await.ok()?;
            let name = editor
                .controller
                .form()
                .session()
                .map(|s| s.working().name.clone())
                .unwrap_or_default();
            let message = if created {
                format!("Service '{name}' created")
            } else {
                format!("Service '{name}' saved")
            };
            Some(Action::Notify(Notification::success(message)))
        });
    }

    fn destroy(&mut self, shared: Arc<Mutex<ServiceEditor>>) {
        self.busy = Busy::Deleting;
        spawn_task(self.action_tx.as_ref(), async move {
            let mut editor = shared.lock().await;
            let ServiceController::Edit(controller) = &mut editor.controller else {
                return None;
            };
            controller.destroy().await.ok()?;
            Some(Action::Notify(Notification::success("Service deleted")))
        });
    }

    fn handle_editor_key(
        &mut self,
        key: KeyEvent,
        shared: &Arc<Mutex<ServiceEditor>>,
    ) -> Option<Action> {
        let Ok(mut guard) = shared.try_lock() else {
            return None;
        };
        let editor = &mut *guard;

        if editor.controller.form().alert().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                editor.controller.form_mut().dismiss_alert();
            }
            return None;
        }

        if self.confirm_delete {
            match key.code {
                KeyCode::Char('y' | 'Y') => {
                    self.confirm_delete = false;
                    drop(guard);
                    self.destroy(Arc::clone(shared));
                }
                KeyCode::Char('n' | 'N') | KeyCode::Esc => self.confirm_delete = false,
                _ => {}
            }
            return None;
        }

        let back = Action::Navigate(Route::services(editor.controller.form().scope()));
        if editor.controller.form().session().is_none() {
            return (key.code == KeyCode::Esc).then_some(back);
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => {
                if editor.form.has_errors() {
                    return Some(Action::Notify(Notification::warning(
                        "Fix the highlighted fields before saving",
                    )));
                }
                drop(guard);
                self.save(Arc::clone(shared));
                return None;
            }
            KeyCode::Char('d') if ctrl => {
                self.confirm_delete = matches!(editor.controller, ServiceController::Edit(_));
                return None;
            }
            KeyCode::Esc => {
                if !editor.controller.form().is_clean() && !self.discard_warned {
                    self.discard_warned = true;
                    return Some(Action::Notify(Notification::warning(
                        "Unsaved changes, press Esc again to discard",
                    )));
                }
                return Some(back);
            }
            _ => {}
        }
        self.discard_warned = false;

        let edit: &mut EditController<Service> = editor.controller.form_mut();
        if editor.form.handle_key(key, edit) {
            return None;
        }

        let cycles = matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Right);
        let result = match editor.form.extra_row() {
            Some(ENVIRONMENT_ROW) if cycles => editor.controller.form_mut().cycle_environment(),
            Some(MOCK_GROUP_ROW) if cycles => editor.controller.form_mut().cycle_mock_group(),
            _ => return None,
        };
        result
            .err()
            .map(|e| Action::Notify(Notification::warning(e.to_string())))
    }

    fn render_busy(&self, frame: &mut Frame, area: Rect) {
        let throbber = Throbber::default()
            .label(self.busy.label())
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, area, &mut self.throbber.clone());
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect, editor: &ServiceEditor) {
        let block = Block::default()
            .title(format!(" {} ", editor.title()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let form = editor.controller.form();
        if let Some(error) = form.load_error() {
            let text = vec![
                Line::from(Span::styled("  Failed to load service", theme::error_text())),
                Line::from(""),
                Line::from(Span::styled(format!("  {}", error.payload()), theme::table_row())),
                Line::from(""),
                hints_line(&[("Esc", "back")]),
            ];
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
            return;
        }
        let Some(session) = form.session() else {
            self.render_busy(frame, inner);
            return;
        };

        let layout = Layout::vertical([
            Constraint::Min(1),    // fields
            Constraint::Length(1), // proxy url
            Constraint::Length(1), // dirty state
            Constraint::Length(1), // hints
        ])
        .split(inner);

        let mut rows = editor.form.rows(session);
        rows.extend(editor.selector_rows());
        render_rows(frame, layout[0], &rows, editor.form.cursor());

        if let Some(url) = form.proxy_url() {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("  Proxy URL         ", Style::default().fg(theme::BORDER_GRAY)),
                    Span::styled(url, Style::default().fg(theme::CORAL)),
                ])),
                layout[1],
            );
        }

        let state = if form.is_clean() {
            Span::styled("  no changes", theme::key_hint())
        } else {
            Span::styled("  ● unsaved changes", theme::modified_value())
        };
        frame.render_widget(Paragraph::new(Line::from(state)), layout[2]);

        let mut hints = vec![("Tab", "move"), ("Space", "toggle/cycle"), ("Ctrl+S", "save")];
        if matches!(editor.controller, ServiceController::Edit(_)) {
            hints.push(("Ctrl+D", "delete"));
        }
        hints.push(("Esc", "back"));
        frame.render_widget(Paragraph::new(hints_line(&hints)), layout[3]);

        if let Some(alert) = form.alert() {
            render_alert(frame, area, alert);
        } else if self.confirm_delete {
            render_confirm(
                frame,
                area,
                &format!("Delete service '{}'?", session.original().name),
            );
        }
    }
}

impl Component for ServiceFormScreen {
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
            Action::RouteChanged(route) => self.open(route),
            Action::Bus(message @ BusMessage::ReloadPage { .. }) => self.reload(message),
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
            Err(_) => self.render_busy(frame, area),
        }
    }

    fn captures_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::stub_admin;
    use mockctl_core::Flag;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn screen_with(controller: ServiceController, id: Option<RecordId>) -> ServiceFormScreen {
        let mut editor = ServiceEditor::new(controller);
        editor.activate(id).await;
        let mut screen = ServiceFormScreen::new(stub_admin(None));
        screen.install(editor);
        screen
    }

    async fn new_form(group: &str) -> ServiceFormScreen {
        let admin = stub_admin(None);
        screen_with(ServiceController::New(admin.service_new(Some(group.into()))), None).await
    }

    fn screen_text(screen: &ServiceFormScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal.draw(|frame| screen.render(frame, frame.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[tokio::test]
    async fn reload_page_waits_for_a_busy_new_form() {
        let admin = stub_admin(None);
        let mut editor =
            ServiceEditor::new(ServiceController::New(admin.service_new(Some("qa".into()))));
        editor.activate(None).await;
        let mut screen = ServiceFormScreen::new(admin.clone());
        screen.install(editor);
        let mut routes = admin.navigator().subscribe();

        let shared = screen.editor.clone().unwrap();
        let busy = shared.lock().await;
        screen
            .update(&Action::Bus(BusMessage::ReloadPage {
                group: "billing".into(),
            }))
            .unwrap();
        tokio::task::yield_now().await;
        assert!(!routes.has_changed().unwrap());

        drop(busy);
        tokio::time::timeout(std::time::Duration::from_secs(1), routes.changed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(*routes.borrow(), Route::new_service(Some("billing")));
    }

    #[tokio::test]
    async fn new_form_shows_defaults_and_preselections() {
        let screen = new_form("billing").await;
        let text = screen_text(&screen);

        assert!(text.contains("New Service · billing"), "{text}");
        assert!(text.contains("dev  (2 options)"));
        assert!(text.contains("no mock group  (2 options)"));
        assert!(text.contains("no changes"));
        assert!(!text.contains("Ctrl+D"));
    }

    #[tokio::test]
    async fn typing_marks_the_form_dirty_and_esc_warns_once() {
        let mut screen = new_form("all").await;
        for c in "quotes".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        {
            let shared = screen.editor.clone().unwrap();
            let editor = shared.lock().await;
            assert_eq!(editor.controller.form().session().unwrap().working().name, "quotes");
        }
        assert!(screen_text(&screen).contains("unsaved changes"));

        let first = screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(matches!(first, Some(Action::Notify(_))));
        let second = screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(second, Some(Action::Navigate(Route::services(Some("all")))));
    }

    #[tokio::test]
    async fn selectors_cycle_from_the_extra_rows() {
        let mut screen = new_form("all").await;
        for _ in 0..11 {
            screen.handle_key_event(key(KeyCode::Down)).unwrap();
        }
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();

        let shared = screen.editor.clone().unwrap();
        let editor = shared.lock().await;
        let working = editor.controller.form().session().unwrap().working().clone();
        assert_eq!(working.mock_group_id, Some(RecordId::new(5)));
        assert_eq!(working.use_mock_group, Flag::No);
    }

    #[tokio::test]
    async fn delete_asks_for_confirmation_on_existing_services_only() {
        let admin = stub_admin(None);
        let mut screen = screen_with(
            ServiceController::Edit(admin.service_edit(Some("all".into()))),
            Some(RecordId::new(2)),
        )
        .await;

        let ctrl_d = KeyEvent::new(KeyCode::Char('d'), KeyModifiers::CONTROL);
        screen.handle_key_event(ctrl_d).unwrap();
        assert!(screen_text(&screen).contains("Delete service 'orders'?"));

        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert!(!screen.confirm_delete);

        let mut new = new_form("all").await;
        new.handle_key_event(ctrl_d).unwrap();
        assert!(!new.confirm_delete);
    }

    #[tokio::test]
    async fn missing_service_shows_the_load_error() {
        let admin = stub_admin(None);
        let mut screen = screen_with(
            ServiceController::Edit(admin.service_edit(None)),
            Some(RecordId::new(99)),
        )
        .await;

        assert!(screen_text(&screen).contains("no service 99"));
        let back = screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert_eq!(back, Some(Action::Navigate(Route::services(None))));
    }
}
