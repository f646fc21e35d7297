//! Service action list with the regenerate control.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use mockctl_core::regenerate::{FAILURE_TEXT, SUCCESS_TEXT};
use mockctl_core::{Admin, ListController, RegenerateControl, Route, ServiceAction};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::spawn_task;
use crate::theme;
use crate::widgets::list_pane::{ListPane, PaneView};

const HINTS: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("←/→", "page"),
    ("/", "filter"),
    ("s/S", "sort"),
    ("Enter", "edit"),
    ("g", "regenerate"),
    ("r", "reload"),
];

pub struct ServiceActionsScreen {
    admin: Admin,
    list: Arc<Mutex<ListController<ServiceAction>>>,
    pane: ListPane,
    throbber: ThrobberState,
    action_tx: Option<UnboundedSender<Action>>,
}

impl ServiceActionsScreen {
    pub fn new(admin: Admin) -> Self {
        let list = admin.service_action_list();
        Self {
            admin,
            list: Arc::new(Mutex::new(list)),
            pane: ListPane::default(),
            throbber: ThrobberState::default(),
            action_tx: None,
        }
    }

    fn reload(&self) {
        let list = Arc::clone(&self.list);
        spawn_task(self.action_tx.as_ref(), async move {
            list.lock().await.activate().await;
            None
        });
    }

    /// Disable the control, ask the server to regenerate, then record
    /// the outcome and reload on success.
    ///
    /// The list stays unlocked while the request runs so the running
    /// text can be drawn.
    fn regenerate(&self, list: &mut ListController<ServiceAction>) -> Option<Action> {
        if !list.begin_regenerate() {
            return Some(Action::Notify(Notification::warning(
                "Regeneration is already running",
            )));
        }
        let admin = self.admin.clone();
        let shared = Arc::clone(&self.list);
        spawn_task(self.action_tx.as_ref(), async move {
            let result = admin.backend().regenerate_service_actions().await;
            let mut list = shared.lock().await;
            list.finish_regenerate(&result);
            match result {
                Ok(()) => {
                    list.activate().await;
                    None
                }
                Err(e) => Some(Action::Notify(Notification::error(e.payload()))),
            }
        });
        None
    }
}

/// Status line for the regenerate control.
fn regenerate_status(control: &RegenerateControl) -> Option<Line<'static>> {
    let info = control.info()?;
    let style = match (control.is_enabled(), info) {
        (false, _) => Style::default().fg(theme::ELECTRIC_YELLOW),
        (true, SUCCESS_TEXT) => Style::default().fg(theme::SUCCESS_GREEN),
        (true, FAILURE_TEXT) => theme::error_text(),
        _ => theme::table_row(),
    };
    Some(Line::from(Span::styled(format!("  {info}"), style)))
}

impl Component for ServiceActionsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let Ok(mut list) = self.list.try_lock() else {
            return Ok(None);
        };
        if self.pane.captures_input() {
            return Ok(self.pane.handle_key(key, &mut list));
        }
        match key.code {
            KeyCode::Char('g') => Ok(self.regenerate(&mut list)),
            KeyCode::Char('r') => {
                drop(list);
                self.reload();
                Ok(None)
            }
            _ => Ok(self.pane.handle_key(key, &mut list)),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::RouteChanged(Route::ServiceActions) => self.reload(),
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let list = self.list.try_lock().ok();
        let status = list
            .as_ref()
            .and_then(|list| regenerate_status(list.regenerate_control()));
        self.pane.render(
            frame,
            area,
            PaneView {
                title: "Service Actions",
                list: list.as_deref(),
                throbber: &self.throbber,
                status,
                hints: HINTS,
            },
        );
    }

    fn captures_input(&self) -> bool {
        self.pane.captures_input()
    }
}
