//! Services list, scoped to the group selector.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{Frame, layout::Rect};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use mockctl_core::{Admin, BusMessage, ListController, Route, Service};

use crate::action::Action;
use crate::component::Component;
use crate::screens::spawn_task;
use crate::widgets::list_pane::{ListPane, PaneView};

const HINTS: &[(&str, &str)] = &[
    ("j/k", "move"),
    ("←/→", "page"),
    ("/", "filter"),
    ("s/S", "sort"),
    ("Enter", "edit"),
    ("n", "new"),
    ("G", "group"),
    ("r", "reload"),
];

pub struct ServicesScreen {
    admin: Admin,
    list: Arc<Mutex<ListController<Service>>>,
    pane: ListPane,
    throbber: ThrobberState,
    action_tx: Option<UnboundedSender<Action>>,
}

impl ServicesScreen {
    pub fn new(admin: Admin) -> Self {
        let list = admin.service_list(admin.group().map(str::to_owned));
        Self {
            admin,
            list: Arc::new(Mutex::new(list)),
            pane: ListPane::default(),
            throbber: ThrobberState::default(),
            action_tx: None,
        }
    }

    /// Show the list for `group`, reusing the controller (and its
    /// paging, sort and filter) when the scope is unchanged.
    fn open(&mut self, group: &str) {
        let same_scope = self
            .list
            .try_lock()
            .is_ok_and(|list| list.scope() == Some(group));
        if !same_scope {
            debug!(group, "new service list scope");
            self.list = Arc::new(Mutex::new(self.admin.service_list(Some(group.to_owned()))));
            self.pane = ListPane::default();
        }
        self.reload();
    }

    fn reload(&self) {
        let list = Arc::clone(&self.list);
        spawn_task(self.action_tx.as_ref(), async move {
            list.lock().await.activate().await;
            None
        });
    }

    fn reload_page(&self, message: BusMessage) {
        let list = Arc::clone(&self.list);
        spawn_task(self.action_tx.as_ref(), async move {
            list.lock().await.handle(&message).await;
            None
        });
    }
}

impl Component for ServicesScreen {
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
            KeyCode::Char('n') => Ok(Some(Action::Navigate(Route::new_service(list.scope())))),
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
            Action::RouteChanged(Route::Services { group }) => self.open(group),
            Action::Bus(message @ BusMessage::ReloadPage { .. }) => {
                self.pane = ListPane::default();
                self.reload_page(message.clone());
            }
            Action::Tick => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let list = self.list.try_lock().ok();
        let title = match list.as_ref().and_then(|list| list.scope()) {
            Some(group) => format!("Services · {group}"),
            None => "Services".to_owned(),
        };
        self.pane.render(
            frame,
            area,
            PaneView {
                title: &title,
                list: list.as_deref(),
                throbber: &self.throbber,
                status: None,
                hints: HINTS,
            },
        );
    }

    fn captures_input(&self) -> bool {
        self.pane.captures_input()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::stub_admin;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};

    fn screen_text(screen: &ServicesScreen) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
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
    async fn renders_loaded_rows_with_scope_and_footer() {
        let admin = stub_admin(Some("billing"));
        let screen = ServicesScreen::new(admin);
        screen.list.lock().await.activate().await;

        let text = screen_text(&screen);
        assert!(text.contains("Services · billing (3)"), "{text}");
        assert!(text.contains("accounts"));
        assert!(text.contains("page 1/1 · 3 rows · sort name asc"));
    }

    #[tokio::test]
    async fn new_key_opens_the_form_in_the_list_scope() {
        let admin = stub_admin(Some("billing"));
        let mut screen = ServicesScreen::new(admin);

        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE))
            .unwrap();
        assert_eq!(action, Some(Action::Navigate(Route::new_service(Some("billing")))));
    }

    #[tokio::test]
    async fn unloaded_list_shows_a_spinner() {
        let screen = ServicesScreen::new(stub_admin(None));
        assert!(screen_text(&screen).contains("Loading"));
    }
}
