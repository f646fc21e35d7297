//! Screen components, one per navigator route family.

pub mod service_action_form;
pub mod service_actions;
pub mod service_form;
pub mod services;

use std::future::Future;

use ratatui::text::{Line, Span};
use tokio::sync::mpsc::UnboundedSender;

use mockctl_core::Admin;

use crate::action::Action;
use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

/// Build every screen, keyed by its id.
pub fn create_screens(admin: &Admin) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Services,
            Box::new(services::ServicesScreen::new(admin.clone())),
        ),
        (
            ScreenId::ServiceActions,
            Box::new(service_actions::ServiceActionsScreen::new(admin.clone())),
        ),
        (
            ScreenId::ServiceForm,
            Box::new(service_form::ServiceFormScreen::new(admin.clone())),
        ),
        (
            ScreenId::ServiceActionForm,
            Box::new(service_action_form::ServiceActionFormScreen::new(admin.clone())),
        ),
    ]
}

/// Run a controller call in the background and dispatch whatever
/// follow-up action it produces.
pub(crate) fn spawn_task<F>(action_tx: Option<&UnboundedSender<Action>>, task: F)
where
    F: Future<Output = Option<Action>> + Send + 'static,
{
    let tx = action_tx.cloned();
    tokio::spawn(async move {
        if let (Some(action), Some(tx)) = (task.await, tx) {
            let _ = tx.send(action);
        }
    });
}

/// Key hints as a single line: `  key label  key label`.
pub(crate) fn hints_line<'a>(hints: &[(&'a str, &'a str)]) -> Line<'a> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(format!("  {key} "), theme::key_hint_key()));
        spans.push(Span::styled(*label, theme::key_hint()));
    }
    Line::from(spans)
}
