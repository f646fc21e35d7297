//! Actions flowing through the app loop.

use mockctl_core::{BusMessage, Route};

use crate::screen::ScreenId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast shown in the bottom-right corner for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── System ────────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    ToggleHelp,

    // ── Navigation ────────────────────────────────────────────────
    /// Ask the navigator to go somewhere.
    Navigate(Route),
    /// The navigator moved; the screen owning the route activates.
    RouteChanged(Route),
    /// Jump to a tab-bar screen.
    SwitchTab(ScreenId),

    // ── Group selector ────────────────────────────────────────────
    OpenGroupPrompt,
    /// Publish `ReloadPage` for the given group.
    SelectGroup(String),
    /// A message arrived on the event bus.
    Bus(BusMessage),

    // ── Feedback ──────────────────────────────────────────────────
    Notify(Notification),
}
