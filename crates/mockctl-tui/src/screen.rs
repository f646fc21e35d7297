//! Screen identifiers and their mapping from navigator routes.

use std::fmt;

use mockctl_core::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Services, // 1
    ServiceActions, // 2
    /// New and edit service forms. Not in the tab bar.
    ServiceForm,
    /// Service action edit form. Not in the tab bar.
    ServiceActionForm,
}

impl ScreenId {
    /// Tab-bar screens, in order.
    pub const TABS: [ScreenId; 2] = [Self::Services, Self::ServiceActions];

    /// The screen that renders `route`.
    pub fn for_route(route: &Route) -> Self {
        match route {
            Route::Services { .. } => Self::Services,
            Route::NewService { .. } | Route::EditService { .. } => Self::ServiceForm,
            Route::ServiceActions => Self::ServiceActions,
            Route::EditServiceAction { .. } => Self::ServiceActionForm,
        }
    }

    /// The tab this screen belongs to.
    pub fn tab(self) -> Self {
        match self {
            Self::Services | Self::ServiceForm => Self::Services,
            Self::ServiceActions | Self::ServiceActionForm => Self::ServiceActions,
        }
    }

    /// Numeric key (1-2) of a tab screen.
    pub fn number(self) -> u8 {
        match self.tab() {
            Self::ServiceActions => 2,
            _ => 1,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Services),
            2 => Some(Self::ServiceActions),
            _ => None,
        }
    }

    /// Next tab (wraps around).
    pub fn next_tab(self) -> Self {
        match self.tab() {
            Self::Services => Self::ServiceActions,
            _ => Self::Services,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Services => "Services",
            Self::ServiceActions => "Service Actions",
            Self::ServiceForm => "Service",
            Self::ServiceActionForm => "Service Action",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
