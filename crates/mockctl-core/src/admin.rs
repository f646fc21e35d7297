// ── Admin facade ──
//
// Bundles the backend, the event bus and the navigator, and hands out
// controllers wired to them.

use std::sync::Arc;

use mockctl_api::{AdminClient, Service, ServiceAction};

use crate::backend::Backend;
use crate::bus::EventBus;
use crate::config::ClientConfig;
use crate::edit::EditController;
use crate::error::CoreError;
use crate::list::ListController;
use crate::navigation::{Navigator, Route};
use crate::service::{ServiceEditController, ServiceNewController};

/// Entry point for front ends.
///
/// Cheaply cloneable via `Arc<AdminInner>`; every controller holds a
/// clone and shares the same bus and navigator.
#[derive(Clone)]
pub struct Admin {
    inner: Arc<AdminInner>,
}

struct AdminInner {
    backend: Arc<dyn Backend>,
    bus: EventBus,
    navigator: Navigator,
    group: Option<String>,
}

impl Admin {
    /// Build an HTTP-backed facade from a client configuration.
    pub fn connect(config: &ClientConfig) -> Result<Self, CoreError> {
        let client = AdminClient::new(config.url.clone(), &config.transport())?
            .with_flag_encoding(config.flag_encoding);
        Ok(Self::with_backend(Arc::new(client), config.group.clone()))
    }

    /// Build a facade over any backend. `group` is the initial scope.
    pub fn with_backend(backend: Arc<dyn Backend>, group: Option<String>) -> Self {
        let navigator = Navigator::new(Route::services(group.as_deref()), backend.base_url());
        Self {
            inner: Arc::new(AdminInner {
                backend,
                bus: EventBus::new(),
                navigator,
                group,
            }),
        }
    }

    pub fn backend(&self) -> &dyn Backend {
        &*self.inner.backend
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    pub fn navigator(&self) -> &Navigator {
        &self.inner.navigator
    }

    /// The group scope the facade was created with.
    pub fn group(&self) -> Option<&str> {
        self.inner.group.as_deref()
    }

    // ── Controllers ──────────────────────────────────────────────

    pub fn service_list(&self, scope: Option<String>) -> ListController<Service> {
        ListController::new(self.clone(), scope)
    }

    pub fn service_action_list(&self) -> ListController<ServiceAction> {
        ListController::new(self.clone(), None)
    }

    pub fn service_edit(&self, scope: Option<String>) -> ServiceEditController {
        ServiceEditController::new(self.clone(), scope)
    }

    pub fn service_new(&self, scope: Option<String>) -> ServiceNewController {
        ServiceNewController::new(self.clone(), scope)
    }

    pub fn service_action_edit(&self) -> EditController<ServiceAction> {
        EditController::new(self.clone(), None)
    }
}
