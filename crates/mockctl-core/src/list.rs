// ── List controller ──
//
// Loads a full collection and binds it to a `TableView`. Group-scoped
// resources announce their scope on the bus and reload when the group
// selector changes.

use tracing::{debug, warn};

use mockctl_api::ServiceAction;

use crate::admin::Admin;
use crate::bus::BusMessage;
use crate::error::CoreError;
use crate::model::Record;
use crate::navigation::scope_segment;
use crate::regenerate::RegenerateControl;
use crate::table::TableView;

/// Load state of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Ready,
    Failed,
}

pub struct ListController<R: Record> {
    admin: Admin,
    scope: Option<String>,
    state: ListState,
    table: Option<TableView<R>>,
    error: Option<CoreError>,
    regenerate: RegenerateControl,
}

impl<R: Record> ListController<R> {
    pub fn new(admin: Admin, scope: Option<String>) -> Self {
        Self {
            admin,
            scope,
            state: ListState::Idle,
            table: None,
            error: None,
            regenerate: RegenerateControl::default(),
        }
    }

    /// Fetch the collection for the current scope and rebuild the table.
    ///
    /// Paging, sort and filter settings survive a re-activation. A failed
    /// fetch is logged and leaves no table.
    pub async fn activate(&mut self) {
        if R::SCOPED {
            self.admin.bus().publish(BusMessage::ShowGroupsFilter(Some(scope_segment(
                self.scope.as_deref(),
            ))));
        }

        self.state = ListState::Loading;
        match R::fetch_all(self.admin.backend(), self.scope.as_deref()).await {
            Ok(data) => {
                debug!(kind = R::KIND, count = data.len(), "list loaded");
                let params = self
                    .table
                    .as_ref()
                    .map(|table| table.params().clone())
                    .unwrap_or_default();
                self.table = Some(TableView::with_params(data, params));
                self.error = None;
                self.state = ListState::Ready;
            }
            Err(e) => {
                warn!(kind = R::KIND, error = %e, "failed to load list");
                self.table = None;
                self.error = Some(e);
                self.state = ListState::Failed;
            }
        }
    }

    /// React to a bus message. Returns `true` when the list reloaded.
    pub async fn handle(&mut self, message: &BusMessage) -> bool {
        match message {
            BusMessage::ReloadPage { group } if R::SCOPED => {
                self.scope = Some(group.clone());
                if let Some(table) = self.table.as_mut() {
                    table.set_page(1);
                }
                self.activate().await;
                true
            }
            _ => false,
        }
    }

    /// Set the filter term and reload the table.
    pub fn set_filter(&mut self, term: Option<String>) {
        if let Some(table) = self.table.as_mut() {
            table.set_filter(term);
        }
    }

    pub fn state(&self) -> ListState {
        self.state
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Why the last fetch failed, if it did.
    pub fn error(&self) -> Option<&CoreError> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<CoreError> {
        self.error.take()
    }

    pub fn table(&self) -> Option<&TableView<R>> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut TableView<R>> {
        self.table.as_mut()
    }

    /// Rows of the current page; empty when nothing is loaded.
    pub fn rows(&self) -> &[R] {
        self.table.as_ref().map(TableView::rows).unwrap_or_default()
    }
}

// ── Service action regeneration ──────────────────────────────────

impl ListController<ServiceAction> {
    pub fn regenerate_control(&self) -> &RegenerateControl {
        &self.regenerate
    }

    /// Disable the control ahead of a regenerate request issued elsewhere.
    pub fn begin_regenerate(&mut self) -> bool {
        self.regenerate.begin()
    }

    /// Record the outcome of a regenerate request.
    pub fn finish_regenerate(&mut self, result: &Result<(), CoreError>) -> bool {
        self.regenerate.finish(result)
    }

    /// Ask the server to rebuild the action list, then reload on success.
    pub async fn regenerate(&mut self) -> Result<(), CoreError> {
        if !self.regenerate.begin() {
            return Err(CoreError::validation("regeneration is already running"));
        }
        let result = self.admin.backend().regenerate_service_actions().await;
        self.regenerate.finish(&result);
        if result.is_ok() {
            self.activate().await;
        }
        result
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeBackend, action, service};
    use crate::regenerate::{FAILURE_TEXT, SUCCESS_TEXT};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn service_list_announces_scope_and_sorts_by_name() {
        let mut fake = FakeBackend::new();
        fake.services = vec![service(1, "quotes"), service(2, "Accounts"), service(3, "orders")];
        let (admin, backend) = fake.into_admin(None);
        let mut bus = admin.bus().subscribe();

        let mut list = admin.service_list(Some("billing".into()));
        list.activate().await;

        assert_eq!(
            bus.try_recv().unwrap(),
            BusMessage::ShowGroupsFilter(Some("billing".into()))
        );
        assert_eq!(backend.calls(), vec!["list_services:billing".to_string()]);
        assert_eq!(list.state(), ListState::Ready);
        let names: Vec<_> = list.rows().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Accounts", "orders", "quotes"]);
        assert_eq!(list.table().unwrap().total(), 3);
    }

    #[tokio::test]
    async fn action_list_stays_silent_on_the_bus() {
        let mut fake = FakeBackend::new();
        fake.actions = vec![action(1, "getQuote")];
        let (admin, _backend) = fake.into_admin(None);
        let mut bus = admin.bus().subscribe();

        let mut list = admin.service_action_list();
        list.activate().await;

        assert!(bus.try_recv().is_err());
        assert_eq!(list.rows().len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_leaves_no_table() {
        let mut fake = FakeBackend::new();
        fake.fail_reads = true;
        let (admin, _backend) = fake.into_admin(None);

        let mut list = admin.service_list(None);
        list.activate().await;

        assert_eq!(list.state(), ListState::Failed);
        assert!(matches!(list.error(), Some(CoreError::ConnectionFailed { .. })));
        assert!(list.table().is_none());
        assert!(list.rows().is_empty());
    }

    #[tokio::test]
    async fn reload_page_refetches_scoped_lists_only() {
        let mut fake = FakeBackend::new();
        fake.services = vec![service(1, "quotes")];
        let (admin, backend) = fake.into_admin(None);

        let mut services = admin.service_list(None);
        services.activate().await;
        services.set_filter(Some("quo".into()));
        let reload = BusMessage::ReloadPage { group: "ops".into() };
        assert!(services.handle(&reload).await);
        assert_eq!(services.scope(), Some("ops"));
        assert_eq!(
            services.table().unwrap().params().filter.as_deref(),
            Some("quo")
        );

        let mut actions = admin.service_action_list();
        assert!(!actions.handle(&reload).await);

        assert_eq!(
            backend.calls(),
            vec!["list_services:all".to_string(), "list_services:ops".to_string()]
        );
    }

    #[tokio::test]
    async fn regenerate_success_reloads_the_list() {
        let mut fake = FakeBackend::new();
        fake.actions = vec![action(1, "getQuote")];
        let (admin, backend) = fake.into_admin(None);

        let mut list = admin.service_action_list();
        list.regenerate().await.unwrap();

        let control = list.regenerate_control();
        assert!(control.is_enabled());
        assert_eq!(control.info(), Some(SUCCESS_TEXT));
        assert_eq!(
            backend.calls(),
            vec!["regenerate".to_string(), "list_service_actions".to_string()]
        );
    }

    #[tokio::test]
    async fn regenerate_failure_re_enables_with_error_text() {
        let mut fake = FakeBackend::new();
        fake.fail_writes = Some("generator crashed".into());
        let (admin, _backend) = fake.into_admin(None);

        let mut list = admin.service_action_list();
        let err = list.regenerate().await.unwrap_err();

        assert_eq!(err.payload(), "generator crashed");
        assert!(list.regenerate_control().is_enabled());
        assert_eq!(list.regenerate_control().info(), Some(FAILURE_TEXT));
    }
}
