// ── Edit controller ──
//
// Snapshot + working copy editing of a single record. Save sends the
// working copy and navigates back to the list; failures surface as a
// blocking alert carrying the server's payload.

use tracing::{info, warn};

use mockctl_api::RecordId;

use crate::admin::Admin;
use crate::bus::BusMessage;
use crate::error::CoreError;
use crate::model::Record;

// ── EditSession ──────────────────────────────────────────────────

/// An immutable snapshot of a loaded record plus an independent working
/// copy the user edits.
#[derive(Debug, Clone)]
pub struct EditSession<R> {
    original: R,
    working: R,
}

impl<R: Record> EditSession<R> {
    pub fn new(record: R) -> Self {
        Self {
            working: record.clone(),
            original: record,
        }
    }

    pub fn original(&self) -> &R {
        &self.original
    }

    pub fn working(&self) -> &R {
        &self.working
    }

    pub fn working_mut(&mut self) -> &mut R {
        &mut self.working
    }

    /// `true` when the working copy equals the snapshot.
    pub fn is_clean(&self) -> bool {
        self.original == self.working
    }

    /// Discard edits.
    pub fn revert(&mut self) {
        self.working = self.original.clone();
    }

    /// Make the current working copy the new baseline.
    pub(crate) fn rebase(&mut self) {
        self.original = self.working.clone();
    }
}

// ── EditController ───────────────────────────────────────────────

pub struct EditController<R: Record> {
    admin: Admin,
    scope: Option<String>,
    session: Option<EditSession<R>>,
    load_error: Option<CoreError>,
    alert: Option<String>,
}

impl<R: Record> EditController<R> {
    pub fn new(admin: Admin, scope: Option<String>) -> Self {
        Self {
            admin,
            scope,
            session: None,
            load_error: None,
            alert: None,
        }
    }

    /// Start editing a record that was built locally rather than fetched.
    pub(crate) fn with_record(admin: Admin, scope: Option<String>, record: R) -> Self {
        let mut controller = Self::new(admin, scope);
        controller.session = Some(EditSession::new(record));
        controller
    }

    /// Hide the group selector and load the record.
    pub async fn activate(&mut self, id: RecordId) {
        self.admin.bus().publish(BusMessage::ShowGroupsFilter(None));
        self.load(id).await;
    }

    async fn load(&mut self, id: RecordId) {
        match R::fetch_one(self.admin.backend(), id).await {
            Ok(record) => {
                self.session = Some(EditSession::new(record));
                self.load_error = None;
            }
            Err(e) => {
                warn!(kind = R::KIND, %id, error = %e, "failed to load record");
                self.session = None;
                self.load_error = Some(e);
            }
        }
    }

    /// Send the working copy to the server.
    ///
    /// On success navigates to the list route. On failure raises an
    /// alert with the server payload and leaves the working copy as is.
    pub async fn save(&mut self) -> Result<(), CoreError> {
        let Some(session) = self.session.as_ref() else {
            return Err(CoreError::NothingLoaded { kind: R::KIND });
        };

        match R::update(self.admin.backend(), session.working()).await {
            Ok(()) => {
                info!(kind = R::KIND, id = %session.working().id(), "saved");
                self.admin
                    .navigator()
                    .navigate(R::list_route(self.scope.as_deref()));
                Ok(())
            }
            Err(e) => {
                self.raise_alert(&e);
                Err(e)
            }
        }
    }

    /// Set a field of the working copy from user input.
    pub fn set_field(&mut self, name: &str, raw: &str) -> Result<(), CoreError> {
        let session = self
            .session
            .as_mut()
            .ok_or(CoreError::NothingLoaded { kind: R::KIND })?;
        session.working_mut().set_field(name, raw)
    }

    /// `true` when nothing has been edited (or nothing is loaded).
    pub fn is_clean(&self) -> bool {
        self.session.as_ref().is_none_or(EditSession::is_clean)
    }

    pub fn session(&self) -> Option<&EditSession<R>> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession<R>> {
        self.session.as_mut()
    }

    /// Why the record could not be loaded, if it could not.
    pub fn load_error(&self) -> Option<&CoreError> {
        self.load_error.as_ref()
    }

    pub fn take_load_error(&mut self) -> Option<CoreError> {
        self.load_error.take()
    }

    /// The pending blocking alert, if any.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    pub(crate) fn admin(&self) -> &Admin {
        &self.admin
    }

    pub(crate) fn raise_alert(&mut self, err: &CoreError) {
        warn!(kind = R::KIND, error = %err, "request rejected");
        self.alert = Some(err.payload());
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fake::{FakeBackend, action};
    use crate::navigation::Route;
    use pretty_assertions::assert_eq;

    fn backend_with_action() -> FakeBackend {
        let mut fake = FakeBackend::new();
        fake.actions = vec![action(4, "getQuote")];
        fake
    }

    #[tokio::test]
    async fn clean_after_load_dirty_after_edit_clean_after_revert() {
        let (admin, _backend) = backend_with_action().into_admin(None);
        let mut edit = admin.service_action_edit();
        edit.activate(RecordId::new(4)).await;
        assert!(edit.is_clean());

        edit.set_field("thresholdms", "250").unwrap();
        assert!(!edit.is_clean());
        assert_eq!(edit.session().unwrap().original().thresholdms, 100);

        edit.set_field("thresholdms", "100").unwrap();
        assert!(edit.is_clean());
    }

    #[tokio::test]
    async fn activation_hides_the_group_filter() {
        let (admin, _backend) = backend_with_action().into_admin(None);
        let mut bus = admin.bus().subscribe();

        admin.service_action_edit().activate(RecordId::new(4)).await;

        assert_eq!(bus.try_recv().unwrap(), BusMessage::ShowGroupsFilter(None));
    }

    #[tokio::test]
    async fn save_success_navigates_to_list() {
        let (admin, backend) = backend_with_action().into_admin(None);
        let mut edit = admin.service_action_edit();
        edit.activate(RecordId::new(4)).await;
        edit.set_field("name", "getQuoteV2").unwrap();

        edit.save().await.unwrap();

        assert_eq!(admin.navigator().current(), Route::ServiceActions);
        assert_eq!(backend.saved()[0]["name"], "getQuoteV2");
        assert!(edit.alert().is_none());
    }

    #[tokio::test]
    async fn save_failure_raises_alert_and_stays() {
        let mut fake = backend_with_action();
        fake.fail_writes = Some("name must be unique".into());
        let (admin, _backend) = fake.into_admin(None);
        let before = admin.navigator().current();

        let mut edit = admin.service_action_edit();
        edit.activate(RecordId::new(4)).await;
        edit.set_field("name", "dup").unwrap();
        assert!(edit.save().await.is_err());

        assert_eq!(edit.alert(), Some("name must be unique"));
        assert_eq!(edit.session().unwrap().working().name, "dup");
        assert_eq!(admin.navigator().current(), before);

        assert_eq!(edit.dismiss_alert().as_deref(), Some("name must be unique"));
        assert!(edit.alert().is_none());
    }

    #[tokio::test]
    async fn load_failure_is_recorded() {
        let (admin, _backend) = backend_with_action().into_admin(None);
        let mut edit = admin.service_action_edit();
        edit.activate(RecordId::new(99)).await;

        assert!(edit.session().is_none());
        let err = edit.load_error().unwrap();
        assert!(err.is_not_found());
        assert_eq!(err.payload(), "no record 99");
        assert!(matches!(
            edit.save().await,
            Err(CoreError::NothingLoaded { .. })
        ));
    }

    #[test]
    fn session_copies_are_independent() {
        let mut session = EditSession::new(action(1, "a"));
        session.working_mut().name = "b".into();
        assert_eq!(session.original().name, "a");
        session.revert();
        assert!(session.is_clean());
    }
}
