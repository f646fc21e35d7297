// ── Service form controllers ──
//
// Edit and new-service screens share a `ServiceForm`: the generic edit
// controller plus the environment and mock-group options. The edit
// screen adds delete; the new screen builds a blank record and follows
// group changes by rewriting its path.

use std::ops::{Deref, DerefMut};

use tracing::info;

use mockctl_api::{ALL_GROUPS, Flag, MockGroup, RecordId, Service};

use crate::admin::Admin;
use crate::bus::BusMessage;
use crate::edit::EditController;
use crate::error::CoreError;
use crate::model::Record;
use crate::navigation::Route;
use crate::reference::ReferenceData;

/// Proxy endpoint a service is reachable at on the mock server.
pub fn proxy_url(host: &str, port: Option<u16>, service: &Service) -> String {
    let target = service.local_target.trim_start_matches('/');
    match port {
        Some(port) => format!("http://{host}:{port}/{target}"),
        None => format!("http://{host}/{target}"),
    }
}

// ── ServiceForm ──────────────────────────────────────────────────

pub struct ServiceForm {
    edit: EditController<Service>,
    reference: ReferenceData,
}

impl Deref for ServiceForm {
    type Target = EditController<Service>;

    fn deref(&self) -> &Self::Target {
        &self.edit
    }
}

impl DerefMut for ServiceForm {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.edit
    }
}

impl ServiceForm {
    fn new(edit: EditController<Service>) -> Self {
        Self {
            edit,
            reference: ReferenceData::default(),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    fn with_working<F>(&mut self, f: F) -> Result<(), CoreError>
    where
        F: FnOnce(&mut ReferenceData, &mut Service) -> Result<(), CoreError>,
    {
        let session = self
            .edit
            .session_mut()
            .ok_or(CoreError::NothingLoaded { kind: Service::KIND })?;
        f(&mut self.reference, session.working_mut())
    }

    pub fn select_environment(&mut self, index: usize) -> Result<(), CoreError> {
        self.with_working(|reference, service| reference.select_environment(index, service))
    }

    pub fn select_mock_group(&mut self, index: usize) -> Result<(), CoreError> {
        self.with_working(|reference, service| reference.select_mock_group(index, service))
    }

    pub fn select_environment_named(&mut self, name: &str) -> Result<(), CoreError> {
        self.with_working(|reference, service| reference.select_environment_named(name, service))
    }

    pub fn select_mock_group_id(&mut self, id: RecordId) -> Result<(), CoreError> {
        self.with_working(|reference, service| reference.select_mock_group_id(id, service))
    }

    pub fn cycle_environment(&mut self) -> Result<(), CoreError> {
        self.with_working(ReferenceData::cycle_environment)
    }

    pub fn cycle_mock_group(&mut self) -> Result<(), CoreError> {
        self.with_working(ReferenceData::cycle_mock_group)
    }

    /// Proxy endpoint of the service being edited.
    pub fn proxy_url(&self) -> Option<String> {
        let navigator = self.edit.admin().navigator();
        self.edit
            .session()
            .map(|session| proxy_url(navigator.host(), navigator.port(), session.working()))
    }
}

// ── ServiceEditController ────────────────────────────────────────

pub struct ServiceEditController {
    form: ServiceForm,
}

impl Deref for ServiceEditController {
    type Target = ServiceForm;

    fn deref(&self) -> &Self::Target {
        &self.form
    }
}

impl DerefMut for ServiceEditController {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.form
    }
}

impl ServiceEditController {
    pub fn new(admin: Admin, scope: Option<String>) -> Self {
        Self {
            form: ServiceForm::new(EditController::new(admin, scope)),
        }
    }

    /// Load the service and its reference data, pre-selecting the
    /// record's environment and mock group.
    pub async fn activate(&mut self, id: RecordId) {
        self.form.edit.activate(id).await;
        let Some(session) = self.form.edit.session() else {
            return;
        };
        let original = session.original().clone();

        let scope = self.form.edit.scope().map(str::to_owned);
        let mut reference = ReferenceData::load(
            self.form.edit.admin().backend(),
            scope.as_deref(),
            scope.as_deref(),
        )
        .await;
        reference.preselect_environment(original.environment_name.as_deref());
        reference.preselect_mock_group(original.mock_group_id);
        self.form.reference = reference;
    }

    /// Delete the loaded service.
    ///
    /// On success navigates to the list route; on failure raises an
    /// alert with the server payload.
    pub async fn destroy(&mut self) -> Result<(), CoreError> {
        let Some(session) = self.form.edit.session() else {
            return Err(CoreError::NothingLoaded { kind: Service::KIND });
        };
        let id = session.original().id;

        let admin = self.form.edit.admin().clone();
        match admin.backend().delete_service(id).await {
            Ok(()) => {
                info!(%id, "service deleted");
                admin
                    .navigator()
                    .navigate(Service::list_route(self.form.edit.scope()));
                Ok(())
            }
            Err(e) => {
                self.form.edit.raise_alert(&e);
                Err(e)
            }
        }
    }
}

// ── ServiceNewController ─────────────────────────────────────────

/// A service that has never been saved, with the defaults of the "new
/// service" form.
pub fn blank_service() -> Service {
    let mut service = Service::pending();
    service.record_xml_data = Flag::Yes;
    service.record_data = Flag::Yes;
    service.use_mock_group = Flag::No;
    service
}

pub struct ServiceNewController {
    form: ServiceForm,
}

impl Deref for ServiceNewController {
    type Target = ServiceForm;

    fn deref(&self) -> &Self::Target {
        &self.form
    }
}

impl DerefMut for ServiceNewController {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.form
    }
}

impl ServiceNewController {
    pub fn new(admin: Admin, scope: Option<String>) -> Self {
        Self {
            form: ServiceForm::new(EditController::with_record(admin, scope, blank_service())),
        }
    }

    /// Hide the group selector and load the form options.
    ///
    /// Mock groups are always listed across every group, with the "no
    /// mock group" entry pre-selected. The first environment is selected.
    /// Both selections become part of the blank record's baseline.
    pub async fn activate(&mut self) {
        let admin = self.form.edit.admin().clone();
        admin.bus().publish(BusMessage::ShowGroupsFilter(None));

        let scope = self.form.edit.scope().map(str::to_owned);
        let mut reference =
            ReferenceData::load(admin.backend(), scope.as_deref(), Some(ALL_GROUPS)).await;
        reference.preselect_first_environment();
        reference.preselect_mock_group(Some(MockGroup::NONE_ID));

        if let Some(session) = self.form.edit.session_mut() {
            let service = session.working_mut();
            if let Some(env) = reference.selected_environment() {
                service.environment_name = Some(env.name.clone());
            }
            if let Some(group) = reference.selected_mock_group() {
                service.mock_group_id = Some(group.id);
            }
            session.rebase();
        }
        self.form.reference = reference;
    }

    /// Follow a group change by moving to the new-service path of that
    /// group. Nothing is refetched. Returns `true` when handled.
    pub fn handle(&mut self, message: &BusMessage) -> bool {
        match message {
            BusMessage::ReloadPage { group } => {
                self.form
                    .edit
                    .admin()
                    .navigator()
                    .navigate(Route::new_service(Some(group.as_str())));
                true
            }
            BusMessage::ShowGroupsFilter(_) => false,
        }
    }
}
