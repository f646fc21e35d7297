// In-memory backend for controller tests.
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use mockctl_api::{Environment, MockGroup, RecordId, Service, ServiceAction};

use crate::admin::Admin;
use crate::backend::Backend;
use crate::error::CoreError;

pub(crate) struct FakeBackend {
    url: Url,
    pub services: Vec<Service>,
    pub actions: Vec<ServiceAction>,
    pub mock_groups: Vec<MockGroup>,
    pub environments: Vec<Environment>,
    /// Every read fails with a connection error.
    pub fail_reads: bool,
    /// Every write fails with HTTP 500 and this payload.
    pub fail_writes: Option<String>,
    calls: Mutex<Vec<String>>,
    saved: Mutex<Vec<serde_json::Value>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            url: Url::parse("http://mocks.local:9010").unwrap(),
            services: Vec::new(),
            actions: Vec::new(),
            mock_groups: Vec::new(),
            environments: Vec::new(),
            fail_reads: false,
            fail_writes: None,
            calls: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies passed to update calls, in order.
    pub fn saved(&self) -> Vec<serde_json::Value> {
        self.saved.lock().unwrap().clone()
    }

    pub fn into_admin(self, group: Option<&str>) -> (Admin, Arc<Self>) {
        let backend = Arc::new(self);
        let admin = Admin::with_backend(backend.clone(), group.map(str::to_owned));
        (admin, backend)
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap()
            .push(call);
    }

    fn read<T>(&self, call: String, value: T) -> Result<T, CoreError> {
        self.record(call);
        if self.fail_reads {
            return Err(CoreError::ConnectionFailed {
                url: "http://fake".into(),
                reason: "connection refused".into(),
            });
        }
        Ok(value)
    }

    fn write(&self, call: String, body: Option<serde_json::Value>) -> Result<(), CoreError> {
        self.record(call);
        if let Some(payload) = &self.fail_writes {
            return Err(CoreError::Rejected {
                status: 500,
                payload: payload.clone(),
            });
        }
        if let Some(body) = body {
            self.saved
                .lock()
                .unwrap()
                .push(body);
        }
        Ok(())
    }
}

fn scope(group: Option<&str>) -> &str {
    group.unwrap_or("all")
}

fn not_found(id: RecordId) -> CoreError {
    CoreError::Rejected {
        status: 404,
        payload: format!("no record {id}"),
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn base_url(&self) -> &Url {
        &self.url
    }

    async fn list_services(&self, group: Option<&str>) -> Result<Vec<Service>, CoreError> {
        self.read(format!("list_services:{}", scope(group)), self.services.clone())
    }

    async fn get_service(&self, id: RecordId) -> Result<Service, CoreError> {
        let found = self.services.iter().find(|s| s.id == id).cloned();
        self.read(format!("get_service:{id}"), found)?
            .ok_or_else(|| not_found(id))
    }

    async fn update_service(&self, service: &Service) -> Result<(), CoreError> {
        self.write(
            format!("update_service:{}", service.id),
            Some(serde_json::to_value(service).unwrap_or_default()),
        )
    }

    async fn delete_service(&self, id: RecordId) -> Result<(), CoreError> {
        self.write(format!("delete_service:{id}"), None)
    }

    async fn list_service_actions(&self) -> Result<Vec<ServiceAction>, CoreError> {
        self.read("list_service_actions".into(), self.actions.clone())
    }

    async fn get_service_action(&self, id: RecordId) -> Result<ServiceAction, CoreError> {
        let found = self.actions.iter().find(|a| a.id == id).cloned();
        self.read(format!("get_service_action:{id}"), found)?
            .ok_or_else(|| not_found(id))
    }

    async fn update_service_action(&self, action: &ServiceAction) -> Result<(), CoreError> {
        self.write(
            format!("update_service_action:{}", action.id),
            Some(serde_json::to_value(action).unwrap_or_default()),
        )
    }

    async fn regenerate_service_actions(&self) -> Result<(), CoreError> {
        self.write("regenerate".into(), None)
    }

    async fn list_mock_groups(&self, group: Option<&str>) -> Result<Vec<MockGroup>, CoreError> {
        self.read(format!("list_mock_groups:{}", scope(group)), self.mock_groups.clone())
    }

    async fn list_environments(
        &self,
        group: Option<&str>,
    ) -> Result<Vec<Environment>, CoreError> {
        self.read(format!("list_environments:{}", scope(group)), self.environments.clone())
    }
}

// ── Fixtures ─────────────────────────────────────────────────────

pub(crate) fn service(id: i64, name: &str) -> Service {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "localTarget": format!("/mock/{name}"),
        "recordXmlData": true,
        "recordData": false,
        "useMockGroup": true,
        "mockGroupId": 7,
        "environmentName": "qa",
    }))
    .unwrap()
}

pub(crate) fn action(id: i64, name: &str) -> ServiceAction {
    serde_json::from_value(json!({ "id": id, "name": name, "thresholdms": 100 }))
        .unwrap()
}

pub(crate) fn mock_group(id: i64, name: &str) -> MockGroup {
    serde_json::from_value(json!({ "id": id, "name": name }))
        .unwrap()
}

pub(crate) fn environment(id: i64, name: &str) -> Environment {
    serde_json::from_value(json!({ "id": id, "name": name }))
        .unwrap()
}
