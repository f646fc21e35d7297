// In-memory backend for screen tests.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use mockctl_core::{
    Admin, Backend, CoreError, Environment, MockGroup, RecordId, Service, ServiceAction,
};

pub(crate) struct StubBackend {
    url: Url,
    services: Vec<Service>,
    actions: Vec<ServiceAction>,
}

#[async_trait]
impl Backend for StubBackend {
    fn base_url(&self) -> &Url {
        &self.url
    }

    async fn list_services(&self, _group: Option<&str>) -> Result<Vec<Service>, CoreError> {
        Ok(self.services.clone())
    }

    async fn get_service(&self, id: RecordId) -> Result<Service, CoreError> {
        self.services
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(CoreError::Rejected {
                status: 404,
                payload: format!("no service {id}"),
            })
    }

    async fn update_service(&self, _service: &Service) -> Result<(), CoreError> {
        Ok(())
    }

    async fn delete_service(&self, _id: RecordId) -> Result<(), CoreError> {
        Ok(())
    }

    async fn list_service_actions(&self) -> Result<Vec<ServiceAction>, CoreError> {
        Ok(self.actions.clone())
    }

    async fn get_service_action(&self, id: RecordId) -> Result<ServiceAction, CoreError> {
        self.actions
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(CoreError::Rejected {
                status: 404,
                payload: format!("no service action {id}"),
            })
    }

    async fn update_service_action(&self, _action: &ServiceAction) -> Result<(), CoreError> {
        Ok(())
    }

    async fn regenerate_service_actions(&self) -> Result<(), CoreError> {
        Ok(())
    }

    async fn list_mock_groups(&self, _group: Option<&str>) -> Result<Vec<MockGroup>, CoreError> {
        Ok(vec![
            serde_json::from_value(json!({ "id": 1, "name": "no mock group" })).unwrap(),
            serde_json::from_value(json!({ "id": 5, "name": "happy path" })).unwrap(),
        ])
    }

    async fn list_environments(
        &self,
        _group: Option<&str>,
    ) -> Result<Vec<Environment>, CoreError> {
        Ok(vec![
            serde_json::from_value(json!({ "id": 1, "name": "dev" })).unwrap(),
            serde_json::from_value(json!({ "id": 2, "name": "qa" })).unwrap(),
        ])
    }
}

pub(crate) fn service(id: i64, name: &str, timeout: u64) -> Service {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "typeRequest": "SOAP",
        "localTarget": format!("mock/{name}"),
        "timeoutms": timeout,
        "recordXmlData": true,
        "recordData": false,
        "useMockGroup": false,
    }))
    .unwrap()
}

pub(crate) fn action(id: i64, name: &str) -> ServiceAction {
    serde_json::from_value(json!({ "id": id, "name": name, "thresholdms": 100 })).unwrap()
}

/// Facade over a stub holding three services and two actions.
pub(crate) fn stub_admin(group: Option<&str>) -> Admin {
    let backend = StubBackend {
        url: Url::parse("http://mocks.local:9010").unwrap(),
        services: vec![
            service(1, "quotes", 500),
            service(2, "orders", 1500),
            service(3, "accounts", 900),
        ],
        actions: vec![action(1, "getQuote"), action(2, "listOrders")],
    };
    Admin::with_backend(Arc::new(backend), group.map(str::to_owned))
}
