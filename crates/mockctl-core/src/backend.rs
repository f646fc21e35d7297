// ── Backend abstraction ──
//
// Every REST call the controllers make goes through `Backend`. The
// production implementation is `mockctl_api::AdminClient`; tests plug in
// an in-memory fake.

use async_trait::async_trait;
use url::Url;

use mockctl_api::{AdminClient, Environment, MockGroup, RecordId, Service, ServiceAction};

use crate::error::CoreError;

/// Async access to the mock server's admin resources.
///
/// `group` arguments select a scope; `None` means every group.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Server root, used for display (host/port) only.
    fn base_url(&self) -> &Url;

    async fn list_services(&self, group: Option<&str>) -> Result<Vec<Service>, CoreError>;
    async fn get_service(&self, id: RecordId) -> Result<Service, CoreError>;
    /// Create (`id == -2`) or replace a service.
    async fn update_service(&self, service: &Service) -> Result<(), CoreError>;
    async fn delete_service(&self, id: RecordId) -> Result<(), CoreError>;

    async fn list_service_actions(&self) -> Result<Vec<ServiceAction>, CoreError>;
    async fn get_service_action(&self, id: RecordId) -> Result<ServiceAction, CoreError>;
    async fn update_service_action(&self, action: &ServiceAction) -> Result<(), CoreError>;
    async fn regenerate_service_actions(&self) -> Result<(), CoreError>;

    async fn list_mock_groups(&self, group: Option<&str>) -> Result<Vec<MockGroup>, CoreError>;
    async fn list_environments(&self, group: Option<&str>)
    -> Result<Vec<Environment>, CoreError>;
}

#[async_trait]
impl Backend for AdminClient {
    fn base_url(&self) -> &Url {
        AdminClient::base_url(self)
    }

    async fn list_services(&self, group: Option<&str>) -> Result<Vec<Service>, CoreError> {
        Ok(AdminClient::list_services(self, group).await?)
    }

    async fn get_service(&self, id: RecordId) -> Result<Service, CoreError> {
        Ok(AdminClient::get_service(self, id).await?)
    }

    async fn update_service(&self, service: &Service) -> Result<(), CoreError> {
        Ok(AdminClient::update_service(self, service).await?)
    }

    async fn delete_service(&self, id: RecordId) -> Result<(), CoreError> {
        Ok(AdminClient::delete_service(self, id).await?)
    }

    async fn list_service_actions(&self) -> Result<Vec<ServiceAction>, CoreError> {
        Ok(AdminClient::list_service_actions(self).await?)
    }

    async fn get_service_action(&self, id: RecordId) -> Result<ServiceAction, CoreError> {
        Ok(AdminClient::get_service_action(self, id).await?)
    }

    async fn update_service_action(&self, action: &ServiceAction) -> Result<(), CoreError> {
        Ok(AdminClient::update_service_action(self, action).await?)
    }

    async fn regenerate_service_actions(&self) -> Result<(), CoreError> {
        Ok(AdminClient::regenerate_service_actions(self).await?)
    }

    async fn list_mock_groups(&self, group: Option<&str>) -> Result<Vec<MockGroup>, CoreError> {
        Ok(AdminClient::list_mock_groups(self, group).await?)
    }

    async fn list_environments(
        &self,
        group: Option<&str>,
    ) -> Result<Vec<Environment>, CoreError> {
        Ok(AdminClient::list_environments(self, group).await?)
    }
}
