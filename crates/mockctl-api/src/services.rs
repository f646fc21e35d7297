// Service endpoints
//
// `findall` is group-scoped; single-record operations address the
// service by id. Updating a service whose id is pending creates it.

use tracing::debug;

use crate::client::{ALL_GROUPS, AdminClient};
use crate::error::Error;
use crate::models::{RecordId, Service};

impl AdminClient {
    /// List the services visible in a group scope.
    ///
    /// `GET services/{group}/findall`, where `None` means every group.
    pub async fn list_services(&self, group: Option<&str>) -> Result<Vec<Service>, Error> {
        let group = group.unwrap_or(ALL_GROUPS);
        debug!(group, "listing services");
        let url = self.endpoint(&["services", group, "findall"]);
        self.get_list(url).await
    }

    /// Fetch one service.
    ///
    /// `GET services/{id}`
    pub async fn get_service(&self, id: RecordId) -> Result<Service, Error> {
        let id = id.to_string();
        let url = self.endpoint(&["services", id.as_str()]);
        self.get_one(url).await
    }

    /// Persist a service. A pending id asks the server to create it.
    ///
    /// `PUT services/{id}`
    pub async fn update_service(&self, service: &Service) -> Result<(), Error> {
        debug!(id = %service.id, pending = service.id.is_pending(), "saving service");
        let body = self.encode(service, &Service::FLAG_FIELDS)?;
        let id = service.id.to_string();
        let url = self.endpoint(&["services", id.as_str()]);
        self.put_json(url, &body).await
    }

    /// Delete a service.
    ///
    /// `DELETE services/{id}`
    pub async fn delete_service(&self, id: RecordId) -> Result<(), Error> {
        debug!(%id, "deleting service");
        let id = id.to_string();
        let url = self.endpoint(&["services", id.as_str()]);
        self.delete(url).await
    }
}
