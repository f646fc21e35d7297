// Service action endpoints
//
// Service actions are not group-scoped. `regenerate` rebuilds the whole
// list server-side from recorded traffic.

use tracing::debug;

use crate::client::AdminClient;
use crate::error::Error;
use crate::models::{RecordId, ServiceAction};

impl AdminClient {
    /// `GET serviceactions/findall`
    pub async fn list_service_actions(&self) -> Result<Vec<ServiceAction>, Error> {
        let url = self.endpoint(&["serviceactions", "findall"]);
        self.get_list(url).await
    }

    /// `GET serviceactions/{id}`
    pub async fn get_service_action(&self, id: RecordId) -> Result<ServiceAction, Error> {
        let id = id.to_string();
        let url = self.endpoint(&["serviceactions", id.as_str()]);
        self.get_one(url).await
    }

    /// `PUT serviceactions/{id}`
    pub async fn update_service_action(&self, action: &ServiceAction) -> Result<(), Error> {
        debug!(id = %action.id, "saving service action");
        let body = self.encode(action, &[])?;
        let id = action.id.to_string();
        let url = self.endpoint(&["serviceactions", id.as_str()]);
        self.put_json(url, &body).await
    }

    /// Rebuild the service action list from recorded requests.
    ///
    /// `GET serviceactions/regenerate`. No client-side timeout beyond the
    /// transport's request timeout; regeneration can take a while.
    pub async fn regenerate_service_actions(&self) -> Result<(), Error> {
        debug!("regenerating service actions");
        let url = self.endpoint(&["serviceactions", "regenerate"]);
        self.get_empty(url).await
    }
}
