// Reference data endpoints
//
// Mock groups and environments only populate selectable options on the
// service form; they are read-only from this client's point of view.

use crate::client::{ALL_GROUPS, AdminClient};
use crate::error::Error;
use crate::models::{Environment, MockGroup};

impl AdminClient {
    /// `GET mockgroups/{group}/findall`
    pub async fn list_mock_groups(&self, group: Option<&str>) -> Result<Vec<MockGroup>, Error> {
        let url = self.endpoint(&["mockgroups", group.unwrap_or(ALL_GROUPS), "findall"]);
        self.get_list(url).await
    }

    /// `GET environments/{group}/findall`
    pub async fn list_environments(&self, group: Option<&str>) -> Result<Vec<Environment>, Error> {
        let url = self.endpoint(&["environments", group.unwrap_or(ALL_GROUPS), "findall"]);
        self.get_list(url).await
    }
}
