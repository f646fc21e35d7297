// ── Reference data ──
//
// Environments and mock groups offered as selectable options on the
// service form. Loaded once per form; failures are logged and leave the
// option list empty.

use tracing::warn;

use mockctl_api::{Environment, MockGroup, RecordId, Service};

use crate::backend::Backend;
use crate::error::CoreError;

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    environments: Vec<Environment>,
    mock_groups: Vec<MockGroup>,
    environment: Option<usize>,
    mock_group: Option<usize>,
}

impl ReferenceData {
    pub async fn load(
        backend: &dyn Backend,
        environment_scope: Option<&str>,
        mock_group_scope: Option<&str>,
    ) -> Self {
        let environments = backend
            .list_environments(environment_scope)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to load environments");
                Vec::new()
            });
        let mock_groups = backend
            .list_mock_groups(mock_group_scope)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to load mock groups");
                Vec::new()
            });
        Self::new(environments, mock_groups)
    }

    pub fn new(environments: Vec<Environment>, mock_groups: Vec<MockGroup>) -> Self {
        Self {
            environments,
            mock_groups,
            environment: None,
            mock_group: None,
        }
    }

    // ── Pre-selection ────────────────────────────────────────────

    /// Select the environment with the given name; none when absent.
    pub fn preselect_environment(&mut self, name: Option<&str>) {
        self.environment =
            name.and_then(|name| self.environments.iter().position(|env| env.name == name));
    }

    /// Select the first environment option, if any.
    pub fn preselect_first_environment(&mut self) {
        self.environment = (!self.environments.is_empty()).then_some(0);
    }

    /// Select the first mock group whose id matches; none when absent.
    pub fn preselect_mock_group(&mut self, id: Option<RecordId>) {
        self.mock_group = id.and_then(|id| self.mock_groups.iter().position(|g| g.id == id));
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn environments(&self) -> &[Environment] {
        &self.environments
    }

    pub fn mock_groups(&self) -> &[MockGroup] {
        &self.mock_groups
    }

    pub fn selected_environment(&self) -> Option<&Environment> {
        self.environment.and_then(|i| self.environments.get(i))
    }

    pub fn selected_mock_group(&self) -> Option<&MockGroup> {
        self.mock_group.and_then(|i| self.mock_groups.get(i))
    }

    // ── Selection (writes through to the service) ────────────────

    pub fn select_environment(&mut self, index: usize, service: &mut Service) -> Result<(), CoreError> {
        let env = self
            .environments
            .get(index)
            .ok_or_else(|| CoreError::validation(format!("no environment at position {index}")))?;
        service.environment_name = Some(env.name.clone());
        self.environment = Some(index);
        Ok(())
    }

    pub fn select_mock_group(&mut self, index: usize, service: &mut Service) -> Result<(), CoreError> {
        let group = self
            .mock_groups
            .get(index)
            .ok_or_else(|| CoreError::validation(format!("no mock group at position {index}")))?;
        service.mock_group_id = Some(group.id);
        self.mock_group = Some(index);
        Ok(())
    }

    pub fn select_environment_named(&mut self, name: &str, service: &mut Service) -> Result<(), CoreError> {
        let index = self
            .environments
            .iter()
            .position(|env| env.name == name)
            .ok_or_else(|| CoreError::validation(format!("unknown environment {name:?}")))?;
        self.select_environment(index, service)
    }

    pub fn select_mock_group_id(&mut self, id: RecordId, service: &mut Service) -> Result<(), CoreError> {
        let index = self
            .mock_groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| CoreError::validation(format!("unknown mock group {id}")))?;
        self.select_mock_group(index, service)
    }

    /// Advance to the next environment, wrapping around.
    pub fn cycle_environment(&mut self, service: &mut Service) -> Result<(), CoreError> {
        let next = next_index(self.environment, self.environments.len());
        self.select_environment(next, service)
    }

    /// Advance to the next mock group, wrapping around.
    pub fn cycle_mock_group(&mut self, service: &mut Service) -> Result<(), CoreError> {
        let next = next_index(self.mock_group, self.mock_groups.len());
        self.select_mock_group(next, service)
    }
}

fn next_index(current: Option<usize>, len: usize) -> usize {
    match current {
        Some(i) if len > 0 => (i + 1) % len,
        _ => 0,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn groups(ids: &[i64]) -> Vec<MockGroup> {
        ids.iter()
            .map(|id| serde_json::from_value(json!({ "id": id, "name": format!("group {id}") })).unwrap())
            .collect()
    }

    fn envs(names: &[&str]) -> Vec<Environment> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| serde_json::from_value(json!({ "id": i, "name": name })).unwrap())
            .collect()
    }

    #[test]
    fn mock_group_preselection_takes_first_match() {
        let mut data = ReferenceData::new(Vec::new(), groups(&[4, 7, 7, 1]));
        data.preselect_mock_group(Some(RecordId::new(7)));
        assert_eq!(data.mock_group, Some(1));

        data.preselect_mock_group(Some(RecordId::new(99)));
        assert!(data.selected_mock_group().is_none());

        data.preselect_mock_group(None);
        assert!(data.selected_mock_group().is_none());
    }

    #[test]
    fn environment_preselection_by_name_or_first() {
        let mut data = ReferenceData::new(envs(&["dev", "qa"]), Vec::new());
        data.preselect_environment(Some("qa"));
        assert_eq!(data.selected_environment().unwrap().name, "qa");

        data.preselect_environment(None);
        assert!(data.selected_environment().is_none());

        data.preselect_first_environment();
        assert_eq!(data.selected_environment().unwrap().name, "dev");
    }

    #[test]
    fn selection_writes_through_and_cycles() {
        let mut data = ReferenceData::new(envs(&["dev", "qa"]), groups(&[1, 5]));
        let mut service = Service::pending();

        data.select_mock_group_id(RecordId::new(5), &mut service).unwrap();
        assert_eq!(service.mock_group_id, Some(RecordId::new(5)));

        data.cycle_mock_group(&mut service).unwrap();
        assert_eq!(service.mock_group_id, Some(RecordId::new(1)));

        data.cycle_environment(&mut service).unwrap();
        data.cycle_environment(&mut service).unwrap();
        assert_eq!(service.environment_name.as_deref(), Some("qa"));

        assert!(data.select_environment_named("prod", &mut service).is_err());
        assert_eq!(service.environment_name.as_deref(), Some("qa"));
    }

    #[test]
    fn cycling_an_empty_list_fails() {
        let mut data = ReferenceData::default();
        assert!(data.cycle_mock_group(&mut Service::pending()).is_err());
    }
}
