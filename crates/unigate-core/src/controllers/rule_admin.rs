// ── Access rule administration ──

use tracing::info;

use unigate_api::ApiClient;
use unigate_api::types::{AccessRuleFilter, AccessRulePayload};

use crate::error::CoreError;
use crate::model::AccessRule;
use crate::view_state::{StateCell, ViewState};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleAdminState {
    /// The filter the current list was fetched with.
    pub filter: AccessRuleFilter,
    pub rules: ViewState<Vec<AccessRule>>,
}

/// Reject windows whose start comes after their end.
pub fn validate_rule(payload: &AccessRulePayload) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (payload.start_date, payload.end_date) {
        if start > end {
            return Err(CoreError::ValidationFailed {
                message: format!("start date {start} is after end date {end}"),
            });
        }
    }
    if let (Some(start), Some(end)) = (payload.start_time, payload.end_time) {
        if start > end {
            return Err(CoreError::ValidationFailed {
                message: format!(
                    "start time {} is after end time {}",
                    start.format("%H:%M"),
                    end.format("%H:%M")
                ),
            });
        }
    }
    Ok(())
}

/// Filterable rule list with create, update and delete.
///
/// Every successful mutation refetches the list with the current filter.
#[derive(Debug, Clone)]
pub struct AccessRuleAdminController {
    api: ApiClient,
    state: StateCell<RuleAdminState>,
}

impl AccessRuleAdminController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(RuleAdminState::default()),
        }
    }

    pub fn state(&self) -> RuleAdminState {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<RuleAdminState> {
        self.state.subscribe()
    }

    /// Fetch rules matching `filter` and remember it for later refetches.
    pub async fn load(&self, filter: AccessRuleFilter) -> ViewState<Vec<AccessRule>> {
        self.state.update(|s| {
            s.filter = filter.clone();
            s.rules = ViewState::Loading;
        });

        let result = self
            .api
            .list_access_rules(&filter)
            .await
            .map_err(CoreError::from)
            .map(|dtos| dtos.into_iter().map(AccessRule::from).collect());
        let rules = ViewState::from_result(result);
        self.state.update(|s| s.rules = rules.clone());
        rules
    }

    pub async fn refresh(&self) -> ViewState<Vec<AccessRule>> {
        let filter = self.state.get().filter;
        self.load(filter).await
    }

    /// Create (`id == None`) or update a rule, then refetch.
    pub async fn save(&self, id: Option<i64>, payload: &AccessRulePayload) -> Result<(), CoreError> {
        validate_rule(payload)?;
        match id {
            Some(id) => {
                self.api.update_access_rule(id, payload).await?;
                info!(id, "access rule updated");
            }
            None => {
                self.api.create_access_rule(payload).await?;
                info!(role = %payload.user_role, zone = %payload.zone_type, "access rule created");
            }
        }
        self.refresh().await;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        self.api.delete_access_rule(id).await?;
        info!(id, "access rule deleted");
        self.refresh().await;
        Ok(())
    }
}
