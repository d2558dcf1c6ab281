// ── My access rules ──

use chrono::NaiveTime;
use serde::Serialize;

use unigate_api::ApiClient;

use crate::error::CoreError;
use crate::model::{AccessRule, CampusZoneType};
use crate::view_state::{StateCell, ViewState};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRow {
    pub id: i64,
    pub zone: CampusZoneType,
    pub granted: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub schedule: String,
}

impl From<AccessRule> for RuleRow {
    fn from(rule: AccessRule) -> Self {
        Self {
            id: rule.id,
            zone: rule.zone_type,
            granted: rule.has_access,
            start_time: rule.start_time,
            end_time: rule.end_time,
            schedule: rule.schedule(),
        }
    }
}

/// Rules that apply to the signed-in user's role.
#[derive(Debug, Clone)]
pub struct MyRulesController {
    api: ApiClient,
    state: StateCell<ViewState<Vec<RuleRow>>>,
}

impl MyRulesController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(ViewState::Idle),
        }
    }

    pub fn state(&self) -> ViewState<Vec<RuleRow>> {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ViewState<Vec<RuleRow>>> {
        self.state.subscribe()
    }

    pub async fn load(&self) -> ViewState<Vec<RuleRow>> {
        self.state.set(ViewState::Loading);
        let result = self
            .api
            .my_access_rules()
            .await
            .map_err(CoreError::from)
            .map(|rules| {
                rules
                    .into_iter()
                    .map(|dto| RuleRow::from(AccessRule::from(dto)))
                    .collect()
            });
        let next = ViewState::from_result(result);
        self.state.set(next.clone());
        next
    }
}
