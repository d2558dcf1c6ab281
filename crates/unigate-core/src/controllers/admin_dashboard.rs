// ── Admin dashboard ──

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use unigate_api::ApiClient;

use super::count_by_day;
use crate::convert::logs_from_dtos;
use crate::error::CoreError;
use crate::model::{AccessLog, AccessStatus};
use crate::view_state::{StateCell, ViewState};

const RECENT_ACCESSES: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentAccess {
    pub name: String,
    pub point: String,
    pub time: DateTime<Utc>,
    pub status: AccessStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub users_count: usize,
    pub access_points_count: usize,
    pub denied_count: usize,
    /// Newest first.
    pub recent: Vec<RecentAccess>,
    pub visits_by_day: Vec<(NaiveDate, usize)>,
}

impl DashboardSummary {
    /// `logs` are in server order, oldest first.
    pub fn build(users_count: usize, access_points_count: usize, logs: &[AccessLog]) -> Self {
        let recent = logs
            .iter()
            .rev()
            .take(RECENT_ACCESSES)
            .map(|log| RecentAccess {
                name: log.full_name.clone().unwrap_or_else(|| "Unknown".into()),
                point: log.room_name.clone(),
                time: log.access_time,
                status: log.status,
            })
            .collect();

        Self {
            users_count,
            access_points_count,
            denied_count: logs.iter().filter(|log| !log.is_granted()).count(),
            recent,
            visits_by_day: count_by_day(logs.iter().map(|log| log.access_time.date_naive())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminDashboardController {
    api: ApiClient,
    state: StateCell<ViewState<DashboardSummary>>,
}

impl AdminDashboardController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(ViewState::Idle),
        }
    }

    pub fn state(&self) -> ViewState<DashboardSummary> {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ViewState<DashboardSummary>> {
        self.state.subscribe()
    }

    pub async fn load(&self) -> ViewState<DashboardSummary> {
        self.state.set(ViewState::Loading);
        let next = ViewState::from_result(self.fetch().await);
        self.state.set(next.clone());
        next
    }

    async fn fetch(&self) -> Result<DashboardSummary, CoreError> {
        let (users, points, logs) = tokio::try_join!(
            self.api.list_users(),
            self.api.list_access_points(),
            self.api.all_access_logs(),
        )?;
        Ok(DashboardSummary::build(
            users.len(),
            points.len(),
            &logs_from_dtos(logs),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn log(id: i64, day: u32, status: AccessStatus) -> AccessLog {
        AccessLog {
            id,
            access_time: Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap(),
            status,
            reason: None,
            full_name: (id % 2 == 0).then(|| format!("User {id}")),
            room_name: format!("Room {id}"),
            user_id: id,
            access_point_id: None,
        }
    }

    #[test]
    fn recent_accesses_are_the_last_five_reversed() {
        let logs: Vec<AccessLog> = (1..=7)
            .map(|i| log(i, 1, AccessStatus::Granted))
            .collect();
        let summary = DashboardSummary::build(3, 2, &logs);

        let ids: Vec<&str> = summary.recent.iter().map(|r| r.point.as_str()).collect();
        assert_eq!(ids, ["Room 7", "Room 6", "Room 5", "Room 4", "Room 3"]);
        assert_eq!(summary.recent[0].name, "Unknown");
        assert_eq!(summary.recent[1].name, "User 6");
    }

    #[test]
    fn denied_and_daily_counts() {
        let logs = vec![
            log(1, 1, AccessStatus::Granted),
            log(2, 1, AccessStatus::Denied),
            log(3, 2, AccessStatus::Denied),
        ];
        let summary = DashboardSummary::build(0, 0, &logs);

        assert_eq!(summary.denied_count, 2);
        assert_eq!(
            summary.visits_by_day,
            vec![
                (NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 2),
                (NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(), 1),
            ]
        );
    }
}
