// ── Home screen ──

use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;

use unigate_api::ApiClient;
use unigate_api::types::PageRequest;

use crate::convert::logs_from_dtos;
use crate::error::CoreError;
use crate::model::{AccessLog, AccessRule, User};
use crate::view_state::{StateCell, ViewState};

const RECENT_LOGS: u32 = 5;
const WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentVisit {
    pub room_name: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeSummary {
    pub first_name: String,
    /// Role name shown as the user's access level.
    pub access_level: String,
    pub visits_last_7_days: usize,
    pub access_rules_count: usize,
    /// One entry per day of the window, oldest first, zero-filled.
    pub visits_by_date: Vec<(NaiveDate, usize)>,
    pub recent_visits: Vec<RecentVisit>,
}

impl HomeSummary {
    /// Shape the home screen from already-fetched data.
    pub fn build(user: &User, logs: &[AccessLog], rules: &[AccessRule], today: NaiveDate) -> Self {
        let window: Vec<NaiveDate> = (0..WINDOW_DAYS)
            .rev()
            .filter_map(|back| today.checked_sub_days(Days::new(back)))
            .collect();
        let window_start = window.first().copied().unwrap_or(today);

        let visits_by_date = window
            .iter()
            .map(|day| {
                let count = logs
                    .iter()
                    .filter(|log| log.access_time.date_naive() == *day)
                    .count();
                (*day, count)
            })
            .collect();

        let mut recent: Vec<&AccessLog> = logs.iter().collect();
        recent.sort_by(|a, b| b.access_time.cmp(&a.access_time));
        let recent_visits = recent
            .into_iter()
            .take(5)
            .map(|log| RecentVisit {
                room_name: log.room_name.clone(),
                date: log.access_time.date_naive(),
            })
            .collect();

        Self {
            first_name: user.first_name.clone(),
            access_level: user.role.to_string(),
            visits_last_7_days: logs
                .iter()
                .filter(|log| log.access_time.date_naive() >= window_start)
                .count(),
            access_rules_count: rules.len(),
            visits_by_date,
            recent_visits,
        }
    }
}

/// Loads the account, its latest visits and its rules in parallel.
#[derive(Debug, Clone)]
pub struct HomeController {
    api: ApiClient,
    state: StateCell<ViewState<HomeSummary>>,
}

impl HomeController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(ViewState::Idle),
        }
    }

    pub fn state(&self) -> ViewState<HomeSummary> {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ViewState<HomeSummary>> {
        self.state.subscribe()
    }

    pub async fn load(&self) -> ViewState<HomeSummary> {
        self.state.set(ViewState::Loading);
        let next = ViewState::from_result(self.fetch().await);
        self.state.set(next.clone());
        next
    }

    async fn fetch(&self) -> Result<HomeSummary, CoreError> {
        let (user, logs, rules) = tokio::try_join!(
            self.api.current_user(),
            self.api.user_access_logs(PageRequest::new(1, RECENT_LOGS)),
            self.api.my_access_rules(),
        )?;

        let user = User::from(user);
        let logs = logs_from_dtos(logs);
        let rules: Vec<AccessRule> = rules.into_iter().map(AccessRule::from).collect();
        Ok(HomeSummary::build(
            &user,
            &logs,
            &rules,
            Utc::now().date_naive(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AccessStatus, AppUserRole};

    fn log_at(day: u32, hour: u32, room: &str) -> AccessLog {
        AccessLog {
            id: i64::from(day * 100 + hour),
            access_time: Utc.with_ymd_and_hms(2025, 5, day, hour, 0, 0).unwrap(),
            status: AccessStatus::Granted,
            reason: None,
            full_name: None,
            room_name: room.into(),
            user_id: 1,
            access_point_id: None,
        }
    }

    #[test]
    fn summary_counts_the_last_seven_days() {
        let user = User {
            id: 1,
            first_name: "Iryna".into(),
            last_name: "Melnyk".into(),
            email: "iryna@uni.edu".into(),
            role: AppUserRole::Staff,
            avatar_url: None,
        };
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let logs = vec![
            log_at(10, 9, "Library"),
            log_at(10, 8, "Gym"),
            log_at(4, 12, "Lab"),
            log_at(3, 12, "Old"),
        ];

        let summary = HomeSummary::build(&user, &logs, &[], today);

        assert_eq!(summary.first_name, "Iryna");
        assert_eq!(summary.access_level, "Staff");
        assert_eq!(summary.visits_last_7_days, 3);
        assert_eq!(summary.visits_by_date.len(), 7);
        assert_eq!(
            summary.visits_by_date.first(),
            Some(&(NaiveDate::from_ymd_opt(2025, 5, 4).unwrap(), 1))
        );
        assert_eq!(summary.visits_by_date.last(), Some(&(today, 2)));
        assert_eq!(summary.recent_visits[0].room_name, "Library");
        assert_eq!(summary.recent_visits.len(), 4);
    }
}
