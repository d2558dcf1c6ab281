// ── Access analytics ──
//
// Aggregates the full access log over an inclusive date range. All
// bucketing is done in UTC.

use std::cmp::Reverse;
use std::collections::HashMap;

use chrono::{Days, NaiveDate, Timelike};
use serde::Serialize;

use unigate_api::ApiClient;

use crate::convert::logs_from_dtos;
use crate::error::CoreError;
use crate::model::AccessLog;
use crate::view_state::{StateCell, ViewState};

const TOP_N: usize = 5;
const UNKNOWN_USER: &str = "Unknown";

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::ValidationFailed {
                message: format!("range start {from} is after its end {to}"),
            });
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        (self.from..=self.to).contains(&day)
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> u64 {
        u64::try_from((self.to - self.from).num_days()).map_or(0, |d| d + 1)
    }

    fn iter_days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..self.days()).filter_map(|offset| self.from.checked_add_days(Days::new(offset)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub range: DateRange,
    pub total: usize,
    pub granted: usize,
    pub denied: usize,
    /// Rounded to one decimal place.
    pub average_per_day: f64,
    /// Every day in the range, zero-filled.
    pub daily: Vec<(NaiveDate, usize)>,
    /// Index is the hour of day (0..24).
    pub hourly: [usize; 24],
    pub top_users: Vec<RankedEntry>,
    pub top_rooms: Vec<RankedEntry>,
}

impl AnalyticsReport {
    pub fn build(range: DateRange, logs: &[AccessLog]) -> Self {
        let in_range: Vec<&AccessLog> = logs
            .iter()
            .filter(|log| range.contains(log.access_time.date_naive()))
            .collect();

        let total = in_range.len();
        let granted = in_range.iter().filter(|log| log.is_granted()).count();

        let mut daily_counts: HashMap<NaiveDate, usize> = HashMap::new();
        let mut hourly = [0_usize; 24];
        for log in &in_range {
            *daily_counts.entry(log.access_time.date_naive()).or_default() += 1;
            if let Some(bucket) = usize::try_from(log.access_time.hour())
                .ok()
                .and_then(|h| hourly.get_mut(h))
            {
                *bucket += 1;
            }
        }
        let daily = range
            .iter_days()
            .map(|day| (day, daily_counts.get(&day).copied().unwrap_or(0)))
            .collect();

        let top_users = top_n(
            in_range
                .iter()
                .map(|log| log.full_name.as_deref().unwrap_or(UNKNOWN_USER)),
        );
        let top_rooms = top_n(in_range.iter().map(|log| log.room_name.as_str()));

        Self {
            range,
            total,
            granted,
            denied: total - granted,
            average_per_day: average(total, range.days()),
            daily,
            hourly,
            top_users,
            top_rooms,
        }
    }
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn average(total: usize, days: u64) -> f64 {
    if days == 0 {
        return 0.0;
    }
    let avg = total as f64 / days as f64;
    (avg * 10.0).round() / 10.0
}

/// Most frequent names, count descending then name ascending.
fn top_n<'a>(names: impl Iterator<Item = &'a str>) -> Vec<RankedEntry> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by_key(|(name, count)| (Reverse(*count), *name));
    ranked
        .into_iter()
        .take(TOP_N)
        .map(|(name, count)| RankedEntry {
            name: name.to_owned(),
            count,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct AnalyticsController {
    api: ApiClient,
    state: StateCell<ViewState<AnalyticsReport>>,
}

impl AnalyticsController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(ViewState::Idle),
        }
    }

    pub fn state(&self) -> ViewState<AnalyticsReport> {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ViewState<AnalyticsReport>> {
        self.state.subscribe()
    }

    pub async fn load(&self, range: DateRange) -> ViewState<AnalyticsReport> {
        self.state.set(ViewState::Loading);
        let result = self
            .api
            .all_access_logs()
            .await
            .map_err(CoreError::from)
            .map(|dtos| AnalyticsReport::build(range, &logs_from_dtos(dtos)));
        let next = ViewState::from_result(result);
        self.state.set(next.clone());
        next
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::AccessStatus;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, d).unwrap()
    }

    fn log(d: u32, hour: u32, who: Option<&str>, room: &str, status: AccessStatus) -> AccessLog {
        AccessLog {
            id: 0,
            access_time: Utc.with_ymd_and_hms(2025, 4, d, hour, 15, 0).unwrap(),
            status,
            reason: None,
            full_name: who.map(str::to_owned),
            room_name: room.into(),
            user_id: 0,
            access_point_id: None,
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(DateRange::new(day(5), day(1)).is_err());
        assert_eq!(DateRange::new(day(1), day(1)).unwrap().days(), 1);
    }

    #[test]
    fn report_counts_only_logs_inside_the_range() {
        let range = DateRange::new(day(1), day(3)).unwrap();
        let logs = vec![
            log(1, 8, Some("Ana"), "Lab", AccessStatus::Granted),
            log(1, 8, Some("Ana"), "Lab", AccessStatus::Denied),
            log(3, 17, None, "Gym", AccessStatus::Granted),
            log(4, 9, Some("Out"), "Lab", AccessStatus::Granted),
        ];

        let report = AnalyticsReport::build(range, &logs);

        assert_eq!(report.total, 3);
        assert_eq!(report.granted, 2);
        assert_eq!(report.denied, 1);
        assert!((report.average_per_day - 1.0).abs() < f64::EPSILON);
        assert_eq!(report.daily, vec![(day(1), 2), (day(2), 0), (day(3), 1)]);
        assert_eq!(report.hourly[8], 2);
        assert_eq!(report.hourly[17], 1);
        assert_eq!(report.hourly.iter().sum::<usize>(), 3);
        assert_eq!(
            report.top_users,
            vec![
                RankedEntry { name: "Ana".into(), count: 2 },
                RankedEntry { name: "Unknown".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        assert!((average(10, 3) - 3.3).abs() < f64::EPSILON);
        assert!((average(0, 7)).abs() < f64::EPSILON);
    }

    #[test]
    fn ranking_breaks_ties_by_name() {
        let names = ["b", "a", "c", "a", "b", "d", "e", "f"];
        let ranked = top_n(names.into_iter());
        let order: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(order, ["a", "b", "c", "d", "e"]);
    }
}
