// ── Access log and access rule domain types ──

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccessStatus, AppUserRole, CampusZoneType};

/// One access attempt with display defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLog {
    pub id: i64,
    pub access_time: DateTime<Utc>,
    pub status: AccessStatus,
    pub reason: Option<String>,
    pub full_name: Option<String>,
    pub room_name: String,
    pub user_id: i64,
    pub access_point_id: Option<i64>,
}

impl AccessLog {
    pub fn is_granted(&self) -> bool {
        self.status == AccessStatus::Granted
    }
}

/// A role/zone permission with an optional date and time-of-day window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub id: i64,
    pub user_role: AppUserRole,
    pub zone_type: CampusZoneType,
    pub has_access: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccessRule {
    /// Human-readable window, e.g. `2025-02-01 to 2025-06-30 | 08:00-18:00`.
    ///
    /// A half-open range (only a start or only an end) is not shown.
    pub fn schedule(&self) -> String {
        let mut parts = Vec::with_capacity(2);
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            parts.push(format!("{start} to {end}"));
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            parts.push(format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")));
        }
        if parts.is_empty() {
            "any time".into()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> AccessRule {
        AccessRule {
            id: 1,
            user_role: AppUserRole::Student,
            zone_type: CampusZoneType::Library,
            has_access: true,
            start_time: None,
            end_time: None,
            start_date: None,
            end_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn schedule_without_window_is_any_time() {
        assert_eq!(rule().schedule(), "any time");
    }

    #[test]
    fn schedule_joins_date_and_time_windows() {
        let rule = AccessRule {
            start_date: NaiveDate::from_ymd_opt(2025, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
            start_time: NaiveTime::from_hms_opt(8, 0, 0),
            end_time: NaiveTime::from_hms_opt(18, 30, 0),
            ..rule()
        };
        assert_eq!(rule.schedule(), "2025-02-01 to 2025-06-30 | 08:00-18:30");
    }

    #[test]
    fn half_open_window_is_not_shown() {
        let rule = AccessRule {
            start_time: NaiveTime::from_hms_opt(8, 0, 0),
            ..rule()
        };
        assert_eq!(rule.schedule(), "any time");
    }
}
