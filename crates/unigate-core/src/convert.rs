// ── API-to-domain type conversions ──
//
// Bridges raw `unigate_api::types` DTOs into `unigate_core::model` types.
// Timestamps without an offset are read as UTC; missing log fields get
// display defaults; unparseable rule windows are dropped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use unigate_api::types::{AccessLogDto, AccessRuleDto, UserDto};

use crate::model::{AccessLog, AccessRule, AccessStatus, User};

/// Room label used when a log does not name one.
pub const UNKNOWN_ROOM: &str = "Unknown";

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp, with or without an offset.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parse a rule date given either as `YYYY-MM-DD` or as a full timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(raw).map(|dt| dt.date_naive()))
}

/// Parse a time of day given as `HH:MM` or `HH:MM:SS[.fff]`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

// ── User ───────────────────────────────────────────────────────────

impl From<UserDto> for User {
    fn from(dto: UserDto) -> Self {
        Self {
            id: dto.id,
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            role: dto.role,
            avatar_url: dto.avatar_url.filter(|url| !url.trim().is_empty()),
        }
    }
}

// ── Access log ─────────────────────────────────────────────────────

impl AccessLog {
    /// Convert with `now` standing in for a missing or unreadable timestamp.
    pub fn from_dto(dto: AccessLogDto, now: DateTime<Utc>) -> Self {
        Self {
            id: dto.id,
            access_time: dto
                .access_time
                .as_deref()
                .and_then(parse_timestamp)
                .unwrap_or(now),
            status: dto.status.unwrap_or(AccessStatus::Denied),
            reason: dto.reason,
            full_name: dto.full_name,
            room_name: dto
                .room_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ROOM.into()),
            user_id: dto.user_id,
            access_point_id: dto.access_point_id,
        }
    }
}

impl From<AccessLogDto> for AccessLog {
    fn from(dto: AccessLogDto) -> Self {
        Self::from_dto(dto, Utc::now())
    }
}

// ── Access rule ────────────────────────────────────────────────────

impl From<AccessRuleDto> for AccessRule {
    fn from(dto: AccessRuleDto) -> Self {
        Self {
            id: dto.id,
            user_role: dto.user_role,
            zone_type: dto.zone_type,
            has_access: dto.has_access,
            start_time: dto.start_time.as_deref().and_then(parse_time),
            end_time: dto.end_time.as_deref().and_then(parse_time),
            start_date: dto.start_date.as_deref().and_then(parse_date),
            end_date: dto.end_date.as_deref().and_then(parse_date),
            created_at: dto.created_at.as_deref().and_then(parse_timestamp),
            updated_at: dto.updated_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/// Convert a batch of logs against a single `now`.
pub fn logs_from_dtos(dtos: Vec<AccessLogDto>) -> Vec<AccessLog> {
    let now = Utc::now();
    dtos.into_iter()
        .map(|dto| AccessLog::from_dto(dto, now))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{AppUserRole, CampusZoneType};

    fn empty_log() -> AccessLogDto {
        AccessLogDto {
            id: 1,
            access_time: None,
            status: None,
            reason: None,
            full_name: None,
            room_name: None,
            user_id: 2,
            access_point_id: None,
        }
    }

    #[test]
    fn timestamps_without_offset_are_utc() {
        let expected = Utc.with_ymd_and_hms(2025, 4, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2025-04-01T09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-01T09:30:00.000Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-01T12:30:00+03:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-04-01 09:30:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn dates_accept_plain_or_iso_datetime() {
        let expected = NaiveDate::from_ymd_opt(2025, 2, 1);
        assert_eq!(parse_date("2025-02-01"), expected);
        assert_eq!(parse_date("2025-02-01T00:00:00"), expected);
        assert_eq!(parse_date("2025-02-01T00:00:00.000Z"), expected);
    }

    #[test]
    fn times_accept_with_or_without_seconds() {
        assert_eq!(parse_time("08:15"), NaiveTime::from_hms_opt(8, 15, 0));
        assert_eq!(parse_time("23:59:59"), NaiveTime::from_hms_opt(23, 59, 59));
        assert_eq!(parse_time("25:00"), None);
    }

    #[test]
    fn log_defaults_fill_missing_fields() {
        let now = Utc.with_ymd_and_hms(2025, 5, 5, 12, 0, 0).unwrap();
        let log = AccessLog::from_dto(empty_log(), now);

        assert_eq!(log.access_time, now);
        assert_eq!(log.status, AccessStatus::Denied);
        assert_eq!(log.room_name, UNKNOWN_ROOM);
        assert!(!log.is_granted());
    }

    #[test]
    fn log_keeps_present_fields() {
        let now = Utc::now();
        let dto = AccessLogDto {
            access_time: Some("2025-01-10T07:45:00Z".into()),
            status: Some(AccessStatus::Granted),
            room_name: Some("Lab 204".into()),
            ..empty_log()
        };
        let log = AccessLog::from_dto(dto, now);
        assert_eq!(
            log.access_time,
            Utc.with_ymd_and_hms(2025, 1, 10, 7, 45, 0).unwrap()
        );
        assert!(log.is_granted());
        assert_eq!(log.room_name, "Lab 204");
    }

    #[test]
    fn rule_windows_are_parsed() {
        let dto = AccessRuleDto {
            id: 4,
            user_role: AppUserRole::Staff,
            zone_type: CampusZoneType::Office,
            has_access: true,
            start_time: Some("08:00:00".into()),
            end_time: Some("garbage".into()),
            start_date: Some("2025-03-01T00:00:00".into()),
            end_date: None,
            created_at: Some("2025-01-01T00:00:00".into()),
            updated_at: None,
        };
        let rule = AccessRule::from(dto);
        assert_eq!(rule.start_time, NaiveTime::from_hms_opt(8, 0, 0));
        assert_eq!(rule.end_time, None);
        assert_eq!(rule.start_date, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert!(rule.created_at.is_some());
    }
}
