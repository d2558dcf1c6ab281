// Wire types for the UniGate REST API
//
// Response DTOs mirror the JSON the server sends (camelCase, mostly
// optional fields). Enumerations are accepted by name or by integer code;
// write payloads and filters send the integer code.

use bytes::Bytes;
use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString, FromRepr};

// ── Enumerations ────────────────────────────────────────────────────

/// Either spelling the server may use for an enum value.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Code(i64),
    Name(String),
}

/// Implements name-or-code deserialization, name serialization, and the
/// `code()` accessor for a `#[repr(u8)]` enum deriving strum's
/// `EnumString`, `AsRefStr` and `FromRepr`.
macro_rules! wire_enum {
    ($ty:ident, $what:literal) => {
        impl $ty {
            /// Stable integer code used in write payloads and query filters.
            #[allow(clippy::as_conversions)]
            pub fn code(self) -> u8 {
                self as u8
            }

            /// Look up a value by its integer code.
            pub fn from_code(code: u8) -> Option<Self> {
                Self::from_repr(code)
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_ref())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match WireValue::deserialize(deserializer)? {
                    WireValue::Code(code) => u8::try_from(code)
                        .ok()
                        .and_then(Self::from_repr)
                        .ok_or_else(|| {
                            serde::de::Error::custom(format!(concat!("unknown ", $what, " code {}"), code))
                        }),
                    WireValue::Name(name) => name.parse().map_err(|_| {
                        serde::de::Error::custom(format!(concat!("unknown ", $what, " {:?}"), name))
                    }),
                }
            }
        }
    };
}

/// Account role. Drives both server-side authorization and client routing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter, FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum AppUserRole {
    SuperAdmin = 0,
    Admin = 1,
    Security = 2,
    Staff = 3,
    Student = 4,
    Guest = 5,
}

wire_enum!(AppUserRole, "role");

impl AppUserRole {
    /// Roles allowed into the administrative area.
    pub fn is_privileged(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin | Self::Security)
    }
}

/// Category of a campus room, the unit access rules are written against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter, FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum CampusZoneType {
    Auditorium = 0,
    Laboratory = 1,
    Office = 2,
    Lounge = 3,
    Library = 4,
    Gym = 5,
    Cafeteria = 6,
    AdminArea = 7,
    CommonArea = 8,
    Parking = 9,
    Outdoor = 10,
    Other = 11,
}

wire_enum!(CampusZoneType, "zone type");

/// Outcome of a single access attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter, FromRepr,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum AccessStatus {
    Granted = 0,
    Denied = 1,
}

wire_enum!(AccessStatus, "access status");

/// Document format for server-rendered reports.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Excel,
    Word,
}

impl ReportFormat {
    /// File extension matching what the server renders.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Excel => "xlsx",
            Self::Word => "docx",
        }
    }
}

/// `serialize_with` helper sending an enum as its integer code.
#[allow(clippy::trivially_copy_pass_by_ref)]
mod as_code {
    use serde::Serializer;

    pub(super) fn role<S: Serializer>(
        value: &super::AppUserRole,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(value.code())
    }

    pub(super) fn zone<S: Serializer>(
        value: &super::CampusZoneType,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(value.code())
    }
}

// ── Users ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: AppUserRole,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl UserDto {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// `PUT /user`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(serialize_with = "as_code::role")]
    pub role: AppUserRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
    pub email: String,
    pub role_name: AppUserRole,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpValidationRequest {
    pub email: String,
    pub otp_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetResponse {
    pub reset_token: String,
}

/// Image sent as the `avatar` field of `auth/update-avatar`.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl AvatarUpload {
    /// Build an upload, taking the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = image_content_type(&file_name).to_owned();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }
}

fn image_content_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvatarResponse {
    pub avatar_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordUpdateRequest {
    pub reset_token: String,
    pub email: String,
    pub new_password: String,
}

// ── Access logs ─────────────────────────────────────────────────────

/// One recorded access attempt. Almost everything is optional on the
/// wire; `unigate-core` fills in display defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessLogDto {
    #[serde(default)]
    pub id: i64,
    #[serde(default, alias = "time")]
    pub access_time: Option<String>,
    #[serde(default)]
    pub status: Option<AccessStatus>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub room_name: Option<String>,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub access_point_id: Option<i64>,
}

/// `pageNum` is 1-based and passed through verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_num: u32,
    pub count: u32,
}

impl PageRequest {
    pub fn new(page_num: u32, count: u32) -> Self {
        Self { page_num, count }
    }

    pub(crate) fn to_query(self) -> Vec<(&'static str, String)> {
        vec![
            ("pageNum", self.page_num.to_string()),
            ("count", self.count.to_string()),
        ]
    }
}

// ── Access rules ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRuleDto {
    pub id: i64,
    pub user_role: AppUserRole,
    pub zone_type: CampusZoneType,
    pub has_access: bool,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Body of `POST /accessrule` and `PUT /accessrule/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRulePayload {
    #[serde(serialize_with = "as_code::role")]
    pub user_role: AppUserRole,
    #[serde(serialize_with = "as_code::zone")]
    pub zone_type: CampusZoneType,
    pub has_access: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Optional narrowing for `GET /accessrule`. Unset fields are omitted
/// from the query string entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRuleFilter {
    pub user_role: Option<AppUserRole>,
    pub zone_type: Option<CampusZoneType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

impl AccessRuleFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(role) = self.user_role {
            params.push(("userRole", role.code().to_string()));
        }
        if let Some(zone) = self.zone_type {
            params.push(("zoneType", zone.code().to_string()));
        }
        if let Some(date) = self.start_date {
            params.push(("startDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.end_date {
            params.push(("endDate", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(time) = self.start_time {
            params.push(("startTime", time.format("%H:%M:%S").to_string()));
        }
        if let Some(time) = self.end_time {
            params.push(("endTime", time.format("%H:%M:%S").to_string()));
        }
        params
    }
}

// ── Campus ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingDto {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub floors: Vec<FloorDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorDto {
    pub id: i64,
    pub number: i32,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub building_id: i64,
    #[serde(default)]
    pub rooms: Vec<RoomDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDto {
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "type")]
    pub room_type: Option<CampusZoneType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub floor_id: i64,
    #[serde(default)]
    pub zone_id: Option<i64>,
    #[serde(default)]
    pub access_points: Vec<AccessPointDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointDto {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub room_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildingPayload {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorPayload {
    pub building_id: i64,
    pub number: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub floor_id: i64,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub room_type: CampusZoneType,
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPointPayload {
    pub room_id: i64,
    pub identifier: String,
    /// Reader technology, e.g. `QR` or `RFID`.
    #[serde(rename = "type")]
    pub kind: String,
}

// ── Reports ─────────────────────────────────────────────────────────

/// Parameters for `GET report/access-logs`. Only `format` is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub status: Option<AccessStatus>,
    pub user_id: Option<i64>,
    pub access_point_id: Option<i64>,
    pub format: ReportFormat,
}

impl ReportQuery {
    pub(crate) fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(from) = self.from {
            params.push(("from", from.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        if let Some(status) = self.status {
            params.push(("status", status.code().to_string()));
        }
        if let Some(id) = self.user_id {
            params.push(("userId", id.to_string()));
        }
        if let Some(id) = self.access_point_id {
            params.push(("accessPointId", id.to_string()));
        }
        params.push(("type", self.format.to_string()));
        params
    }
}

/// A rendered report as returned by the server.
#[derive(Debug, Clone)]
pub struct Report {
    pub format: ReportFormat,
    pub content_type: String,
    pub bytes: Bytes,
}

impl Report {
    /// `report.pdf`, `report.xlsx` or `report.docx`.
    pub fn suggested_file_name(&self) -> String {
        format!("report.{}", self.format.extension())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn enums_accept_name_or_code() {
        let by_name: AppUserRole = serde_json::from_value(json!("Security")).unwrap();
        let by_code: AppUserRole = serde_json::from_value(json!(2)).unwrap();
        assert_eq!(by_name, AppUserRole::Security);
        assert_eq!(by_code, AppUserRole::Security);

        let zone: CampusZoneType = serde_json::from_value(json!(10)).unwrap();
        assert_eq!(zone, CampusZoneType::Outdoor);
        assert!(serde_json::from_value::<CampusZoneType>(json!(12)).is_err());
        assert!(serde_json::from_value::<AccessStatus>(json!("Maybe")).is_err());
    }

    #[test]
    fn codes_match_server_numbering() {
        assert_eq!(AppUserRole::SuperAdmin.code(), 0);
        assert_eq!(AppUserRole::Guest.code(), 5);
        assert_eq!(CampusZoneType::Other.code(), 11);
        assert_eq!(AccessStatus::Denied.code(), 1);
        assert_eq!(CampusZoneType::from_code(7), Some(CampusZoneType::AdminArea));
    }

    #[test]
    fn access_log_reads_time_alias_and_missing_fields() {
        let log: AccessLogDto = serde_json::from_value(json!({
            "id": 9,
            "time": "2025-05-01T08:30:00",
            "status": "Granted",
            "userId": 3
        }))
        .unwrap();
        assert_eq!(log.access_time.as_deref(), Some("2025-05-01T08:30:00"));
        assert_eq!(log.status, Some(AccessStatus::Granted));
        assert_eq!(log.room_name, None);

        let empty: AccessLogDto = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.id, 0);
        assert_eq!(empty.status, None);
    }

    #[test]
    fn rule_payload_sends_codes() {
        let payload = AccessRulePayload {
            user_role: AppUserRole::Student,
            zone_type: CampusZoneType::Library,
            has_access: true,
            start_time: NaiveTime::from_hms_opt(8, 0, 0),
            end_time: NaiveTime::from_hms_opt(20, 0, 0),
            start_date: None,
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "userRole": 4,
                "zoneType": 4,
                "hasAccess": true,
                "startTime": "08:00:00",
                "endTime": "20:00:00",
                "startDate": null,
                "endDate": "2025-06-30"
            })
        );
    }

    #[test]
    fn empty_rule_filter_has_no_params() {
        let filter = AccessRuleFilter::default();
        assert!(filter.is_empty());
        assert!(filter.to_query().is_empty());
    }

    #[test]
    fn rule_filter_emits_only_set_fields() {
        let filter = AccessRuleFilter {
            zone_type: Some(CampusZoneType::Gym),
            start_time: NaiveTime::from_hms_opt(7, 5, 0),
            ..AccessRuleFilter::default()
        };
        assert_eq!(
            filter.to_query(),
            vec![("zoneType", "5".to_owned()), ("startTime", "07:05:00".to_owned())]
        );
    }

    #[test]
    fn report_query_always_names_the_format() {
        let query = ReportQuery {
            status: Some(AccessStatus::Denied),
            format: ReportFormat::Excel,
            ..ReportQuery::default()
        };
        assert_eq!(
            query.to_query(),
            vec![("status", "1".to_owned()), ("type", "excel".to_owned())]
        );
    }

    #[test]
    fn nested_campus_tree_defaults_missing_children() {
        let building: BuildingDto = serde_json::from_value(json!({
            "id": 1,
            "name": "Main",
            "floors": [{
                "id": 10,
                "number": 2,
                "buildingId": 1,
                "rooms": [{
                    "id": 100,
                    "name": "Lab 201",
                    "type": "Laboratory",
                    "floorId": 10,
                    "accessPoints": [{ "id": 1000, "type": "QR", "identifier": "L201-A", "roomId": 100 }]
                }]
            }]
        }))
        .unwrap();
        let room = &building.floors[0].rooms[0];
        assert_eq!(room.room_type, Some(CampusZoneType::Laboratory));
        assert_eq!(room.access_points[0].kind, "QR");

        let bare: BuildingDto = serde_json::from_value(json!({ "id": 2, "name": "Annex" })).unwrap();
        assert!(bare.floors.is_empty());
    }

    #[test]
    fn avatar_content_type_follows_extension() {
        assert_eq!(AvatarUpload::new("me.PNG", vec![1]).content_type, "image/png");
        assert_eq!(AvatarUpload::new("me.jpeg", vec![1]).content_type, "image/jpeg");
        assert_eq!(AvatarUpload::new("me.webp", vec![1]).content_type, "image/webp");
        assert_eq!(
            AvatarUpload::new("avatar", vec![1]).content_type,
            "application/octet-stream"
        );
    }
}
