// ── Domain model ──
//
// Canonical representations consumed by controllers and the CLI. Wire
// enums are shared with `unigate-api` unchanged.

pub mod access;
pub mod campus;
pub mod user;

pub use access::{AccessLog, AccessRule};
pub use campus::{AccessPoint, Building, CampusNode, CampusNodeKind, CampusTree, Floor, Room};
pub use user::User;

pub use unigate_api::types::{AccessStatus, AppUserRole, CampusZoneType, ReportFormat};
