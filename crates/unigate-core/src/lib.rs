// unigate-core: Domain layer between unigate-api and consumers (CLI/UI).
//
// Session wiring, API-to-domain conversion, role routing, and one
// view-state controller per screen.

pub mod config;
pub mod controllers;
pub mod convert;
pub mod error;
pub mod model;
pub mod route;
pub mod scope;
pub mod session;
pub mod view_state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ClientConfig, TlsVerification};
pub use error::CoreError;
pub use route::{GuardDecision, Route};
pub use scope::ControllerScope;
pub use session::{AuthState, Session};
pub use view_state::{LoadError, StateCell, ViewState};

pub use controllers::{
    AccessRuleAdminController, AdminDashboardController, AnalyticsController, CampusController,
    HistoryController, HomeController, LoginController, MyRulesController, QrCodeController,
};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AccessLog, AccessPoint, AccessRule, AccessStatus, AppUserRole, Building, CampusNode,
    CampusNodeKind, CampusZoneType, Floor, Room, User,
};

// The credential-store seam is part of the public surface.
pub use unigate_api::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionToken, TokenCache,
};
