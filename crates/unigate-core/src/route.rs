// ── Role-based routing ──
//
// Where a user lands after signing in, and whether a given path may be
// shown for the current session.

use std::fmt;

use crate::model::AppUserRole;

/// Paths reachable without a session (prefix match).
const PUBLIC_PREFIXES: &[&str] = &["/auth/login", "/auth/register", "/auth/reset", "/404"];

/// Areas that require a session (prefix match).
const PROTECTED_PREFIXES: &[&str] = &["/admin", "/user", "/guest"];

/// Named destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    AdminDashboard,
    AdminSecurity,
    UserDashboard,
    GuestPermissions,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/auth/login",
            Self::AdminDashboard => "/admin/dashboard",
            Self::AdminSecurity => "/admin/security",
            Self::UserDashboard => "/user/dashboard",
            Self::GuestPermissions => "/guest/permissions",
        }
    }

    /// First screen after a successful login.
    pub fn landing_for(role: AppUserRole) -> Self {
        match role {
            AppUserRole::SuperAdmin | AppUserRole::Admin => Self::AdminDashboard,
            AppUserRole::Security => Self::AdminSecurity,
            AppUserRole::Guest => Self::GuestPermissions,
            AppUserRole::Staff | AppUserRole::Student => Self::UserDashboard,
        }
    }

    /// Where to go when the stored session changes: login once it is gone.
    pub fn on_session_change(role: Option<AppUserRole>) -> Self {
        role.map_or(Self::Login, Self::landing_for)
    }

    /// Decide whether `path` may be shown to a session holding `role`
    /// (`None` for no session).
    ///
    /// Every redirect for a signed-in user lands on a concrete screen from
    /// [`landing_for`](Self::landing_for). The web portal's guard instead
    /// sends unprivileged `/admin` requests to `/` and a Guest on `/user`
    /// to `/guest/home`; neither page exists among these routes.
    pub fn guard(path: &str, role: Option<AppUserRole>) -> GuardDecision {
        if PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
            return GuardDecision::Allow;
        }
        if !PROTECTED_PREFIXES.iter().any(|p| path.starts_with(p)) {
            return GuardDecision::Allow;
        }

        let Some(role) = role else {
            return GuardDecision::Redirect(Self::Login);
        };

        if path.starts_with("/admin") && !role.is_privileged() {
            return GuardDecision::Redirect(Self::landing_for(role));
        }
        if path.starts_with("/user") && (role.is_privileged() || role == AppUserRole::Guest) {
            return GuardDecision::Redirect(Self::landing_for(role));
        }
        GuardDecision::Allow
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of [`Route::guard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(Route),
}
