// ── View-state controllers ──
//
// One controller per screen. Each owns a `StateCell`, calls endpoint
// methods on a shared `ApiClient`, and shapes results for display.
// Controllers never talk to each other and start fresh when re-created.

mod admin_dashboard;
mod analytics;
mod campus;
mod history;
mod home;
mod login;
mod my_rules;
mod qr_code;
mod rule_admin;

pub use admin_dashboard::{AdminDashboardController, DashboardSummary, RecentAccess};
pub use analytics::{AnalyticsController, AnalyticsReport, DateRange, RankedEntry};
pub use campus::CampusController;
pub use history::{DEFAULT_PAGE_SIZE, HistoryController, HistoryRow, HistoryState};
pub use home::{HomeController, HomeSummary, RecentVisit};
pub use login::{LoginController, LoginOutcome};
pub use my_rules::{MyRulesController, RuleRow};
pub use qr_code::QrCodeController;
pub use rule_admin::{AccessRuleAdminController, RuleAdminState, validate_rule};

use std::collections::BTreeMap;

use chrono::NaiveDate;

/// Count items per calendar day, oldest first.
pub(crate) fn count_by_day<I>(days: I) -> Vec<(NaiveDate, usize)>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut counts = BTreeMap::new();
    for day in days {
        *counts.entry(day).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}
