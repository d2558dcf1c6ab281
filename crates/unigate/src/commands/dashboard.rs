//! Admin overview.

use std::fmt::Write;

use tabled::Tabled;

use unigate_core::AdminDashboardController;
use unigate_core::controllers::DashboardSummary;

use crate::cli::GlobalOpts;
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RecentRow {
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "User")]
    name: String,
    #[tabled(rename = "Access Point")]
    point: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn detail(summary: &DashboardSummary, color: bool) -> String {
    let mut out = output::detail(&[
        ("Users", summary.users_count.to_string()),
        ("Access points", summary.access_points_count.to_string()),
        ("Denied attempts", summary.denied_count.to_string()),
    ]);

    if !summary.visits_by_day.is_empty() {
        let _ = write!(out, "\n\n{}", output::day_bars(&summary.visits_by_day));
    }

    let rows: Vec<RecentRow> = summary
        .recent
        .iter()
        .map(|r| RecentRow {
            time: r.time.format("%Y-%m-%d %H:%M").to_string(),
            name: r.name.clone(),
            point: r.point.clone(),
            status: output::status_label(r.status, color),
        })
        .collect();
    let _ = write!(out, "\n\nRecent access\n{}", output::render_table(&rows));
    out
}

pub async fn handle(ctx: &SessionContext, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let controller = AdminDashboardController::new(ctx.session.api().clone());
    let summary = util::settle(controller.load().await)?;

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &summary,
        |s| detail(s, color),
        |s| s.denied_count.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
