//! Personal summary screen.

use std::fmt::Write;

use tabled::Tabled;

use unigate_core::HomeController;
use unigate_core::controllers::HomeSummary;

use crate::cli::GlobalOpts;
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct VisitRow {
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Date")]
    date: String,
}

fn detail(summary: &HomeSummary) -> String {
    let mut out = output::detail(&[
        ("Welcome", summary.first_name.clone()),
        ("Access level", summary.access_level.clone()),
        ("Visits (7 days)", summary.visits_last_7_days.to_string()),
        ("Access rules", summary.access_rules_count.to_string()),
    ]);

    let _ = write!(out, "\n\n{}", output::day_bars(&summary.visits_by_date));

    if !summary.recent_visits.is_empty() {
        let rows: Vec<VisitRow> = summary
            .recent_visits
            .iter()
            .map(|v| VisitRow {
                room: v.room_name.clone(),
                date: v.date.to_string(),
            })
            .collect();
        let _ = write!(out, "\n\nRecent visits\n{}", output::render_table(&rows));
    }
    out
}

pub async fn handle(ctx: &SessionContext, global: &GlobalOpts) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let controller = HomeController::new(ctx.session.api().clone());
    let summary = util::settle(controller.load().await)?;

    let out = output::render_single(&global.output, &summary, detail, |s| {
        s.visits_last_7_days.to_string()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
