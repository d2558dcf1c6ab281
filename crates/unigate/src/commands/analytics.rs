//! Access statistics over a date range.

use std::fmt::Write;

use chrono::{Days, Utc};
use tabled::Tabled;

use unigate_core::AnalyticsController;
use unigate_core::controllers::{AnalyticsReport, DateRange, RankedEntry};

use crate::cli::{AnalyticsArgs, GlobalOpts};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

/// Days covered when `--from` is omitted, counting the last day.
const DEFAULT_SPAN_DAYS: u64 = 30;

#[derive(Tabled)]
struct RankRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Visits")]
    count: usize,
}

fn ranking(title: &str, entries: &[RankedEntry]) -> String {
    let rows: Vec<RankRow> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| RankRow {
            rank: i + 1,
            name: e.name.clone(),
            count: e.count,
        })
        .collect();
    format!("{title}\n{}", output::render_table(&rows))
}

/// Earliest hour with the most visits, if any.
fn busiest_hour(hourly: &[usize; 24]) -> Option<usize> {
    let peak = hourly.iter().copied().max().filter(|n| *n > 0)?;
    hourly.iter().position(|n| *n == peak)
}

fn detail(report: &AnalyticsReport) -> String {
    let mut out = output::detail(&[
        (
            "Range",
            format!("{} to {} ({} days)", report.range.from, report.range.to, report.range.days()),
        ),
        ("Total", report.total.to_string()),
        ("Granted", report.granted.to_string()),
        ("Denied", report.denied.to_string()),
        ("Per day", format!("{:.1}", report.average_per_day)),
        (
            "Busiest hour",
            busiest_hour(&report.hourly).map_or_else(|| "-".into(), |h| format!("{h:02}:00 UTC")),
        ),
    ]);
    let _ = write!(out, "\n\n{}", output::day_bars(&report.daily));
    if !report.top_users.is_empty() {
        let _ = write!(out, "\n\n{}", ranking("Top users", &report.top_users));
    }
    if !report.top_rooms.is_empty() {
        let _ = write!(out, "\n\n{}", ranking("Top rooms", &report.top_rooms));
    }
    out
}

fn resolve_range(args: &AnalyticsArgs) -> Result<DateRange, CliError> {
    let to = args.to.unwrap_or_else(|| Utc::now().date_naive());
    let from = args.from.unwrap_or_else(|| {
        to.checked_sub_days(Days::new(DEFAULT_SPAN_DAYS - 1))
            .unwrap_or(to)
    });
    Ok(DateRange::new(from, to)?)
}

pub async fn handle(
    ctx: &SessionContext,
    args: AnalyticsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let range = resolve_range(&args)?;
    util::require_session(ctx).await?;

    let controller = AnalyticsController::new(ctx.session.api().clone());
    let report = util::settle(controller.load(range).await)?;

    let out = output::render_single(&global.output, &report, detail, |r| r.total.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}
