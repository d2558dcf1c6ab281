//! Server-rendered access-log reports.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use unigate_api::types::ReportQuery;

use crate::cli::{GlobalOpts, ReportArgs};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

fn start_of(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Last representable millisecond of `day`, so `--to` is inclusive.
fn end_of(day: NaiveDate) -> DateTime<Utc> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    day.and_time(last).and_utc()
}

fn query_from(args: &ReportArgs) -> Result<ReportQuery, CliError> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        if from > to {
            return Err(CliError::Validation {
                field: "from".into(),
                reason: format!("{from} is after {to}"),
            });
        }
    }
    Ok(ReportQuery {
        from: args.from.map(start_of),
        to: args.to.map(end_of),
        status: args.status,
        user_id: args.user,
        access_point_id: args.access_point,
        format: args.format,
    })
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet || !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub async fn handle(
    ctx: &SessionContext,
    args: ReportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = query_from(&args)?;
    util::require_session(ctx).await?;

    let bar = spinner(global.quiet);
    bar.set_message(format!("Rendering {} report…", query.format));
    let result = ctx.session.api().generate_report(&query).await;
    bar.finish_and_clear();
    let report = result?;

    let path = args
        .out
        .unwrap_or_else(|| PathBuf::from(report.suggested_file_name()));
    tokio::fs::write(&path, &report.bytes).await?;
    output::notice(
        &format!("✓ Saved {} ({} bytes)", path.display(), report.bytes.len()),
        global.quiet,
    );
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use unigate_api::types::ReportFormat;

    use super::*;

    fn args(from: Option<NaiveDate>, to: Option<NaiveDate>) -> ReportArgs {
        ReportArgs {
            format: ReportFormat::Excel,
            from,
            to,
            status: None,
            user: None,
            access_point: None,
            out: None,
        }
    }

    #[test]
    fn to_date_covers_the_whole_day() {
        let day = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let query = query_from(&args(Some(day), Some(day))).unwrap();
        assert_eq!(query.from.unwrap().to_rfc3339(), "2025-05-01T00:00:00+00:00");
        assert_eq!(
            query.to.unwrap().to_rfc3339(),
            "2025-05-01T23:59:59.999+00:00"
        );
        assert_eq!(query.format, ReportFormat::Excel);
    }

    #[test]
    fn inverted_dates_are_rejected() {
        let err = query_from(&args(
            NaiveDate::from_ymd_opt(2025, 5, 2),
            NaiveDate::from_ymd_opt(2025, 5, 1),
        ))
        .unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
