//! Campus-wide access log (admin).

use tabled::Tabled;

use unigate_core::AccessLog;
use unigate_core::convert::logs_from_dtos;

use crate::cli::{GlobalOpts, LogsArgs};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Time (UTC)")]
    time: String,
    #[tabled(rename = "User")]
    user: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

fn to_row(log: &AccessLog, color: bool) -> LogRow {
    LogRow {
        id: log.id,
        time: log.access_time.format("%Y-%m-%d %H:%M").to_string(),
        user: log.full_name.clone().unwrap_or_else(|| "Unknown".into()),
        room: log.room_name.clone(),
        status: output::status_label(log.status, color),
        reason: log.reason.clone().unwrap_or_default(),
    }
}

pub async fn handle(
    ctx: &SessionContext,
    args: LogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;

    let mut logs = logs_from_dtos(ctx.session.api().all_access_logs().await?);
    if let Some(status) = args.status {
        logs.retain(|log| log.status == status);
    }
    logs.sort_by(|a, b| b.access_time.cmp(&a.access_time));
    if let Some(limit) = args.limit {
        logs.truncate(limit);
    }

    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &logs,
        |l| to_row(l, color),
        |l| l.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
