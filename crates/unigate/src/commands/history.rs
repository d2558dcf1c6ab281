//! Access history, fetched page by page.

use tabled::Tabled;

use unigate_core::{ControllerScope, HistoryController};
use unigate_core::controllers::HistoryRow;

use crate::cli::{GlobalOpts, HistoryArgs};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Access Point")]
    access_point: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

fn to_row(row: &HistoryRow, color: bool) -> Row {
    Row {
        date: row.date.to_string(),
        time: row.time.format("%H:%M").to_string(),
        access_point: row.access_point.clone(),
        status: output::status_label(row.status, color),
        reason: row.reason.clone().unwrap_or_default(),
    }
}

pub async fn handle(
    ctx: &SessionContext,
    args: HistoryArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let controller = HistoryController::with_page_size(ctx.session.api().clone(), args.limit);

    // Ctrl-C abandons the page in flight and prints what was loaded.
    let scope = ControllerScope::new();
    let mut loaded = 0;
    while args.all || loaded < args.pages {
        let pager = controller.clone();
        let load = scope.spawn(async move { pager.load_next_page().await });
        let ran = tokio::select! {
            joined = load => joined.map_err(|e| CliError::Internal(e.to_string()))?,
            _ = tokio::signal::ctrl_c() => {
                scope.cancel();
                output::notice("Interrupted; showing pages loaded so far", global.quiet);
                break;
            }
        };
        if ran != Some(true) {
            break;
        }
        loaded += 1;

        let state = controller.state();
        if let Some(err) = state.error {
            if state.items.is_empty() || err.session_ended {
                return Err(util::failure(err));
            }
            tracing::warn!(page = state.page + 1, "{err}");
            break;
        }
        if state.end_reached {
            break;
        }
    }

    let state = controller.state();
    let color = output::should_color(&global.color);
    let out = output::render_list(
        &global.output,
        &state.items,
        |r| to_row(r, color),
        |r| format!("{} {} {}", r.date, r.time.format("%H:%M"), r.access_point),
    );
    output::print_output(&out, global.quiet);

    if !state.end_reached && state.error.is_none() {
        output::notice(
            &format!(
                "{} entries shown; more available (use --pages or --all)",
                state.items.len()
            ),
            global.quiet,
        );
    }
    Ok(())
}
