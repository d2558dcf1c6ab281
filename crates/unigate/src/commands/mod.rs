//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod analytics;
pub mod auth;
pub mod campus;
pub mod config_cmd;
pub mod dashboard;
pub mod history;
pub mod home;
pub mod logs;
pub mod qrcode;
pub mod report;
pub mod rules;
pub mod users;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::SessionContext;
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &SessionContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args, global).await,
        Command::Logout => auth::logout(ctx, global).await,
        Command::Whoami => auth::whoami(ctx, global).await,
        Command::Password(args) => auth::password(ctx, args, global).await,
        Command::Home => home::handle(ctx, global).await,
        Command::History(args) => history::handle(ctx, args, global).await,
        Command::Rules(args) => rules::handle(ctx, args, global).await,
        Command::Logs(args) => logs::handle(ctx, args, global).await,
        Command::Dashboard => dashboard::handle(ctx, global).await,
        Command::Analytics(args) => analytics::handle(ctx, args, global).await,
        Command::Campus => campus::tree(ctx, global).await,
        Command::Buildings(args) => campus::buildings(ctx, args, global).await,
        Command::Floors(args) => campus::floors(ctx, args, global).await,
        Command::Rooms(args) => campus::rooms(ctx, args, global).await,
        Command::AccessPoints(args) => campus::access_points(ctx, args, global).await,
        Command::Users(args) => users::handle(ctx, args, global).await,
        Command::Report(args) => report::handle(ctx, args, global).await,
        Command::Qrcode(args) => qrcode::handle(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
