//! QR access badge download.

use unigate_core::QrCodeController;

use crate::cli::{GlobalOpts, QrcodeArgs};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    ctx: &SessionContext,
    args: QrcodeArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let controller = QrCodeController::new(ctx.session.api().clone());
    let image = util::settle(controller.load().await)?;

    tokio::fs::write(&args.out, &image.bytes).await?;
    output::notice(
        &format!(
            "✓ Saved {} ({}, {} bytes)",
            args.out.display(),
            image.content_type,
            image.bytes.len()
        ),
        global.quiet,
    );
    Ok(())
}
