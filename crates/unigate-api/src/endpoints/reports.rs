// Report download endpoint

use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{Report, ReportQuery};

impl ApiClient {
    /// Have the server render an access-log report.
    ///
    /// `GET report/access-logs?from&to&status&userId&accessPointId&type`
    pub async fn generate_report(&self, query: &ReportQuery) -> Result<Report, Error> {
        debug!(format = %query.format, "requesting report");
        let download = self
            .get_bytes("report/access-logs", &query.to_query())
            .await?;
        Ok(Report {
            format: query.format,
            content_type: download.content_type,
            bytes: download.bytes,
        })
    }
}
