// ── Access history (paginated) ──

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::debug;

use unigate_api::ApiClient;
use unigate_api::types::PageRequest;

use crate::convert::logs_from_dtos;
use crate::error::CoreError;
use crate::model::{AccessLog, AccessStatus};
use crate::view_state::{LoadError, StateCell};

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// One history line as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub access_point: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub status: AccessStatus,
    pub reason: Option<String>,
}

impl From<AccessLog> for HistoryRow {
    fn from(log: AccessLog) -> Self {
        Self {
            access_point: log.room_name,
            date: log.access_time.date_naive(),
            time: log.access_time.time(),
            status: log.status,
            reason: log.reason,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryState {
    pub items: Vec<HistoryRow>,
    /// Number of pages loaded so far.
    pub page: u32,
    pub is_loading: bool,
    pub end_reached: bool,
    pub error: Option<LoadError>,
}

/// Incrementally loads the session owner's access history.
///
/// Pages are appended in request order. A request is skipped while another
/// is in flight or once a short page has been seen.
#[derive(Debug, Clone)]
pub struct HistoryController {
    api: ApiClient,
    page_size: u32,
    state: StateCell<HistoryState>,
}

impl HistoryController {
    pub fn new(api: ApiClient) -> Self {
        Self::with_page_size(api, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(api: ApiClient, page_size: u32) -> Self {
        Self {
            api,
            page_size: page_size.max(1),
            state: StateCell::new(HistoryState::default()),
        }
    }

    pub fn state(&self) -> HistoryState {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<HistoryState> {
        self.state.subscribe()
    }

    /// Fetch the next page. Returns `false` when the call was suppressed.
    pub async fn load_next_page(&self) -> bool {
        let mut next_page = 0;
        let claimed = self.state.update_if(|s| {
            if s.is_loading || s.end_reached {
                return false;
            }
            s.is_loading = true;
            s.error = None;
            next_page = s.page + 1;
            true
        });
        if !claimed {
            debug!("history load suppressed");
            return false;
        }

        let result = self
            .api
            .user_access_logs(PageRequest::new(next_page, self.page_size))
            .await
            .map_err(CoreError::from);

        match result {
            Ok(dtos) => {
                let fetched = dtos.len();
                let rows: Vec<HistoryRow> = logs_from_dtos(dtos)
                    .into_iter()
                    .map(HistoryRow::from)
                    .collect();
                let page_size = self.page_size;
                self.state.update(|s| {
                    s.items.extend(rows);
                    s.page += 1;
                    s.is_loading = false;
                    s.end_reached = fetched < usize::try_from(page_size).unwrap_or(usize::MAX);
                });
                debug!(page = next_page, fetched, "history page loaded");
            }
            Err(e) => {
                self.state.update(|s| {
                    s.is_loading = false;
                    s.error = Some(LoadError::from(&e));
                });
            }
        }
        true
    }
}
