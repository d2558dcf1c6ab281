// ── QR badge ──

use unigate_api::{ApiClient, Download};

use crate::error::CoreError;
use crate::view_state::{StateCell, ViewState};

/// Fetches the signed-in user's QR badge image.
#[derive(Debug, Clone)]
pub struct QrCodeController {
    api: ApiClient,
    state: StateCell<ViewState<Download>>,
}

impl QrCodeController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(ViewState::Idle),
        }
    }

    pub fn state(&self) -> ViewState<Download> {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ViewState<Download>> {
        self.state.subscribe()
    }

    pub async fn load(&self) -> ViewState<Download> {
        self.state.set(ViewState::Loading);
        let result = match self.api.user_qr_code().await {
            Ok(image) if image.bytes.is_empty() => Err(CoreError::Internal(
                "server returned an empty QR image".into(),
            )),
            Ok(image) => Ok(image),
            Err(e) => Err(e.into()),
        };
        let next = ViewState::from_result(result);
        self.state.set(next.clone());
        next
    }
}
