// ── Campus structure ──

use tracing::info;

use unigate_api::ApiClient;

use crate::error::CoreError;
use crate::model::{CampusNodeKind, CampusTree};
use crate::view_state::{StateCell, ViewState};

/// The nested campus tree plus node deletion.
#[derive(Debug, Clone)]
pub struct CampusController {
    api: ApiClient,
    state: StateCell<ViewState<CampusTree>>,
}

impl CampusController {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: StateCell::new(ViewState::Idle),
        }
    }

    pub fn state(&self) -> ViewState<CampusTree> {
        self.state.get()
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<ViewState<CampusTree>> {
        self.state.subscribe()
    }

    pub async fn refresh(&self) -> ViewState<CampusTree> {
        self.state.set(ViewState::Loading);
        let result = self
            .api
            .list_buildings()
            .await
            .map(CampusTree::new)
            .map_err(CoreError::from);
        let next = ViewState::from_result(result);
        self.state.set(next.clone());
        next
    }

    /// Delete one node, then reload the tree.
    pub async fn delete(&self, kind: CampusNodeKind, id: i64) -> Result<(), CoreError> {
        match kind {
            CampusNodeKind::Building => self.api.delete_building(id).await?,
            CampusNodeKind::Floor => self.api.delete_floor(id).await?,
            CampusNodeKind::Room => self.api.delete_room(id).await?,
            CampusNodeKind::AccessPoint => self.api.delete_access_point(id).await?,
        }
        info!(%kind, id, "campus node deleted");
        self.refresh().await;
        Ok(())
    }

    /// Label of a node in the last loaded tree.
    pub fn label_of(&self, kind: CampusNodeKind, id: i64) -> Option<String> {
        let state = self.state.get();
        state.loaded()?.find(kind, id).map(|node| node.label())
    }
}
