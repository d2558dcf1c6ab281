// Access log endpoints under `accesslog/`

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{AccessLogDto, PageRequest};

impl ApiClient {
    /// One page of the session owner's access history.
    ///
    /// `GET accesslog/user?pageNum=..&count=..`
    pub async fn user_access_logs(&self, page: PageRequest) -> Result<Vec<AccessLogDto>, Error> {
        self.get_with_params("accesslog/user", &page.to_query())
            .await
    }

    /// Every access attempt on campus. `GET accesslog/all`
    pub async fn all_access_logs(&self) -> Result<Vec<AccessLogDto>, Error> {
        self.get("accesslog/all").await
    }
}
