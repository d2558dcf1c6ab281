// Access rule endpoints under `accessrule/`

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{AccessRuleDto, AccessRuleFilter, AccessRulePayload};

impl ApiClient {
    /// `GET accessrule`, narrowed by whichever filter fields are set.
    pub async fn list_access_rules(
        &self,
        filter: &AccessRuleFilter,
    ) -> Result<Vec<AccessRuleDto>, Error> {
        let params = filter.to_query();
        if params.is_empty() {
            self.get("accessrule").await
        } else {
            self.get_with_params("accessrule", &params).await
        }
    }

    /// Rules that apply to the session owner's role. `GET accessrule/my`
    pub async fn my_access_rules(&self) -> Result<Vec<AccessRuleDto>, Error> {
        self.get("accessrule/my").await
    }

    /// `POST accessrule`
    pub async fn create_access_rule(&self, payload: &AccessRulePayload) -> Result<(), Error> {
        self.post_no_response("accessrule", payload).await
    }

    /// `PUT accessrule/{id}`
    pub async fn update_access_rule(
        &self,
        id: i64,
        payload: &AccessRulePayload,
    ) -> Result<(), Error> {
        self.put_no_response(&format!("accessrule/{id}"), payload)
            .await
    }

    /// `DELETE accessrule/{id}`
    pub async fn delete_access_rule(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("accessrule/{id}")).await
    }
}
