// User endpoints under `user/`

use crate::client::{ApiClient, Download};
use crate::error::Error;
use crate::types::{UpdateUserRequest, UserDto};

impl ApiClient {
    /// The account behind the current session. `GET user`
    pub async fn current_user(&self) -> Result<UserDto, Error> {
        self.get("user").await
    }

    /// `GET user/all`
    pub async fn list_users(&self) -> Result<Vec<UserDto>, Error> {
        self.get("user/all").await
    }

    /// The session owner's QR badge as an image. `GET user/qrcode`
    pub async fn user_qr_code(&self) -> Result<Download, Error> {
        self.get_bytes("user/qrcode", &[]).await
    }

    /// `PUT user`
    pub async fn update_user(&self, request: &UpdateUserRequest) -> Result<String, Error> {
        self.put_text("user", request).await
    }

    /// `DELETE user/{id}`
    pub async fn delete_user(&self, id: i64) -> Result<(), Error> {
        self.delete(&format!("user/{id}")).await
    }
}
