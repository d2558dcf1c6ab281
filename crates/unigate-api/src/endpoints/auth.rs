// Authentication endpoints under `auth/`

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::types::{
    AssignRoleRequest, AvatarResponse, AvatarUpload, LoginRequest, LoginResponse,
    OtpValidationRequest, PasswordChangeRequest, PasswordResetRequest, PasswordResetResponse,
    PasswordUpdateRequest, RegisterRequest,
};

impl ApiClient {
    /// Exchange credentials for a session token.
    ///
    /// `POST auth/login`. Does not touch the credential store; persisting
    /// the token is the caller's job.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, Error> {
        debug!(email = %request.email, "logging in");
        self.post("auth/login", request).await
    }

    /// `POST auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<String, Error> {
        self.post_text("auth/register", request).await
    }

    /// Invalidate the current session server-side. `POST auth/logout`
    pub async fn logout(&self) -> Result<String, Error> {
        self.post_text("auth/logout", &serde_json::json!({})).await
    }

    /// `POST auth/assign-role`
    pub async fn assign_role(&self, request: &AssignRoleRequest) -> Result<String, Error> {
        self.post_text("auth/assign-role", request).await
    }

    /// `POST auth/change-password`
    pub async fn change_password(&self, request: &PasswordChangeRequest) -> Result<String, Error> {
        self.post_text("auth/change-password", request).await
    }

    /// Ask the server to email a one-time code. `POST auth/reset-password-request`
    pub async fn request_password_reset(
        &self,
        request: &PasswordResetRequest,
    ) -> Result<String, Error> {
        self.post_text("auth/reset-password-request", request).await
    }

    /// Trade a one-time code for a reset token. `POST auth/verify-otp`
    pub async fn verify_otp(
        &self,
        request: &OtpValidationRequest,
    ) -> Result<PasswordResetResponse, Error> {
        self.post("auth/verify-otp", request).await
    }

    /// `POST auth/reset-password`
    pub async fn reset_password(&self, request: &PasswordUpdateRequest) -> Result<String, Error> {
        self.post_text("auth/reset-password", request).await
    }

    /// Replace the signed-in account's avatar image.
    ///
    /// `POST auth/update-avatar` as a multipart form with one `avatar`
    /// file field. Returns where the server now serves the image.
    pub async fn update_avatar(&self, upload: AvatarUpload) -> Result<AvatarResponse, Error> {
        debug!(file = %upload.file_name, size = upload.bytes.len(), "uploading avatar");
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("avatar", part);
        self.post_multipart("auth/update-avatar", form).await
    }
}
