//! Request and response bodies that exist only at the HTTP edge. Entity
//! payloads come from `eventdesk_core::model`.

use serde::Deserialize;

/// POST /api/users/login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// PUT /api/users/{id}/password
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(alias = "oldPassword")]
    pub old_password: String,
    #[serde(alias = "newPassword")]
    pub new_password: String,
}

/// Query parameters for GET /api/events.
#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    pub q: Option<String>,
    pub creator_id: Option<i64>,
}

/// Body of POST /api/wallets/validate.
#[derive(Debug, Default, Deserialize)]
pub struct WalletReference {
    #[serde(default, alias = "userId")]
    pub user_id: Option<i64>,
}

