use serde::Serialize;

use crate::protocol::Severity;

#[derive(Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub login_token: String,
    pub user_id: String,
    pub name: String,
    pub role: String,
}

#[derive(Default, Serialize)]
pub struct ViewInfoResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

crate::impl_err_response! {
    LoginResponse,
    ViewInfoResponse,
}
