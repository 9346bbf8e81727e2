use serde::Serialize;

use crate::protocol::Severity;

#[derive(Default, Serialize)]
pub struct PublishTimeResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub id: String,
    pub replaced: bool,
}

#[derive(Default, Serialize)]
pub struct ViewTimeResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub date: String,
    pub slots: Vec<String>,
}

crate::impl_err_response! {
    PublishTimeResponse,
    ViewTimeResponse,
}
