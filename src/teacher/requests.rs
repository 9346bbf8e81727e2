use serde::Deserialize;

#[derive(Deserialize)]
pub struct PublishTimeRequest {
    pub login_token: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slots: Vec<String>,
}

#[derive(Deserialize)]
pub struct ViewTimeRequest {
    pub login_token: String,
    pub date: String,
}

#[derive(Deserialize)]
pub struct SearchAppointRequest {
    pub login_token: String,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelAppointRequest {
    pub login_token: String,
    pub appointment_id: String,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Deserialize)]
pub struct FinishAppointRequest {
    pub login_token: String,
    pub appointment_id: String,
    #[serde(default)]
    pub confirm: bool,
}
