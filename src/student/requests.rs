use serde::Deserialize;

#[derive(Deserialize)]
pub struct SearchTeacherRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct OpenSlotsRequest {
    pub login_token: String,
    #[serde(default)]
    pub teacher_id: String,
    #[serde(default)]
    pub date: String,
}

#[derive(Deserialize)]
pub struct AppointRequest {
    pub login_token: String,
    #[serde(default)]
    pub teacher_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slot: String,
    #[serde(default)]
    pub reason: String,
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
