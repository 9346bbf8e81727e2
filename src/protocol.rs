use serde::Serialize;

use crate::models::appointments::Appointment;

/// How a client should present a response message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Success
    }
}

#[derive(Default, Serialize)]
pub struct SimpleResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
}

impl SimpleResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: "".to_string(),
            severity: Severity::Success,
        }
    }
}

#[derive(Default, Serialize)]
pub struct IdResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub id: String,
}

impl IdResponse {
    pub fn ok(id: String) -> Self {
        Self {
            success: true,
            id,
            ..Default::default()
        }
    }
}

#[derive(Default, Serialize)]
pub struct AppointItem {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub date: String,
    pub slot: String,
    pub reason: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Appointment> for AppointItem {
    fn from(data: Appointment) -> Self {
        Self {
            created_at: crate::utils::format_time_str(&data.created_at),
            updated_at: crate::utils::format_time_str_opt(&data.updated_at),
            id: data.id,
            student_id: data.student_id,
            student_name: data.student_name,
            teacher_id: data.teacher_id,
            teacher_name: data.teacher_name,
            date: data.date,
            slot: data.slot,
            reason: data.reason,
            status: data.status,
        }
    }
}

#[derive(Default, Serialize)]
pub struct SearchAppointResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub notice: String,
    pub appointments: Vec<AppointItem>,
}

impl SearchAppointResponse {
    pub fn ok(appointments: Vec<Appointment>, empty_notice: &str) -> Self {
        let (severity, notice) = if appointments.is_empty() {
            (Severity::Warning, empty_notice.to_string())
        } else {
            (Severity::Success, String::new())
        };
        Self {
            success: true,
            err: "".to_string(),
            severity,
            notice,
            appointments: appointments.into_iter().map(AppointItem::from).collect(),
        }
    }
}

#[derive(Default, Serialize)]
pub struct TransitionResponse {
    pub success: bool,
    pub err: String,
    pub severity: Severity,
    pub appointment: AppointItem,
}

impl TransitionResponse {
    pub fn ok(appointment: Appointment) -> Self {
        Self {
            success: true,
            appointment: appointment.into(),
            ..Default::default()
        }
    }
}

#[macro_export]
macro_rules! impl_err_response {
    ( $( $type:ty),+ $(,)? ) => {
        $(
            impl $type {
                pub fn err<S: ToString>(err: S) -> Self {
                    Self {
                        success: false,
                        err: err.to_string(),
                        severity: $crate::protocol::Severity::Error,
                        ..Default::default()
                    }
                }
            }
        )+
    };
}

impl_err_response! {
    SimpleResponse,
    IdResponse,
    SearchAppointResponse,
    TransitionResponse,
}
