use std::{fmt, str::FromStr};

use crate::{error::BookingError, schema::appointments};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Queryable, Clone, Debug)]
pub struct Appointment {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub date: String,
    pub slot: String,
    pub reason: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Appointment {
    pub fn status(&self) -> Result<AppointStatus, BookingError> {
        self.status.parse()
    }
}

#[derive(Insertable)]
#[diesel(table_name = appointments)]
pub struct NewAppointment {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub date: String,
    pub slot: String,
    pub reason: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

pub const APPOINT_STATUS_SCHEDULED: &str = "scheduled";
pub const APPOINT_STATUS_COMPLETED: &str = "completed";
pub const APPOINT_STATUS_CANCELLED: &str = "cancelled";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointStatus::Scheduled => APPOINT_STATUS_SCHEDULED,
            AppointStatus::Completed => APPOINT_STATUS_COMPLETED,
            AppointStatus::Cancelled => APPOINT_STATUS_CANCELLED,
        }
    }
}

impl FromStr for AppointStatus {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            APPOINT_STATUS_SCHEDULED => Ok(AppointStatus::Scheduled),
            APPOINT_STATUS_COMPLETED => Ok(AppointStatus::Completed),
            APPOINT_STATUS_CANCELLED => Ok(AppointStatus::Cancelled),
            other => Err(BookingError::validation(format!(
                "unknown appointment status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for AppointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
