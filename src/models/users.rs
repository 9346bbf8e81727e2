use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{error::BookingError, schema::users};

#[derive(Queryable, Insertable, Identifiable, Clone, Debug)]
#[diesel(table_name = users)]
pub struct UserData {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub created_at: NaiveDateTime,
}

impl UserData {
    pub fn role(&self) -> Result<Role, BookingError> {
        self.role.parse()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_TEACHER: &str = "teacher";

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Teacher => ROLE_TEACHER,
        }
    }
}

impl FromStr for Role {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_TEACHER => Ok(Role::Teacher),
            other => Err(BookingError::validation(format!("unknown role '{}'", other))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
