//! Accounts and login sessions.
//!
//! A login token is resolved into a [`SessionContext`] once per request; every
//! command takes that context explicitly instead of reading shared state.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::{info, warn};

use crate::{
    database::assert,
    error::{BookingError, BookingResult},
    models::{
        sessions::SessionData,
        users::{Role, UserData},
    },
    utils::{hash_password, new_id, require_field},
};

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub token: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl SessionContext {
    fn new(token: String, user: UserData) -> BookingResult<Self> {
        let role = user.role()?;
        Ok(Self {
            token,
            user_id: user.id,
            name: user.name,
            email: user.email,
            role,
        })
    }

    pub fn require_role(&self, role: Role) -> BookingResult<()> {
        if self.role != role {
            return Err(BookingError::validation(format!(
                "only a {} can do this",
                role
            )));
        }
        Ok(())
    }
}

pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
}

fn normalize_email(email: &str) -> BookingResult<String> {
    let email = require_field(email, "email")?.to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    };
    if !valid {
        return Err(BookingError::validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email)
}

#[tracing::instrument(skip(conn, account), fields(email = %account.email, role = %account.role))]
pub fn create_account(
    conn: &mut SqliteConnection,
    account: NewAccount,
    now: NaiveDateTime,
) -> BookingResult<UserData> {
    use crate::schema::users;

    let name = require_field(&account.name, "name")?.to_string();
    let email = normalize_email(&account.email)?;
    if account.password.is_empty() {
        return Err(BookingError::validation("password is required"));
    }
    if account.password != account.confirm_password {
        return Err(BookingError::validation("passwords do not match"));
    }
    if account.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(BookingError::validation(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let user = conn.immediate_transaction::<_, BookingError, _>(|conn| {
        if assert::email_taken(conn, &email)? {
            return Err(BookingError::validation("email is already registered"));
        }

        let data = UserData {
            id: new_id(),
            name,
            email,
            password: hash_password(&account.password),
            role: account.role.as_str().to_string(),
            created_at: now,
        };
        diesel::insert_into(users::table)
            .values(&data)
            .execute(conn)?;

        Ok(data)
    })?;

    info!(user_id = %user.id, "account created");
    Ok(user)
}

/// Signs in and then checks the stored role against the one the caller chose.
/// On a mismatch the fresh session is signed out again before failing.
#[tracing::instrument(skip(conn, password))]
pub fn authenticate(
    conn: &mut SqliteConnection,
    email: &str,
    password: &str,
    role: Role,
    now: NaiveDateTime,
) -> BookingResult<SessionContext> {
    use crate::schema::{sessions, users};

    let email = email.trim().to_ascii_lowercase();
    let user = users::table
        .filter(users::email.eq(&email))
        .filter(users::password.eq(hash_password(password)))
        .get_result::<UserData>(conn)
        .optional()?
        .ok_or_else(|| BookingError::Unauthenticated("wrong email or password".to_string()))?;

    let token = new_id();
    diesel::insert_into(sessions::table)
        .values(SessionData {
            token: token.clone(),
            user_id: user.id.clone(),
            login_time: now,
        })
        .execute(conn)?;

    let session = SessionContext::new(token, user)?;
    if session.role != role {
        sign_out(conn, &session.token)?;
        warn!(user_id = %session.user_id, stored = %session.role, "role mismatch at login");
        return Err(BookingError::validation(format!(
            "You're not registered as a {}. Please choose the correct role.",
            role
        )));
    }

    info!(user_id = %session.user_id, "signed in");
    Ok(session)
}

pub fn sign_out(conn: &mut SqliteConnection, token: &str) -> BookingResult<()> {
    use crate::schema::sessions;

    diesel::delete(sessions::table.filter(sessions::token.eq(token))).execute(conn)?;
    Ok(())
}

pub fn current_identity(
    conn: &mut SqliteConnection,
    token: &str,
    ttl_secs: i64,
    now: NaiveDateTime,
) -> BookingResult<SessionContext> {
    use crate::schema::{sessions, users};

    if token.is_empty() {
        return Err(BookingError::Unauthenticated("you are not logged in".to_string()));
    }

    let data = sessions::table
        .inner_join(users::table)
        .filter(sessions::token.eq(token))
        .get_result::<(SessionData, UserData)>(conn)
        .optional()?;

    match data {
        Some((session, user)) => {
            let age = now.signed_duration_since(session.login_time);
            if age.num_seconds() > ttl_secs {
                return Err(BookingError::Unauthenticated("login has expired".to_string()));
            }
            SessionContext::new(session.token, user)
        }
        None => Err(BookingError::Unauthenticated("you are not logged in".to_string())),
    }
}
