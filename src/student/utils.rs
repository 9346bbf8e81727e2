use diesel::SqliteConnection;

use crate::{
    error::BookingResult,
    identity::{current_identity, SessionContext},
    models::users::Role,
    utils::now,
};

pub fn get_student_session(
    conn: &mut SqliteConnection,
    token: &str,
    ttl_secs: i64,
) -> BookingResult<SessionContext> {
    let session = current_identity(conn, token, ttl_secs, now())?;
    session.require_role(Role::Student)?;
    Ok(session)
}
