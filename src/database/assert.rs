use diesel::prelude::*;

use crate::{
    error::{BookingError, BookingResult},
    models::{
        appointments::Appointment,
        users::{Role, UserData},
    },
};

pub fn find_user(conn: &mut SqliteConnection, user_id: &str) -> BookingResult<UserData> {
    use crate::schema::users;

    users::table
        .filter(users::id.eq(user_id))
        .get_result::<UserData>(conn)
        .optional()?
        .ok_or(BookingError::NotFound("user"))
}

pub fn assert_teacher(conn: &mut SqliteConnection, teacher_id: &str) -> BookingResult<UserData> {
    let user = find_user(conn, teacher_id).map_err(|err| match err {
        BookingError::NotFound(_) => BookingError::NotFound("teacher"),
        other => other,
    })?;
    if user.role()? != Role::Teacher {
        return Err(BookingError::NotFound("teacher"));
    }
    Ok(user)
}

pub fn find_appointment(
    conn: &mut SqliteConnection,
    appointment_id: &str,
) -> BookingResult<Appointment> {
    use crate::schema::appointments;

    appointments::table
        .filter(appointments::id.eq(appointment_id))
        .get_result::<Appointment>(conn)
        .optional()?
        .ok_or(BookingError::NotFound("appointment"))
}

pub fn email_taken(conn: &mut SqliteConnection, email: &str) -> BookingResult<bool> {
    use crate::schema::users;

    let res = users::table
        .filter(users::email.eq(email))
        .count()
        .get_result::<i64>(conn)?;
    Ok(res > 0)
}
