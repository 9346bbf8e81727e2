use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::info;

use crate::{
    database::assert,
    error::{BookingError, BookingResult},
    identity::SessionContext,
    models::{
        appointments::{AppointStatus, Appointment, APPOINT_STATUS_SCHEDULED},
        users::Role,
    },
};

/// `scheduled` may become `cancelled` (either party) or `completed` (teacher only).
/// Nothing leaves a terminal state and nothing returns to `scheduled`.
pub fn check_transition(from: AppointStatus, to: AppointStatus, role: Role) -> BookingResult<()> {
    match (from, to) {
        (AppointStatus::Scheduled, AppointStatus::Cancelled) => Ok(()),
        (AppointStatus::Scheduled, AppointStatus::Completed) if role == Role::Teacher => Ok(()),
        (AppointStatus::Scheduled, AppointStatus::Completed) => Err(BookingError::validation(
            "only the teacher can mark an appointment completed",
        )),
        (from, to) => Err(BookingError::IllegalTransition { from, to }),
    }
}

fn is_party(session: &SessionContext, appo: &Appointment) -> bool {
    match session.role {
        Role::Student => appo.student_id == session.user_id,
        Role::Teacher => appo.teacher_id == session.user_id,
    }
}

/// `confirmed` is the caller's explicit acknowledgment; without it nothing is touched.
#[tracing::instrument(skip(conn, session), fields(user_id = %session.user_id))]
pub fn transition(
    conn: &mut SqliteConnection,
    session: &SessionContext,
    appointment_id: &str,
    target: AppointStatus,
    confirmed: bool,
    now: NaiveDateTime,
) -> BookingResult<Appointment> {
    use crate::schema::appointments;

    if !confirmed {
        return Err(BookingError::validation(format!(
            "please confirm that the appointment should be {}",
            target
        )));
    }

    let appo = assert::find_appointment(conn, appointment_id)?;
    if !is_party(session, &appo) {
        return Err(BookingError::validation(
            "you are not a participant of this appointment",
        ));
    }
    let current = appo.status()?;
    check_transition(current, target, session.role)?;

    let updated = diesel::update(
        appointments::table
            .filter(appointments::id.eq(appointment_id))
            .filter(appointments::status.eq(APPOINT_STATUS_SCHEDULED)),
    )
    .set((
        appointments::status.eq(target.as_str()),
        appointments::updated_at.eq(Some(now)),
    ))
    .execute(conn)?;

    let appo = assert::find_appointment(conn, appointment_id)?;
    if updated == 0 {
        // Someone else moved it out of `scheduled` between the read and the write.
        return Err(BookingError::IllegalTransition {
            from: appo.status()?,
            to: target,
        });
    }

    info!(appointment_id = %appo.id, status = %target, "appointment updated");
    Ok(appo)
}
