use chrono::NaiveDateTime;
use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use tracing::info;

use crate::{
    booking::resolver::resolve_open_slots,
    config::CancelledSlotPolicy,
    database::assert,
    error::{BookingError, BookingResult},
    identity::SessionContext,
    models::{
        appointments::{Appointment, NewAppointment, APPOINT_STATUS_SCHEDULED},
        users::Role,
    },
    utils::{new_id, normalize_date_str},
};

#[derive(Clone, Debug)]
pub struct BookingRequest {
    pub teacher_id: String,
    pub date: String,
    pub slot: String,
    pub reason: String,
}

/// Books `slot` for the signed-in student. The open-slot check and the insert
/// share one immediate transaction, and the partial unique index on live
/// appointments rejects anything that still slips through.
#[tracing::instrument(skip(conn, student, req), fields(student_id = %student.user_id, teacher_id = %req.teacher_id, slot = %req.slot))]
pub fn book(
    conn: &mut SqliteConnection,
    student: &SessionContext,
    req: BookingRequest,
    policy: CancelledSlotPolicy,
    now: NaiveDateTime,
) -> BookingResult<Appointment> {
    use crate::schema::appointments;

    student.require_role(Role::Student)?;
    let teacher_id = req.teacher_id.trim();
    let slot = req.slot.trim();
    if teacher_id.is_empty() || req.date.trim().is_empty() || slot.is_empty() {
        return Err(BookingError::validation("Please fill all required fields"));
    }
    let date = normalize_date_str(&req.date)?;

    let appo_id = conn.immediate_transaction::<_, BookingError, _>(|conn| {
        let teacher = assert::assert_teacher(conn, teacher_id)?;

        let open = resolve_open_slots(conn, &teacher.id, &date, policy)?;
        if !open.contains(slot) {
            return Err(BookingError::SlotUnavailable(slot.to_string()));
        }

        let data = NewAppointment {
            id: new_id(),
            student_id: student.user_id.clone(),
            student_name: student.name.clone(),
            teacher_id: teacher.id,
            teacher_name: teacher.name,
            date: date.clone(),
            slot: slot.to_string(),
            reason: req.reason.trim().to_string(),
            status: APPOINT_STATUS_SCHEDULED.to_string(),
            created_at: now,
        };
        match diesel::insert_into(appointments::table)
            .values(&data)
            .execute(conn)
        {
            Ok(_) => Ok(data.id),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(BookingError::SlotUnavailable(slot.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    })?;

    info!(appointment_id = %appo_id, date = %date, "appointment booked");
    assert::find_appointment(conn, &appo_id)
}
