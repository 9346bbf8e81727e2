use std::collections::HashSet;

use chrono::NaiveDateTime;
use diesel::prelude::*;
use tracing::info;

use crate::{
    booking::resolver::find_availability,
    error::{BookingError, BookingResult},
    identity::SessionContext,
    models::{
        availability::{NewAvailability, UpdateAvailability},
        users::Role,
    },
    utils::{new_id, normalize_date_str},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Published {
    Created(String),
    Replaced(String),
}

impl Published {
    pub fn id(&self) -> &str {
        match self {
            Published::Created(id) | Published::Replaced(id) => id,
        }
    }
}

/// Trims every slot, rejects blanks and keeps only the first of any repeats.
pub fn normalize_slots(slots: Vec<String>) -> BookingResult<Vec<String>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(slots.len());
    for slot in slots {
        let slot = slot.trim();
        if slot.is_empty() {
            return Err(BookingError::validation("time slots cannot be blank"));
        }
        if seen.insert(slot.to_string()) {
            out.push(slot.to_string());
        }
    }
    Ok(out)
}

/// Replaces the teacher's slot set for `date` wholesale, or creates it.
/// Slots that already carry bookings are not reconciled.
#[tracing::instrument(skip(conn, teacher), fields(teacher_id = %teacher.user_id))]
pub fn publish(
    conn: &mut SqliteConnection,
    teacher: &SessionContext,
    date: &str,
    slots: Vec<String>,
    now: NaiveDateTime,
) -> BookingResult<Published> {
    use crate::schema::availability;

    teacher.require_role(Role::Teacher)?;
    if date.trim().is_empty() || slots.is_empty() {
        return Err(BookingError::validation(
            "Please select date and at least one time slot",
        ));
    }
    let date = normalize_date_str(date)?;
    let slots = serde_json::to_string(&normalize_slots(slots)?)?;

    let published = conn.immediate_transaction::<_, BookingError, _>(|conn| {
        match find_availability(conn, &teacher.user_id, &date)? {
            Some(existing) => {
                diesel::update(availability::table.filter(availability::id.eq(&existing.id)))
                    .set(&UpdateAvailability {
                        slots,
                        updated_at: Some(now),
                    })
                    .execute(conn)?;
                Ok(Published::Replaced(existing.id))
            }
            None => {
                let data = NewAvailability {
                    id: new_id(),
                    teacher_id: teacher.user_id.clone(),
                    teacher_name: teacher.name.clone(),
                    date: date.clone(),
                    slots,
                    created_at: now,
                };
                diesel::insert_into(availability::table)
                    .values(&data)
                    .execute(conn)?;
                Ok(Published::Created(data.id))
            }
        }
    })?;

    info!(date = %date, availability_id = %published.id(), "availability saved");
    Ok(published)
}

/// The teacher's own slot set for a date; empty when nothing was published.
pub fn view_availability(
    conn: &mut SqliteConnection,
    teacher: &SessionContext,
    date: &str,
) -> BookingResult<Vec<String>> {
    teacher.require_role(Role::Teacher)?;
    let date = normalize_date_str(date)?;
    match find_availability(conn, &teacher.user_id, &date)? {
        Some(avail) => avail.slot_list(),
        None => Ok(Vec::new()),
    }
}
