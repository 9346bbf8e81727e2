use std::collections::HashSet;

use diesel::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::{
    config::CancelledSlotPolicy,
    error::BookingResult,
    models::{
        appointments::{Appointment, APPOINT_STATUS_CANCELLED},
        availability::AvailabilityData,
    },
    utils::normalize_date_str,
};

/// Why an open-slot list looks the way it does. Only `Open` carries slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotCondition {
    Open,
    MissingSelection,
    NoAvailability,
    FullyBooked,
}

impl SlotCondition {
    pub fn notice(&self) -> &'static str {
        match self {
            SlotCondition::Open => "",
            SlotCondition::MissingSelection => "Select a teacher and a date first",
            SlotCondition::NoAvailability => "No availability found for this date",
            SlotCondition::FullyBooked => "Every time slot on this date is already booked",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenSlots {
    pub slots: Vec<String>,
    pub condition: SlotCondition,
}

impl OpenSlots {
    fn empty(condition: SlotCondition) -> Self {
        Self {
            slots: Vec::new(),
            condition,
        }
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots.iter().any(|s| s == slot)
    }
}

pub fn booked_slots(appointments: &[Appointment], policy: CancelledSlotPolicy) -> HashSet<&str> {
    appointments
        .iter()
        .filter(|appo| match policy {
            CancelledSlotPolicy::Block => true,
            CancelledSlotPolicy::Release => appo.status != APPOINT_STATUS_CANCELLED,
        })
        .map(|appo| appo.slot.as_str())
        .collect()
}

/// `available` minus `booked`, in the order of `available`, without repeats.
pub fn subtract_booked(available: Vec<String>, booked: &HashSet<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    available
        .into_iter()
        .filter(|slot| !booked.contains(slot.as_str()) && seen.insert(slot.clone()))
        .collect()
}

pub fn find_availability(
    conn: &mut SqliteConnection,
    teacher_id: &str,
    date: &str,
) -> BookingResult<Option<AvailabilityData>> {
    use crate::schema::availability;

    Ok(availability::table
        .filter(availability::teacher_id.eq(teacher_id))
        .filter(availability::date.eq(date))
        .get_result::<AvailabilityData>(conn)
        .optional()?)
}

#[tracing::instrument(skip(conn))]
pub fn resolve_open_slots(
    conn: &mut SqliteConnection,
    teacher_id: &str,
    date: &str,
    policy: CancelledSlotPolicy,
) -> BookingResult<OpenSlots> {
    use crate::schema::appointments;

    let teacher_id = teacher_id.trim();
    if teacher_id.is_empty() || date.trim().is_empty() {
        return Ok(OpenSlots::empty(SlotCondition::MissingSelection));
    }
    let date = normalize_date_str(date)?;

    let avail = match find_availability(conn, teacher_id, &date)? {
        Some(avail) => avail,
        None => return Ok(OpenSlots::empty(SlotCondition::NoAvailability)),
    };

    let appos = appointments::table
        .filter(appointments::teacher_id.eq(teacher_id))
        .filter(appointments::date.eq(&date))
        .get_results::<Appointment>(conn)?;

    let booked = booked_slots(&appos, policy);
    let slots = subtract_booked(avail.slot_list()?, &booked);
    debug!(open = slots.len(), booked = booked.len(), "resolved open slots");

    if slots.is_empty() {
        Ok(OpenSlots::empty(SlotCondition::FullyBooked))
    } else {
        Ok(OpenSlots {
            slots,
            condition: SlotCondition::Open,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        booking::{
            booker::{book, BookingRequest},
            fixtures::{signed_in, slots},
            lifecycle::transition,
            publisher::publish,
        },
        database::memory_pool,
        error::BookingError,
        models::{appointments::AppointStatus, users::Role},
        utils::now,
    };

    fn appo(slot: &str, status: AppointStatus) -> Appointment {
        Appointment {
            id: slot.to_string(),
            student_id: "s".to_string(),
            student_name: "S".to_string(),
            teacher_id: "t".to_string(),
            teacher_name: "T".to_string(),
            date: "2099-01-01".to_string(),
            slot: slot.to_string(),
            reason: String::new(),
            status: status.as_str().to_string(),
            created_at: now(),
            updated_at: None,
        }
    }

    #[test]
    fn open_is_available_minus_booked_and_a_subset() {
        let available = slots(&["08:00", "09:00", "10:00", "11:00"]);
        let appos = vec![
            appo("09:00", AppointStatus::Scheduled),
            appo("11:00", AppointStatus::Completed),
            appo("13:00", AppointStatus::Scheduled),
        ];

        for policy in [CancelledSlotPolicy::Block, CancelledSlotPolicy::Release].iter() {
            let open = subtract_booked(available.clone(), &booked_slots(&appos, *policy));
            assert_eq!(open, slots(&["08:00", "10:00"]));
            assert!(open.iter().all(|s| available.contains(s)));
        }
    }

    #[test]
    fn cancelled_appointments_follow_the_policy() {
        let available = slots(&["09:00", "10:00"]);
        let appos = vec![appo("09:00", AppointStatus::Cancelled)];

        let blocked = subtract_booked(
            available.clone(),
            &booked_slots(&appos, CancelledSlotPolicy::Block),
        );
        assert_eq!(blocked, slots(&["10:00"]));

        let released = subtract_booked(
            available,
            &booked_slots(&appos, CancelledSlotPolicy::Release),
        );
        assert_eq!(released, slots(&["09:00", "10:00"]));
    }

    #[test]
    fn duplicates_in_the_source_are_dropped() {
        let open = subtract_booked(slots(&["09:00", "10:00", "09:00"]), &HashSet::new());
        assert_eq!(open, slots(&["09:00", "10:00"]));
    }

    #[test]
    fn booked_slot_is_excluded() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let teacher = signed_in(&mut conn, "Turing", Role::Teacher);
        let student = signed_in(&mut conn, "Lovelace", Role::Student);
        publish(&mut conn, &teacher, "2099-05-01", slots(&["09:00", "10:00"]), now()).unwrap();

        book(
            &mut conn,
            &student,
            BookingRequest {
                teacher_id: teacher.user_id.clone(),
                date: "2099-05-01".to_string(),
                slot: "09:00".to_string(),
                reason: "essay feedback".to_string(),
            },
            CancelledSlotPolicy::Block,
            now(),
        )
        .unwrap();

        let open = resolve_open_slots(
            &mut conn,
            &teacher.user_id,
            "2099-05-01",
            CancelledSlotPolicy::Block,
        )
        .unwrap();
        assert_eq!(open.slots, slots(&["10:00"]));
        assert_eq!(open.condition, SlotCondition::Open);
    }

    #[test]
    fn missing_availability_is_an_empty_state() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let teacher = signed_in(&mut conn, "Turing", Role::Teacher);
        publish(&mut conn, &teacher, "2099-05-01", slots(&["09:00"]), now()).unwrap();

        let open = resolve_open_slots(
            &mut conn,
            &teacher.user_id,
            "2099-05-02",
            CancelledSlotPolicy::Block,
        )
        .unwrap();
        assert!(open.slots.is_empty());
        assert_eq!(open.condition, SlotCondition::NoAvailability);
    }

    #[test]
    fn missing_selection_is_reported() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();

        let open = resolve_open_slots(&mut conn, "", "2099-05-01", CancelledSlotPolicy::Block)
            .unwrap();
        assert_eq!(open.condition, SlotCondition::MissingSelection);
        let open = resolve_open_slots(&mut conn, "t-1", "  ", CancelledSlotPolicy::Block).unwrap();
        assert_eq!(open.condition, SlotCondition::MissingSelection);
        assert!(open.slots.is_empty());

        assert!(matches!(
            resolve_open_slots(&mut conn, "t-1", "May 1st", CancelledSlotPolicy::Block),
            Err(BookingError::Validation(_))
        ));
    }

    #[test]
    fn cancelled_slot_visibility_depends_on_policy() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let teacher = signed_in(&mut conn, "Turing", Role::Teacher);
        let student = signed_in(&mut conn, "Lovelace", Role::Student);
        publish(&mut conn, &teacher, "2099-05-01", slots(&["09:00", "10:00"]), now()).unwrap();

        let appo = book(
            &mut conn,
            &student,
            BookingRequest {
                teacher_id: teacher.user_id.clone(),
                date: "2099-05-01".to_string(),
                slot: "10:00".to_string(),
                reason: String::new(),
            },
            CancelledSlotPolicy::Block,
            now(),
        )
        .unwrap();
        let cancelled =
            transition(&mut conn, &student, &appo.id, AppointStatus::Cancelled, true, now())
                .unwrap();
        assert_eq!(cancelled.status, "cancelled");

        let blocked = resolve_open_slots(
            &mut conn,
            &teacher.user_id,
            "2099-05-01",
            CancelledSlotPolicy::Block,
        )
        .unwrap();
        assert_eq!(blocked.slots, slots(&["09:00"]));

        let released = resolve_open_slots(
            &mut conn,
            &teacher.user_id,
            "2099-05-01",
            CancelledSlotPolicy::Release,
        )
        .unwrap();
        assert_eq!(released.slots, slots(&["09:00", "10:00"]));
    }

    #[test]
    fn fully_booked_day_is_flagged() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let teacher = signed_in(&mut conn, "Turing", Role::Teacher);
        let student = signed_in(&mut conn, "Lovelace", Role::Student);
        publish(&mut conn, &teacher, "2099-05-01", slots(&["09:00"]), now()).unwrap();
        book(
            &mut conn,
            &student,
            BookingRequest {
                teacher_id: teacher.user_id.clone(),
                date: "2099-05-01".to_string(),
                slot: "09:00".to_string(),
                reason: String::new(),
            },
            CancelledSlotPolicy::Block,
            now(),
        )
        .unwrap();

        let open = resolve_open_slots(
            &mut conn,
            &teacher.user_id,
            "2099-05-01",
            CancelledSlotPolicy::Block,
        )
        .unwrap();
        assert_eq!(open.condition, SlotCondition::FullyBooked);
    }
}
