use diesel::{prelude::*, sqlite::Sqlite};

use crate::{
    error::BookingResult,
    identity::SessionContext,
    models::{
        appointments::{AppointStatus, Appointment},
        users::{Role, UserData, ROLE_TEACHER},
    },
};

pub const STATUS_ALL: &str = "all";

pub fn parse_status_filter(status: Option<&str>) -> BookingResult<Option<AppointStatus>> {
    match status.map(str::trim) {
        None | Some("") | Some(STATUS_ALL) => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// Appointments the caller takes part in, newest date first.
pub fn my_appointments(
    conn: &mut SqliteConnection,
    session: &SessionContext,
    status: Option<AppointStatus>,
) -> BookingResult<Vec<Appointment>> {
    use crate::schema::appointments;

    let mut query: appointments::BoxedQuery<'_, Sqlite> = appointments::table.into_boxed();
    query = match session.role {
        Role::Student => query.filter(appointments::student_id.eq(&session.user_id)),
        Role::Teacher => query.filter(appointments::teacher_id.eq(&session.user_id)),
    };
    if let Some(status) = status {
        query = query.filter(appointments::status.eq(status.as_str()));
    }

    Ok(query
        .order(appointments::date.desc())
        .then_order_by(appointments::slot.asc())
        .get_results::<Appointment>(conn)?)
}

pub fn list_teachers(conn: &mut SqliteConnection) -> BookingResult<Vec<UserData>> {
    use crate::schema::users;

    Ok(users::table
        .filter(users::role.eq(ROLE_TEACHER))
        .order(users::name.asc())
        .get_results::<UserData>(conn)?)
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
        config::CancelledSlotPolicy,
        database::memory_pool,
        utils::now,
    };

    #[test]
    fn status_filter_accepts_all_or_a_status() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("completed")).unwrap(),
            Some(AppointStatus::Completed)
        );
        assert!(parse_status_filter(Some("pending")).is_err());
    }

    #[test]
    fn listings_are_scoped_filtered_and_newest_first() {
        let pool = memory_pool();
        let mut conn = pool.get().unwrap();
        let turing = signed_in(&mut conn, "Turing", Role::Teacher);
        let church = signed_in(&mut conn, "Church", Role::Teacher);
        let ada = signed_in(&mut conn, "Lovelace", Role::Student);
        let grace = signed_in(&mut conn, "Hopper", Role::Student);

        for date in ["2099-05-01", "2099-06-01"].iter() {
            publish(&mut conn, &turing, date, slots(&["09:00", "10:00"]), now()).unwrap();
        }
        let booking = |teacher: &SessionContext, date: &str, slot: &str| BookingRequest {
            teacher_id: teacher.user_id.clone(),
            date: date.to_string(),
            slot: slot.to_string(),
            reason: String::new(),
        };
        let early = book(&mut conn, &ada, booking(&turing, "2099-05-01", "09:00"), CancelledSlotPolicy::Block, now())
            .unwrap();
        book(&mut conn, &ada, booking(&turing, "2099-06-01", "10:00"), CancelledSlotPolicy::Block, now())
            .unwrap();
        book(&mut conn, &grace, booking(&turing, "2099-05-01", "10:00"), CancelledSlotPolicy::Block, now())
            .unwrap();
        transition(&mut conn, &ada, &early.id, AppointStatus::Cancelled, true, now()).unwrap();

        let mine = my_appointments(&mut conn, &ada, None).unwrap();
        let dates: Vec<_> = mine.iter().map(|a| a.date.as_str()).collect();
        assert_eq!(dates, vec!["2099-06-01", "2099-05-01"]);

        let scheduled = my_appointments(&mut conn, &ada, Some(AppointStatus::Scheduled)).unwrap();
        assert_eq!(scheduled.len(), 1);

        assert_eq!(my_appointments(&mut conn, &turing, None).unwrap().len(), 3);
        assert!(my_appointments(&mut conn, &church, None).unwrap().is_empty());

        let names: Vec<_> = list_teachers(&mut conn)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Church", "Turing"]);
    }
}
