mod requests;
mod responses;
mod utils;

use crate::{
    booking::{
        booker::{book, BookingRequest},
        lifecycle::transition,
        queries::{list_teachers, my_appointments, parse_status_filter},
        resolver::resolve_open_slots,
    },
    database::with_conn,
    models::appointments::AppointStatus,
    protocol::{IdResponse, SearchAppointResponse, TransitionResponse},
    AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;

use self::{requests::*, responses::*, utils::get_student_session};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(search_teacher)
        .service(open_slots)
        .service(appoint)
        .service(search_appoint)
        .service(cancel_appoint);
}

crate::post_funcs! {
    (search_teacher, "/search_teacher", SearchTeacherRequest, SearchTeacherResponse),
    (open_slots, "/open_slots", OpenSlotsRequest, OpenSlotsResponse),
    (appoint, "/appoint", AppointRequest, IdResponse),
    (search_appoint, "/search_appoint", SearchAppointRequest, SearchAppointResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, TransitionResponse),
}

async fn search_teacher_impl(
    state: web::Data<AppState>,
    info: web::Json<SearchTeacherRequest>,
) -> anyhow::Result<SearchTeacherResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let teachers = with_conn(&state.pool, move |conn| {
        get_student_session(conn, &info.login_token, ttl)?;
        list_teachers(conn)
    })
    .await
    .context("Error loading teachers")?;

    let teachers = teachers
        .into_iter()
        .map(|data| SearchTeacherItem {
            id: data.id,
            name: data.name,
        })
        .collect();

    Ok(SearchTeacherResponse {
        success: true,
        teachers,
        ..Default::default()
    })
}

async fn open_slots_impl(
    state: web::Data<AppState>,
    info: web::Json<OpenSlotsRequest>,
) -> anyhow::Result<OpenSlotsResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let policy = state.settings.cancelled_slots;
    let open = with_conn(&state.pool, move |conn| {
        get_student_session(conn, &info.login_token, ttl)?;
        resolve_open_slots(conn, &info.teacher_id, &info.date, policy)
    })
    .await
    .context("Error loading time slots")?;

    Ok(open.into())
}

async fn appoint_impl(
    state: web::Data<AppState>,
    info: web::Json<AppointRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let policy = state.settings.cancelled_slots;
    let appo = with_conn(&state.pool, move |conn| {
        let student = get_student_session(conn, &info.login_token, ttl)?;
        let req = BookingRequest {
            teacher_id: info.teacher_id,
            date: info.date,
            slot: info.slot,
            reason: info.reason,
        };
        book(conn, &student, req, policy, crate::utils::now())
    })
    .await
    .context("Error booking appointment")?;

    Ok(IdResponse::ok(appo.id))
}

async fn search_appoint_impl(
    state: web::Data<AppState>,
    info: web::Json<SearchAppointRequest>,
) -> anyhow::Result<SearchAppointResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let appos = with_conn(&state.pool, move |conn| {
        let student = get_student_session(conn, &info.login_token, ttl)?;
        let status = parse_status_filter(info.status.as_deref())?;
        my_appointments(conn, &student, status)
    })
    .await
    .context("Error loading appointments")?;

    Ok(SearchAppointResponse::ok(appos, "No appointments booked yet."))
}

async fn cancel_appoint_impl(
    state: web::Data<AppState>,
    info: web::Json<CancelAppointRequest>,
) -> anyhow::Result<TransitionResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let appo = with_conn(&state.pool, move |conn| {
        let student = get_student_session(conn, &info.login_token, ttl)?;
        transition(
            conn,
            &student,
            &info.appointment_id,
            AppointStatus::Cancelled,
            info.confirm,
            crate::utils::now(),
        )
    })
    .await
    .context("Error cancelling appointment")?;

    Ok(TransitionResponse::ok(appo))
}
