mod requests;
mod responses;
mod utils;

use crate::{
    booking::{
        lifecycle::transition,
        publisher::{publish, view_availability, Published},
        queries::{my_appointments, parse_status_filter},
    },
    database::with_conn,
    models::appointments::AppointStatus,
    protocol::{SearchAppointResponse, TransitionResponse},
    utils::{normalize_date_str, now},
    AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;

use self::{requests::*, responses::*, utils::get_teacher_session};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(publish_time)
        .service(view_time)
        .service(search_appoint)
        .service(cancel_appoint)
        .service(finish_appoint);
}

crate::post_funcs! {
    (publish_time, "/publish_time", PublishTimeRequest, PublishTimeResponse),
    (view_time, "/view_time", ViewTimeRequest, ViewTimeResponse),
    (search_appoint, "/search_appoint", SearchAppointRequest, SearchAppointResponse),
    (cancel_appoint, "/cancel_appoint", CancelAppointRequest, TransitionResponse),
    (finish_appoint, "/finish_appoint", FinishAppointRequest, TransitionResponse),
}

async fn publish_time_impl(
    state: web::Data<AppState>,
    info: web::Json<PublishTimeRequest>,
) -> anyhow::Result<PublishTimeResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let published = with_conn(&state.pool, move |conn| {
        let teacher = get_teacher_session(conn, &info.login_token, ttl)?;
        publish(conn, &teacher, &info.date, info.slots, now())
    })
    .await
    .context("Error saving availability")?;

    Ok(PublishTimeResponse {
        success: true,
        replaced: matches!(published, Published::Replaced(_)),
        id: published.id().to_string(),
        ..Default::default()
    })
}

async fn view_time_impl(
    state: web::Data<AppState>,
    info: web::Json<ViewTimeRequest>,
) -> anyhow::Result<ViewTimeResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let date = normalize_date_str(&info.date).context("Error loading availability")?;
    let slots = with_conn(&state.pool, {
        let date = date.clone();
        move |conn| {
            let teacher = get_teacher_session(conn, &info.login_token, ttl)?;
            view_availability(conn, &teacher, &date)
        }
    })
    .await
    .context("Error loading availability")?;

    Ok(ViewTimeResponse {
        success: true,
        date,
        slots,
        ..Default::default()
    })
}

async fn search_appoint_impl(
    state: web::Data<AppState>,
    info: web::Json<SearchAppointRequest>,
) -> anyhow::Result<SearchAppointResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let appos = with_conn(&state.pool, move |conn| {
        let teacher = get_teacher_session(conn, &info.login_token, ttl)?;
        let status = parse_status_filter(info.status.as_deref())?;
        my_appointments(conn, &teacher, status)
    })
    .await
    .context("Error loading appointments")?;

    Ok(SearchAppointResponse::ok(appos, "No appointments scheduled yet."))
}

async fn set_status(
    state: web::Data<AppState>,
    login_token: String,
    appointment_id: String,
    target: AppointStatus,
    confirm: bool,
) -> anyhow::Result<TransitionResponse> {
    let ttl = state.settings.session_ttl_secs;
    let appo = with_conn(&state.pool, move |conn| {
        let teacher = get_teacher_session(conn, &login_token, ttl)?;
        transition(conn, &teacher, &appointment_id, target, confirm, now())
    })
    .await?;

    Ok(TransitionResponse::ok(appo))
}

async fn cancel_appoint_impl(
    state: web::Data<AppState>,
    info: web::Json<CancelAppointRequest>,
) -> anyhow::Result<TransitionResponse> {
    let info = info.into_inner();
    set_status(
        state,
        info.login_token,
        info.appointment_id,
        AppointStatus::Cancelled,
        info.confirm,
    )
    .await
    .context("Error cancelling appointment")
}

async fn finish_appoint_impl(
    state: web::Data<AppState>,
    info: web::Json<FinishAppointRequest>,
) -> anyhow::Result<TransitionResponse> {
    let info = info.into_inner();
    set_status(
        state,
        info.login_token,
        info.appointment_id,
        AppointStatus::Completed,
        info.confirm,
    )
    .await
    .context("Error completing appointment")
}
