mod requests;
mod responses;

use crate::{
    database::{assert, with_conn},
    identity::{self, NewAccount},
    protocol::{IdResponse, SimpleResponse},
    utils::now,
    AppState,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::Context;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(logout)
        .service(view_info);
}

crate::post_funcs! {
    (register, "/register", RegisterRequest, IdResponse),
    (login, "/login", LoginRequest, LoginResponse),
    (logout, "/logout", LogoutRequest, SimpleResponse),
    (view_info, "/view_info", ViewInfoRequest, ViewInfoResponse),
}

async fn register_impl(
    state: web::Data<AppState>,
    info: web::Json<RegisterRequest>,
) -> anyhow::Result<IdResponse> {
    let info = info.into_inner();
    let account = NewAccount {
        name: info.name,
        email: info.email,
        password: info.password,
        confirm_password: info.confirm_password,
        role: info.role,
    };

    let user = with_conn(&state.pool, move |conn| {
        identity::create_account(conn, account, now())
    })
    .await
    .context("Error creating account")?;

    Ok(IdResponse::ok(user.id))
}

async fn login_impl(
    state: web::Data<AppState>,
    info: web::Json<LoginRequest>,
) -> anyhow::Result<LoginResponse> {
    let info = info.into_inner();

    // the role gate message is shown to the user as is
    let session = with_conn(&state.pool, move |conn| {
        identity::authenticate(conn, &info.email, &info.password, info.role, now())
    })
    .await?;

    Ok(LoginResponse {
        success: true,
        login_token: session.token,
        user_id: session.user_id,
        name: session.name,
        role: session.role.to_string(),
        ..Default::default()
    })
}

async fn logout_impl(
    state: web::Data<AppState>,
    info: web::Json<LogoutRequest>,
) -> anyhow::Result<SimpleResponse> {
    let info = info.into_inner();
    with_conn(&state.pool, move |conn| {
        identity::sign_out(conn, &info.login_token)
    })
    .await
    .context("Error logging out")?;

    Ok(SimpleResponse::ok())
}

async fn view_info_impl(
    state: web::Data<AppState>,
    info: web::Json<ViewInfoRequest>,
) -> anyhow::Result<ViewInfoResponse> {
    let info = info.into_inner();
    let ttl = state.settings.session_ttl_secs;
    let user = with_conn(&state.pool, move |conn| {
        let session = identity::current_identity(conn, &info.login_token, ttl, now())?;
        assert::find_user(conn, &session.user_id)
    })
    .await?;

    Ok(ViewInfoResponse {
        success: true,
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        created_at: crate::utils::format_time_str(&user.created_at),
        ..Default::default()
    })
}
