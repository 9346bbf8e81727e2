#[macro_use]
extern crate diesel;

mod account;
mod booking;
mod config;
mod database;
mod error;
mod identity;
mod models;
mod protocol;
mod schema;
mod student;
mod teacher;
mod utils;

#[cfg(test)]
mod test;

use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{config::Settings, database::DbPool};

pub struct AppState {
    pub pool: DbPool,
    pub settings: Settings,
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // sign up / sign in
        .service(web::scope("/account").configure(account::config))
        // student
        .service(web::scope("/student").configure(student::config))
        // teacher
        .service(web::scope("/teacher").configure(teacher::config));
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;
    let pool = database::build_pool(&settings.database_url, settings.pool_size)?;

    tracing::info!(
        bind = %settings.bind,
        database = %settings.database_url,
        cancelled_slots = %settings.cancelled_slots,
        "starting office hours v{}",
        env!("CARGO_PKG_VERSION")
    );

    let bind = settings.bind.clone();
    let state = web::Data::new(AppState { pool, settings });

    HttpServer::new(move || App::new().app_data(state.clone()).configure(routes))
        .bind(&bind)
        .with_context(|| format!("Failed to bind {}", bind))?
        .run()
        .await
        .context("Server error")
}
