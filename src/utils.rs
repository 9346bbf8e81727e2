use blake2::{Blake2b512, Digest};
use chrono::{NaiveDate, NaiveDateTime, Utc};

use crate::error::{BookingError, BookingResult};

#[macro_export]
macro_rules! post_funcs {
    ( $( ( $func_name:ident, $url:expr, $request:ty, $response:ty ) ),+ $(,)? ) => {
        $(
            paste::paste! {
                #[post($url)]
                async fn $func_name(
                    state: web::Data<AppState>,
                    info: web::Json<$request>
                ) -> impl Responder {
                    let response = match [<$func_name _impl>](state, info).await {
                        Ok(response) => response,
                        Err(err) => {
                            $crate::utils::log_failure(stringify!($func_name), &err);
                            <$response>::err(format!("{:#}", err))
                        }
                    };
                    HttpResponse::Ok().json(response)
                }
            }
        )+
    };
}

pub fn log_failure(ctx: &str, err: &anyhow::Error) {
    match err.downcast_ref::<BookingError>() {
        Some(err) => err.log(ctx),
        None => {
            let msg = format!("{:#}", err);
            tracing::warn!(error = %msg, context = %ctx, "command rejected");
        }
    }
}

pub const DATE_FMT: &str = "%Y-%m-%d";

pub fn parse_date_str<S: AsRef<str>>(s: S) -> BookingResult<NaiveDate> {
    let s = s.as_ref().trim();
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| {
        BookingError::validation(format!("invalid date '{}', expected YYYY-MM-DD", s))
    })
}

/// Parses and re-renders a date so that equal days always compare equal as text.
pub fn normalize_date_str<S: AsRef<str>>(s: S) -> BookingResult<String> {
    parse_date_str(s).map(|date| date.format(DATE_FMT).to_string())
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    const TIME_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    format!("{}+00:00", time.format(TIME_FMT))
}

pub fn format_time_str_opt(time: &Option<NaiveDateTime>) -> String {
    time.as_ref().map(format_time_str).unwrap_or_default()
}

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

pub fn hash_password<S: AsRef<str>>(password: S) -> String {
    format!("{:x}", Blake2b512::digest(password.as_ref().as_bytes()))
}

pub fn require_field<'a>(value: &'a str, what: &str) -> BookingResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(BookingError::validation(format!("{} is required", what)));
    }
    Ok(value)
}
