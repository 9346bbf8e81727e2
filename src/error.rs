use actix_web::error::BlockingError;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::appointments::AppointStatus;

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("cannot move an appointment from {from} to {to}")]
    IllegalTransition { from: AppointStatus, to: AppointStatus },

    #[error("time slot {0} is no longer available")]
    SlotUnavailable(String),

    #[error("database error")]
    Store(#[from] diesel::result::Error),

    #[error("database connection error")]
    Pool(#[from] r2d2::Error),

    #[error("corrupt slot list")]
    SlotEncoding(#[from] serde_json::Error),

    #[error("background task failed")]
    Blocking,
}

pub type BookingResult<T> = Result<T, BookingError>;

impl BookingError {
    pub fn validation<S: ToString>(msg: S) -> Self {
        BookingError::Validation(msg.to_string())
    }

    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            BookingError::Store(_)
                | BookingError::Pool(_)
                | BookingError::SlotEncoding(_)
                | BookingError::Blocking
        )
    }

    /// Rejected commands are expected traffic; store failures are not.
    pub fn log(&self, ctx: &str) {
        if self.is_store_failure() {
            let cause = std::error::Error::source(self)
                .map(|e| e.to_string())
                .unwrap_or_default();
            error!(error = %self, cause = %cause, context = %ctx, "store failure");
        } else {
            warn!(error = %self, context = %ctx, "command rejected");
        }
    }
}

impl From<BlockingError> for BookingError {
    fn from(_: BlockingError) -> Self {
        BookingError::Blocking
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_failures_are_classified() {
        assert!(BookingError::Blocking.is_store_failure());
        assert!(BookingError::Store(diesel::result::Error::NotFound).is_store_failure());
        assert!(!BookingError::validation("passwords do not match").is_store_failure());
        assert!(!BookingError::SlotUnavailable("09:00".into()).is_store_failure());
    }

    #[test]
    fn illegal_transition_names_both_states() {
        let err = BookingError::IllegalTransition {
            from: AppointStatus::Completed,
            to: AppointStatus::Scheduled,
        };
        assert_eq!(
            err.to_string(),
            "cannot move an appointment from completed to scheduled"
        );
    }
}
