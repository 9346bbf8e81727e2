//! Slot resolution, booking, publishing and the appointment state machine.
//!
//! Everything here works on a plain `SqliteConnection` so it can run inside a
//! transaction or straight from a test without the web layer.

pub mod booker;
pub mod lifecycle;
pub mod publisher;
pub mod queries;
pub mod resolver;
