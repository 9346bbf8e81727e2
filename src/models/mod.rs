pub mod appointments;
pub mod availability;
pub mod users;

pub mod sessions;
