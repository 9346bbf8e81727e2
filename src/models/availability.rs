use crate::{error::BookingResult, schema::availability};
use chrono::NaiveDateTime;

#[derive(Queryable, Clone, Debug)]
pub struct AvailabilityData {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub date: String,
    pub slots: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl AvailabilityData {
    /// Slots in the order the teacher published them.
    pub fn slot_list(&self) -> BookingResult<Vec<String>> {
        Ok(serde_json::from_str(&self.slots)?)
    }
}

#[derive(Insertable)]
#[diesel(table_name = availability)]
pub struct NewAvailability {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub date: String,
    pub slots: String,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = availability)]
pub struct UpdateAvailability {
    pub slots: String,
    pub updated_at: Option<NaiveDateTime>,
}
