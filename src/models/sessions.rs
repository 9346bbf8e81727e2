use crate::schema::sessions;
use chrono::NaiveDateTime;

#[derive(Queryable, Insertable)]
#[diesel(table_name = sessions)]
pub struct SessionData {
    pub token: String,
    pub user_id: String,
    pub login_time: NaiveDateTime,
}
