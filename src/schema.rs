diesel::table! {
    users (id) {
        id -> Text,
        name -> Text,
        email -> Text,
        password -> Text,
        role -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    sessions (token) {
        token -> Text,
        user_id -> Text,
        login_time -> Timestamp,
    }
}

diesel::table! {
    availability (id) {
        id -> Text,
        teacher_id -> Text,
        teacher_name -> Text,
        date -> Text,
        slots -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::table! {
    appointments (id) {
        id -> Text,
        student_id -> Text,
        student_name -> Text,
        teacher_id -> Text,
        teacher_name -> Text,
        date -> Text,
        slot -> Text,
        reason -> Text,
        status -> Text,
        created_at -> Timestamp,
        updated_at -> Nullable<Timestamp>,
    }
}

diesel::joinable!(sessions -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, sessions, availability, appointments);

/// Statements run once per fresh database. Every statement is idempotent.
pub const INIT_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('student', 'teacher')),
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token TEXT PRIMARY KEY NOT NULL,
    user_id TEXT NOT NULL REFERENCES users(id),
    login_time TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS availability (
    id TEXT PRIMARY KEY NOT NULL,
    teacher_id TEXT NOT NULL REFERENCES users(id),
    teacher_name TEXT NOT NULL,
    date TEXT NOT NULL,
    slots TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP
);

CREATE UNIQUE INDEX IF NOT EXISTS availability_teacher_date
    ON availability (teacher_id, date);

CREATE TABLE IF NOT EXISTS appointments (
    id TEXT PRIMARY KEY NOT NULL,
    student_id TEXT NOT NULL REFERENCES users(id),
    student_name TEXT NOT NULL,
    teacher_id TEXT NOT NULL REFERENCES users(id),
    teacher_name TEXT NOT NULL,
    date TEXT NOT NULL,
    slot TEXT NOT NULL,
    reason TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('scheduled', 'completed', 'cancelled')),
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP
);

CREATE INDEX IF NOT EXISTS appointments_teacher_date
    ON appointments (teacher_id, date);

CREATE UNIQUE INDEX IF NOT EXISTS appointments_live_slot
    ON appointments (teacher_id, date, slot) WHERE status <> 'cancelled';
"#;
