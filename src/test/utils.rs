use std::collections::HashMap;

use actix_web::web;

use crate::{
    booking::publisher::publish,
    config::{CancelledSlotPolicy, Settings},
    database::memory_pool,
    identity::{self, NewAccount, SessionContext},
    models::users::Role,
    utils::now,
    AppState,
};

pub const STANDARD_PASSWORD: &str = "password123";

/// Posts a JSON body to the service and decodes the JSON reply.
macro_rules! post_json {
    ($app:expr, $uri:expr, $body:expr) => {{
        let req = actix_web::test::TestRequest::post()
            .uri($uri)
            .set_json($body)
            .to_request();
        let resp: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;
        resp
    }};
}

macro_rules! test_app {
    ($env:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($env.state.clone())
                .configure(crate::routes),
        )
        .await
    };
}

pub struct TestUser {
    pub name: String,
    pub role: Role,
}

pub struct TestAvailability {
    pub teacher: String,
    pub date: String,
    pub slots: Vec<String>,
}

#[derive(Default)]
pub struct TestEnvBuilder {
    users: Vec<TestUser>,
    availability: Vec<TestAvailability>,
    policy: CancelledSlotPolicy,
}

impl TestEnvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn student(mut self, name: &str) -> Self {
        self.users.push(TestUser {
            name: name.to_string(),
            role: Role::Student,
        });
        self
    }

    pub fn teacher(mut self, name: &str) -> Self {
        self.users.push(TestUser {
            name: name.to_string(),
            role: Role::Teacher,
        });
        self
    }

    pub fn availability(mut self, teacher: &str, date: &str, slots: &[&str]) -> Self {
        self.availability.push(TestAvailability {
            teacher: teacher.to_string(),
            date: date.to_string(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    pub fn cancelled_slots(mut self, policy: CancelledSlotPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> TestEnv {
        let pool = memory_pool();
        let mut sessions = HashMap::new();
        {
            let mut conn = pool.get().expect("test connection");
            for user in self.users {
                let email = format!("{}@school.test", user.name.to_ascii_lowercase());
                identity::create_account(
                    &mut conn,
                    NewAccount {
                        name: user.name.clone(),
                        email: email.clone(),
                        password: STANDARD_PASSWORD.to_string(),
                        confirm_password: STANDARD_PASSWORD.to_string(),
                        role: user.role,
                    },
                    now(),
                )
                .expect("create test user");
                let session =
                    identity::authenticate(&mut conn, &email, STANDARD_PASSWORD, user.role, now())
                        .expect("sign in test user");
                sessions.insert(user.name, session);
            }
            for avail in self.availability {
                let teacher = sessions.get(&avail.teacher).expect("unknown test teacher");
                publish(&mut conn, teacher, &avail.date, avail.slots, now())
                    .expect("publish test availability");
            }
        }

        let settings = Settings {
            cancelled_slots: self.policy,
            ..Settings::default()
        };
        TestEnv {
            state: web::Data::new(AppState { pool, settings }),
            sessions,
        }
    }
}

pub struct TestEnv {
    pub state: web::Data<AppState>,
    sessions: HashMap<String, SessionContext>,
}

impl TestEnv {
    pub fn token(&self, name: &str) -> String {
        self.sessions[name].token.clone()
    }

    pub fn id(&self, name: &str) -> String {
        self.sessions[name].user_id.clone()
    }
}
