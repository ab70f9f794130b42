#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use bizdesk::auth::{SessionKeys, hash_password};
use bizdesk::db;
use bizdesk::infrastructure::AppState;
use bizdesk::models::{category, employee, entry, person, proposal, user, work};
use bizdesk::server::build_router;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tower::util::ServiceExt; // for `oneshot`

pub const TEST_SECRET: &str = "test-secret";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub keys: SessionKeys,
}

impl TestApp {
    pub async fn new() -> Self {
        let db = db::init_db("sqlite::memory:")
            .await
            .expect("Failed to init DB");
        let keys = SessionKeys::new(TEST_SECRET);
        let state = AppState::new(db.clone(), keys.clone());
        let router = build_router(state, "static", &[]);
        Self { router, db, keys }
    }

    /// Session cookie for `username`
    pub fn session(&self, username: &str) -> String {
        let token = self
            .keys
            .create_token(username, "admin")
            .expect("Failed to create token");
        format!("session={}", token)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().uri(uri).method("GET");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(req.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(
        &self,
        uri: &str,
        fields: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut req = Request::builder()
            .uri(uri)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(req.body(Body::from(encode_form(fields))).unwrap())
            .await
            .unwrap()
    }
}

pub fn encode_form(fields: &[(&str, &str)]) -> String {
    fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response is not JSON")
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `name=value` of the first Set-Cookie header for `name`
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// User with a password and, optionally, an employee record.
/// Returns the employee id when one was created.
pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    first_name: &str,
    password: &str,
    with_employee: bool,
) -> Option<i32> {
    let u = user::ActiveModel {
        username: Set(username.to_string()),
        first_name: Set(first_name.to_string()),
        last_name: Set(None),
        password_hash: Set(hash_password(password).unwrap()),
        role: Set("user".to_string()),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create user");

    if !with_employee {
        return None;
    }

    let e = employee::ActiveModel {
        user_id: Set(u.id),
        occupation: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create employee");
    Some(e.id)
}

pub async fn create_person(
    db: &DatabaseConnection,
    first_name: &str,
    company: Option<&str>,
    person_type: &str,
) -> i32 {
    person::ActiveModel {
        first_name: Set(first_name.to_string()),
        last_name: Set(None),
        company: Set(company.map(str::to_string)),
        email: Set(None),
        phone: Set(None),
        person_type: Set(person_type.to_string()),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create person")
    .id
}

pub async fn create_category(db: &DatabaseConnection, code: &str) -> i32 {
    category::ActiveModel {
        category: Set(code.to_string()),
        description: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create category")
    .id
}

pub async fn create_work(db: &DatabaseConnection, name: &str, customer_id: i32) -> i32 {
    work::ActiveModel {
        name_work: Set(name.to_string()),
        address: Set(None),
        customer_id: Set(customer_id),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create work")
    .id
}

pub async fn create_entry(
    db: &DatabaseConnection,
    category_id: i32,
    work_id: i32,
    person_id: i32,
    seller_id: i32,
) -> i32 {
    entry::ActiveModel {
        category_id: Set(category_id),
        description: Set(Some("Pedido de orçamento".to_string())),
        work_id: Set(work_id),
        person_id: Set(person_id),
        seller_id: Set(seller_id),
        is_entry: Set(false),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create entry")
    .id
}

pub struct Fixture {
    pub category_id: i32,
    pub customer_id: i32,
    pub contact_id: i32,
    pub work_id: i32,
    pub employee_id: i32,
}

/// Category, customer, contact, work and an employee logged in as "ana".
pub async fn create_fixture(db: &DatabaseConnection) -> Fixture {
    let employee_id = create_user(db, "ana", "Ana", "s3nha", true)
        .await
        .expect("employee");
    let category_id = create_category(db, "ELE").await;
    let customer_id = create_person(db, "Cliente Um", Some("Construtora"), "c").await;
    let contact_id = create_person(db, "Carla", None, "p").await;
    let work_id = create_work(db, "Edifício Aurora", customer_id).await;

    Fixture {
        category_id,
        customer_id,
        contact_id,
        work_id,
        employee_id,
    }
}

pub async fn create_proposal(
    db: &DatabaseConnection,
    fixture: &Fixture,
    num_prop: i32,
    status: &str,
) -> i32 {
    proposal::ActiveModel {
        num_prop: Set(num_prop),
        type_prop: Set("O".to_string()),
        status: Set(status.to_string()),
        category_id: Set(fixture.category_id),
        description: Set(None),
        work_id: Set(fixture.work_id),
        person_id: Set(fixture.contact_id),
        employee_id: Set(fixture.employee_id),
        seller_id: Set(fixture.employee_id),
        entry_id: Set(None),
        price: Set(None),
        created_at: Set(now()),
        updated_at: Set(now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create proposal")
    .id
}
