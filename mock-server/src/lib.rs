use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

pub const ABOUT_PROJECT: &str = "About Project Page from new controller";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub gender: Gender,
}

/// Body accepted by create and update. Every field is optional on the wire so
/// missing values produce a 400 with a readable message instead of a bare
/// deserialization rejection.
#[derive(Deserialize)]
pub struct StudentInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// Error body in the shape of Spring Boot's default error attributes.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    path: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>, uri: &Uri) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            path: uri.path().to_string(),
        }
    }

    fn not_found(id: u64, uri: &Uri) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Student with id {id} does not exists"),
            path: uri.path().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::warn!(status = self.status.as_u16(), message = %self.message, "request rejected");
        let body = ErrorBody {
            status: self.status.as_u16(),
            error: self
                .status
                .canonical_reason()
                .unwrap_or("Unknown")
                .to_string(),
            message: self.message,
            path: self.path,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Students keyed by id; ids are handed out in increasing order, so key order
/// is insertion order.
#[derive(Default)]
pub struct Store {
    next_id: u64,
    students: BTreeMap<u64, Student>,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.students
            .values()
            .any(|s| s.email == email && Some(s.id) != except)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/api/v1/students", get(list_students).post(add_student))
        .route(
            "/api/v1/students/{id}",
            put(update_student).delete(delete_student),
        )
        .route("/api/v1/about-project", get(about_project))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Required-field checks; all messages are joined one per line.
fn validate(input: StudentInput, uri: &Uri) -> Result<(String, String, Gender), ApiError> {
    let mut problems = String::new();
    let name = input.name.filter(|n| !n.trim().is_empty());
    let email = input.email.filter(|e| !e.trim().is_empty());
    if name.is_none() {
        problems.push_str("Name must not be blank\n");
    }
    if email.is_none() {
        problems.push_str("Email must not be blank\n");
    }
    if input.gender.is_none() {
        problems.push_str("Gender must not be null\n");
    }
    match (name, email, input.gender) {
        (Some(name), Some(email), Some(gender)) => Ok((name, email, gender)),
        _ => Err(ApiError::bad_request(problems, uri)),
    }
}

async fn list_students(State(db): State<Db>) -> Json<Vec<Student>> {
    let store = db.read().await;
    Json(store.students.values().cloned().collect())
}

async fn add_student(
    State(db): State<Db>,
    uri: Uri,
    input: Result<Json<StudentInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(input) = input.map_err(|r| ApiError::bad_request(r.body_text(), &uri))?;
    let (name, email, gender) = validate(input, &uri)?;
    let mut store = db.write().await;
    if store.email_taken(&email, None) {
        return Err(ApiError::bad_request(format!("Email {email} is taken"), &uri));
    }
    store.next_id += 1;
    let id = store.next_id;
    tracing::info!(id, %email, "student added");
    store.students.insert(
        id,
        Student {
            id,
            name,
            email,
            gender,
        },
    );
    Ok(StatusCode::OK)
}

async fn update_student(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
    uri: Uri,
    input: Result<Json<StudentInput>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::bad_request(r.body_text(), &uri))?;
    let Json(input) = input.map_err(|r| ApiError::bad_request(r.body_text(), &uri))?;
    let (name, email, gender) = validate(input, &uri)?;
    let mut store = db.write().await;
    if !store.students.contains_key(&id) {
        return Err(ApiError::not_found(id, &uri));
    }
    if store.email_taken(&email, Some(id)) {
        return Err(ApiError::bad_request(format!("Email {email} is taken"), &uri));
    }
    if let Some(student) = store.students.get_mut(&id) {
        student.name = name;
        student.email = email;
        student.gender = gender;
    }
    tracing::info!(id, "student updated");
    Ok(StatusCode::OK)
}

async fn delete_student(
    State(db): State<Db>,
    id: Result<Path<u64>, PathRejection>,
    uri: Uri,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id.map_err(|r| ApiError::bad_request(r.body_text(), &uri))?;
    let mut store = db.write().await;
    store
        .students
        .remove(&id)
        .map(|_| {
            tracing::info!(id, "student deleted");
            StatusCode::OK
        })
        .ok_or_else(|| ApiError::not_found(id, &uri))
}

async fn about_project() -> &'static str {
    ABOUT_PROJECT
}
