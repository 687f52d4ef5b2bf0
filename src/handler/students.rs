//! Student API handlers
//!
//! Each handler performs one registry operation under the registry lock and
//! maps the outcome to a JSON response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use crate::config::AppState;
use crate::http::json_response;
use crate::registry::{
    FieldMap, NewStudent, RegistryError, RequestedId, Student, StudentPatch,
};

const CREATED_MESSAGE: &str = "Student added successfully!!!";
const UPDATED_MESSAGE: &str = "Student updated successfully.";
const DELETED_MESSAGE: &str = "Student deleted successfully.";

/// Body of a failed single-record lookup
#[derive(Debug, Serialize)]
struct LookupError {
    error: &'static str,
}

/// Body of an update or delete
#[derive(Debug, Serialize)]
struct MutationResponse<'a> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    student: Option<&'a Student>,
}

impl<'a> MutationResponse<'a> {
    fn ok(message: &str, student: &'a Student) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            student: Some(student),
        }
    }

    fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            student: None,
        }
    }
}

/// `GET /api/students`
pub async fn list_students(state: &AppState) -> Response<Full<Bytes>> {
    let registry = state.registry.read().await;
    json_response(StatusCode::OK, registry.list())
}

/// `GET /api/students/:id`; the id may be hexadecimal with a `0x` prefix
pub async fn get_student(state: &AppState, raw_id: &str) -> Response<Full<Bytes>> {
    let registry = state.registry.read().await;
    match registry.get(RequestedId::parse_auto(raw_id)) {
        Ok(student) => json_response(StatusCode::OK, student),
        Err(_) => json_response(
            StatusCode::NOT_FOUND,
            &LookupError {
                error: "Student not found",
            },
        ),
    }
}

/// `POST /api/students`
pub async fn create_student(state: &AppState, fields: &FieldMap) -> Response<Full<Bytes>> {
    state
        .registry
        .write()
        .await
        .create(NewStudent::from_fields(fields));
    json_response(StatusCode::CREATED, CREATED_MESSAGE)
}

/// `PUT /api/students/:id`; the id is always decimal
pub async fn update_student(
    state: &AppState,
    raw_id: &str,
    fields: &FieldMap,
) -> Response<Full<Bytes>> {
    let mut registry = state.registry.write().await;
    match registry.update(RequestedId::parse(raw_id), StudentPatch::from_fields(fields)) {
        Ok(student) => json_response(
            StatusCode::OK,
            &MutationResponse::ok(UPDATED_MESSAGE, student),
        ),
        Err(e) => not_found(&e),
    }
}

/// `DELETE /api/students/:id`; the id may be hexadecimal with a `0x` prefix
pub async fn delete_student(state: &AppState, raw_id: &str) -> Response<Full<Bytes>> {
    let removed = state
        .registry
        .write()
        .await
        .delete(RequestedId::parse_auto(raw_id));
    match removed {
        Ok(student) => json_response(
            StatusCode::OK,
            &MutationResponse::ok(DELETED_MESSAGE, &student),
        ),
        Err(e) => not_found(&e),
    }
}

fn not_found(err: &RegistryError) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::NOT_FOUND,
        &MutationResponse::failed(err.to_string()),
    )
}
