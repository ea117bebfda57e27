//! School administration routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;

use crate::services::school::{self, SchoolDetail, SchoolError, SchoolSummary};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSchoolBody {
    pub school_name: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// `GET /api/schools` — list schools.
pub async fn list_schools(State(state): State<AppState>) -> Json<Vec<SchoolSummary>> {
    Json(school::list_schools(&state).await)
}

/// `POST /api/schools` — create a school.
pub async fn create_school(
    State(state): State<AppState>,
    Json(body): Json<CreateSchoolBody>,
) -> Result<(StatusCode, Json<SchoolSummary>), (StatusCode, Json<serde_json::Value>)> {
    school::create_school(&state, &body.school_name, body.display_name.as_deref())
        .await
        .map(|summary| (StatusCode::CREATED, Json(summary)))
        .map_err(error_response)
}

/// `GET /api/schools/:name` — settings and recent names of one school.
pub async fn get_school(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SchoolDetail>, (StatusCode, Json<serde_json::Value>)> {
    school::get_school(&state, &name)
        .await
        .map(Json)
        .map_err(error_response)
}

/// `POST /api/schools/:name/toggle` — activate or deactivate a school.
pub async fn toggle_school(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SchoolSummary>, (StatusCode, Json<serde_json::Value>)> {
    school::toggle_school(&state, &name)
        .await
        .map(Json)
        .map_err(error_response)
}

/// `DELETE /api/schools/:name` — remove a school and its roster.
pub async fn delete_school(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<serde_json::Value>)> {
    school::delete_school(&state, &name)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

pub(crate) fn school_error_to_status(err: &SchoolError) -> StatusCode {
    match err {
        SchoolError::NotFound(_) => StatusCode::NOT_FOUND,
        SchoolError::AlreadyExists(_) => StatusCode::CONFLICT,
        SchoolError::Inactive(_) => StatusCode::FORBIDDEN,
        SchoolError::Incomplete | SchoolError::InvalidName(_) | SchoolError::InvalidSettings(_) => {
            StatusCode::BAD_REQUEST
        }
    }
}

fn error_response(err: SchoolError) -> (StatusCode, Json<serde_json::Value>) {
    use crate::event::ErrorCode;

    let status = school_error_to_status(&err);
    (status, Json(serde_json::json!({ "code": err.error_code(), "message": err.to_string() })))
}

#[cfg(test)]
#[path = "schools_test.rs"]
mod tests;
