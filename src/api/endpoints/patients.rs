//! Patient endpoints.
//!
//! - `GET /patients` — every record
//! - `GET /patients/:id` — one record
//! - `POST /create_patients` — validate and insert
//! - `PUT /update_patients/:id` — validate supplied fields and apply
//! - `DELETE /delete_patients/:id` — hard delete
//! - `GET /sort_patient?sort_by=&order=` — every record, ordered

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{
    ApiContext, CreatedResponse, MessageResponse, SortQuery, SortedPatientsResponse,
};
use crate::models::{Patient, PatientPatch, PatientPayload};
use crate::patients;

/// `GET /patients` — list all patients.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<Vec<Patient>>, ApiError> {
    let conn = ctx.open_db()?;
    let all = patients::list_patients(&conn)?;
    Ok(Json(all))
}

/// `GET /patients/:id` — single patient.
pub async fn detail(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Patient>, ApiError> {
    let Path(id) = id?;
    let conn = ctx.open_db()?;
    Ok(Json(patients::get_patient(&conn, id)?))
}

/// `POST /create_patients` — create a patient from a full payload.
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<PatientPayload>, JsonRejection>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let Json(payload) = payload?;

    let conn = ctx.open_db()?;
    let id = patients::create_patient(&conn, &ctx.validator, payload)?;

    Ok(Json(CreatedResponse {
        message: "Patient added successfully".into(),
        id,
    }))
}

/// `PUT /update_patients/:id` — apply the supplied fields.
pub async fn update(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
    patch: Result<Json<PatientPatch>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;
    let Json(patch) = patch?;

    let conn = ctx.open_db()?;
    patients::update_patient(&conn, &ctx.validator, id, patch)?;

    Ok(Json(MessageResponse::new("Patient updated successfully")))
}

/// `DELETE /delete_patients/:id` — remove a patient permanently.
pub async fn remove(
    State(ctx): State<ApiContext>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Path(id) = id?;

    let conn = ctx.open_db()?;
    patients::delete_patient(&conn, id)?;

    Ok(Json(MessageResponse::new("Patient deleted successfully")))
}

/// `GET /sort_patient` — all patients ordered by `sort_by` (`asc` unless `order=desc`).
pub async fn sorted(
    State(ctx): State<ApiContext>,
    query: Result<Query<SortQuery>, QueryRejection>,
) -> Result<Json<SortedPatientsResponse>, ApiError> {
    let Query(query) = query?;

    // Reject unknown tokens before opening the database
    let (field, order) =
        patients::parse_sort_request(query.sort_by.as_deref(), query.order.as_deref())?;

    let conn = ctx.open_db()?;
    let sorted_patients = patients::sort_patients(&conn, field, order)?;

    Ok(Json(SortedPatientsResponse { sorted_patients }))
}
