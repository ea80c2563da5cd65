use std::str::FromStr;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use common::types::Envelope;
use models::complaint::{Complaint, ComplaintFilter};
use models::errors::ModelError;
use models::user::Role;
use service::complaint::service::CreateComplaint;

use crate::errors::ApiError;
use crate::guard::{self, Authenticated};
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// `all` (any case), an empty value, or an absent parameter all mean
/// "no filter on this field"; anything else must parse into the enum.
fn filter_field<T>(raw: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = ModelError>,
{
    match raw {
        None | Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|e| ApiError::Validation(vec![format!("{e}")])),
    }
}

/// Ids are opaque store keys; a malformed one surfaces as an internal
/// error, not a validation failure.
fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::Internal(format!("malformed complaint id: {raw}")))
}

#[utoipa::path(get, path = "/complaints", tag = "complaints", params(("status" = Option<String>, Query, description = "Exact status, or `all`"), ("priority" = Option<String>, Query, description = "Exact priority, or `all`"), ("category" = Option<String>, Query, description = "Exact category, or `all`")), responses((status = 200, description = "OK"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    Authenticated(principal): Authenticated,
    Query(query): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Complaint>>>, ApiError> {
    guard::require_role(&principal, &[Role::Admin])?;

    let filter = ComplaintFilter {
        status: filter_field(query.status.as_deref())?,
        priority: filter_field(query.priority.as_deref())?,
        category: filter_field(query.category.as_deref())?,
    };
    let complaints = state.complaints.list(&filter, &principal).await?;
    Ok(Json(Envelope::ok(complaints)))
}

#[utoipa::path(post, path = "/complaints", tag = "complaints", request_body = crate::openapi::CreateComplaintRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn create(
    State(state): State<ServerState>,
    Authenticated(principal): Authenticated,
    Json(input): Json<CreateRequest>,
) -> Result<(StatusCode, Json<Envelope<Complaint>>), ApiError> {
    guard::require_role(&principal, &[Role::User, Role::Admin])?;

    let created = state
        .complaints
        .create(
            &principal,
            CreateComplaint {
                title: input.title,
                description: input.description,
                category: input.category,
                priority: input.priority,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok_with_message(created, "Complaint submitted successfully")),
    ))
}

#[utoipa::path(get, path = "/complaints/{id}", tag = "complaints", params(("id" = String, Path, description = "Complaint id")), responses((status = 200, description = "OK"), (status = 404, description = "Not Found"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Envelope<Complaint>>, ApiError> {
    guard::require_role(&principal, &[Role::Admin])?;

    let id = parse_id(&id)?;
    let complaint = state.complaints.get(id, &principal).await?;
    Ok(Json(Envelope::ok(complaint)))
}

#[utoipa::path(patch, path = "/complaints/{id}", tag = "complaints", params(("id" = String, Path, description = "Complaint id")), request_body = crate::openapi::UpdateStatusRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Bad Request"), (status = 404, description = "Not Found"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn update_status(
    State(state): State<ServerState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
    Json(input): Json<UpdateStatusRequest>,
) -> Result<Json<Envelope<Complaint>>, ApiError> {
    guard::require_role(&principal, &[Role::Admin])?;

    let Some(status) = input.status else {
        return Err(ApiError::Validation(vec!["Status is required".into()]));
    };
    let id = parse_id(&id)?;
    let updated = state.complaints.update_status(id, &status, &principal).await?;
    Ok(Json(Envelope::ok_with_message(updated, "Complaint updated successfully")))
}

#[utoipa::path(delete, path = "/complaints/{id}", tag = "complaints", params(("id" = String, Path, description = "Complaint id")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found"), (status = 401, description = "Unauthorized"), (status = 403, description = "Forbidden")))]
pub async fn remove(
    State(state): State<ServerState>,
    Authenticated(principal): Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Envelope<()>>, ApiError> {
    guard::require_role(&principal, &[Role::Admin])?;

    let id = parse_id(&id)?;
    state.complaints.delete(id, &principal).await?;
    Ok(Json(Envelope::ok_message("Complaint deleted successfully")))
}
