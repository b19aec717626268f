use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{no_content, run_blocking};
use crate::domain::catalog::{NewSkinType, SkinType, SkinTypePatch};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSkinTypeRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSkinTypeRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

/// GET /api/skin-types
#[utoipa::path(
    get,
    path = "/api/skin-types",
    responses((status = 200, description = "All skin types by name", body = Vec<SkinType>)),
    tag = "skin-types"
)]
pub async fn list_skin_types(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let skin_types = run_blocking(move || catalog.list_skin_types()).await?;
    Ok(HttpResponse::Ok().json(skin_types))
}

/// GET /api/skin-types/{id}
#[utoipa::path(
    get,
    path = "/api/skin-types/{id}",
    params(("id" = Uuid, Path, description = "Skin type UUID")),
    responses(
        (status = 200, description = "Skin type found", body = SkinType),
        (status = 404, description = "Skin type not found"),
    ),
    tag = "skin-types"
)]
pub async fn get_skin_type(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let skin_type = run_blocking(move || catalog.get_skin_type(id)).await?;
    Ok(HttpResponse::Ok().json(skin_type))
}

/// POST /api/skin-types
#[utoipa::path(
    post,
    path = "/api/skin-types",
    request_body = CreateSkinTypeRequest,
    responses(
        (status = 201, description = "Skin type created", body = SkinType),
        (status = 409, description = "Name already exists"),
    ),
    tag = "skin-types"
)]
pub async fn create_skin_type(
    state: web::Data<AppState>,
    body: web::Json<CreateSkinTypeRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let skin_type = NewSkinType {
        name: body.name.trim().to_string(),
        description: body.description,
    };
    let catalog = state.catalog.clone();
    let created = run_blocking(move || catalog.create_skin_type(skin_type)).await?;
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/skin-types/{id}
#[utoipa::path(
    put,
    path = "/api/skin-types/{id}",
    params(("id" = Uuid, Path, description = "Skin type UUID")),
    request_body = UpdateSkinTypeRequest,
    responses(
        (status = 200, description = "Skin type updated", body = SkinType),
        (status = 404, description = "Skin type not found"),
    ),
    tag = "skin-types"
)]
pub async fn update_skin_type(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateSkinTypeRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let patch = SkinTypePatch {
        name: body.name.map(|n| n.trim().to_string()),
        description: body.description,
    };
    let catalog = state.catalog.clone();
    let updated = run_blocking(move || catalog.update_skin_type(id, patch)).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/skin-types/{id}
#[utoipa::path(
    delete,
    path = "/api/skin-types/{id}",
    params(("id" = Uuid, Path, description = "Skin type UUID")),
    responses(
        (status = 204, description = "Skin type deleted"),
        (status = 404, description = "Skin type not found"),
    ),
    tag = "skin-types"
)]
pub async fn delete_skin_type(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    run_blocking(move || catalog.delete_skin_type(id)).await?;
    Ok(no_content())
}
