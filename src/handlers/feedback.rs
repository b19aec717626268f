use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{no_content, run_blocking};
use crate::domain::catalog::{Feedback, FeedbackPatch, NewFeedback};
use crate::errors::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateFeedbackRequest {
    pub product_id: Uuid,
    pub customer_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "comment is too long"))]
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateFeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000, message = "comment is too long"))]
    pub comment: Option<String>,
}

/// POST /api/feedback
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = CreateFeedbackRequest,
    responses(
        (status = 201, description = "Feedback created", body = Feedback),
        (status = 400, description = "Invalid feedback or unknown product/customer"),
    ),
    tag = "feedback"
)]
pub async fn create_feedback(
    state: web::Data<AppState>,
    body: web::Json<CreateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    body.validate()?;

    let feedback = NewFeedback {
        product_id: body.product_id,
        customer_id: body.customer_id,
        rating: body.rating,
        comment: body.comment,
    };
    let catalog = state.catalog.clone();
    let created = run_blocking(move || catalog.create_feedback(feedback)).await?;
    Ok(HttpResponse::Created().json(created))
}

/// PUT /api/feedback/{id}
#[utoipa::path(
    put,
    path = "/api/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback UUID")),
    request_body = UpdateFeedbackRequest,
    responses(
        (status = 200, description = "Feedback updated", body = Feedback),
        (status = 404, description = "Feedback not found"),
    ),
    tag = "feedback"
)]
pub async fn update_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateFeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    body.validate()?;

    let patch = FeedbackPatch {
        rating: body.rating,
        comment: body.comment,
    };
    let catalog = state.catalog.clone();
    let updated = run_blocking(move || catalog.update_feedback(id, patch)).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/feedback/{id}
#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = Uuid, Path, description = "Feedback UUID")),
    responses(
        (status = 204, description = "Feedback deleted"),
        (status = 404, description = "Feedback not found"),
    ),
    tag = "feedback"
)]
pub async fn delete_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    run_blocking(move || catalog.delete_feedback(id)).await?;
    Ok(no_content())
}
