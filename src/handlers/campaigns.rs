// src/handlers/campaigns.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        analytics::CampaignAnalytics,
        campaign::{Campaign, CampaignListRow, CreateCampaignPayload, UpdateCampaignStatusPayload},
    },
};

// POST /api/campaigns
#[utoipa::path(
    post,
    path = "/api/campaigns",
    tag = "Campaigns",
    request_body = CreateCampaignPayload,
    responses(
        (status = 201, description = "Campanha criada", body = Campaign),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Imóvel já possui campanha ativa")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateCampaignPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let campaign = app_state.campaign_service.create(user.0, &payload).await?;

    Ok((StatusCode::CREATED, Json(campaign)))
}

// GET /api/campaigns
#[utoipa::path(
    get,
    path = "/api/campaigns",
    tag = "Campaigns",
    responses(
        (status = 200, description = "Campanhas do usuário com resumo do imóvel", body = Vec<CampaignListRow>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_campaigns(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let campaigns = app_state.campaign_service.list(user.0).await?;
    Ok((StatusCode::OK, Json(campaigns)))
}

// PATCH /api/campaigns/{id}/status
#[utoipa::path(
    patch,
    path = "/api/campaigns/{id}/status",
    tag = "Campaigns",
    request_body = UpdateCampaignStatusPayload,
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Status atualizado", body = Campaign),
        (status = 409, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_campaign_status(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCampaignStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let campaign = app_state
        .campaign_service
        .update_status(user.0, id, payload.status)
        .await?;

    Ok((StatusCode::OK, Json(campaign)))
}

// DELETE /api/campaigns/{id}
#[utoipa::path(
    delete,
    path = "/api/campaigns/{id}",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses((status = 204, description = "Campanha removida (leads históricos permanecem)")),
    security(("api_jwt" = []))
)]
pub async fn delete_campaign(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.campaign_service.delete(user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/campaigns/{id}/analytics
#[utoipa::path(
    get,
    path = "/api/campaigns/{id}/analytics",
    tag = "Campaigns",
    params(("id" = Uuid, Path, description = "ID da campanha")),
    responses(
        (status = 200, description = "Estatísticas derivadas da campanha", body = CampaignAnalytics)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_campaign_analytics(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let analytics = app_state.analytics_service.for_campaign(user.0, id).await?;
    Ok((StatusCode::OK, Json(analytics)))
}
