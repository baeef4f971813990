// src/handlers/delivery.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::delivery::{SponsoredCandidate, SponsoredQuery},
};

// Header com o id da sessão de dedup, gerado pelo cliente a cada page load.
const SESSION_HEADER: &str = "x-session-id";

// GET /api/delivery/sponsored
#[utoipa::path(
    get,
    path = "/api/delivery/sponsored",
    tag = "Delivery",
    params(SponsoredQuery),
    responses(
        (status = 200, description = "Candidatos patrocinados ranqueados", body = Vec<SponsoredCandidate>)
    )
)]
pub async fn get_sponsored(
    State(app_state): State<AppState>,
    Query(query): Query<SponsoredQuery>,
) -> Result<impl IntoResponse, AppError> {
    let candidates = app_state.delivery_service.select_candidates(&query).await?;
    Ok((StatusCode::OK, Json(candidates)))
}

// POST /api/delivery/impressions/{campaign_id}
//
// Fire-and-forget: responde 202 na hora e roda o incremento em background.
// Telemetria NUNCA interrompe a navegação nem mostra erro ao usuário — falha
// aqui vira warn no log e mais nada.
#[utoipa::path(
    post,
    path = "/api/delivery/impressions/{campaign_id}",
    tag = "Delivery",
    params(
        ("campaign_id" = Uuid, Path, description = "Campanha vista"),
        ("x-session-id" = Option<Uuid>, Header, description = "Sessão de dedup do viewer")
    ),
    responses((status = 202, description = "Registro aceito"))
)]
pub async fn track_impression(
    State(app_state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    headers: HeaderMap,
) -> StatusCode {
    // Sem header de sessão (ou header inválido) tratamos como sessão nova:
    // conta uma vez e pronto.
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4);

    let tracking = app_state.tracking_service.clone();
    tokio::spawn(async move {
        match tracking.record_impression(session_id, campaign_id).await {
            Ok(true) => tracing::debug!(%campaign_id, "Impressão contada"),
            Ok(false) => {}
            Err(err) => tracing::warn!(%campaign_id, "Falha ao contar impressão: {err}"),
        }
    });

    StatusCode::ACCEPTED
}

// POST /api/delivery/clicks/{campaign_id}
#[utoipa::path(
    post,
    path = "/api/delivery/clicks/{campaign_id}",
    tag = "Delivery",
    params(("campaign_id" = Uuid, Path, description = "Campanha clicada")),
    responses((status = 202, description = "Registro aceito"))
)]
pub async fn track_click(
    State(app_state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> StatusCode {
    let tracking = app_state.tracking_service.clone();
    tokio::spawn(async move {
        if let Err(err) = tracking.record_click(campaign_id).await {
            tracing::warn!(%campaign_id, "Falha ao contar clique: {err}");
        }
    });

    StatusCode::ACCEPTED
}
