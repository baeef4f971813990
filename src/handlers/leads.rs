// src/handlers/leads.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::lead::{CreateLeadPayload, Lead},
};

// POST /api/leads (público — o interessado não precisa de conta)
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Consulta já enviada para este anúncio")
    )
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    // A validação roda dentro do serviço, antes da sequência de retentativas.
    let lead = app_state.lead_service.submit(payload).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

// GET /api/leads/received (caixa de entrada do anunciante)
#[utoipa::path(
    get,
    path = "/api/leads/received",
    tag = "Leads",
    responses(
        (status = 200, description = "Leads recebidos, mais recentes primeiro", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_received_leads(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let leads = app_state.lead_repository.list_by_owner(user.0).await?;
    Ok((StatusCode::OK, Json(leads)))
}
