// src/models/campaign.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

// Mapeia o CREATE TYPE campaign_status do banco
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "campaign_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

// --- CAMPANHA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub title: String,
    pub status: CampaignStatus,

    // Valores monetários: sempre Decimal, nunca float.
    pub budget: Decimal,
    pub spent: Decimal,

    // Contadores monotônicos (incrementados só por UPDATE atômico no banco)
    pub impressions: i64,
    pub clicks: i64,
    pub leads_generated: i64,

    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub category: Option<String>,
    pub subcategory: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Campaign {
    // O predicado de elegibilidade (§ filtro de entrega). Puro e sem efeitos:
    // reavaliado em todo fetch porque status/spent mudam o tempo todo sob
    // tráfego concorrente.
    pub fn is_deliverable(&self, now: DateTime<Utc>) -> bool {
        self.status == CampaignStatus::Active
            && self.start_date <= now
            && now <= self.end_date
            && self.spent < self.budget
    }
}

// Linha da listagem do dono: campanha + um resumo do imóvel promovido.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignListRow {
    pub id: Uuid,
    pub property_id: Uuid,
    pub title: String,
    pub status: CampaignStatus,
    pub budget: Decimal,
    pub spent: Decimal,
    pub impressions: i64,
    pub clicks: i64,
    pub leads_generated: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    pub property_title: String,
    pub property_type: Option<String>,
    pub property_city: String,
    pub property_area: String,
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignPayload {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub property_id: Uuid,

    #[validate(length(min = 3, message = "O título deve ter no mínimo 3 caracteres"))]
    #[schema(example = "Destaque: loja no centro")]
    pub title: String,

    #[validate(custom(function = validate_budget))]
    #[schema(value_type = f64, example = 1000.0)]
    pub budget: Decimal,

    // Se omitido, a campanha começa agora.
    #[schema(value_type = Option<String>, format = DateTime)]
    pub start_date: Option<DateTime<Utc>>,

    #[schema(value_type = String, format = DateTime)]
    pub end_date: DateTime<Utc>,

    pub category: Option<String>,
    pub subcategory: Option<String>,
}

fn validate_budget(budget: &Decimal) -> Result<(), validator::ValidationError> {
    if budget.is_sign_positive() && !budget.is_zero() {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("invalid_budget");
        err.message = Some("O orçamento deve ser maior que zero".into());
        Err(err)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignStatusPayload {
    #[schema(example = "paused")]
    pub status: CampaignStatus,
}
