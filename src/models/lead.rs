// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default, ToSchema)]
#[sqlx(type_name = "lead_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LeadType {
    #[default]
    Organic,
    Paid,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Default, ToSchema)]
#[sqlx(type_name = "lead_source_page", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourcePage {
    #[default]
    ListingPage,
    CategoryPage,
    InternalAd,
}

// --- LEAD ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub listing_id: Option<Uuid>,
    pub owner_id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: Option<String>,

    // Workflow de atendimento (kanban do CRM) — fora do escopo deste core,
    // persistido como texto livre.
    pub status: String,
    pub source: String,

    pub lead_type: LeadType,
    pub source_page: SourcePage,
    pub campaign_id: Option<Uuid>,
    pub category: Option<String>,
    pub subcategory: Option<String>,

    pub idempotency_key: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- PAYLOAD ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = validate_lead_shape))]
pub struct CreateLeadPayload {
    pub listing_id: Option<Uuid>,

    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub owner_id: Uuid,

    #[validate(length(min = 2, max = 100, message = "O nome deve ter no mínimo 2 caracteres"))]
    #[schema(example = "Priya Sharma")]
    pub name: String,

    #[validate(custom(function = validate_phone))]
    #[schema(example = "+91 98765 43210")]
    pub phone: String,

    #[validate(email(message = "E-mail inválido"))]
    pub email: Option<String>,

    #[validate(length(max = 1000, message = "A mensagem deve ter no máximo 1000 caracteres"))]
    pub message: Option<String>,

    #[serde(default)]
    pub lead_type: LeadType,

    #[serde(default)]
    pub source_page: SourcePage,

    pub campaign_id: Option<Uuid>,
    pub category: Option<String>,
    pub subcategory: Option<String>,

    // Chave de idempotência gerada no cliente; o servidor preenche uma se o
    // cliente não mandar (aí a proteção contra retry ambíguo vale só dentro
    // da mesma sequência de tentativas).
    pub idempotency_key: Option<Uuid>,
}

// Conta apenas os dígitos: "+91 98765-43210" normaliza para 12 dígitos.
pub fn normalized_phone_digits(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

fn validate_phone(phone: &str) -> Result<(), validator::ValidationError> {
    let digits = normalized_phone_digits(phone);
    if (10..=15).contains(&digits) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("invalid_phone");
        err.message = Some("O telefone deve ter entre 10 e 15 dígitos".into());
        Err(err)
    }
}

// Invariantes que cruzam campos: lead pago exige campanha; o dono precisa
// existir de verdade (Uuid nulo indica payload montado errado no cliente).
fn validate_lead_shape(payload: &CreateLeadPayload) -> Result<(), validator::ValidationError> {
    if payload.owner_id.is_nil() {
        let mut err = validator::ValidationError::new("missing_owner");
        err.message = Some("Informações do anunciante ausentes".into());
        return Err(err);
    }
    if payload.lead_type == LeadType::Paid && payload.campaign_id.is_none() {
        let mut err = validator::ValidationError::new("paid_without_campaign");
        err.message = Some("Lead pago exige o id da campanha de origem".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> CreateLeadPayload {
        CreateLeadPayload {
            listing_id: Some(Uuid::new_v4()),
            owner_id: Uuid::new_v4(),
            name: "Priya".into(),
            phone: "+91 98765 43210".into(),
            email: None,
            message: None,
            lead_type: LeadType::Organic,
            source_page: SourcePage::ListingPage,
            campaign_id: None,
            category: None,
            subcategory: None,
            idempotency_key: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        assert!(payload().validate().is_ok());
    }

    #[test]
    fn short_name_fails() {
        let mut p = payload();
        p.name = "P".into();
        assert!(p.validate().is_err());
    }

    #[test]
    fn phone_digit_count_is_normalized() {
        assert_eq!(normalized_phone_digits("+91 98765-43210"), 12);

        let mut p = payload();
        p.phone = "12345".into(); // poucos dígitos
        assert!(p.validate().is_err());

        p.phone = "1".repeat(16); // dígitos demais
        assert!(p.validate().is_err());
    }

    #[test]
    fn paid_lead_requires_campaign_id() {
        let mut p = payload();
        p.lead_type = LeadType::Paid;
        p.campaign_id = None;
        assert!(p.validate().is_err());

        p.campaign_id = Some(Uuid::new_v4());
        assert!(p.validate().is_ok());
    }

    #[test]
    fn nil_owner_fails() {
        let mut p = payload();
        p.owner_id = Uuid::nil();
        assert!(p.validate().is_err());
    }
}
