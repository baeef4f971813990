// src/models/property.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Snapshot do imóvel promovido. A tabela 'properties' pertence ao serviço de
// anúncios (colaborador externo); aqui ela é só leitura.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertySnapshot {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub images: Vec<String>,

    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub price_type: Option<String>,
    pub property_type: Option<String>,

    pub city: String,
    pub area: String,
    pub pin_code: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    pub verified: bool,
}
