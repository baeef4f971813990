// src/models/delivery.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::property::PropertySnapshot;

// O sinal de localização do viewer: exatamente UM dos quatro modos.
// Coordenadas ganham de filtros textuais se o cliente mandar os dois.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSignal {
    Coordinates { lat: f64, lng: f64, radius_km: f64 },
    City(String),
    Area(String),
    Pincode(String),
}

// Query string do GET /api/delivery/sponsored.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub city: Option<String>,
    pub area: Option<String>,
    pub pincode: Option<String>,
    pub category: Option<String>,
}

// Raio padrão da busca por coordenadas, em km (mesmo default do RPC original).
pub const DEFAULT_RADIUS_KM: f64 = 10.0;

impl SponsoredQuery {
    pub fn signal(&self) -> Option<LocationSignal> {
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            return Some(LocationSignal::Coordinates {
                lat,
                lng,
                radius_km: self.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
            });
        }
        if let Some(city) = self.city.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(LocationSignal::City(city.trim().to_string()));
        }
        if let Some(area) = self.area.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(LocationSignal::Area(area.trim().to_string()));
        }
        if let Some(pin) = self.pincode.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(LocationSignal::Pincode(pin.trim().to_string()));
        }
        None
    }
}

// Linha crua do JOIN campanha × imóvel, já restrita pelo predicado de
// elegibilidade no SQL. O serviço transforma em SponsoredCandidate.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub campaign_id: Uuid,
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub images: Vec<String>,
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

impl CandidateRow {
    pub fn into_property(self) -> (Uuid, PropertySnapshot) {
        let campaign_id = self.campaign_id;
        let property = PropertySnapshot {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            images: self.images,
            price: self.price,
            price_type: self.price_type,
            property_type: self.property_type,
            city: self.city,
            area: self.area,
            pin_code: self.pin_code,
            latitude: self.latitude,
            longitude: self.longitude,
            verified: self.verified,
        };
        (campaign_id, property)
    }
}

// Um candidato patrocinado pronto para exibição, anotado com a campanha dona
// e a distância até o viewer (null quando o sinal foi textual).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredCandidate {
    pub campaign_id: Uuid,
    pub distance_km: Option<f64>,
    pub property: PropertySnapshot,
}
