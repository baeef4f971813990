// src/db/delivery_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::delivery::{CandidateRow, LocationSignal},
};

// Busca de candidatos patrocinados. O predicado de elegibilidade
// (status ativo, janela de datas, orçamento não estourado) roda aqui no SQL
// em TODO fetch — sem cache, porque status e spent mudam o tempo todo sob
// tráfego concorrente.
#[derive(Clone)]
pub struct DeliveryRepository {
    pool: PgPool,
}

const BASE_QUERY: &str = r#"
    SELECT
        c.id AS campaign_id,
        p.id, p.user_id, p.title, p.images, p.price, p.price_type,
        p.property_type, p.city, p.area, p.pin_code,
        p.latitude, p.longitude, p.verified
    FROM ad_campaigns c
    JOIN properties p ON p.id = c.property_id
    WHERE c.status = 'active'
      AND c.start_date <= NOW()
      AND c.end_date >= NOW()
      AND c.spent < c.budget
      AND p.available = TRUE
      AND ($1::text IS NULL OR c.category = $1)
"#;

impl DeliveryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn fetch_candidates(
        &self,
        signal: &LocationSignal,
        category: Option<&str>,
    ) -> Result<Vec<CandidateRow>, AppError> {
        // Filtros textuais: igualdade exata case-insensitive no campo
        // correspondente. Coordenadas: só exigimos que o imóvel seja
        // geolocalizado; corte por raio e ordenação acontecem no serviço.
        let (clause, text_filter) = match signal {
            LocationSignal::Coordinates { .. } => {
                (" AND p.latitude IS NOT NULL AND p.longitude IS NOT NULL", None)
            }
            LocationSignal::City(city) => (" AND LOWER(p.city) = LOWER($2)", Some(city.as_str())),
            LocationSignal::Area(area) => (" AND LOWER(p.area) = LOWER($2)", Some(area.as_str())),
            LocationSignal::Pincode(pin) => (" AND p.pin_code = $2", Some(pin.as_str())),
        };

        let sql = format!("{BASE_QUERY}{clause}");
        let mut query = sqlx::query_as::<_, CandidateRow>(&sql).bind(category);
        if let Some(value) = text_filter {
            query = query.bind(value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        Ok(rows)
    }
}
