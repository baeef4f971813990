// src/db/lead_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::lead::{CreateLeadPayload, Lead},
};

// O repositório de leads, responsável por todas as interações com a tabela
// 'leads'.
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Insere um lead de forma idempotente. Retorna:
    //   Some(lead) — a linha foi criada AGORA (a atribuição deve acontecer);
    //   None       — a chave de idempotência já existia (replay de retry
    //                ambíguo; nada foi inserido, nada deve ser atribuído).
    // Conflito no par (listing_id, phone) é outra história: consulta
    // duplicada de verdade, sobe como DuplicateLead.
    pub async fn insert(
        &self,
        payload: &CreateLeadPayload,
        idempotency_key: Uuid,
    ) -> Result<Option<Lead>, AppError> {
        sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads
                (listing_id, owner_id, name, phone, email, message,
                 lead_type, source_page, campaign_id, category, subcategory,
                 idempotency_key)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (idempotency_key) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(payload.listing_id)
        .bind(payload.owner_id)
        .bind(payload.name.trim())
        .bind(payload.phone.trim())
        .bind(payload.email.as_deref().map(str::trim))
        .bind(payload.message.as_deref().map(str::trim))
        .bind(payload.lead_type)
        .bind(payload.source_page)
        .bind(payload.campaign_id)
        .bind(&payload.category)
        .bind(&payload.subcategory)
        .bind(idempotency_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some("uq_leads_listing_phone")
                {
                    return AppError::DuplicateLead;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Recupera o lead que um replay de idempotência deixou para trás.
    pub async fn find_by_idempotency_key(&self, key: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE idempotency_key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lead)
    }

    // Caixa de entrada do anunciante: leads recebidos, mais recentes primeiro.
    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }
}
