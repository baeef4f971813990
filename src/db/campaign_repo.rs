// src/db/campaign_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::campaign::{Campaign, CampaignListRow, CampaignStatus, CreateCampaignPayload},
};

// O repositório de campanhas, responsável por todas as interações com a
// tabela 'ad_campaigns'.
#[derive(Clone)]
pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CRUD do dono
    // =========================================================================

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: &CreateCampaignPayload,
    ) -> Result<Campaign, AppError> {
        sqlx::query_as::<_, Campaign>(
            r#"
            INSERT INTO ad_campaigns
                (user_id, property_id, title, status, budget, start_date, end_date, category, subcategory)
            VALUES ($1, $2, $3, 'active', $4, COALESCE($5, NOW()), $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(payload.property_id)
        .bind(&payload.title)
        .bind(payload.budget)
        .bind(payload.start_date)
        .bind(payload.end_date)
        .bind(&payload.category)
        .bind(&payload.subcategory)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Violação do índice parcial = já existe campanha viva no imóvel
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::PropertyAlreadyPromoted;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Campaign>, AppError> {
        let campaign = sqlx::query_as::<_, Campaign>("SELECT * FROM ad_campaigns WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(campaign)
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<CampaignListRow>, AppError> {
        let rows = sqlx::query_as::<_, CampaignListRow>(
            r#"
            SELECT
                c.id, c.property_id, c.title, c.status, c.budget, c.spent,
                c.impressions, c.clicks, c.leads_generated,
                c.start_date, c.end_date, c.created_at,
                p.title AS property_title,
                p.property_type,
                p.city AS property_city,
                p.area AS property_area
            FROM ad_campaigns c
            JOIN properties p ON p.id = c.property_id
            WHERE c.user_id = $1
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: CampaignStatus,
    ) -> Result<Campaign, AppError> {
        sqlx::query_as::<_, Campaign>(
            "UPDATE ad_campaigns SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CampaignNotFound)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM ad_campaigns WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::CampaignNotFound);
        }
        Ok(())
    }

    // O imóvel pertence ao serviço de anúncios; aqui só conferimos o dono
    // para autorizar a criação da campanha.
    pub async fn find_property_owner(&self, property_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM properties WHERE id = $1")
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(owner)
    }

    // =========================================================================
    //  Contadores atômicos
    // =========================================================================
    // Sempre `coluna = coluna + N` direto no banco. Ler-e-escrever no código
    // da aplicação perderia updates sob tráfego concorrente.

    pub async fn increment_impressions(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE ad_campaigns SET impressions = impressions + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // Clique também debita o custo-por-clique do orçamento, no mesmo UPDATE.
    pub async fn register_click(&self, id: Uuid, cost: Decimal) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE ad_campaigns
            SET clicks = clicks + 1,
                spent = spent + $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(cost)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn increment_leads_generated(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE ad_campaigns SET leads_generated = leads_generated + 1, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // =========================================================================
    //  Varredura de ciclo de vida (idempotente)
    // =========================================================================
    // Os dois UPDATEs só movem campanhas PARA 'completed'; rodar duas vezes
    // seguidas produz o mesmo estado final. Uma campanha pausada pelo dono
    // nunca é ressuscitada por aqui.

    pub async fn complete_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE ad_campaigns
            SET status = 'completed', updated_at = NOW()
            WHERE end_date < $1 AND status <> 'completed'
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn complete_exhausted(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE ad_campaigns
            SET status = 'completed', updated_at = NOW()
            WHERE status = 'active' AND spent >= budget
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  Agregados para o analytics
    // =========================================================================

    // Leads pagos atribuídos à campanha + leads orgânicos do imóvel dela.
    pub async fn lead_counts(
        &self,
        campaign_id: Uuid,
        property_id: Uuid,
    ) -> Result<(i64, i64), AppError> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE campaign_id = $1),
                COUNT(*) FILTER (WHERE listing_id = $2 AND lead_type = 'organic')
            FROM leads
            WHERE campaign_id = $1 OR listing_id = $2
            "#,
        )
        .bind(campaign_id)
        .bind(property_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
