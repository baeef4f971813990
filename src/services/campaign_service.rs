// src/services/campaign_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CampaignRepository,
    models::campaign::{Campaign, CampaignListRow, CampaignStatus, CreateCampaignPayload},
};

// Gestão das campanhas pelo dono: criar, listar, pausar/retomar, apagar.
#[derive(Clone)]
pub struct CampaignService {
    repo: CampaignRepository,
}

impl CampaignService {
    pub fn new(repo: CampaignRepository) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        payload: &CreateCampaignPayload,
    ) -> Result<Campaign, AppError> {
        // Só se promove imóvel próprio.
        let owner = self
            .repo
            .find_property_owner(payload.property_id)
            .await?
            .ok_or(AppError::PropertyNotFound)?;
        if owner != user_id {
            return Err(AppError::Forbidden);
        }

        if payload.end_date <= payload.start_date.unwrap_or_else(Utc::now) {
            let mut errors = validator::ValidationErrors::new();
            let mut err = validator::ValidationError::new("invalid_window");
            err.message = Some("A data final deve ser depois do início".into());
            errors.add("endDate", err);
            return Err(AppError::ValidationError(errors));
        }

        // O índice parcial garante no máximo uma campanha viva por imóvel;
        // o repo traduz a violação em PropertyAlreadyPromoted.
        self.repo.create(user_id, payload).await
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<CampaignListRow>, AppError> {
        self.repo.list_by_user(user_id).await
    }

    // Transições do dono: draft→active, active⇄paused. 'completed' é terminal
    // e pertence só à varredura do servidor — o dono não completa nem
    // ressuscita campanha por aqui.
    pub async fn update_status(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
        new_status: CampaignStatus,
    ) -> Result<Campaign, AppError> {
        let campaign = self.owned_campaign(user_id, campaign_id).await?;

        let allowed = matches!(
            (campaign.status, new_status),
            (CampaignStatus::Draft, CampaignStatus::Active)
                | (CampaignStatus::Active, CampaignStatus::Paused)
                | (CampaignStatus::Paused, CampaignStatus::Active)
        );
        if !allowed {
            return Err(AppError::InvalidTransition);
        }

        self.repo.set_status(campaign_id, new_status).await
    }

    // Apagar remove o registro da campanha; os leads históricos ficam.
    pub async fn delete(&self, user_id: Uuid, campaign_id: Uuid) -> Result<(), AppError> {
        self.owned_campaign(user_id, campaign_id).await?;
        self.repo.delete(campaign_id).await
    }

    pub(crate) async fn owned_campaign(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<Campaign, AppError> {
        let campaign = self
            .repo
            .find_by_id(campaign_id)
            .await?
            .ok_or(AppError::CampaignNotFound)?;
        if campaign.user_id != user_id {
            return Err(AppError::Forbidden);
        }
        Ok(campaign)
    }
}
