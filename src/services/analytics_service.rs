// src/services/analytics_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CampaignRepository,
    models::analytics::CampaignAnalytics,
    services::campaign_service::CampaignService,
};

// Agregador de analytics: leitura pura sobre contadores + leads. Não muta
// nada e não explode com divisão por zero (ver CampaignAnalytics::derive).
#[derive(Clone)]
pub struct AnalyticsService {
    repo: CampaignRepository,
    campaigns: CampaignService,
}

impl AnalyticsService {
    pub fn new(repo: CampaignRepository, campaigns: CampaignService) -> Self {
        Self { repo, campaigns }
    }

    pub async fn for_campaign(
        &self,
        user_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<CampaignAnalytics, AppError> {
        // Analytics é do dono da campanha.
        let campaign = self.campaigns.owned_campaign(user_id, campaign_id).await?;

        let (paid_leads, organic_leads) = self
            .repo
            .lead_counts(campaign.id, campaign.property_id)
            .await?;

        Ok(CampaignAnalytics::derive(&campaign, paid_leads, organic_leads))
    }
}
