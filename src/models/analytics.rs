// src/models/analytics.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::campaign::Campaign;

// Estatísticas derivadas de uma campanha. Somente leitura: calculadas a
// partir dos contadores e dos leads associados, nunca persistidas.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignAnalytics {
    pub total_leads: i64,
    pub organic_leads: i64,
    pub paid_leads: i64,

    // leads pagos / cliques; 0 quando não há cliques.
    #[schema(value_type = f64)]
    pub conversion_rate: Decimal,

    // spent / leads_generated; null quando a campanha ainda não gerou lead.
    #[schema(value_type = Option<f64>)]
    pub cost_per_lead: Option<Decimal>,
}

impl CampaignAnalytics {
    // Função pura: divisões por zero caem nos defaults, nunca em panic.
    pub fn derive(campaign: &Campaign, paid_leads: i64, organic_leads: i64) -> Self {
        let conversion_rate = if campaign.clicks > 0 {
            (Decimal::from(paid_leads) / Decimal::from(campaign.clicks)).round_dp(4)
        } else {
            Decimal::ZERO
        };

        let cost_per_lead = if campaign.leads_generated > 0 {
            Some((campaign.spent / Decimal::from(campaign.leads_generated)).round_dp(2))
        } else {
            None
        };

        Self {
            total_leads: paid_leads + organic_leads,
            organic_leads,
            paid_leads,
            conversion_rate,
            cost_per_lead,
        }
    }
}
