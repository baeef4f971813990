// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Delivery ---
        handlers::delivery::get_sponsored,
        handlers::delivery::track_impression,
        handlers::delivery::track_click,

        // --- Campaigns ---
        handlers::campaigns::create_campaign,
        handlers::campaigns::list_campaigns,
        handlers::campaigns::update_campaign_status,
        handlers::campaigns::delete_campaign,
        handlers::campaigns::get_campaign_analytics,

        // --- Leads ---
        handlers::leads::create_lead,
        handlers::leads::list_received_leads,
    ),
    components(
        schemas(
            models::campaign::Campaign,
            models::campaign::CampaignStatus,
            models::campaign::CampaignListRow,
            models::campaign::CreateCampaignPayload,
            models::campaign::UpdateCampaignStatusPayload,
            models::property::PropertySnapshot,
            models::delivery::SponsoredCandidate,
            models::lead::Lead,
            models::lead::LeadType,
            models::lead::SourcePage,
            models::lead::CreateLeadPayload,
            models::analytics::CampaignAnalytics,
        )
    ),
    tags(
        (name = "Delivery", description = "Seleção e telemetria de anúncios patrocinados"),
        (name = "Campaigns", description = "Gestão de campanhas pelo anunciante"),
        (name = "Leads", description = "Captura e atribuição de leads"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    pub fn with_security() -> utoipa::openapi::OpenApi {
        let mut doc = Self::openapi();
        if let Some(components) = doc.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
        doc
    }
}
