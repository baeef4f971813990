// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::db::{CampaignRepository, DeliveryRepository, LeadRepository};
use crate::services::{
    AnalyticsService, CampaignService, DeliveryService, LeadService, TrackingService,
    tracking_service::InMemoryDedupStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    // O grafo de serviços do pipeline
    pub delivery_service: DeliveryService,
    pub tracking_service: TrackingService,
    pub lead_service: LeadService,
    pub campaign_service: CampaignService,
    pub analytics_service: AnalyticsService,
    pub lead_repository: LeadRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        let campaign_repo = CampaignRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let delivery_repo = DeliveryRepository::new(db_pool.clone());

        // O dedup de impressões é uma capacidade injetada (substituível em teste)
        let dedup_store = Arc::new(InMemoryDedupStore::new());

        let delivery_service = DeliveryService::new(delivery_repo);
        let tracking_service = TrackingService::new(campaign_repo.clone(), dedup_store);
        let lead_service = LeadService::new(lead_repo.clone(), campaign_repo.clone());
        let campaign_service = CampaignService::new(campaign_repo.clone());
        let analytics_service =
            AnalyticsService::new(campaign_repo.clone(), campaign_service.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            delivery_service,
            tracking_service,
            lead_service,
            campaign_service,
            analytics_service,
            lead_repository: lead_repo,
        })
    }
}
