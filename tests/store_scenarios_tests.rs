//! Cenários do pipeline contra um Postgres de verdade.
//!
//! Exigem um banco com as migrações aplicadas; rode com
//! `TEST_DATABASE_URL=... cargo test -- --ignored`.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use backend::db::{CampaignRepository, LeadRepository};
use backend::models::campaign::{CampaignStatus, CreateCampaignPayload};
use backend::models::lead::{CreateLeadPayload, LeadType, SourcePage};
use backend::services::LifecycleSweeper;
use backend::services::lifecycle_sweeper::OVERSPEND_TOLERANCE;
use backend::services::tracking_service::COST_PER_CLICK;

/// Helper: pool apontando para o banco de teste
async fn setup_test_db() -> PgPool {
    let database_url = std::env::var("TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgresql://localhost/backend_test".to_string());

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Falha ao conectar no banco de teste");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Falha ao migrar o banco de teste");

    pool
}

/// Helper: insere um imóvel mínimo e devolve (owner_id, property_id)
async fn seed_property(pool: &PgPool) -> (Uuid, Uuid) {
    let owner_id = Uuid::new_v4();
    let property_id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO properties (user_id, title, city, area, latitude, longitude)
        VALUES ($1, 'Loja no centro', 'Bengaluru', 'Majestic', 12.9766, 77.5713)
        RETURNING id
        "#,
    )
    .bind(owner_id)
    .fetch_one(pool)
    .await
    .expect("Falha ao semear imóvel");

    (owner_id, property_id)
}

async fn seed_campaign(pool: &PgPool, budget: i64, spent: i64) -> (Uuid, Uuid, Uuid) {
    let (owner_id, property_id) = seed_property(pool).await;
    let repo = CampaignRepository::new(pool.clone());

    let campaign = repo
        .create(
            owner_id,
            &CreateCampaignPayload {
                property_id,
                title: "Destaque".into(),
                budget: Decimal::from(budget),
                start_date: None,
                end_date: Utc::now() + Duration::days(7),
                category: None,
                subcategory: None,
            },
        )
        .await
        .expect("Falha ao criar campanha");

    if spent > 0 {
        sqlx::query("UPDATE ad_campaigns SET spent = $2 WHERE id = $1")
            .bind(campaign.id)
            .bind(Decimal::from(spent))
            .execute(pool)
            .await
            .expect("Falha ao ajustar spent");
    }

    (owner_id, property_id, campaign.id)
}

fn lead_payload(owner_id: Uuid, property_id: Uuid, campaign_id: Option<Uuid>) -> CreateLeadPayload {
    CreateLeadPayload {
        listing_id: Some(property_id),
        owner_id,
        name: "Priya Sharma".into(),
        phone: "9876543210".into(),
        email: None,
        message: None,
        lead_type: if campaign_id.is_some() { LeadType::Paid } else { LeadType::Organic },
        source_page: if campaign_id.is_some() { SourcePage::InternalAd } else { SourcePage::ListingPage },
        campaign_id,
        category: None,
        subcategory: None,
        idempotency_key: Some(Uuid::new_v4()),
    }
}

// ============================================================================
// Varredura de ciclo de vida
// ============================================================================

#[tokio::test]
#[ignore] // Requer banco de teste
async fn budget_exhaustion_completes_campaign_and_stops_delivery() {
    let pool = setup_test_db().await;
    let repo = CampaignRepository::new(pool.clone());
    let (_, _, campaign_id) = seed_campaign(&pool, 1000, 950).await;

    // Cliques suficientes para cruzar o orçamento (950 + 11 × CPC ≥ 1000)
    for _ in 0..11 {
        repo.register_click(campaign_id, COST_PER_CLICK).await.unwrap();
    }

    let sweeper = LifecycleSweeper::new(repo.clone());
    sweeper.run_once().await;

    let campaign = repo.find_by_id(campaign_id).await.unwrap().unwrap();
    assert_eq!(campaign.status, CampaignStatus::Completed);
    assert!(!campaign.is_deliverable(Utc::now()));

    // Propriedade do orçamento: spent nunca passa de budget + tolerância
    assert!(campaign.spent <= campaign.budget + OVERSPEND_TOLERANCE);
}

#[tokio::test]
#[ignore] // Requer banco de teste
async fn sweep_is_idempotent() {
    let pool = setup_test_db().await;
    let repo = CampaignRepository::new(pool.clone());
    let (_, _, campaign_id) = seed_campaign(&pool, 100, 100).await;

    let sweeper = LifecycleSweeper::new(repo.clone());
    sweeper.run_once().await;
    let after_first = repo.find_by_id(campaign_id).await.unwrap().unwrap();

    sweeper.run_once().await;
    let after_second = repo.find_by_id(campaign_id).await.unwrap().unwrap();

    assert_eq!(after_first.status, CampaignStatus::Completed);
    assert_eq!(after_second.status, after_first.status);
    assert_eq!(after_second.updated_at, after_first.updated_at);
}

#[tokio::test]
#[ignore] // Requer banco de teste
async fn paused_campaign_is_never_resurrected_by_sweep() {
    let pool = setup_test_db().await;
    let repo = CampaignRepository::new(pool.clone());
    let (_, _, campaign_id) = seed_campaign(&pool, 1000, 0).await;

    repo.set_status(campaign_id, CampaignStatus::Paused).await.unwrap();
    LifecycleSweeper::new(repo.clone()).run_once().await;

    let campaign = repo.find_by_id(campaign_id).await.unwrap().unwrap();
    assert_eq!(campaign.status, CampaignStatus::Paused);
}

// ============================================================================
// Atribuição de leads
// ============================================================================

#[tokio::test]
#[ignore] // Requer banco de teste
async fn paid_lead_increments_only_its_own_campaign() {
    let pool = setup_test_db().await;
    let campaigns = CampaignRepository::new(pool.clone());
    let leads = LeadRepository::new(pool.clone());
    let service = backend::services::LeadService::new(leads, campaigns.clone());

    let (owner_a, property_a, campaign_a) = seed_campaign(&pool, 1000, 0).await;
    let (_, _, campaign_b) = seed_campaign(&pool, 1000, 0).await;

    service
        .submit(lead_payload(owner_a, property_a, Some(campaign_a)))
        .await
        .expect("Falha ao criar lead pago");

    let a = campaigns.find_by_id(campaign_a).await.unwrap().unwrap();
    let b = campaigns.find_by_id(campaign_b).await.unwrap().unwrap();
    assert_eq!(a.leads_generated, 1);
    assert_eq!(b.leads_generated, 0, "campanha alheia não pode ser creditada");
}

#[tokio::test]
#[ignore] // Requer banco de teste
async fn idempotency_key_replay_creates_one_lead_and_one_attribution() {
    let pool = setup_test_db().await;
    let campaigns = CampaignRepository::new(pool.clone());
    let leads = LeadRepository::new(pool.clone());
    let service = backend::services::LeadService::new(leads.clone(), campaigns.clone());

    let (owner_id, property_id, campaign_id) = seed_campaign(&pool, 1000, 0).await;
    let payload = lead_payload(owner_id, property_id, Some(campaign_id));

    // Duas ativações rápidas da mesma submissão lógica (mesma chave):
    // simula o retry ambíguo / double-tap antes do disable do botão.
    let first = service.submit(payload.clone()).await.unwrap();
    let second = service.submit(payload).await.unwrap();

    assert_eq!(first.id, second.id, "replay devolve o lead original");

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leads WHERE campaign_id = $1")
        .bind(campaign_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    let campaign = campaigns.find_by_id(campaign_id).await.unwrap().unwrap();
    assert_eq!(campaign.leads_generated, 1, "atribuição não pode dobrar");
}

#[tokio::test]
#[ignore] // Requer banco de teste
async fn duplicate_phone_for_same_listing_conflicts() {
    let pool = setup_test_db().await;
    let campaigns = CampaignRepository::new(pool.clone());
    let leads = LeadRepository::new(pool.clone());
    let service = backend::services::LeadService::new(leads, campaigns);

    let (owner_id, property_id) = seed_property(&pool).await;

    service
        .submit(lead_payload(owner_id, property_id, None))
        .await
        .unwrap();

    // Mesmo telefone, mesmo anúncio, chave de idempotência NOVA: é uma
    // segunda consulta de verdade, e deve bater no conflito.
    let err = service
        .submit(lead_payload(owner_id, property_id, None))
        .await
        .unwrap_err();
    assert!(matches!(err, backend::common::error::AppError::DuplicateLead));
}

// ============================================================================
// Contadores atômicos
// ============================================================================

#[tokio::test]
#[ignore] // Requer banco de teste
async fn concurrent_impressions_are_never_lost() {
    let pool = setup_test_db().await;
    let repo = CampaignRepository::new(pool.clone());
    let (_, _, campaign_id) = seed_campaign(&pool, 1000, 0).await;

    // 32 viewers independentes incrementando ao mesmo tempo
    let handles: Vec<_> = (0..32)
        .map(|_| {
            let repo = repo.clone();
            tokio::spawn(async move { repo.increment_impressions(campaign_id).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let campaign = repo.find_by_id(campaign_id).await.unwrap().unwrap();
    assert_eq!(campaign.impressions, 32, "UPDATE atômico não perde updates");
}
