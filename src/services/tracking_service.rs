// src/services/tracking_service.rs

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{common::error::AppError, db::CampaignRepository};

// Custo debitado do orçamento a cada clique (impressões não cobram).
pub const COST_PER_CLICK: Decimal = Decimal::from_parts(500, 0, 0, false, 2);

// Sessões de dedup que não aparecem há esse tempo são descartadas.
const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

// O "dedup store" da sessão: um mapa (sessão, campanha) → já contou?
// É uma capacidade injetada, não estado global de módulo, justamente para
// poder ser substituída nos testes. Importante: ele só evita recontagem do
// MESMO viewer — corridas entre viewers distintos são resolvidas pelo
// UPDATE atômico no banco, nunca por aqui.
#[async_trait]
pub trait DedupStore: Send + Sync {
    // true apenas na primeira vez que o par (sessão, campanha) aparece.
    async fn first_sighting(&self, session_id: Uuid, campaign_id: Uuid) -> bool;
}

struct SessionEntry {
    seen: HashSet<Uuid>,
    touched: Instant,
}

// Implementação em memória, por processo. Recarregar a página gera um novo
// session id no cliente — recontar nesse caso é comportamento aceito.
#[derive(Default)]
pub struct InMemoryDedupStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl InMemoryDedupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DedupStore for InMemoryDedupStore {
    async fn first_sighting(&self, session_id: Uuid, campaign_id: Uuid) -> bool {
        let mut sessions = self.sessions.lock().expect("dedup store mutex poisoned");

        // Poda preguiçosa de sessões expiradas, no próprio acesso.
        sessions.retain(|_, entry| entry.touched.elapsed() < SESSION_TTL);

        let entry = sessions.entry(session_id).or_insert_with(|| SessionEntry {
            seen: HashSet::new(),
            touched: Instant::now(),
        });
        entry.touched = Instant::now();
        entry.seen.insert(campaign_id)
    }
}

// Contagem de impressões e cliques. Os dois caminhos são fire-and-forget do
// ponto de vista do viewer: o handler responde 202 e roda o incremento em
// background; falha vira log, nunca erro pro usuário.
#[derive(Clone)]
pub struct TrackingService {
    repo: CampaignRepository,
    dedup: Arc<dyn DedupStore>,
}

impl TrackingService {
    pub fn new(repo: CampaignRepository, dedup: Arc<dyn DedupStore>) -> Self {
        Self { repo, dedup }
    }

    // No máximo UMA impressão por campanha por sessão. Retorna se contou.
    pub async fn record_impression(
        &self,
        session_id: Uuid,
        campaign_id: Uuid,
    ) -> Result<bool, AppError> {
        if !self.dedup.first_sighting(session_id, campaign_id).await {
            return Ok(false);
        }
        self.repo.increment_impressions(campaign_id).await?;
        Ok(true)
    }

    // Cliques não são deduplicados: cada ação genuína do usuário conta.
    // (O guard contra double-tap é o disable do botão, no cliente.)
    pub async fn record_click(&self, campaign_id: Uuid) -> Result<(), AppError> {
        self.repo.register_click(campaign_id, COST_PER_CLICK).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_session_counts_a_campaign_once() {
        let store = InMemoryDedupStore::new();
        let session = Uuid::new_v4();
        let campaign = Uuid::new_v4();

        assert!(store.first_sighting(session, campaign).await);
        // rolar pra fora e voltar: mesmo par, não conta de novo
        assert!(!store.first_sighting(session, campaign).await);
        assert!(!store.first_sighting(session, campaign).await);
    }

    #[tokio::test]
    async fn fresh_session_counts_again() {
        let store = InMemoryDedupStore::new();
        let campaign = Uuid::new_v4();

        assert!(store.first_sighting(Uuid::new_v4(), campaign).await);
        // reload da página = sessão nova = conta de novo (comportamento aceito)
        assert!(store.first_sighting(Uuid::new_v4(), campaign).await);
    }

    #[tokio::test]
    async fn distinct_campaigns_count_independently() {
        let store = InMemoryDedupStore::new();
        let session = Uuid::new_v4();

        assert!(store.first_sighting(session, Uuid::new_v4()).await);
        assert!(store.first_sighting(session, Uuid::new_v4()).await);
    }
}
