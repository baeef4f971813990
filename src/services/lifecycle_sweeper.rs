// src/services/lifecycle_sweeper.rs

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;

use crate::db::CampaignRepository;

// Intervalo entre varreduras. Com cobrança por clique, o estouro máximo de
// orçamento fica limitado a um intervalo de tráfego: ~50 cliques/min ×
// custo-por-clique. Esse é o OVERSPEND_TOLERANCE documentado — tolerância
// aceita, não bug: uma impressão pode legitimamente ser servida
// microssegundos antes de a varredura aposentar a campanha.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);
pub const OVERSPEND_TOLERANCE: Decimal = Decimal::from_parts(25000, 0, 0, false, 2);

// O gerente de ciclo de vida: processo do SERVIDOR, agendado, nunca acionado
// por requisição de browser. Roda mesmo que nenhum cliente esteja ativo.
pub struct LifecycleSweeper {
    repo: CampaignRepository,
    interval: Duration,
}

impl LifecycleSweeper {
    pub fn new(repo: CampaignRepository) -> Self {
        Self {
            repo,
            interval: SWEEP_INTERVAL,
        }
    }

    // Dispara a task destacada. Cada tick roda as duas varreduras; erro vira
    // log e o loop continua — as operações são idempotentes, então a próxima
    // rodada se recupera sozinha.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.run_once().await;
            }
        })
    }

    // As duas obrigações, em ordem:
    //  1. expirar por data: QUALQUER status (menos completed) com end_date
    //     no passado vira completed;
    //  2. expirar por orçamento: ativa com spent >= budget vira completed.
    // Ambas só movem campanhas PARA completed, então rodar duas vezes seguidas
    // dá no mesmo — e uma pausa feita pelo dono nunca é desfeita.
    pub async fn run_once(&self) {
        match self.repo.complete_expired(Utc::now()).await {
            Ok(0) => {}
            Ok(n) => tracing::info!(campaigns = n, "Varredura: campanhas expiradas por data"),
            Err(err) => tracing::error!("Falha na varredura por data: {err}"),
        }

        match self.repo.complete_exhausted().await {
            Ok(0) => {}
            Ok(n) => tracing::info!(campaigns = n, "Varredura: campanhas com orçamento esgotado"),
            Err(err) => tracing::error!("Falha na varredura por orçamento: {err}"),
        }
    }
}
