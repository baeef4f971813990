// src/services/lead_service.rs

use anyhow::anyhow;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, retry::RetryPolicy},
    db::{CampaignRepository, LeadRepository},
    models::lead::{CreateLeadPayload, Lead, LeadType},
};

// O pipeline de atribuição de leads: valida, escreve com retentativa e, para
// leads pagos, credita o contador da campanha de origem exatamente uma vez.
#[derive(Clone)]
pub struct LeadService {
    leads: LeadRepository,
    campaigns: CampaignRepository,
    retry: RetryPolicy,
}

impl LeadService {
    pub fn new(leads: LeadRepository, campaigns: CampaignRepository) -> Self {
        Self {
            leads,
            campaigns,
            retry: RetryPolicy::lead_writes(),
        }
    }

    pub async fn submit(&self, payload: CreateLeadPayload) -> Result<Lead, AppError> {
        // Falha de validação aparece na hora e nunca é retentada.
        payload.validate()?;

        // A chave de idempotência amarra a sequência inteira de tentativas a
        // UMA submissão lógica: se a primeira tentativa estourar timeout no
        // cliente mas tiver gravado no servidor, o replay encontra a chave e
        // não insere (nem atribui) de novo.
        let idempotency_key = payload.idempotency_key.unwrap_or_else(Uuid::new_v4);

        let inserted = self
            .retry
            .run(|_attempt| {
                let repo = self.leads.clone();
                let payload = payload.clone();
                async move { repo.insert(&payload, idempotency_key).await }
            })
            .await?;

        match inserted {
            Some(lead) => {
                self.attribute(&lead).await;
                Ok(lead)
            }
            // Replay de idempotência: a linha já existia. Devolvemos o lead
            // original, sem segunda atribuição.
            None => self
                .leads
                .find_by_idempotency_key(idempotency_key)
                .await?
                .ok_or_else(|| {
                    AppError::InternalServerError(anyhow!(
                        "conflito de idempotência sem lead correspondente no banco"
                    ))
                }),
        }
    }

    // Efeito colateral de atribuição: +1 em leads_generated da campanha, só
    // quando o INSERT criou a linha agora. O lead em si já está salvo; se o
    // contador falhar, logamos e seguimos — contador é telemetria, não pode
    // derrubar a resposta de sucesso do usuário.
    async fn attribute(&self, lead: &Lead) {
        if lead.lead_type != LeadType::Paid {
            return;
        }
        let Some(campaign_id) = lead.campaign_id else {
            // O CHECK do banco impede isso; se aparecer, é bug de migração.
            tracing::error!(lead_id = %lead.id, "Lead pago sem campaign_id");
            return;
        };
        if let Err(err) = self.campaigns.increment_leads_generated(campaign_id).await {
            tracing::warn!(
                %campaign_id,
                lead_id = %lead.id,
                "Falha ao creditar lead na campanha: {err}"
            );
        }
    }
}
