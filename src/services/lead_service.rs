// src/services/lead_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::LeadRepository,
    models::{
        access::AccessScope,
        lead::{CreateLeadPayload, Lead, ProposalDraft},
        proposal::non_blank,
    },
};

#[derive(Clone)]
pub struct LeadService {
    repo: LeadRepository,
    pool: PgPool,
}

impl LeadService {
    pub fn new(repo: LeadRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_lead(
        &self,
        scope: AccessScope,
        payload: CreateLeadPayload,
    ) -> Result<Lead, AppError> {
        let seller_id = scope.owner_for_new_record()?;

        let provider = payload.provider.trim();
        if provider.is_empty() {
            return Err(AppError::validation("provider", "O provedor é obrigatório."));
        }

        let contact = non_blank(payload.contact);
        let website = non_blank(payload.website);
        let state = non_blank(payload.state);

        let lead = self
            .repo
            .create_lead(
                &self.pool,
                seller_id,
                provider,
                contact.as_deref(),
                website.as_deref(),
                state.as_deref(),
            )
            .await?;

        tracing::info!("📇 Lead {} criado para '{}'", lead.id, lead.provider);
        Ok(lead)
    }

    pub async fn list_leads(&self, scope: AccessScope) -> Result<Vec<Lead>, AppError> {
        self.repo.list_leads(scope.seller_filter()).await
    }

    async fn get_lead(&self, scope: AccessScope, id: Uuid) -> Result<Lead, AppError> {
        let lead = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Lead"))?;
        scope.ensure_can_read(lead.seller_id)?;
        Ok(lead)
    }

    pub async fn delete_lead(&self, scope: AccessScope, id: Uuid) -> Result<(), AppError> {
        let lead = self.get_lead(scope, id).await?;
        scope.ensure_owner(lead.seller_id)?;

        if !self.repo.delete_lead(&self.pool, id).await? {
            return Err(AppError::NotFound("Lead"));
        }
        Ok(())
    }

    /// Pré-preenche uma nova proposta. O lead continua como está.
    pub async fn proposal_draft(&self, scope: AccessScope, id: Uuid) -> Result<ProposalDraft, AppError> {
        let lead = self.get_lead(scope, id).await?;
        Ok(lead.to_proposal_draft())
    }
}
