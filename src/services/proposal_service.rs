// src/services/proposal_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProposalRepository,
    models::{
        access::AccessScope,
        proposal::{NewProposal, Proposal, ProposalDescription, ProposalUpdate},
    },
};

#[derive(Clone)]
pub struct ProposalService {
    repo: ProposalRepository,
    pool: PgPool,
}

impl ProposalService {
    pub fn new(repo: ProposalRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_proposal(
        &self,
        scope: AccessScope,
        input: NewProposal,
    ) -> Result<Proposal, AppError> {
        let seller_id = scope.owner_for_new_record()?;
        let proposal = Proposal::open(seller_id, input, Utc::now())?;

        // Proposta e descrição inicial entram juntas
        let mut tx = self.pool.begin().await?;
        self.repo.insert(&mut *tx, &proposal).await?;
        for entry in proposal.descriptions().entries() {
            self.repo.insert_description(&mut *tx, entry).await?;
        }
        tx.commit().await?;

        tracing::info!("📝 Proposta {} criada para '{}'", proposal.id, proposal.provider);
        Ok(proposal)
    }

    pub async fn get_proposal(&self, scope: AccessScope, id: Uuid) -> Result<Proposal, AppError> {
        let proposal = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Proposta"))?;
        scope.ensure_can_read(proposal.seller_id)?;
        Ok(proposal)
    }

    pub async fn list_proposals(&self, scope: AccessScope) -> Result<Vec<Proposal>, AppError> {
        self.repo.list(scope.seller_filter()).await
    }

    /// Edita campos e status. A regra de fechamento é aplicada pelo modelo
    /// antes de qualquer escrita; a nova descrição vai na mesma transação.
    pub async fn transition_proposal(
        &self,
        scope: AccessScope,
        id: Uuid,
        update: ProposalUpdate,
    ) -> Result<Proposal, AppError> {
        let mut proposal = self.get_proposal(scope, id).await?;
        scope.ensure_owner(proposal.seller_id)?;

        let previous_status = proposal.status();
        let appended = proposal.apply_update(update, Utc::now())?;

        let mut tx = self.pool.begin().await?;
        if !self.repo.update(&mut *tx, &proposal).await? {
            return Err(AppError::NotFound("Proposta"));
        }
        if let Some(entry) = &appended {
            self.repo.insert_description(&mut *tx, entry).await?;
        }
        tx.commit().await?;

        if proposal.status() != previous_status {
            tracing::info!(
                "🔁 Proposta {}: '{}' → '{}'",
                proposal.id,
                previous_status.label(),
                proposal.status().label()
            );
        }
        if proposal.status().is_won() {
            tracing::info!(
                "🏆 Proposta {} concluída: {} por {:?}",
                proposal.id,
                proposal.plan().unwrap_or_default(),
                proposal.value()
            );
        }

        Ok(proposal)
    }

    pub async fn append_description(
        &self,
        scope: AccessScope,
        id: Uuid,
        text: &str,
    ) -> Result<ProposalDescription, AppError> {
        let mut proposal = self.get_proposal(scope, id).await?;
        scope.ensure_owner(proposal.seller_id)?;

        let entry = proposal.append_description(text, Utc::now())?;

        let mut tx = self.pool.begin().await?;
        self.repo.insert_description(&mut *tx, &entry).await?;
        self.repo.touch(&mut *tx, &proposal).await?;
        tx.commit().await?;

        Ok(entry)
    }

    pub async fn delete_proposal(&self, scope: AccessScope, id: Uuid) -> Result<(), AppError> {
        let proposal = self.get_proposal(scope, id).await?;
        scope.ensure_owner(proposal.seller_id)?;

        // As descrições saem junto (ON DELETE CASCADE)
        if !self.repo.delete(&self.pool, id).await? {
            return Err(AppError::NotFound("Proposta"));
        }

        tracing::info!("🗑️ Proposta {} removida", id);
        Ok(())
    }
}
