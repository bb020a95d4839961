// src/db/proposal_repo.rs

use std::collections::HashMap;

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::proposal::{Proposal, ProposalDescription},
};

const PROPOSAL_COLUMNS: &str = r#"
    id, seller_id, provider, whatsapp, email, responsible_name,
    status, plan, value, created_at, updated_at
"#;

#[derive(Clone)]
pub struct ProposalRepository {
    pool: PgPool,
}

impl ProposalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  PROPOSTAS
    // =========================================================================

    pub async fn insert<'e, E>(&self, executor: E, proposal: &Proposal) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO proposals (
                id, seller_id, provider, whatsapp, email, responsible_name,
                status, plan, value, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(proposal.id)
        .bind(proposal.seller_id)
        .bind(&proposal.provider)
        .bind(&proposal.whatsapp)
        .bind(&proposal.email)
        .bind(&proposal.responsible_name)
        .bind(proposal.status())
        .bind(proposal.plan())
        .bind(proposal.value())
        .bind(proposal.created_at)
        .bind(proposal.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Grava os campos editáveis. Status, plano e valor vão sempre juntos,
    /// já validados pelo modelo.
    pub async fn update<'e, E>(&self, executor: E, proposal: &Proposal) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE proposals SET
                provider = $2, whatsapp = $3, email = $4, responsible_name = $5,
                status = $6, plan = $7, value = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(proposal.id)
        .bind(&proposal.provider)
        .bind(&proposal.whatsapp)
        .bind(&proposal.email)
        .bind(&proposal.responsible_name)
        .bind(proposal.status())
        .bind(proposal.plan())
        .bind(proposal.value())
        .bind(proposal.updated_at)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn touch<'e, E>(&self, executor: E, proposal: &Proposal) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE proposals SET updated_at = $2 WHERE id = $1")
            .bind(proposal.id)
            .bind(proposal.updated_at)
            .execute(executor)
            .await?;
        Ok(())
    }

    /// Busca a proposta com o histórico de descrições (mais antigas primeiro).
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Proposal>, AppError> {
        let maybe_proposal = sqlx::query_as::<_, Proposal>(&format!(
            "SELECT {PROPOSAL_COLUMNS} FROM proposals WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(proposal) = maybe_proposal else {
            return Ok(None);
        };

        let descriptions = sqlx::query_as::<_, ProposalDescription>(
            r#"
            SELECT id, proposal_id, text, created_at
            FROM proposal_descriptions
            WHERE proposal_id = $1
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(proposal.with_descriptions(descriptions)))
    }

    /// Lista em ordem de criação, mais recentes primeiro.
    /// `seller_id = None` lista de todos os vendedores.
    pub async fn list(&self, seller_id: Option<Uuid>) -> Result<Vec<Proposal>, AppError> {
        let proposals = sqlx::query_as::<_, Proposal>(&format!(
            r#"
            SELECT {PROPOSAL_COLUMNS} FROM proposals
            WHERE ($1::uuid IS NULL OR seller_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;

        if proposals.is_empty() {
            return Ok(proposals);
        }

        let ids: Vec<Uuid> = proposals.iter().map(|p| p.id).collect();
        let descriptions = sqlx::query_as::<_, ProposalDescription>(
            r#"
            SELECT id, proposal_id, text, created_at
            FROM proposal_descriptions
            WHERE proposal_id = ANY($1)
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_proposal: HashMap<Uuid, Vec<ProposalDescription>> = HashMap::new();
        for entry in descriptions {
            by_proposal.entry(entry.proposal_id).or_default().push(entry);
        }

        Ok(proposals
            .into_iter()
            .map(|p| {
                let entries = by_proposal.remove(&p.id).unwrap_or_default();
                p.with_descriptions(entries)
            })
            .collect())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM proposals WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  HISTÓRICO (somente INSERT)
    // =========================================================================

    pub async fn insert_description<'e, E>(
        &self,
        executor: E,
        entry: &ProposalDescription,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO proposal_descriptions (id, proposal_id, text, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.id)
        .bind(entry.proposal_id)
        .bind(&entry.text)
        .bind(entry.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }
}
