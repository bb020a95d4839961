// src/db/lead_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::lead::Lead};

const LEAD_COLUMNS: &str = "id, seller_id, provider, contact, website, state, created_at";

#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_lead<'e, E>(
        &self,
        executor: E,
        seller_id: Uuid,
        provider: &str,
        contact: Option<&str>,
        website: Option<&str>,
        state: Option<&str>,
    ) -> Result<Lead, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads (seller_id, provider, contact, website, state)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(seller_id)
        .bind(provider)
        .bind(contact)
        .bind(website)
        .bind(state)
        .fetch_one(executor)
        .await?;
        Ok(lead)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(lead)
    }

    // Mais recentes primeiro
    pub async fn list_leads(&self, seller_id: Option<Uuid>) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {LEAD_COLUMNS} FROM leads
            WHERE ($1::uuid IS NULL OR seller_id = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(seller_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }

    pub async fn delete_lead<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
