// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{dashboard::DashboardTotals, proposal::ProposalStatus},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Totais do painel. `seller_id = None` soma todos os vendedores.
    pub async fn get_totals(
        &self,
        seller_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<DashboardTotals, AppError> {
        // Transação para ler propostas e reuniões no mesmo snapshot
        let mut tx = self.pool.begin().await?;

        // A. Propostas (total, concluídas e valor fechado)
        let (total_proposals, successful_proposals, closed_value): (i64, i64, Decimal) =
            sqlx::query_as(
                r#"
                SELECT
                    COUNT(*),
                    COUNT(*) FILTER (WHERE status = $2),
                    COALESCE(SUM(value) FILTER (WHERE status = $2), 0)
                FROM proposals
                WHERE ($1::uuid IS NULL OR seller_id = $1)
                "#,
            )
            .bind(seller_id)
            .bind(ProposalStatus::Won)
            .fetch_one(&mut *tx)
            .await?;

        // B. Reuniões de hoje
        let today_meetings: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM meetings
            WHERE ($1::uuid IS NULL OR seller_id = $1)
              AND date = $2
            "#,
        )
        .bind(seller_id)
        .bind(today)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardTotals {
            total_proposals,
            successful_proposals,
            closed_value,
            today_meetings,
        })
    }
}
