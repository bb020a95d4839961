// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::auth::UserRole;

// Totais brutos, como saem do banco
#[derive(Debug, Clone, Default, FromRow)]
pub struct DashboardTotals {
    pub total_proposals: i64,
    pub successful_proposals: i64,
    pub closed_value: Decimal,
    pub today_meetings: i64,
}

// Os cards do topo do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_proposals: i64,
    pub successful_proposals: i64,
    // Soma do valor das propostas concluídas, sem multiplicador
    #[schema(value_type = f64)]
    pub closed_value: Decimal,
    // Parte do vendedor sobre o valor fechado (só para vendedores)
    #[schema(value_type = Option<f64>)]
    pub seller_share: Option<Decimal>,
    pub today_meetings: i64,
}

impl DashboardSummary {
    pub fn new(totals: DashboardTotals, role: UserRole, seller_share_rate: Decimal) -> Self {
        let seller_share = match role {
            UserRole::Seller => Some((totals.closed_value * seller_share_rate).round_dp(2)),
            UserRole::Admin => None,
        };

        Self {
            total_proposals: totals.total_proposals,
            successful_proposals: totals.successful_proposals,
            closed_value: totals.closed_value,
            seller_share,
            today_meetings: totals.today_meetings,
        }
    }
}
