// src/services/dashboard_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{access::AccessScope, auth::User, dashboard::DashboardSummary},
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
    seller_share_rate: Decimal,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository, seller_share_rate: Decimal) -> Self {
        Self { repo, seller_share_rate }
    }

    pub async fn get_summary(&self, user: &User, today: NaiveDate) -> Result<DashboardSummary, AppError> {
        let scope = AccessScope::for_user(user);
        let totals = self.repo.get_totals(scope.seller_filter(), today).await?;
        Ok(DashboardSummary::new(totals, user.role, self.seller_share_rate))
    }
}
