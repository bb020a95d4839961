// src/config.rs

use std::{env, path::PathBuf, time::Duration};

use anyhow::{bail, Context};
use rust_decimal::Decimal;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{DashboardRepository, LeadRepository, MeetingRepository, ProposalRepository, UserRepository},
    services::{
        auth::AuthService, dashboard_service::DashboardService,
        document_service::DocumentService, lead_service::LeadService,
        meeting_service::MeetingService, proposal_service::ProposalService,
        user_service::UserService,
    },
};

// Conta criada na primeira subida, quando a base está vazia
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub fonts_dir: PathBuf,
    pub seller_revenue_share: Decimal,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} deve ser definida", key))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let fonts_dir = PathBuf::from(lookup("FONTS_DIR").unwrap_or_else(|| "./fonts".to_string()));

        let seller_revenue_share = match lookup("SELLER_REVENUE_SHARE") {
            Some(raw) => raw
                .trim()
                .parse::<Decimal>()
                .with_context(|| format!("SELLER_REVENUE_SHARE inválido: '{}'", raw))?,
            None => Decimal::new(80, 2),
        };
        if seller_revenue_share < Decimal::ZERO || seller_revenue_share > Decimal::ONE {
            bail!("SELLER_REVENUE_SHARE deve estar entre 0 e 1");
        }

        let admin = match (lookup("ADMIN_EMAIL"), lookup("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => {
                if password.len() < 6 {
                    bail!("ADMIN_PASSWORD deve ter pelo menos 6 caracteres");
                }
                Some(AdminBootstrap {
                    name: lookup("ADMIN_NAME").unwrap_or_else(|| "Administrador".to_string()),
                    email: email.trim().to_lowercase(),
                    password,
                })
            }
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            fonts_dir,
            seller_revenue_share,
            admin,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub proposal_service: ProposalService,
    pub lead_service: LeadService,
    pub meeting_service: MeetingService,
    pub dashboard_service: DashboardService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Faz o app rodar as migrações do SQLx na inicialização
        sqlx::migrate!()
            .run(&db_pool)
            .await
            .context("Falha ao rodar as migrações do banco de dados")?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        let state = Self::with_pool(db_pool, config);

        if let Some(admin) = &config.admin {
            state
                .auth_service
                .bootstrap_admin(&admin.name, &admin.email, &admin.password)
                .await
                .context("Falha ao criar o administrador inicial")?;
        }

        Ok(state)
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_pool(db_pool: PgPool, config: &Config) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let proposal_repo = ProposalRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let meeting_repo = MeetingRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), config.jwt_secret.clone(), db_pool.clone());
        let user_service = UserService::new(user_repo, auth_service.clone(), db_pool.clone());
        let proposal_service = ProposalService::new(proposal_repo.clone(), db_pool.clone());
        let lead_service = LeadService::new(lead_repo, db_pool.clone());
        let meeting_service = MeetingService::new(meeting_repo, proposal_repo, db_pool.clone());
        let dashboard_service = DashboardService::new(dashboard_repo, config.seller_revenue_share);
        let document_service = DocumentService::new(config.fonts_dir.clone());

        Self {
            db_pool,
            auth_service,
            user_service,
            proposal_service,
            lead_service,
            meeting_service,
            dashboard_service,
            document_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/pingdesk"),
        ("JWT_SECRET", "segredo"),
    ];

    #[test]
    fn defaults_are_applied() {
        let config = Config::from_lookup(lookup(&BASE)).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.fonts_dir, PathBuf::from("./fonts"));
        assert_eq!(config.seller_revenue_share, Decimal::new(80, 2));
        assert!(config.admin.is_none());
    }

    #[test]
    fn missing_required_values_fail() {
        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "x")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("JWT_SECRET", " ")])).is_err());
    }

    #[test]
    fn revenue_share_must_be_a_fraction() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SELLER_REVENUE_SHARE", "0.75"));
        assert_eq!(
            Config::from_lookup(lookup(&pairs)).unwrap().seller_revenue_share,
            Decimal::new(75, 2)
        );

        for bad in ["1.5", "-0.1", "oitenta"] {
            let mut pairs = BASE.to_vec();
            pairs.push(("SELLER_REVENUE_SHARE", bad));
            assert!(Config::from_lookup(lookup(&pairs)).is_err(), "{}", bad);
        }
    }

    #[test]
    fn admin_bootstrap_needs_email_and_password() {
        let mut pairs = BASE.to_vec();
        pairs.push(("ADMIN_EMAIL", "Admin@PingDesk.com.br"));
        assert!(Config::from_lookup(lookup(&pairs)).unwrap().admin.is_none());

        pairs.push(("ADMIN_PASSWORD", "admin123"));
        let admin = Config::from_lookup(lookup(&pairs)).unwrap().admin.unwrap();
        assert_eq!(admin.email, "admin@pingdesk.com.br");
        assert_eq!(admin.name, "Administrador");

        let mut short = BASE.to_vec();
        short.push(("ADMIN_EMAIL", "a@b.com"));
        short.push(("ADMIN_PASSWORD", "123"));
        assert!(Config::from_lookup(lookup(&short)).is_err());
    }
}
