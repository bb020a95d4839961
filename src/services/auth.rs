// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{AuthResponse, Claims, Session, User, UserRole},
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let (token, _) = issue_token(&self.jwt_secret, user.id, Utc::now())?;
        tracing::info!("🔑 Login de {} ({})", user.email, user.role.label());

        Ok(AuthResponse { token, user })
    }

    /// Encerra a sessão: o `jti` entra na lista de revogados até expirar.
    pub async fn logout(&self, user: &User, session: Session) -> Result<(), AppError> {
        self.user_repo
            .revoke_token(&self.pool, session.jti, user.id, session.expires_at)
            .await?;

        let purged = self.user_repo.purge_expired_tokens(&self.pool).await?;
        if purged > 0 {
            tracing::debug!("{} sessões expiradas removidas da lista de revogados", purged);
        }

        tracing::info!("👋 Logout de {}", user.email);
        Ok(())
    }

    /// Resolve o token para o usuário da aplicação.
    /// Token sem usuário correspondente é tratado como não autenticado.
    pub async fn validate_token(&self, token: &str) -> Result<(User, Session), AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        if self.user_repo.is_token_revoked(claims.jti).await? {
            return Err(AppError::InvalidToken);
        }

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        Ok((user, claims.session()?))
    }

    pub async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    /// Cria o primeiro administrador quando a base ainda não tem usuários.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, AppError> {
        if self.user_repo.count_users(&self.pool).await? > 0 {
            return Ok(None);
        }

        let password_hash = self.hash_password(password).await?;
        let admin = self
            .user_repo
            .create_user(&self.pool, name, email, &password_hash, UserRole::Admin)
            .await?;

        tracing::info!("👤 Administrador inicial criado: {}", admin.email);
        Ok(Some(admin))
    }
}

impl Claims {
    fn session(&self) -> Result<Session, AppError> {
        let expires_at =
            DateTime::<Utc>::from_timestamp(self.exp as i64, 0).ok_or(AppError::InvalidToken)?;
        Ok(Session { jti: self.jti, expires_at })
    }
}

/// Gera um JWT HS256 válido por 7 dias, com `jti` próprio.
pub fn issue_token(
    secret: &str,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(String, Claims), AppError> {
    let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

    let claims = Claims {
        sub: user_id,
        jti: Uuid::new_v4(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;

    Ok((token, claims))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;
    Ok(token_data.claims)
}
