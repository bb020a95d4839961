// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, UpdateUserPayload, User},
    services::auth::AuthService,
};

// Gestão de vendedores e administradores. Os handlers só chegam aqui com um admin.
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    auth_service: AuthService,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, auth_service: AuthService, pool: PgPool) -> Self {
        Self { repo, auth_service, pool }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_users(&self.pool).await
    }

    pub async fn create_user(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        let name = payload.name.trim();
        let email = payload.email.trim().to_lowercase();
        if name.is_empty() {
            return Err(AppError::validation("name", "O nome é obrigatório."));
        }

        let password_hash = self.auth_service.hash_password(&payload.password).await?;
        let user = self
            .repo
            .create_user(&self.pool, name, &email, &password_hash, payload.role)
            .await?;

        tracing::info!("👤 Usuário {} criado como {}", user.email, user.role.label());
        Ok(user)
    }

    pub async fn update_user(
        &self,
        caller: &User,
        id: Uuid,
        payload: UpdateUserPayload,
    ) -> Result<User, AppError> {
        ensure_not_own_role_change(caller, id, &payload)?;

        let name = payload.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("name", "O nome é obrigatório."));
        }
        let email = payload.email.trim().to_lowercase();

        self.repo
            .update_user(&self.pool, id, name, &email, payload.role)
            .await?
            .ok_or(AppError::NotFound("Usuário"))
    }

    pub async fn delete_user(&self, caller: &User, id: Uuid) -> Result<(), AppError> {
        if caller.id == id {
            return Err(AppError::forbidden("Você não pode excluir a sua própria conta."));
        }

        if !self.repo.delete_user(&self.pool, id).await? {
            return Err(AppError::NotFound("Usuário"));
        }

        tracing::info!("🗑️ Usuário {} removido por {}", id, caller.email);
        Ok(())
    }
}

// O próprio papel não é editável por quem o tem
fn ensure_not_own_role_change(
    caller: &User,
    id: Uuid,
    payload: &UpdateUserPayload,
) -> Result<(), AppError> {
    if caller.id == id && payload.role != caller.role {
        return Err(AppError::forbidden("Você não pode alterar o seu próprio papel."));
    }
    Ok(())
}
