// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::{User, UserRole},
};

/// 1. O Trait que define qual papel uma rota exige
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> UserRole;
    fn denied_message() -> &'static str;
}

/// 2. O Extractor (Guardião). Depende do auth_guard ter rodado antes.
pub struct RequireRole<T>(pub User, PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn user(&self) -> &User {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;

        check_role::<T>(&user)?;
        Ok(RequireRole(user, PhantomData))
    }
}

fn check_role<T: RoleDef>(user: &User) -> Result<(), AppError> {
    if user.role != T::role() {
        return Err(AppError::forbidden(T::denied_message()));
    }
    Ok(())
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn role() -> UserRole { UserRole::Admin }
    fn denied_message() -> &'static str {
        "Acesso negado. Apenas administradores podem acessar esta página."
    }
}

pub type RequireAdmin = RequireRole<AdminOnly>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            email: "x@pingdesk.com.br".into(),
            name: "X".into(),
            role,
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn admin_only_rejects_sellers() {
        assert!(check_role::<AdminOnly>(&user(UserRole::Admin)).is_ok());
        assert!(matches!(
            check_role::<AdminOnly>(&user(UserRole::Seller)),
            Err(AppError::Forbidden(_))
        ));
    }
}
