// src/models/access.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{User, UserRole},
};

/// Escopo de leitura de quem chama: admin vê tudo, vendedor vê só o que é dele.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessScope {
    All,
    Seller(Uuid),
}

impl AccessScope {
    pub fn new(role: UserRole, caller_id: Uuid) -> Self {
        match role {
            UserRole::Admin => AccessScope::All,
            UserRole::Seller => AccessScope::Seller(caller_id),
        }
    }

    pub fn for_user(user: &User) -> Self {
        if user.is_admin() {
            AccessScope::All
        } else {
            AccessScope::Seller(user.id)
        }
    }

    /// Filtro `seller_id` das listagens (`None` = sem filtro).
    pub fn seller_filter(&self) -> Option<Uuid> {
        match self {
            AccessScope::All => None,
            AccessScope::Seller(id) => Some(*id),
        }
    }

    pub fn can_read(&self, owner_id: Uuid) -> bool {
        match self {
            AccessScope::All => true,
            AccessScope::Seller(id) => *id == owner_id,
        }
    }

    pub fn ensure_can_read(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.can_read(owner_id) {
            Ok(())
        } else {
            Err(AppError::forbidden("Você não tem permissão para acessar este registro."))
        }
    }

    /// Escrita em leads, propostas e reuniões: só o vendedor dono.
    /// Administradores apenas visualizam.
    pub fn ensure_owner(&self, owner_id: Uuid) -> Result<(), AppError> {
        match self {
            AccessScope::All => Err(AppError::forbidden(
                "Administradores podem apenas visualizar este registro.",
            )),
            AccessScope::Seller(id) if *id == owner_id => Ok(()),
            AccessScope::Seller(_) => Err(AppError::forbidden(
                "Você não tem permissão para editar este registro.",
            )),
        }
    }

    /// Dono de um registro novo: o próprio vendedor.
    pub fn owner_for_new_record(&self) -> Result<Uuid, AppError> {
        match self {
            AccessScope::All => Err(AppError::forbidden(
                "Administradores não podem criar leads, propostas ou reuniões.",
            )),
            AccessScope::Seller(id) => Ok(*id),
        }
    }
}
