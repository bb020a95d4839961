// src/handlers/proposals.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::proposal::{
        AppendDescriptionPayload, NewProposal, Proposal, ProposalDescription, ProposalUpdate,
    },
};

// GET /api/proposals
#[utoipa::path(
    get,
    path = "/api/proposals",
    tag = "Proposals",
    responses(
        (status = 200, description = "Propostas visíveis, mais recentes primeiro", body = Vec<Proposal>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_proposals(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let proposals = app_state.proposal_service.list_proposals(user.scope()).await?;
    Ok((StatusCode::OK, Json(proposals)))
}

// POST /api/proposals
#[utoipa::path(
    post,
    path = "/api/proposals",
    tag = "Proposals",
    request_body = NewProposal,
    responses(
        (status = 201, description = "Proposta criada em 'Inicio'", body = Proposal),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Administradores não criam propostas")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_proposal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<NewProposal>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let proposal = app_state
        .proposal_service
        .create_proposal(user.scope(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

// GET /api/proposals/{id}
#[utoipa::path(
    get,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 200, description = "Proposta com histórico", body = Proposal),
        (status = 403, description = "Proposta de outro vendedor"),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_proposal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let proposal = app_state.proposal_service.get_proposal(user.scope(), id).await?;
    Ok((StatusCode::OK, Json(proposal)))
}

// PUT /api/proposals/{id}
#[utoipa::path(
    put,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    request_body = ProposalUpdate,
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 200, description = "Proposta atualizada", body = Proposal),
        (status = 400, description = "Plano e valor obrigatórios para concluir"),
        (status = 403, description = "Apenas o vendedor dono pode editar"),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_proposal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProposalUpdate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let proposal = app_state
        .proposal_service
        .transition_proposal(user.scope(), id, payload)
        .await?;
    Ok((StatusCode::OK, Json(proposal)))
}

// DELETE /api/proposals/{id}
#[utoipa::path(
    delete,
    path = "/api/proposals/{id}",
    tag = "Proposals",
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 204, description = "Proposta removida"),
        (status = 403, description = "Apenas o vendedor dono pode excluir"),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_proposal(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.proposal_service.delete_proposal(user.scope(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// POST /api/proposals/{id}/descriptions
#[utoipa::path(
    post,
    path = "/api/proposals/{id}/descriptions",
    tag = "Proposals",
    request_body = AppendDescriptionPayload,
    params(("id" = Uuid, Path, description = "ID da proposta")),
    responses(
        (status = 201, description = "Descrição adicionada ao histórico", body = ProposalDescription),
        (status = 400, description = "Descrição em branco"),
        (status = 403, description = "Apenas o vendedor dono"),
        (status = 404, description = "Proposta não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn append_description(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AppendDescriptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let entry = app_state
        .proposal_service
        .append_description(user.scope(), id, &payload.text)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}
