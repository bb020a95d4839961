// src/handlers/documents.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::document::{ComposeProposalRequest, PlanTemplate},
    services::document_service::content_disposition,
};

// GET /api/proposal-documents/templates
#[utoipa::path(
    get,
    path = "/api/proposal-documents/templates",
    tag = "Documents",
    responses(
        (status = 200, description = "Templates de plano disponíveis", body = Vec<PlanTemplate>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Json<Vec<PlanTemplate>> {
    Json(app_state.document_service.list_templates())
}

// POST /api/proposal-documents
#[utoipa::path(
    post,
    path = "/api/proposal-documents",
    tag = "Documents",
    request_body = ComposeProposalRequest,
    responses(
        (status = 200, description = "Arquivo da proposta (txt ou pdf) como anexo"),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Template não encontrado"),
        (status = 500, description = "Falha ao gerar o documento")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_proposal_document(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ComposeProposalRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;

    let issued_on = Local::now().date_naive();
    let service = app_state.document_service.clone();

    // genpdf é síncrono: roda fora do executor
    let document = tokio::task::spawn_blocking(move || service.generate(&payload, issued_on))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de geração do documento: {}", e))??;

    tracing::info!("📄 {} gerou '{}'", user.email, document.file_name);

    // Configura os Headers para o navegador baixar o arquivo
    let headers = [
        (header::CONTENT_TYPE, document.content_type.to_string()),
        (header::CONTENT_DISPOSITION, content_disposition(&document.file_name)),
    ];

    Ok((StatusCode::OK, headers, document.bytes).into_response())
}
