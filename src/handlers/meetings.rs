// src/handlers/meetings.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::meeting::{Meeting, MeetingFilter, ScheduleMeetingPayload},
};

// GET /api/meetings?date=YYYY-MM-DD
#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "Meetings",
    params(MeetingFilter),
    responses(
        (status = 200, description = "Agenda em ordem de data e horário", body = Vec<Meeting>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_meetings(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(filter): Query<MeetingFilter>,
) -> Result<impl IntoResponse, AppError> {
    let meetings = app_state
        .meeting_service
        .list_meetings(user.scope(), filter.date)
        .await?;
    Ok((StatusCode::OK, Json(meetings)))
}

// POST /api/meetings
#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = ScheduleMeetingPayload,
    responses(
        (status = 201, description = "Reunião agendada", body = Meeting),
        (status = 400, description = "Dados inválidos"),
        (status = 403, description = "Administradores não agendam reuniões")
    ),
    security(("api_jwt" = []))
)]
pub async fn schedule_meeting(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ScheduleMeetingPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let meeting = app_state
        .meeting_service
        .schedule_meeting(user.scope(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(meeting)))
}

// DELETE /api/meetings/{id}
#[utoipa::path(
    delete,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "ID da reunião")),
    responses(
        (status = 204, description = "Reunião removida"),
        (status = 403, description = "Apenas o vendedor dono"),
        (status = 404, description = "Reunião não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_meeting(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.meeting_service.delete_meeting(user.scope(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/meetings/upcoming
#[utoipa::path(
    get,
    path = "/api/meetings/upcoming",
    tag = "Meetings",
    responses(
        (status = 200, description = "Reuniões de hoje que começam na próxima hora", body = Vec<Meeting>)
    ),
    security(("api_jwt" = []))
)]
pub async fn upcoming_meetings(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    // Horário de parede do servidor
    let now = Local::now().naive_local();
    let meetings = app_state
        .meeting_service
        .upcoming_meetings(user.scope(), now)
        .await?;
    Ok((StatusCode::OK, Json(meetings)))
}
