// src/services/meeting_service.rs

use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{meeting_repo::NewMeeting, MeetingRepository, ProposalRepository},
    models::{
        access::AccessScope,
        meeting::{parse_meeting_time, Meeting, ScheduleMeetingPayload},
        proposal::{non_blank, Proposal},
    },
};

#[derive(Clone)]
pub struct MeetingService {
    repo: MeetingRepository,
    proposal_repo: ProposalRepository,
    pool: PgPool,
}

impl MeetingService {
    pub fn new(repo: MeetingRepository, proposal_repo: ProposalRepository, pool: PgPool) -> Self {
        Self { repo, proposal_repo, pool }
    }

    /// Agenda uma reunião do próprio vendedor. Sem checagem de conflito.
    pub async fn schedule_meeting(
        &self,
        scope: AccessScope,
        payload: ScheduleMeetingPayload,
    ) -> Result<Meeting, AppError> {
        let seller_id = scope.owner_for_new_record()?;

        let time = parse_meeting_time(&payload.time)?.format("%H:%M").to_string();
        let contact = payload.contact.trim();
        if contact.is_empty() {
            return Err(AppError::validation("contact", "O contato é obrigatório."));
        }

        // Proposta vinculada: só vale se existir e for visível para quem agenda
        let linked = match payload.proposal_id {
            Some(id) => self
                .proposal_repo
                .find_by_id(id)
                .await?
                .filter(|p| scope.can_read(p.seller_id)),
            None => None,
        };
        let provider = resolve_provider(linked.as_ref(), payload.provider)?;
        let notes = non_blank(payload.notes);

        let meeting = self
            .repo
            .create_meeting(
                &self.pool,
                NewMeeting {
                    seller_id,
                    proposal_id: payload.proposal_id,
                    provider: &provider,
                    date: payload.date,
                    time: &time,
                    kind: payload.kind,
                    contact,
                    notes: notes.as_deref(),
                },
            )
            .await?;

        tracing::info!(
            "📅 Reunião com '{}' agendada para {} {}",
            meeting.provider,
            meeting.date.format("%d/%m/%Y"),
            meeting.time
        );
        Ok(meeting)
    }

    pub async fn list_meetings(
        &self,
        scope: AccessScope,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Meeting>, AppError> {
        self.repo.list_meetings(scope.seller_filter(), date).await
    }

    pub async fn delete_meeting(&self, scope: AccessScope, id: Uuid) -> Result<(), AppError> {
        let meeting = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("Reunião"))?;
        scope.ensure_can_read(meeting.seller_id)?;
        scope.ensure_owner(meeting.seller_id)?;

        if !self.repo.delete_meeting(&self.pool, id).await? {
            return Err(AppError::NotFound("Reunião"));
        }
        Ok(())
    }

    /// Reuniões de hoje que começam na próxima hora. Calculado a cada chamada.
    pub async fn upcoming_meetings(
        &self,
        scope: AccessScope,
        now: NaiveDateTime,
    ) -> Result<Vec<Meeting>, AppError> {
        let today = self.list_meetings(scope, Some(now.date())).await?;
        Ok(starting_soon(today, now))
    }
}

pub fn starting_soon(meetings: Vec<Meeting>, now: NaiveDateTime) -> Vec<Meeting> {
    meetings
        .into_iter()
        .filter(|m| m.is_starting_soon(now))
        .collect()
}

// Provedor da proposta vinculada tem prioridade sobre o digitado
fn resolve_provider(linked: Option<&Proposal>, supplied: Option<String>) -> Result<String, AppError> {
    if let Some(proposal) = linked {
        return Ok(proposal.provider.clone());
    }
    non_blank(supplied).ok_or_else(|| AppError::validation("provider", "O provedor é obrigatório."))
}
