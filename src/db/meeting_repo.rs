// src/db/meeting_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::meeting::{Meeting, MeetingKind},
};

const MEETING_COLUMNS: &str =
    "id, seller_id, proposal_id, provider, date, time, kind, contact, notes, created_at";

// Campos de uma reunião nova, já normalizados pelo serviço
pub struct NewMeeting<'a> {
    pub seller_id: Uuid,
    pub proposal_id: Option<Uuid>,
    pub provider: &'a str,
    pub date: NaiveDate,
    pub time: &'a str,
    pub kind: MeetingKind,
    pub contact: &'a str,
    pub notes: Option<&'a str>,
}

#[derive(Clone)]
pub struct MeetingRepository {
    pool: PgPool,
}

impl MeetingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_meeting<'e, E>(
        &self,
        executor: E,
        meeting: NewMeeting<'_>,
    ) -> Result<Meeting, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let created = sqlx::query_as::<_, Meeting>(&format!(
            r#"
            INSERT INTO meetings (
                seller_id, proposal_id, provider, date, time, kind, contact, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MEETING_COLUMNS}
            "#
        ))
        .bind(meeting.seller_id)
        .bind(meeting.proposal_id)
        .bind(meeting.provider)
        .bind(meeting.date)
        .bind(meeting.time)
        .bind(meeting.kind)
        .bind(meeting.contact)
        .bind(meeting.notes)
        .fetch_one(executor)
        .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Meeting>, AppError> {
        let meeting = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {MEETING_COLUMNS} FROM meetings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(meeting)
    }

    /// Agenda em ordem cronológica. O horário "HH:MM" ordena como texto.
    pub async fn list_meetings(
        &self,
        seller_id: Option<Uuid>,
        date: Option<NaiveDate>,
    ) -> Result<Vec<Meeting>, AppError> {
        let meetings = sqlx::query_as::<_, Meeting>(&format!(
            r#"
            SELECT {MEETING_COLUMNS} FROM meetings
            WHERE ($1::uuid IS NULL OR seller_id = $1)
              AND ($2::date IS NULL OR date = $2)
            ORDER BY date ASC, time ASC
            "#
        ))
        .bind(seller_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(meetings)
    }

    pub async fn delete_meeting<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
