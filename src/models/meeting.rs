// src/models/meeting.rs

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

// Mapeia o CREATE TYPE meeting_kind do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "meeting_kind")]
pub enum MeetingKind {
    #[sqlx(rename = "E-mail")]
    #[serde(rename = "E-mail")]
    Email,
    #[sqlx(rename = "Ligação")]
    #[serde(rename = "Ligação")]
    Call,
    #[sqlx(rename = "WhatsApp")]
    #[serde(rename = "WhatsApp")]
    WhatsApp,
    #[sqlx(rename = "Vídeo Chamada")]
    #[serde(rename = "Vídeo Chamada")]
    VideoCall,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: Uuid,
    pub seller_id: Uuid,
    // Referência solta: não é chave estrangeira
    pub proposal_id: Option<Uuid>,
    #[schema(example = "Fibra Norte Telecom")]
    pub provider: String,
    #[schema(example = "2026-10-20")]
    pub date: NaiveDate,
    // Horário de parede, "HH:MM"
    #[schema(example = "14:30")]
    pub time: String,
    #[serde(rename = "type")]
    pub kind: MeetingKind,
    #[schema(example = "Carlos (11) 99999-8888")]
    pub contact: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMeetingPayload {
    pub proposal_id: Option<Uuid>,
    // Opcional quando a proposta informada já tem provedor
    pub provider: Option<String>,
    #[schema(example = "2026-10-20")]
    pub date: NaiveDate,
    #[validate(length(min = 1, message = "O horário é obrigatório."))]
    #[schema(example = "14:30")]
    pub time: String,
    #[serde(rename = "type")]
    pub kind: MeetingKind,
    #[validate(length(min = 1, message = "O contato é obrigatório."))]
    pub contact: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MeetingFilter {
    /// Apenas reuniões deste dia (YYYY-MM-DD)
    pub date: Option<NaiveDate>,
}

/// Normaliza o horário para "HH:MM".
pub fn parse_meeting_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| AppError::validation("time", "Horário inválido, use o formato HH:MM."))
}

impl Meeting {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_meeting_time(&self.time)
            .ok()
            .map(|time| self.date.and_time(time))
    }

    /// Lembrete de "reunião em 1 hora": é hoje, ainda não começou e
    /// começa dentro da próxima hora.
    pub fn is_starting_soon(&self, now: NaiveDateTime) -> bool {
        match self.starts_at() {
            Some(start) => {
                start.date() == now.date() && now < start && start - Duration::hours(1) < now
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meeting_at(date: NaiveDate, time: &str) -> Meeting {
        Meeting {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            proposal_id: None,
            provider: "Fibra Norte".into(),
            date,
            time: time.into(),
            kind: MeetingKind::VideoCall,
            contact: "Carlos".into(),
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn at(date: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        date.and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_wall_clock_times() {
        assert_eq!(parse_meeting_time("14:30").unwrap(), NaiveTime::from_hms_opt(14, 30, 0).unwrap());
        assert_eq!(parse_meeting_time(" 09:05 ").unwrap(), NaiveTime::from_hms_opt(9, 5, 0).unwrap());
        assert!(parse_meeting_time("25:00").is_err());
        assert!(parse_meeting_time("meio-dia").is_err());
    }

    #[test]
    fn reminder_window_is_the_hour_before_start() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let meeting = meeting_at(day, "15:00");

        assert!(meeting.is_starting_soon(at(day, 14, 30)));
        assert!(meeting.is_starting_soon(at(day, 14, 59)));
        // Exatamente uma hora antes ainda não conta
        assert!(!meeting.is_starting_soon(at(day, 14, 0)));
        assert!(!meeting.is_starting_soon(at(day, 13, 0)));
        // Já começou
        assert!(!meeting.is_starting_soon(at(day, 15, 0)));
        assert!(!meeting.is_starting_soon(at(day, 16, 0)));
    }

    #[test]
    fn reminder_only_fires_on_the_same_day() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let next_day = day.succ_opt().unwrap();
        let meeting = meeting_at(next_day, "00:30");
        assert!(!meeting.is_starting_soon(at(day, 23, 45)));
    }

    #[test]
    fn unparseable_time_never_reminds() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert!(!meeting_at(day, "").is_starting_soon(at(day, 10, 0)));
    }

    #[test]
    fn kind_uses_portuguese_labels_and_type_key() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let json = serde_json::to_value(meeting_at(day, "10:00")).unwrap();
        assert_eq!(json["type"], "Vídeo Chamada");
        assert_eq!(json["date"], "2026-10-19");
    }
}
