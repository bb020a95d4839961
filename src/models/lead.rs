// src/models/lead.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: Uuid,
    pub seller_id: Uuid,
    #[schema(example = "Conecta Sul Internet")]
    pub provider: String,
    // WhatsApp ou e-mail, no mesmo campo
    #[schema(example = "5511999998888")]
    pub contact: Option<String>,
    #[schema(example = "https://conectasul.com.br")]
    pub website: Option<String>,
    #[schema(example = "SP")]
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "O provedor é obrigatório."))]
    pub provider: String,
    pub contact: Option<String>,
    pub website: Option<String>,
    pub state: Option<String>,
}

/// Formulário de "Nova Proposta" pré-preenchido a partir de um lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDraft {
    pub provider: String,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub from_lead: Uuid,
}

impl Lead {
    /// Cópia de mão única: o contato com "@" vira e-mail, o resto vira WhatsApp.
    /// O lead em si não é alterado.
    pub fn to_proposal_draft(&self) -> ProposalDraft {
        let contact = self
            .contact
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        let (whatsapp, email) = match contact {
            Some(c) if c.contains('@') => (None, Some(c.to_string())),
            Some(c) => (Some(c.to_string()), None),
            None => (None, None),
        };

        ProposalDraft {
            provider: self.provider.clone(),
            whatsapp,
            email,
            from_lead: self.id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(contact: Option<&str>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            seller_id: Uuid::new_v4(),
            provider: "Conecta Sul".into(),
            contact: contact.map(str::to_string),
            website: None,
            state: Some("SP".into()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn phone_contact_prefills_whatsapp() {
        let source = lead(Some("5511999998888"));
        let draft = source.to_proposal_draft();

        assert_eq!(draft.provider, "Conecta Sul");
        assert_eq!(draft.whatsapp.as_deref(), Some("5511999998888"));
        assert_eq!(draft.email, None);
        assert_eq!(draft.from_lead, source.id);
    }

    #[test]
    fn email_contact_prefills_email() {
        let draft = lead(Some("vendas@conectasul.com.br")).to_proposal_draft();
        assert_eq!(draft.whatsapp, None);
        assert_eq!(draft.email.as_deref(), Some("vendas@conectasul.com.br"));
    }

    #[test]
    fn missing_or_blank_contact_prefills_nothing() {
        for contact in [None, Some("  ")] {
            let draft = lead(contact).to_proposal_draft();
            assert_eq!(draft.whatsapp, None);
            assert_eq!(draft.email, None);
        }
    }

    #[test]
    fn conversion_leaves_the_lead_untouched() {
        let source = lead(Some("5511999998888"));
        let snapshot = serde_json::to_value(&source).unwrap();
        let _ = source.to_proposal_draft();
        assert_eq!(serde_json::to_value(&source).unwrap(), snapshot);
    }
}
