// src/models/proposal.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;

const CLOSING_FIELDS_REQUIRED: &str =
    "Para propostas concluídas, é obrigatório preencher o plano e o valor";

// Maior valor que cabe em NUMERIC(12, 2)
const MAX_VALUE_CENTS: i64 = 999_999_999_999;

/// Teto para qualquer valor em reais aceito pela API (R$ 9.999.999.999,99).
pub fn max_money_value() -> Decimal {
    Decimal::new(MAX_VALUE_CENTS, 2)
}

// --- ENUMS ---

// Mapeia o CREATE TYPE proposal_status do banco.
// Os rótulos em português são o formato do banco e do JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "proposal_status")]
pub enum ProposalStatus {
    #[sqlx(rename = "Inicio")]
    #[serde(rename = "Inicio")]
    Started,
    #[sqlx(rename = "Negociando")]
    #[serde(rename = "Negociando")]
    Negotiating,
    #[sqlx(rename = "Quase fechando")]
    #[serde(rename = "Quase fechando")]
    AlmostClosing,
    #[sqlx(rename = "Concluído com sucesso")]
    #[serde(rename = "Concluído com sucesso")]
    Won,
    #[sqlx(rename = "Encerrado por falta de interesse")]
    #[serde(rename = "Encerrado por falta de interesse")]
    Lost,
}

impl ProposalStatus {
    pub const ALL: [ProposalStatus; 5] = [
        ProposalStatus::Started,
        ProposalStatus::Negotiating,
        ProposalStatus::AlmostClosing,
        ProposalStatus::Won,
        ProposalStatus::Lost,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProposalStatus::Started => "Inicio",
            ProposalStatus::Negotiating => "Negociando",
            ProposalStatus::AlmostClosing => "Quase fechando",
            ProposalStatus::Won => "Concluído com sucesso",
            ProposalStatus::Lost => "Encerrado por falta de interesse",
        }
    }

    /// Único status em que plano e valor existem.
    pub fn is_won(self) -> bool {
        self == ProposalStatus::Won
    }
}

// --- HISTÓRICO DE DESCRIÇÕES ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDescription {
    pub id: Uuid,
    #[serde(skip)]
    pub proposal_id: Uuid,
    #[schema(example = "Cliente pediu nova visita técnica")]
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Log de descrições: só cresce, nunca é editado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct DescriptionLog(Vec<ProposalDescription>);

impl DescriptionLog {
    fn push(&mut self, proposal_id: Uuid, text: &str, now: DateTime<Utc>) -> ProposalDescription {
        let entry = ProposalDescription {
            id: Uuid::new_v4(),
            proposal_id,
            text: text.trim().to_string(),
            created_at: now,
        };
        self.0.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[ProposalDescription] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// --- PROPOSTA ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    pub seller_id: Uuid,

    #[schema(example = "Fibra Norte Telecom")]
    pub provider: String,
    #[schema(example = "5511999998888")]
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub responsible_name: Option<String>,

    // Status, plano e valor só mudam por `apply_update`.
    status: ProposalStatus,
    #[schema(example = "Fibra 500")]
    plan: Option<String>,
    #[schema(value_type = Option<f64>, example = 199.90)]
    value: Option<Decimal>,

    #[sqlx(skip)]
    descriptions: DescriptionLog,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados de criação (formulário "Nova Proposta")
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProposal {
    #[validate(length(min = 1, message = "O provedor é obrigatório."))]
    #[schema(example = "Fibra Norte Telecom")]
    pub provider: String,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub responsible_name: Option<String>,
    #[schema(example = "Primeiro contato por indicação")]
    pub description: Option<String>,
}

// Dados de edição (formulário "Editar Proposta")
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposalUpdate {
    #[validate(length(min = 1, message = "O provedor é obrigatório."))]
    pub provider: String,
    pub whatsapp: Option<String>,
    pub email: Option<String>,
    pub responsible_name: Option<String>,
    pub status: ProposalStatus,
    #[schema(example = "Fibra 500")]
    pub plan: Option<String>,
    #[schema(value_type = Option<f64>, example = 199.90)]
    pub value: Option<Decimal>,
    pub new_description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppendDescriptionPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub text: String,
}

impl Proposal {
    /// Cria uma proposta em "Inicio". A descrição inicial, se houver,
    /// vira a primeira entrada do histórico.
    pub fn open(seller_id: Uuid, input: NewProposal, now: DateTime<Utc>) -> Result<Self, AppError> {
        let provider = required_text("provider", &input.provider, "O provedor é obrigatório.")?;
        let id = Uuid::new_v4();

        let mut descriptions = DescriptionLog::default();
        if let Some(text) = non_blank(input.description) {
            descriptions.push(id, &text, now);
        }

        Ok(Self {
            id,
            seller_id,
            provider,
            whatsapp: non_blank(input.whatsapp),
            email: non_blank(input.email),
            responsible_name: non_blank(input.responsible_name),
            status: ProposalStatus::Started,
            plan: None,
            value: None,
            descriptions,
            created_at: now,
            updated_at: now,
        })
    }

    /// Edita a proposta aplicando a regra de fechamento:
    /// - indo para "Concluído com sucesso", plano e valor (>= 0) são obrigatórios;
    /// - em qualquer outro status, plano e valor são apagados.
    ///
    /// Em caso de erro nada é alterado. Retorna a nova descrição, se houver.
    pub fn apply_update(
        &mut self,
        update: ProposalUpdate,
        now: DateTime<Utc>,
    ) -> Result<Option<ProposalDescription>, AppError> {
        let provider = required_text("provider", &update.provider, "O provedor é obrigatório.")?;
        let (plan, value) = resolve_closing(update.status, update.plan, update.value)?;

        self.provider = provider;
        self.whatsapp = non_blank(update.whatsapp);
        self.email = non_blank(update.email);
        self.responsible_name = non_blank(update.responsible_name);
        self.status = update.status;
        self.plan = plan;
        self.value = value;
        self.updated_at = now;

        let appended = non_blank(update.new_description)
            .map(|text| self.descriptions.push(self.id, &text, now));

        Ok(appended)
    }

    /// Acrescenta uma descrição sem tocar em status, plano ou valor.
    pub fn append_description(
        &mut self,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<ProposalDescription, AppError> {
        let text = required_text("text", text, "A descrição é obrigatória.")?;
        let entry = self.descriptions.push(self.id, &text, now);
        self.updated_at = now;
        Ok(entry)
    }

    // Usado pelo repositório ao montar a proposta lida do banco.
    pub(crate) fn with_descriptions(mut self, entries: Vec<ProposalDescription>) -> Self {
        self.descriptions = DescriptionLog(entries);
        self
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn descriptions(&self) -> &DescriptionLog {
        &self.descriptions
    }
}

fn resolve_closing(
    status: ProposalStatus,
    plan: Option<String>,
    value: Option<Decimal>,
) -> Result<(Option<String>, Option<Decimal>), AppError> {
    if !status.is_won() {
        return Ok((None, None));
    }

    let plan = non_blank(plan).ok_or_else(|| AppError::validation("plan", CLOSING_FIELDS_REQUIRED))?;
    let value = value.ok_or_else(|| AppError::validation("value", CLOSING_FIELDS_REQUIRED))?;

    if value < Decimal::ZERO {
        return Err(AppError::validation("value", "O valor não pode ser negativo."));
    }

    let value = value.round_dp(2);
    if value > max_money_value() {
        return Err(AppError::validation("value", "O valor excede o limite permitido."));
    }

    Ok((Some(plan), Some(value)))
}

fn required_text(field: &'static str, raw: &str, message: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, message));
    }
    Ok(trimmed.to_string())
}

// Campos opcionais em branco viram ausentes (o formulário manda "").
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn new_proposal() -> NewProposal {
        NewProposal {
            provider: "Fibra Norte".into(),
            whatsapp: Some("5511999998888".into()),
            email: Some("".into()),
            responsible_name: None,
            description: Some("Primeiro contato".into()),
        }
    }

    fn update_to(status: ProposalStatus, plan: Option<&str>, value: Option<Decimal>) -> ProposalUpdate {
        ProposalUpdate {
            provider: "Fibra Norte".into(),
            whatsapp: Some("5511999998888".into()),
            email: None,
            responsible_name: Some("Carlos".into()),
            status,
            plan: plan.map(str::to_string),
            value,
            new_description: None,
        }
    }

    fn invariant_holds(p: &Proposal) -> bool {
        let closed = p.plan().is_some() && p.value().is_some_and(|v| v >= Decimal::ZERO);
        p.status().is_won() == closed
    }

    #[test]
    fn open_starts_in_inicio_with_initial_description() {
        let now = Utc::now();
        let seller = Uuid::new_v4();
        let p = Proposal::open(seller, new_proposal(), now).unwrap();

        assert_eq!(p.status(), ProposalStatus::Started);
        assert_eq!(p.seller_id, seller);
        assert_eq!(p.descriptions().len(), 1);
        assert_eq!(p.descriptions().entries()[0].text, "Primeiro contato");
        assert_eq!(p.created_at, now);
        assert_eq!(p.updated_at, now);
        assert_eq!(p.email, None);
        assert!(invariant_holds(&p));
    }

    #[test]
    fn open_rejects_blank_provider() {
        let input = NewProposal { provider: "   ".into(), ..Default::default() };
        assert!(Proposal::open(Uuid::new_v4(), input, Utc::now()).is_err());
    }

    #[test]
    fn closing_and_reopening_scenario() {
        let t0 = Utc::now();
        let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), t0).unwrap();

        let t1 = t0 + Duration::minutes(5);
        p.apply_update(update_to(ProposalStatus::Won, Some("Fibra 500"), Some(dec("199.90"))), t1)
            .unwrap();
        assert_eq!(p.status(), ProposalStatus::Won);
        assert_eq!(p.plan(), Some("Fibra 500"));
        assert_eq!(p.value(), Some(dec("199.90")));
        assert_eq!(p.updated_at, t1);
        assert!(invariant_holds(&p));

        let t2 = t1 + Duration::minutes(5);
        p.apply_update(
            update_to(ProposalStatus::Negotiating, Some("Fibra 500"), Some(dec("199.90"))),
            t2,
        )
        .unwrap();
        assert_eq!(p.status(), ProposalStatus::Negotiating);
        assert_eq!(p.plan(), None);
        assert_eq!(p.value(), None);
        assert_eq!(p.updated_at, t2);
        assert!(invariant_holds(&p));
    }

    #[test]
    fn closing_without_plan_or_value_fails_without_mutation() {
        let t0 = Utc::now();
        let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), t0).unwrap();
        let before = p.clone();

        for update in [
            update_to(ProposalStatus::Won, None, Some(dec("10"))),
            update_to(ProposalStatus::Won, Some("  "), Some(dec("10"))),
            update_to(ProposalStatus::Won, Some("Fibra 500"), None),
            update_to(ProposalStatus::Won, Some("Fibra 500"), Some(dec("-1"))),
        ] {
            let err = p.apply_update(update, t0 + Duration::hours(1)).unwrap_err();
            assert!(matches!(err, AppError::Validation { .. }));
        }

        assert_eq!(p.status(), before.status());
        assert_eq!(p.updated_at, before.updated_at);
        assert_eq!(p.responsible_name, before.responsible_name);
        assert_eq!(p.descriptions(), before.descriptions());
    }

    #[test]
    fn closing_value_must_fit_the_column() {
        let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), Utc::now()).unwrap();
        let before = p.clone();

        for value in ["10000000000", "9999999999.995", "1000000000000000000000000000"] {
            let err = p
                .apply_update(update_to(ProposalStatus::Won, Some("Fibra 500"), Some(dec(value))), Utc::now())
                .unwrap_err();
            assert!(matches!(err, AppError::Validation { field: "value", .. }));
        }
        assert_eq!(p.status(), before.status());

        p.apply_update(
            update_to(ProposalStatus::Won, Some("Fibra 500"), Some(max_money_value())),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(p.value(), Some(dec("9999999999.99")));
    }

    #[test]
    fn zero_value_is_a_valid_closing() {
        let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), Utc::now()).unwrap();
        p.apply_update(update_to(ProposalStatus::Won, Some("Cortesia"), Some(Decimal::ZERO)), Utc::now())
            .unwrap();
        assert!(invariant_holds(&p));
    }

    #[test]
    fn every_non_won_status_clears_closing_fields() {
        for status in ProposalStatus::ALL.into_iter().filter(|s| !s.is_won()) {
            let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), Utc::now()).unwrap();
            p.apply_update(update_to(ProposalStatus::Won, Some("Fibra 500"), Some(dec("99"))), Utc::now())
                .unwrap();
            p.apply_update(update_to(status, Some("Outro"), Some(dec("1"))), Utc::now())
                .unwrap();
            assert_eq!(p.plan(), None, "status {}", status.label());
            assert_eq!(p.value(), None, "status {}", status.label());
        }
    }

    #[test]
    fn descriptions_only_grow_and_keep_their_content() {
        let t0 = Utc::now();
        let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), t0).unwrap();
        let first = p.descriptions().entries()[0].clone();

        let mut update = update_to(ProposalStatus::AlmostClosing, None, None);
        update.new_description = Some("Enviada proposta revisada".into());
        let appended = p.apply_update(update, t0 + Duration::minutes(1)).unwrap();
        assert!(appended.is_some());

        let entry = p.append_description("Ligou de volta", t0 + Duration::minutes(2)).unwrap();
        assert_eq!(entry.proposal_id, p.id);

        assert_eq!(p.descriptions().len(), 3);
        assert_eq!(p.descriptions().entries()[0], first);
        assert_eq!(p.descriptions().entries()[2].text, "Ligou de volta");
        assert_eq!(p.status(), ProposalStatus::AlmostClosing);
    }

    #[test]
    fn blank_new_description_is_not_appended() {
        let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), Utc::now()).unwrap();
        let mut update = update_to(ProposalStatus::Negotiating, None, None);
        update.new_description = Some("   ".into());
        assert!(p.apply_update(update, Utc::now()).unwrap().is_none());
        assert_eq!(p.descriptions().len(), 1);
        assert!(p.append_description("", Utc::now()).is_err());
    }

    #[test]
    fn append_description_keeps_closing_fields() {
        let mut p = Proposal::open(Uuid::new_v4(), new_proposal(), Utc::now()).unwrap();
        p.apply_update(update_to(ProposalStatus::Won, Some("Fibra 500"), Some(dec("199.90"))), Utc::now())
            .unwrap();
        p.append_description("Contrato assinado", Utc::now()).unwrap();
        assert_eq!(p.plan(), Some("Fibra 500"));
        assert_eq!(p.value(), Some(dec("199.90")));
    }

    #[test]
    fn status_labels_serialize_in_portuguese() {
        let json = serde_json::to_string(&ProposalStatus::AlmostClosing).unwrap();
        assert_eq!(json, "\"Quase fechando\"");
        let parsed: ProposalStatus = serde_json::from_str("\"Concluído com sucesso\"").unwrap();
        assert_eq!(parsed, ProposalStatus::Won);
    }
}
