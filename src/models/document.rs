// src/models/document.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// --- CATÁLOGO DE PLANOS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlanCategory {
    Internet,
    Telefonia,
    Tv,
    Pacote,
    Servicos,
}

/// Linha de preço exibida literalmente (ex: "R$ 0,35 por atendimento").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceLine {
    #[schema(example = "Atendimento excedente")]
    pub label: String,
    #[schema(example = "R$ 0,35 por atendimento")]
    pub price: String,
}

impl PriceLine {
    pub fn new(label: &str, price: &str) -> Self {
        Self { label: label.to_string(), price: price.to_string() }
    }
}

/// Mensalidade fixa OU cobrança por evento, nunca as duas.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PlanPricing {
    Monthly {
        #[schema(value_type = f64, example = 149.90)]
        base_price: Decimal,
    },
    PerEvent {
        rates: Vec<PriceLine>,
    },
}

impl PlanPricing {
    /// Preço base para o cálculo do desconto (0 quando é por evento).
    pub fn base_price(&self) -> Decimal {
        match self {
            PlanPricing::Monthly { base_price } => *base_price,
            PlanPricing::PerEvent { .. } => Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AddOnKind {
    FlatRate,
    PerEvent,
}

/// Adicionais com tarifa fixa OU por evento, exclusivos por template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddOnPricing {
    pub kind: AddOnKind,
    pub items: Vec<PriceLine>,
}

impl AddOnPricing {
    pub fn flat_rate(items: Vec<PriceLine>) -> Self {
        Self { kind: AddOnKind::FlatRate, items }
    }

    pub fn per_event(items: Vec<PriceLine>) -> Self {
        Self { kind: AddOnKind::PerEvent, items }
    }

    pub fn heading(&self) -> &'static str {
        match self.kind {
            AddOnKind::FlatRate => "VALORES ADICIONAIS (tarifa fixa)",
            AddOnKind::PerEvent => "VALORES ADICIONAIS (por evento)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanTemplate {
    #[schema(example = "internet-premium")]
    pub id: String,
    #[schema(example = "Internet Banda Larga - Premium")]
    pub name: String,
    pub description: String,
    pub category: PlanCategory,
    pub features: Vec<String>,
    pub pricing: PlanPricing,
    // Franquia incluída antes da cobrança excedente
    pub quota: Option<String>,
    pub add_ons: Option<AddOnPricing>,
    // Plano personalizado: preço, franquia e adicionais vêm de quem pede
    pub custom: bool,
}

fn brl(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

fn features(items: &[&str]) -> Vec<String> {
    items.iter().map(|f| f.to_string()).collect()
}

pub const CUSTOM_PLAN_ID: &str = "plano-personalizado";

/// Templates disponíveis em "Montar Proposta".
pub fn plan_catalog() -> Vec<PlanTemplate> {
    vec![
        PlanTemplate {
            id: "internet-basico".into(),
            name: "Internet Banda Larga - Básico".into(),
            description: "Plano de internet ideal para uso residencial básico".into(),
            category: PlanCategory::Internet,
            features: features(&[
                "Velocidade de 100 Mbps",
                "Wi-Fi grátis",
                "Instalação gratuita",
                "Suporte técnico 24h",
                "Sem fidelidade",
            ]),
            pricing: PlanPricing::Monthly { base_price: brl(7990) },
            quota: None,
            add_ons: None,
            custom: false,
        },
        PlanTemplate {
            id: "internet-premium".into(),
            name: "Internet Banda Larga - Premium".into(),
            description: "Plano de internet para uso intensivo e profissional".into(),
            category: PlanCategory::Internet,
            features: features(&[
                "Velocidade de 500 Mbps",
                "Wi-Fi 6 grátis",
                "Instalação gratuita",
                "Suporte técnico 24h",
                "IP fixo incluso",
                "Roteador Premium",
                "Antivírus grátis",
            ]),
            pricing: PlanPricing::Monthly { base_price: brl(14990) },
            quota: None,
            add_ons: None,
            custom: false,
        },
        PlanTemplate {
            id: "telefonia-empresarial".into(),
            name: "Telefonia Empresarial".into(),
            description: "Solução completa de telefonia para empresas".into(),
            category: PlanCategory::Telefonia,
            features: features(&[
                "Linhas ilimitadas",
                "DDD nacional grátis",
                "Central telefônica virtual",
                "Gravação de chamadas",
                "Relatórios detalhados",
                "Suporte técnico especializado",
            ]),
            pricing: PlanPricing::Monthly { base_price: brl(19990) },
            quota: None,
            add_ons: None,
            custom: false,
        },
        PlanTemplate {
            id: "pacote-completo".into(),
            name: "Pacote Completo - Triplo Play".into(),
            description: "Internet + TV + Telefone com desconto especial".into(),
            category: PlanCategory::Pacote,
            features: features(&[
                "Internet 300 Mbps",
                "TV com 150+ canais",
                "Telefone fixo ilimitado",
                "Netflix incluso",
                "Paramount+ incluso",
                "Wi-Fi 6 grátis",
                "Instalação gratuita",
            ]),
            pricing: PlanPricing::Monthly { base_price: brl(19990) },
            quota: None,
            add_ons: None,
            custom: false,
        },
        PlanTemplate {
            id: "link-dedicado".into(),
            name: "Link Dedicado Empresarial".into(),
            description: "Link dedicado simétrico com SLA para operações críticas".into(),
            category: PlanCategory::Internet,
            features: features(&[
                "Banda simétrica de 1 Gbps",
                "SLA de 99,7%",
                "Bloco /29 de IPs fixos",
                "Monitoramento 24x7",
            ]),
            pricing: PlanPricing::Monthly { base_price: brl(500000) },
            quota: None,
            add_ons: Some(AddOnPricing::flat_rate(vec![
                PriceLine::new("Link de redundância", "R$ 890,00/mês"),
                PriceLine::new("Backup em nuvem 1 TB", "R$ 149,90/mês"),
            ])),
            custom: false,
        },
        PlanTemplate {
            id: "atendimento-franquia".into(),
            name: "Central de Atendimento - Franquia".into(),
            description: "Atendimento terceirizado ao assinante com franquia mensal".into(),
            category: PlanCategory::Servicos,
            features: features(&[
                "Atendimento por telefone e WhatsApp",
                "Abertura de chamados no seu sistema",
                "Relatório mensal de atendimentos",
            ]),
            pricing: PlanPricing::Monthly { base_price: brl(129900) },
            quota: Some("Franquia de 1.000 atendimentos por mês".into()),
            add_ons: Some(AddOnPricing::per_event(vec![
                PriceLine::new("Atendimento excedente", "R$ 1,20 por atendimento"),
                PriceLine::new("Atendimento fora do horário comercial", "R$ 2,00 por atendimento"),
            ])),
            custom: false,
        },
        PlanTemplate {
            id: "monitoramento-sob-demanda".into(),
            name: "Monitoramento de Rede - Sob Demanda".into(),
            description: "Monitoramento de equipamentos cobrado apenas pelo uso".into(),
            category: PlanCategory::Servicos,
            features: features(&[
                "Alertas por e-mail e WhatsApp",
                "Painel de disponibilidade",
                "Sem contrato mínimo",
            ]),
            pricing: PlanPricing::PerEvent {
                rates: vec![
                    PriceLine::new("Alerta de indisponibilidade", "R$ 0,50 por evento"),
                    PriceLine::new("Relatório sob demanda", "R$ 15,00 por relatório"),
                ],
            },
            quota: None,
            add_ons: None,
            custom: false,
        },
        PlanTemplate {
            id: CUSTOM_PLAN_ID.into(),
            name: "Plano Personalizado".into(),
            description: "Condições comerciais negociadas sob medida".into(),
            category: PlanCategory::Servicos,
            features: features(&[
                "Escopo definido com o cliente",
                "Suporte técnico dedicado",
            ]),
            pricing: PlanPricing::Monthly { base_price: Decimal::ZERO },
            quota: None,
            add_ons: None,
            custom: true,
        },
    ]
}

pub fn find_plan_template(id: &str) -> Option<PlanTemplate> {
    plan_catalog().into_iter().find(|t| t.id == id)
}

// --- PEDIDO DE GERAÇÃO ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Txt,
    Pdf,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Txt => "txt",
            DocumentFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            DocumentFormat::Txt => "text/plain; charset=utf-8",
            DocumentFormat::Pdf => "application/pdf",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[validate(length(min = 1, message = "O nome da empresa é obrigatório."))]
    #[schema(example = "Fibra Norte Telecom")]
    pub company_name: String,
    #[validate(length(min = 1, message = "O nome do contato é obrigatório."))]
    #[schema(example = "Carlos Andrade")]
    pub contact_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// Valores informados para o plano personalizado.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomPlanFields {
    #[schema(value_type = Option<f64>, example = 5000.0)]
    pub monthly_value: Option<Decimal>,
    #[schema(example = "Franquia de 500 GB")]
    pub quota: Option<String>,
    pub add_ons: Option<AddOnPricing>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComposeProposalRequest {
    #[schema(example = "internet-premium")]
    pub template_id: String,
    #[validate(nested)]
    pub client: ClientInfo,
    // Percentual entre 0 e 100
    #[serde(default)]
    #[schema(value_type = f64, example = 10.0)]
    pub discount: Decimal,
    pub additional_features: Option<String>,
    pub observations: Option<String>,
    #[schema(example = "2026-11-30")]
    pub valid_until: Option<NaiveDate>,
    pub custom: Option<CustomPlanFields>,
    #[serde(default)]
    pub format: DocumentFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = plan_catalog();
        let mut ids: Vec<_> = catalog.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.len());
    }

    #[test]
    fn per_event_templates_have_no_base_price() {
        for template in plan_catalog() {
            if let PlanPricing::PerEvent { rates } = &template.pricing {
                assert!(!rates.is_empty(), "{}", template.id);
                assert_eq!(template.pricing.base_price(), Decimal::ZERO);
            }
        }
    }

    #[test]
    fn custom_plan_is_in_the_catalog() {
        let custom = find_plan_template(CUSTOM_PLAN_ID).unwrap();
        assert!(custom.custom);
        assert!(find_plan_template("nao-existe").is_none());
    }

    #[test]
    fn request_defaults_to_text_without_discount() {
        let request: ComposeProposalRequest = serde_json::from_value(serde_json::json!({
            "templateId": "internet-basico",
            "client": { "companyName": "ACME", "contactName": "Ana" }
        }))
        .unwrap();
        assert_eq!(request.format, DocumentFormat::Txt);
        assert_eq!(request.discount, Decimal::ZERO);
    }
}
