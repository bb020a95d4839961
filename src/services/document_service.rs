// src/services/document_service.rs

use std::path::PathBuf;

use chrono::NaiveDate;
use genpdf::{elements, style, Element};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    common::error::AppError,
    models::document::{
        find_plan_template, plan_catalog, AddOnPricing, ComposeProposalRequest, DocumentFormat,
        PlanPricing, PlanTemplate, PriceLine,
    },
    models::proposal::max_money_value,
};

const NO_FIXED_FEE: &str = "Sem mensalidade fixa";

/// Uma seção da proposta, na ordem em que é impressa.
#[derive(Debug, Clone, PartialEq)]
pub struct DocSection {
    pub heading: Option<String>,
    pub lines: Vec<String>,
    pub bulleted: bool,
}

impl DocSection {
    fn titled(heading: &str, lines: Vec<String>) -> Self {
        Self { heading: Some(heading.to_string()), lines, bulleted: false }
    }

    fn bullets(heading: &str, lines: Vec<String>) -> Self {
        Self { heading: Some(heading.to_string()), lines, bulleted: true }
    }

    fn plain(lines: Vec<String>) -> Self {
        Self { heading: None, lines, bulleted: false }
    }
}

/// Proposta montada, independente do formato de saída.
#[derive(Debug, Clone)]
pub struct ComposedProposal {
    pub title: String,
    pub file_stem: String,
    pub base_price: Decimal,
    pub final_price: Decimal,
    pub header: DocSection,
    pub body: Vec<DocSection>,
    pub footer: DocSection,
}

#[derive(Debug)]
pub struct RenderedDocument {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>) -> Self {
        Self { fonts_dir: fonts_dir.into() }
    }

    pub fn list_templates(&self) -> Vec<PlanTemplate> {
        plan_catalog()
    }

    /// Monta e renderiza a proposta. Nada é persistido: ou sai o arquivo
    /// inteiro, ou sai um erro.
    pub fn generate(
        &self,
        request: &ComposeProposalRequest,
        issued_on: NaiveDate,
    ) -> Result<RenderedDocument, AppError> {
        let composed = compose(request, issued_on)?;
        let file_name = format!("{}.{}", composed.file_stem, request.format.extension());

        let bytes = match request.format {
            DocumentFormat::Txt => render_text(&composed).into_bytes(),
            DocumentFormat::Pdf => self.render_pdf(&composed)?,
        };

        tracing::info!("📄 Proposta '{}' gerada ({} bytes)", file_name, bytes.len());

        Ok(RenderedDocument {
            file_name,
            content_type: request.format.content_type(),
            bytes,
        })
    }

    fn render_pdf(&self, composed: &ComposedProposal) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada (Roboto-Regular.ttf, Roboto-Bold.ttf, ...)
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None).map_err(|_| {
            AppError::FontNotFound(format!(
                "Fonte não encontrada na pasta {}",
                self.fonts_dir.display()
            ))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(composed.title.clone());
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        for line in &composed.header.lines {
            doc.push(
                elements::Paragraph::new(line.clone())
                    .styled(style::Style::new().bold().with_font_size(16)),
            );
        }
        doc.push(elements::Break::new(1.5));

        // --- CORPO ---
        let style_heading = style::Style::new().bold().with_font_size(12);
        for section in &composed.body {
            if let Some(heading) = &section.heading {
                doc.push(elements::Paragraph::new(heading.clone()).styled(style_heading));
            }

            if section.bulleted {
                let mut list = elements::UnorderedList::new();
                for line in &section.lines {
                    list.push(elements::Paragraph::new(line.clone()));
                }
                doc.push(list);
            } else {
                for line in &section.lines {
                    doc.push(elements::Paragraph::new(line.clone()));
                }
            }
            doc.push(elements::Break::new(1));
        }

        // --- RODAPÉ ---
        doc.push(elements::Break::new(1));
        for line in &composed.footer.lines {
            doc.push(
                elements::Paragraph::new(line.clone())
                    .styled(style::Style::new().italic().with_font_size(8)),
            );
        }

        // Renderiza para Buffer (Memória)
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::DocumentRender(e.to_string()))?;

        Ok(buffer)
    }
}

/// `base × (1 − desconto/100)`, arredondado em centavos.
pub fn final_price(base_price: Decimal, discount: Decimal) -> Decimal {
    let factor = Decimal::ONE - discount / Decimal::ONE_HUNDRED;
    round_cents(base_price * factor)
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn money(value: Decimal) -> String {
    format!("R$ {:.2}", round_cents(value))
}

fn br_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn price_lines(items: &[PriceLine]) -> Vec<String> {
    items.iter().map(|i| format!("{}: {}", i.label, i.price)).collect()
}

/// `Proposta_<empresa>_<plano com espaços trocados por _>`
pub fn file_stem(company_name: &str, plan_name: &str) -> String {
    let plan = plan_name.split_whitespace().collect::<Vec<_>>().join("_");
    let company: String = company_name
        .trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '/' | '\\') && !c.is_control())
        .collect();
    format!("Proposta_{}_{}", company, plan)
}

/// Cabeçalho `Content-Disposition` (RFC 6266): `filename` em ASCII para
/// clientes antigos e `filename*` com o nome original em UTF-8.
pub fn content_disposition(file_name: &str) -> String {
    let ascii: String = file_name
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();

    let mut encoded = String::with_capacity(file_name.len() * 3);
    for byte in file_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }

    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", ascii, encoded)
}

/// Valida o pedido e monta as seções na ordem fixa da proposta.
pub fn compose(
    request: &ComposeProposalRequest,
    issued_on: NaiveDate,
) -> Result<ComposedProposal, AppError> {
    let template = find_plan_template(&request.template_id)
        .ok_or(AppError::NotFound("Template de proposta"))?;

    let client = &request.client;
    if client.company_name.trim().is_empty() || client.contact_name.trim().is_empty() {
        return Err(AppError::validation(
            "client",
            "Preencha pelo menos o nome da empresa e contato",
        ));
    }

    let discount = request.discount;
    if discount < Decimal::ZERO || discount > Decimal::ONE_HUNDRED {
        return Err(AppError::validation("discount", "O desconto deve estar entre 0 e 100."));
    }

    // Plano personalizado: preço, franquia e adicionais substituem os do template
    let (pricing, quota, add_ons) = if template.custom {
        let custom = request.custom.clone().unwrap_or_default();
        let monthly_value = custom.monthly_value.ok_or_else(|| {
            AppError::validation("custom.monthlyValue", "Informe o valor mensal do plano personalizado.")
        })?;
        if monthly_value < Decimal::ZERO {
            return Err(AppError::validation("custom.monthlyValue", "O valor mensal não pode ser negativo."));
        }
        if monthly_value > max_money_value() {
            return Err(AppError::validation("custom.monthlyValue", "O valor mensal excede o limite permitido."));
        }
        let quota = non_blank(custom.quota.as_deref())
            .ok_or_else(|| {
                AppError::validation("custom.quota", "Informe a franquia do plano personalizado.")
            })?
            .to_string();

        (
            PlanPricing::Monthly { base_price: monthly_value },
            Some(quota),
            custom.add_ons.filter(|a| !a.items.is_empty()),
        )
    } else {
        (template.pricing.clone(), template.quota.clone(), template.add_ons.clone())
    };

    let base_price = pricing.base_price();
    let final_value = if base_price > Decimal::ZERO {
        final_price(base_price, discount)
    } else {
        Decimal::ZERO
    };

    let header = DocSection::plain(vec![format!("PROPOSTA COMERCIAL - {}", template.name)]);

    let mut body = Vec::new();

    body.push(DocSection::titled(
        "DADOS DO CLIENTE",
        vec![
            format!("Empresa: {}", client.company_name.trim()),
            format!("Contato: {}", client.contact_name.trim()),
            format!("E-mail: {}", client.email.trim()),
            format!("Telefone: {}", client.phone.trim()),
            format!("Endereço: {}", client.address.trim()),
        ],
    ));

    body.push(DocSection::titled("DESCRIÇÃO DO SERVIÇO", vec![template.description.clone()]));

    body.push(DocSection::bullets("RECURSOS INCLUSOS", template.features.clone()));

    if let Some(quota) = quota {
        body.push(DocSection::titled("FRANQUIA", vec![quota]));
    }

    if let Some(add_ons) = add_ons.as_ref() {
        body.push(add_on_section(add_ons));
    }

    if let Some(extra) = non_blank(request.additional_features.as_deref()) {
        body.push(DocSection::titled(
            "RECURSOS ADICIONAIS",
            extra.lines().map(str::to_string).collect(),
        ));
    }

    body.push(investment_section(&pricing, discount, base_price, final_value));

    if let Some(observations) = non_blank(request.observations.as_deref()) {
        body.push(DocSection::titled(
            "OBSERVAÇÕES",
            observations.lines().map(str::to_string).collect(),
        ));
    }

    if let Some(valid_until) = request.valid_until {
        body.push(DocSection::plain(vec![format!(
            "Proposta válida até: {}",
            br_date(valid_until)
        )]));
    }

    let footer = DocSection::plain(vec![
        "Proposta gerada pelo CRM PingDesk".to_string(),
        format!("Data: {}", br_date(issued_on)),
    ]);

    Ok(ComposedProposal {
        title: format!("Proposta - {}", template.name),
        file_stem: file_stem(&client.company_name, &template.name),
        base_price,
        final_price: final_value,
        header,
        body,
        footer,
    })
}

fn add_on_section(add_ons: &AddOnPricing) -> DocSection {
    DocSection::bullets(add_ons.heading(), price_lines(&add_ons.items))
}

fn investment_section(
    pricing: &PlanPricing,
    discount: Decimal,
    base_price: Decimal,
    final_value: Decimal,
) -> DocSection {
    if base_price <= Decimal::ZERO {
        // Sem mensalidade: só as tarifas por evento, sem linha de desconto
        let mut lines = vec![NO_FIXED_FEE.to_string()];
        if let PlanPricing::PerEvent { rates } = pricing {
            lines.extend(price_lines(rates));
        }
        return DocSection::titled("INVESTIMENTO", lines);
    }

    let mut lines = vec![format!("Valor base: {}", money(base_price))];
    if discount > Decimal::ZERO {
        // Diferença já arredondada entre base e final
        let discount_value = base_price - final_value;
        lines.push(format!(
            "Desconto ({}%): - {}",
            discount.normalize(),
            money(discount_value)
        ));
    }
    lines.push(format!("Valor final: {}", money(final_value)));

    DocSection::titled("INVESTIMENTO", lines)
}

/// Versão em texto puro, seção por seção.
pub fn render_text(composed: &ComposedProposal) -> String {
    let mut blocks: Vec<String> = Vec::new();

    let section_text = |section: &DocSection| {
        let mut out = Vec::new();
        if let Some(heading) = &section.heading {
            out.push(format!("{}:", heading));
        }
        for line in &section.lines {
            if section.bulleted {
                out.push(format!("• {}", line));
            } else {
                out.push(line.clone());
            }
        }
        out.join("\n")
    };

    blocks.push(section_text(&composed.header));
    for section in &composed.body {
        blocks.push(section_text(section));
    }
    blocks.push(format!("---\n{}", section_text(&composed.footer)));

    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::{ClientInfo, CustomPlanFields, CUSTOM_PLAN_ID};

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn request(template_id: &str, discount: &str) -> ComposeProposalRequest {
        ComposeProposalRequest {
            template_id: template_id.into(),
            client: ClientInfo {
                company_name: "Fibra Norte".into(),
                contact_name: "Carlos Andrade".into(),
                email: "carlos@fibranorte.com.br".into(),
                phone: "(11) 99999-9999".into(),
                address: "Rua das Flores, 123".into(),
            },
            discount: dec(discount),
            ..Default::default()
        }
    }

    fn headings(composed: &ComposedProposal) -> Vec<String> {
        composed.body.iter().filter_map(|s| s.heading.clone()).collect()
    }

    fn investment(composed: &ComposedProposal) -> &DocSection {
        composed
            .body
            .iter()
            .find(|s| s.heading.as_deref() == Some("INVESTIMENTO"))
            .unwrap()
    }

    #[test]
    fn final_price_applies_the_discount() {
        assert_eq!(final_price(dec("5000"), dec("10")), dec("4500.00"));
        assert_eq!(final_price(dec("79.90"), dec("0")), dec("79.90"));
        assert_eq!(final_price(dec("149.90"), dec("100")), dec("0.00"));
        assert_eq!(final_price(dec("199.90"), dec("15")), dec("169.92"));
    }

    #[test]
    fn ten_percent_off_five_thousand() {
        let composed = compose(&request("link-dedicado", "10"), today()).unwrap();
        assert_eq!(composed.base_price, dec("5000.00"));
        assert_eq!(composed.final_price, dec("4500.00"));

        let lines = &investment(&composed).lines;
        assert_eq!(lines[0], "Valor base: R$ 5000.00");
        assert_eq!(lines[1], "Desconto (10%): - R$ 500.00");
        assert_eq!(lines[2], "Valor final: R$ 4500.00");
    }

    #[test]
    fn zero_discount_has_no_discount_line() {
        let composed = compose(&request("internet-basico", "0"), today()).unwrap();
        let lines = &investment(&composed).lines;
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| !l.starts_with("Desconto")));
        assert_eq!(lines[1], "Valor final: R$ 79.90");
    }

    #[test]
    fn per_event_template_uses_no_fixed_fee_label() {
        let composed = compose(&request("monitoramento-sob-demanda", "25"), today()).unwrap();
        let lines = &investment(&composed).lines;

        assert_eq!(lines[0], NO_FIXED_FEE);
        assert!(lines.contains(&"Alerta de indisponibilidade: R$ 0,50 por evento".to_string()));
        assert!(lines.iter().all(|l| !l.contains("Desconto") && !l.contains("Valor final")));
        assert_eq!(composed.final_price, Decimal::ZERO);
    }

    #[test]
    fn sections_follow_the_fixed_order() {
        let mut req = request("atendimento-franquia", "5");
        req.additional_features = Some("Treinamento da equipe".into());
        req.observations = Some("Pagamento via boleto".into());
        req.valid_until = Some(NaiveDate::from_ymd_opt(2026, 11, 30).unwrap());

        let composed = compose(&req, today()).unwrap();
        assert_eq!(
            headings(&composed),
            vec![
                "DADOS DO CLIENTE",
                "DESCRIÇÃO DO SERVIÇO",
                "RECURSOS INCLUSOS",
                "FRANQUIA",
                "VALORES ADICIONAIS (por evento)",
                "RECURSOS ADICIONAIS",
                "INVESTIMENTO",
                "OBSERVAÇÕES",
            ]
        );
        let last = composed.body.last().unwrap();
        assert_eq!(last.lines, vec!["Proposta válida até: 30/11/2026"]);
        assert_eq!(composed.footer.lines[1], "Data: 19/10/2026");
    }

    #[test]
    fn flat_rate_add_ons_are_labelled_as_such() {
        let composed = compose(&request("link-dedicado", "0"), today()).unwrap();
        assert!(headings(&composed).contains(&"VALORES ADICIONAIS (tarifa fixa)".to_string()));
        assert!(!headings(&composed).contains(&"FRANQUIA".to_string()));
    }

    #[test]
    fn custom_plan_requires_value_and_quota() {
        let mut req = request(CUSTOM_PLAN_ID, "0");
        assert!(matches!(compose(&req, today()), Err(AppError::Validation { field: "custom.monthlyValue", .. })));

        req.custom = Some(CustomPlanFields {
            monthly_value: Some(dec("5000")),
            quota: Some("   ".into()),
            add_ons: None,
        });
        assert!(matches!(compose(&req, today()), Err(AppError::Validation { field: "custom.quota", .. })));
    }

    #[test]
    fn custom_plan_replaces_template_figures() {
        let mut req = request(CUSTOM_PLAN_ID, "10");
        req.custom = Some(CustomPlanFields {
            monthly_value: Some(dec("5000")),
            quota: Some("Franquia de 500 GB".into()),
            add_ons: Some(AddOnPricing::per_event(vec![PriceLine::new("GB excedente", "R$ 2,00 por GB")])),
        });

        let composed = compose(&req, today()).unwrap();
        assert_eq!(composed.final_price, dec("4500.00"));
        let quota = composed.body.iter().find(|s| s.heading.as_deref() == Some("FRANQUIA")).unwrap();
        assert_eq!(quota.lines, vec!["Franquia de 500 GB"]);
        assert!(headings(&composed).contains(&"VALORES ADICIONAIS (por evento)".to_string()));
    }

    #[test]
    fn custom_plan_value_is_capped() {
        let mut req = request(CUSTOM_PLAN_ID, "100");
        req.custom = Some(CustomPlanFields {
            monthly_value: Some(dec("1000000000000000000000000000")),
            quota: Some("Franquia de 500 GB".into()),
            add_ons: None,
        });
        assert!(matches!(compose(&req, today()), Err(AppError::Validation { field: "custom.monthlyValue", .. })));

        req.discount = dec("50");
        req.custom.as_mut().unwrap().monthly_value = Some(dec("9999999999.99"));
        let composed = compose(&req, today()).unwrap();
        let lines = &investment(&composed).lines;
        assert_eq!(lines[1], "Desconto (50%): - R$ 4999999999.99");
        assert_eq!(lines[2], "Valor final: R$ 5000000000.00");
    }

    #[test]
    fn discount_line_and_final_value_add_up_to_the_base() {
        let composed = compose(&request("internet-premium", "15"), today()).unwrap();
        assert_eq!(composed.base_price, dec("149.90"));
        let lines = &investment(&composed).lines;
        assert_eq!(lines[1], "Desconto (15%): - R$ 22.48");
        assert_eq!(lines[2], "Valor final: R$ 127.42");
    }

    #[test]
    fn rejects_missing_client_names_and_bad_discount() {
        let mut req = request("internet-basico", "0");
        req.client.contact_name = " ".into();
        assert!(compose(&req, today()).is_err());

        for discount in ["-1", "100.01"] {
            let req = request("internet-basico", discount);
            assert!(matches!(compose(&req, today()), Err(AppError::Validation { field: "discount", .. })));
        }
    }

    #[test]
    fn unknown_template_is_not_found() {
        assert!(matches!(compose(&request("nao-existe", "0"), today()), Err(AppError::NotFound(_))));
    }

    #[test]
    fn file_name_replaces_whitespace_in_plan_name() {
        assert_eq!(
            file_stem("Fibra Norte", "Internet Banda Larga - Premium"),
            "Proposta_Fibra Norte_Internet_Banda_Larga_-_Premium"
        );
    }

    #[test]
    fn file_name_drops_characters_that_break_the_header() {
        assert_eq!(file_stem("ACME \"Telecom\"/SP", "Plano"), "Proposta_ACME TelecomSP_Plano");
    }

    #[test]
    fn attachment_header_keeps_accented_names() {
        assert_eq!(
            content_disposition("Proposta_Fibra Norte_Internet_Banda_Larga_-_Básico.txt"),
            "attachment; filename=\"Proposta_Fibra Norte_Internet_Banda_Larga_-_B_sico.txt\"; \
             filename*=UTF-8''Proposta_Fibra%20Norte_Internet_Banda_Larga_-_B%C3%A1sico.txt"
        );
    }

    #[test]
    fn text_rendering_is_deterministic_and_complete() {
        let mut req = request("internet-premium", "10");
        req.observations = Some("Instalação em até 5 dias".into());
        let composed = compose(&req, today()).unwrap();

        let text = render_text(&composed);
        assert_eq!(text, render_text(&composed));
        assert!(text.starts_with("PROPOSTA COMERCIAL - Internet Banda Larga - Premium\n\nDADOS DO CLIENTE:\nEmpresa: Fibra Norte"));
        assert!(text.contains("RECURSOS INCLUSOS:\n• Velocidade de 500 Mbps\n"));
        assert!(text.contains("Valor final: R$ 134.91"));
        assert!(text.contains("OBSERVAÇÕES:\nInstalação em até 5 dias"));
        assert!(text.ends_with("---\nProposta gerada pelo CRM PingDesk\nData: 19/10/2026\n"));
    }

    #[test]
    fn generate_text_document_names_the_file() {
        let service = DocumentService::new("./fonts");
        let doc = service.generate(&request("internet-basico", "0"), today()).unwrap();
        assert_eq!(doc.file_name, "Proposta_Fibra Norte_Internet_Banda_Larga_-_Básico.txt");
        assert_eq!(doc.content_type, "text/plain; charset=utf-8");
        assert!(!doc.bytes.is_empty());
    }

    #[test]
    fn pdf_without_fonts_fails_cleanly() {
        let service = DocumentService::new("/caminho/que/nao/existe");
        let mut req = request("internet-basico", "0");
        req.format = DocumentFormat::Pdf;
        assert!(matches!(service.generate(&req, today()), Err(AppError::FontNotFound(_))));
    }
}
