// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::logout,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Proposals ---
        handlers::proposals::list_proposals,
        handlers::proposals::create_proposal,
        handlers::proposals::get_proposal,
        handlers::proposals::update_proposal,
        handlers::proposals::delete_proposal,
        handlers::proposals::append_description,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::create_lead,
        handlers::leads::delete_lead,
        handlers::leads::proposal_draft,

        // --- Meetings ---
        handlers::meetings::list_meetings,
        handlers::meetings::schedule_meeting,
        handlers::meetings::delete_meeting,
        handlers::meetings::upcoming_meetings,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Documents ---
        handlers::documents::list_templates,
        handlers::documents::generate_proposal_document,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,

            // --- Proposals ---
            models::proposal::ProposalStatus,
            models::proposal::ProposalDescription,
            models::proposal::DescriptionLog,
            models::proposal::Proposal,
            models::proposal::NewProposal,
            models::proposal::ProposalUpdate,
            models::proposal::AppendDescriptionPayload,

            // --- Leads ---
            models::lead::Lead,
            models::lead::CreateLeadPayload,
            models::lead::ProposalDraft,

            // --- Meetings ---
            models::meeting::MeetingKind,
            models::meeting::Meeting,
            models::meeting::ScheduleMeetingPayload,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Documents ---
            models::document::PlanCategory,
            models::document::PriceLine,
            models::document::PlanPricing,
            models::document::AddOnKind,
            models::document::AddOnPricing,
            models::document::PlanTemplate,
            models::document::DocumentFormat,
            models::document::ClientInfo,
            models::document::CustomPlanFields,
            models::document::ComposeProposalRequest,
        )
    ),
    tags(
        (name = "Auth", description = "Login e Logout"),
        (name = "Users", description = "Vendedores e Administradores"),
        (name = "Proposals", description = "Ciclo de Vida das Propostas"),
        (name = "Leads", description = "Leads de Provedores"),
        (name = "Meetings", description = "Agenda de Reuniões"),
        (name = "Dashboard", description = "Indicadores do Painel"),
        (name = "Documents", description = "Montagem de Propostas Comerciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
