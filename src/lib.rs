// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_guard};

/// Monta o router completo da API.
pub fn build_router(app_state: AppState) -> Router {
    // Define as rotas de autenticação (login é público)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login)).route(
        "/logout",
        post(handlers::auth::logout).layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        )),
    );

    // Usuários: /me para todos, o resto só para administradores (RequireAdmin)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        );

    let proposal_routes = Router::new()
        .route(
            "/",
            get(handlers::proposals::list_proposals).post(handlers::proposals::create_proposal),
        )
        .route(
            "/{id}",
            get(handlers::proposals::get_proposal)
                .put(handlers::proposals::update_proposal)
                .delete(handlers::proposals::delete_proposal),
        )
        .route(
            "/{id}/descriptions",
            post(handlers::proposals::append_description),
        );

    let lead_routes = Router::new()
        .route(
            "/",
            get(handlers::leads::list_leads).post(handlers::leads::create_lead),
        )
        .route("/{id}", axum::routing::delete(handlers::leads::delete_lead))
        .route("/{id}/proposal-draft", get(handlers::leads::proposal_draft));

    let meeting_routes = Router::new()
        .route(
            "/",
            get(handlers::meetings::list_meetings).post(handlers::meetings::schedule_meeting),
        )
        .route("/upcoming", get(handlers::meetings::upcoming_meetings))
        .route("/{id}", axum::routing::delete(handlers::meetings::delete_meeting));

    let dashboard_routes = Router::new().route("/summary", get(handlers::dashboard::get_summary));

    let document_routes = Router::new()
        .route("/", post(handlers::documents::generate_proposal_document))
        .route("/templates", get(handlers::documents::list_templates));

    // Tudo que exige login passa pelo auth_guard
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/proposals", proposal_routes)
        .nest("/leads", lead_routes)
        .nest("/meetings", meeting_routes)
        .nest("/dashboard", dashboard_routes)
        .nest("/proposal-documents", document_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let api = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/auth", auth_routes)
        .merge(protected);

    // Combina tudo no router principal
    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
