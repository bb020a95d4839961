pub mod auth;
pub mod dashboard_service;
pub mod document_service;
pub mod lead_service;
pub mod meeting_service;
pub mod proposal_service;
pub mod user_service;
