pub mod access;
pub mod auth;
pub mod dashboard;
pub mod document;
pub mod lead;
pub mod meeting;
pub mod proposal;
