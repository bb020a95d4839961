pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod leads;
pub mod meetings;
pub mod proposals;
pub mod users;
