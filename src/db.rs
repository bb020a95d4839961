pub mod user_repo;
pub use user_repo::UserRepository;
pub mod proposal_repo;
pub use proposal_repo::ProposalRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod meeting_repo;
pub use meeting_repo::MeetingRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
