pub mod campaign_repo;
pub use campaign_repo::CampaignRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod delivery_repo;
pub use delivery_repo::DeliveryRepository;
