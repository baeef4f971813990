pub mod analytics_service;
pub mod campaign_service;
pub mod delivery_service;
pub mod lead_service;
pub mod lifecycle_sweeper;
pub mod tracking_service;

pub use analytics_service::AnalyticsService;
pub use campaign_service::CampaignService;
pub use delivery_service::DeliveryService;
pub use lead_service::LeadService;
pub use lifecycle_sweeper::LifecycleSweeper;
pub use tracking_service::TrackingService;
