pub mod analytics;
pub mod campaign;
pub mod delivery;
pub mod lead;
pub mod property;
