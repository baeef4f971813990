pub mod campaigns;
pub mod delivery;
pub mod leads;
