// Service exports
pub mod catalog;
pub mod explainer;
pub mod overpass;
pub mod referrals;

pub use catalog::{CatalogError, HospitalCatalog};
pub use explainer::{fallback_explanation, DisabledExplainer, ExplainerError, GeminiClient, ReferralPatient, TextExplainer};
pub use overpass::{LookupError, NearbyFacilityLookup, OverpassClient};
pub use referrals::{InMemoryReferralStore, ReferralStore};
