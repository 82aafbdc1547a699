// Model exports
pub mod domain;
mod lenient;
pub mod requests;
pub mod responses;

pub use domain::{Coordinate, HospitalRecord, HospitalRow, NearbyFacility, PatientProfile, PriorityTier, ScoredHospital, ScoringWeights};
pub use requests::{NearbyQuery, ReferralRequest, RequestLocation};
pub use responses::{DatabaseHospital, ErrorResponse, HealthResponse, NearbyHospitalsResponse, NearbyQueryEcho, OsmHospital, RecommendedHospital, ReferralRecord};
