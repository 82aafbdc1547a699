// Core algorithm exports
pub mod distance;
pub mod eligibility;
pub mod priority;
pub mod ranker;
pub mod scoring;

pub use distance::{distance_between, haversine_distance};
pub use eligibility::{collect_schemes, eligible_schemes, eligible_schemes_for, is_scheme_eligible, MAX_ELIGIBLE_SCHEMES};
pub use priority::classify_priority;
pub use ranker::{rank, Ranker};
pub use scoring::{calculate_hospital_score, HospitalScore};
