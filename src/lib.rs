//! Jeevan-Setu - hospital referral recommendation service
//!
//! The core ranks a fixed hospital catalog for a patient's condition and
//! location, classifies clinical urgency, and works out which insurance or
//! welfare schemes the patient can use at the recommended hospitals.
//! Everything in [`core`] is pure and synchronous; the HTTP surface and the
//! external collaborators live in [`routes`] and [`services`].

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{classify_priority, eligible_schemes, haversine_distance, rank, Ranker};
pub use crate::models::{Coordinate, HospitalRecord, PatientProfile, PriorityTier, ScoredHospital, ScoringWeights};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let ranked = rank(&[HospitalRecord::new("H", 14.0, 77.0)], None, "Cardiology", 5);
        assert_eq!(ranked.len(), 1);
        assert_eq!(classify_priority("Cardiology"), PriorityTier::High);
    }
}
