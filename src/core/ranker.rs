use crate::core::scoring::{calculate_hospital_score, HospitalScore};
use crate::models::{Coordinate, HospitalRecord, ScoredHospital, ScoringWeights};

/// Ranking engine - scores the whole catalog and keeps the best entries
///
/// Every hospital is scored; nothing is pruned before scoring, so a
/// low-rated but well-specialised nearby hospital stays comparable.
#[derive(Debug, Clone)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank hospitals for a condition and optional patient location
    ///
    /// # Arguments
    /// * `catalog` - The full hospital catalog, never modified
    /// * `coordinate` - Patient location, if known
    /// * `condition` - Normalized condition label
    /// * `top_n` - Maximum number of hospitals to return
    ///
    /// # Returns
    /// At most `top_n` scored copies, best first. Equal scores keep catalog order.
    pub fn rank(
        &self,
        catalog: &[HospitalRecord],
        coordinate: Option<Coordinate>,
        condition: &str,
        top_n: usize,
    ) -> Vec<ScoredHospital> {
        let mut scored: Vec<(&HospitalRecord, HospitalScore)> = catalog
            .iter()
            .map(|hospital| (hospital, calculate_hospital_score(hospital, condition, coordinate, &self.weights)))
            .collect();

        // sort_by is stable, so ties keep catalog order
        scored.sort_by(|a, b| {
            b.1.score
                .partial_cmp(&a.1.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // Only the survivors are copied out of the catalog
        scored
            .into_iter()
            .take(top_n)
            .map(|(hospital, result)| ScoredHospital {
                hospital: hospital.clone(),
                distance_km: result.distance_km,
                score: result.score,
            })
            .collect()
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

/// Rank a catalog with the default weights
pub fn rank(
    catalog: &[HospitalRecord],
    coordinate: Option<Coordinate>,
    condition: &str,
    top_n: usize,
) -> Vec<ScoredHospital> {
    Ranker::with_default_weights().rank(catalog, coordinate, condition, top_n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_hospital(id: &str, rating: f64, specialisation: &str, lat: f64, lon: f64) -> HospitalRecord {
        HospitalRecord::new(id, lat, lon)
            .with_rating(rating)
            .with_specialisation(specialisation)
    }

    fn anantapur() -> Coordinate {
        Coordinate::new(14.6819, 77.6006)
    }

    #[test]
    fn test_rank_orders_by_score() {
        let ranker = Ranker::with_default_weights();
        let catalog = vec![
            create_hospital("low", 2.0, "General", 14.68, 77.60),
            create_hospital("specialist", 4.0, "Cardiology", 14.70, 77.61),
            create_hospital("far", 4.8, "General", 28.61, 77.20),
        ];

        let ranked = ranker.rank(&catalog, Some(anantapur()), "Cardiology", 3);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].hospital.id, "specialist");
        for pair in ranked.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let ranker = Ranker::with_default_weights();
        let catalog: Vec<HospitalRecord> = ["a", "b", "c", "d"]
            .iter()
            .map(|id| create_hospital(id, 3.5, "General", 14.0, 77.0))
            .collect();

        let ranked = ranker.rank(&catalog, None, "Oncology", 4);

        let ids: Vec<&str> = ranked.iter().map(|s| s.hospital.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_top_n_larger_than_catalog() {
        let ranker = Ranker::with_default_weights();
        let catalog = vec![
            create_hospital("1", 3.0, "General", 14.0, 77.0),
            create_hospital("2", 4.0, "General", 14.0, 77.0),
        ];

        let ranked = ranker.rank(&catalog, None, "Neurology", 10);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].hospital.id, "2");
    }

    #[test]
    fn test_respects_top_n() {
        let ranker = Ranker::with_default_weights();
        let catalog: Vec<HospitalRecord> = (0..20)
            .map(|i| create_hospital(&i.to_string(), (i % 5) as f64, "General", 14.0 + i as f64 * 0.01, 77.0))
            .collect();

        let ranked = ranker.rank(&catalog, Some(anantapur()), "General", 5);

        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn test_best_entry_found_at_end_of_catalog() {
        let ranker = Ranker::with_default_weights();
        let mut catalog: Vec<HospitalRecord> = (0..50)
            .map(|i| create_hospital(&format!("filler-{}", i), 1.0, "General", 20.0, 80.0))
            .collect();
        catalog.push(create_hospital("best", 5.0, "Cardiology", 14.68, 77.60));

        let ranked = ranker.rank(&catalog, Some(anantapur()), "Cardiology", 2);

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].hospital, catalog[50]);
        assert_eq!(ranked[1].hospital.id, "filler-0");
        assert!(ranked[0].distance_km.is_some());
    }

    #[test]
    fn test_empty_catalog() {
        let ranked = rank(&[], Some(anantapur()), "Cardiology", 5);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_catalog_untouched() {
        let catalog = vec![
            create_hospital("1", 3.0, "Cardiology", 14.0, 77.0),
            create_hospital("2", 4.0, "General", 14.5, 77.5),
        ];
        let snapshot = catalog.clone();

        let _ = rank(&catalog, Some(anantapur()), "Cardiology", 1);

        assert_eq!(catalog, snapshot);
    }

    #[test]
    fn test_nearby_specialist_beats_distant_star() {
        let catalog = vec![
            create_hospital("distant", 5.0, "General", 28.61, 77.20),
            create_hospital("nearby", 3.0, "Neurology", 14.69, 77.60),
        ];

        let ranked = rank(&catalog, Some(anantapur()), "Neurology", 2);

        // distant: 0.5 + 0 + 0 (beyond 500km); nearby: 0.3 + 0.3 + ~0.2
        assert_eq!(ranked[0].hospital.id, "nearby");
        assert_eq!(ranked[1].distance_km.map(|d| d > 500.0), Some(true));
    }
}
