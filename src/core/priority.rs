use crate::models::PriorityTier;

/// Specialties that need urgent referral
const HIGH_PRIORITY_CONDITIONS: [&str; 5] = [
    "cardiology",
    "neurology",
    "oncology",
    "pulmonology",
    "nephrology",
];

const MEDIUM_PRIORITY_CONDITIONS: [&str; 3] = ["orthopedics", "gastroenterology", "endocrinology"];

/// Map a condition label to an urgency tier
///
/// Case-insensitive substring match. HIGH is checked before MEDIUM, and
/// anything unmatched is NORMAL.
pub fn classify_priority(condition: &str) -> PriorityTier {
    let condition = condition.to_lowercase();

    if HIGH_PRIORITY_CONDITIONS.iter().any(|c| condition.contains(c)) {
        PriorityTier::High
    } else if MEDIUM_PRIORITY_CONDITIONS.iter().any(|c| condition.contains(c)) {
        PriorityTier::Medium
    } else {
        PriorityTier::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers() {
        assert_eq!(classify_priority("Cardiology"), PriorityTier::High);
        assert_eq!(classify_priority("Orthopedics"), PriorityTier::Medium);
        assert_eq!(classify_priority("Dermatology"), PriorityTier::Normal);
    }

    #[test]
    fn test_case_insensitive_substring() {
        assert_eq!(classify_priority("PAEDIATRIC NEPHROLOGY"), PriorityTier::High);
        assert_eq!(classify_priority("chronic gastroenterology follow-up"), PriorityTier::Medium);
    }

    #[test]
    fn test_high_wins_over_medium() {
        assert_eq!(classify_priority("Endocrinology / Oncology"), PriorityTier::High);
    }

    #[test]
    fn test_total_over_any_input() {
        assert_eq!(classify_priority(""), PriorityTier::Normal);
        assert_eq!(classify_priority("😷"), PriorityTier::Normal);
    }
}
