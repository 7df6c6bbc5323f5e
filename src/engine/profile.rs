// src/engine/profile.rs - Budget-profile selection by Jaccard similarity
//
// Grounded in calculator/engine/calculator.py::_select_budget_profile.

use std::collections::HashSet;

use crate::models::BudgetProfile;

/// Rank profiles by Jaccard similarity of their category set to the
/// present set (§4.2). An exact match short-circuits. Below a 0.5 score,
/// the caller should fall back to the default profile.
pub fn select_budget_profile(
    present_category_ids: &[i64],
    profiles: &[BudgetProfile],
) -> Option<&BudgetProfile> {
    let present: HashSet<i64> = present_category_ids.iter().copied().collect();

    let mut best: Option<&BudgetProfile> = None;
    let mut best_score = -1.0f64;

    for profile in profiles {
        let profile_cats: HashSet<i64> = profile.category_ids.iter().copied().collect();

        if profile_cats == present {
            return Some(profile);
        }

        let intersection = present.intersection(&profile_cats).count();
        let union = present.union(&profile_cats).count();
        let score = if union > 0 {
            intersection as f64 / union as f64
        } else {
            0.0
        };

        if score > best_score {
            best_score = score;
            best = Some(profile);
        }
    }

    if best_score < 0.5 {
        return profiles.iter().find(|p| p.is_default);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i64, cats: &[i64], is_default: bool) -> BudgetProfile {
        BudgetProfile {
            id,
            name: format!("profile-{id}"),
            category_ids: cats.to_vec(),
            is_default,
            protein_pool_ceiling_grams: None,
            accompaniment_pool_ceiling_grams: None,
            dessert_pool_ceiling_grams: None,
        }
    }

    #[test]
    fn exact_match_wins_outright() {
        let profiles = vec![profile(1, &[1, 2], false), profile(2, &[1, 2, 3], false)];
        let chosen = select_budget_profile(&[1, 2], &profiles).unwrap();
        assert_eq!(chosen.id, 1);
    }

    #[test]
    fn falls_back_to_default_below_threshold() {
        let profiles = vec![profile(1, &[9, 10], false), profile(2, &[], true)];
        let chosen = select_budget_profile(&[1, 2, 3], &profiles).unwrap();
        assert_eq!(chosen.id, 2);
    }

    #[test]
    fn no_profile_when_below_threshold_and_no_default() {
        let profiles = vec![profile(1, &[9, 10], false)];
        assert!(select_budget_profile(&[1, 2, 3], &profiles).is_none());
    }
}
