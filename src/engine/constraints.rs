// src/engine/constraints.rs - Last-resort safety caps after pool allocation
//
// Grounded in calculator/engine/constraints.py.

use std::collections::HashMap;

use crate::models::{DishInput, ResolvedConstraints};

/// Per-category min/max/total caps. Applies to every dish, including the
/// service pool (the only place a service dish's fixed amount can still be
/// clamped).
pub fn enforce_category_constraints(
    portions: &mut HashMap<i64, f64>,
    dishes: &[&DishInput],
    constraints: &ResolvedConstraints,
) -> Vec<String> {
    let mut adjustments = Vec::new();
    let mut by_category: HashMap<i64, Vec<&DishInput>> = HashMap::new();
    for &dish in dishes {
        by_category.entry(dish.category_id).or_default().push(dish);
    }

    let mut cat_ids: Vec<&i64> = by_category.keys().collect();
    cat_ids.sort_unstable();

    for &cat_id in &cat_ids {
        let cat_dishes = &by_category[cat_id];
        if let Some(&max_portion) = constraints.category_max_portions.get(cat_id) {
            for dish in cat_dishes {
                let current = portions[&dish.id];
                if current > max_portion {
                    portions.insert(dish.id, max_portion);
                    adjustments.push(format!(
                        "{} capped at {max_portion:.0}g (max per dish for {})",
                        dish.name, dish.category_name
                    ));
                }
            }
        }
    }

    for &cat_id in &cat_ids {
        let cat_dishes = &by_category[cat_id];
        if let Some(&max_total) = constraints.category_max_totals.get(cat_id) {
            let cat_total: f64 = cat_dishes.iter().map(|d| portions[&d.id]).sum();
            if cat_total > max_total {
                let cat_min = constraints
                    .category_min_portions
                    .get(cat_id)
                    .copied()
                    .unwrap_or(0.0);
                let n = cat_dishes.len() as f64;
                let floor_total = n * cat_min;

                if floor_total >= max_total {
                    for dish in cat_dishes {
                        portions.insert(dish.id, cat_min);
                    }
                } else {
                    let scale = max_total / cat_total;
                    for dish in cat_dishes {
                        let new_val = portions[&dish.id] * scale;
                        portions.insert(dish.id, new_val.max(cat_min));
                    }
                }

                let cat_name = &cat_dishes[0].category_name;
                adjustments.push(format!(
                    "{cat_name} total reduced from {cat_total:.0}g to {max_total:.0}g (category limit)"
                ));
            }
        }
    }

    adjustments
}

/// Global hard caps. Must only be called with non-service dishes — callers
/// are responsible for filtering the pool first (§4.5).
///
/// Returns `(warnings, adjustments)`.
pub fn enforce_global_constraints(
    portions: &mut HashMap<i64, f64>,
    dishes: &[&DishInput],
    constraints: &ResolvedConstraints,
) -> (Vec<String>, Vec<String>) {
    let mut warnings = Vec::new();
    let mut adjustments = Vec::new();

    let total_food: f64 = portions.values().sum();
    let max_food = constraints.max_total_food_per_person_grams;
    if total_food > max_food {
        let scale = max_food / total_food;
        for value in portions.values_mut() {
            *value *= scale;
        }
        warnings.push(format!(
            "Total food was {total_food:.0}g per person — reduced to {max_food:.0}g limit"
        ));
        adjustments.push(format!(
            "Total food exceeded {max_food:.0}g limit — all portions scaled down"
        ));
    }

    let min_portion = constraints.min_portion_per_dish_grams;
    for dish in dishes {
        let cat_min = constraints
            .category_min_portions
            .get(&dish.category_id)
            .copied()
            .unwrap_or(min_portion);
        if portions[&dish.id] < cat_min {
            warnings.push(format!(
                "Cannot satisfy both minimum portion ({cat_min:.0}g) and caps for '{}' ({:.0}g). Consider removing a dish.",
                dish.name, portions[&dish.id]
            ));
        }
    }

    (warnings, adjustments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample_data::curry_dish;

    #[test]
    fn global_cap_rescales_every_non_service_dish() {
        let dish_a = curry_dish(1, "Chicken Karahi", 1.0);
        let dish_b = curry_dish(2, "Mutton Curry", 1.0);
        let dishes = vec![&dish_a, &dish_b];

        let mut portions = HashMap::new();
        portions.insert(1, 600.0);
        portions.insert(2, 600.0);

        let mut constraints = ResolvedConstraints::default();
        constraints.max_total_food_per_person_grams = 1000.0;

        let (warnings, adjustments) = enforce_global_constraints(&mut portions, &dishes, &constraints);

        assert_eq!(portions[&1], 500.0);
        assert_eq!(portions[&2], 500.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(adjustments.len(), 1);
    }

    #[test]
    fn category_total_over_cap_rescales_down_to_the_limit() {
        let dish_a = curry_dish(1, "Chicken Karahi", 1.0);
        let dish_b = curry_dish(2, "Mutton Curry", 1.0);
        let dishes = vec![&dish_a, &dish_b];

        let mut portions = HashMap::new();
        portions.insert(1, 200.0);
        portions.insert(2, 200.0);

        let mut constraints = ResolvedConstraints::default();
        constraints
            .category_max_totals
            .insert(crate::sample_data::CURRY_CATEGORY_ID, 300.0);

        let adjustments = enforce_category_constraints(&mut portions, &dishes, &constraints);

        assert_eq!(portions[&1] + portions[&2], 300.0);
        assert_eq!(adjustments.len(), 1);
    }
}
