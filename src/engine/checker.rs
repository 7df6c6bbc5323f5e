// src/engine/checker.rs - Pure validator for operator-entered portions
//
// Grounded in calculator/engine/checker.py::check_user_portions.

use std::collections::HashMap;

use serde_json::json;

use crate::models::{
    DishInput, ExpandedPortion, GuestMix, ResolvedConstraints, UserTotals, Violation,
    ViolationSeverity, ViolationType,
};

use super::expand::{big_eaters_multiplier, expand_dish};
use super::util::round_to;

pub struct CheckerOutput {
    pub violations: Vec<Violation>,
    pub user_portions_expanded: Vec<ExpandedPortion>,
    pub totals: UserTotals,
}

fn violation(
    kind: ViolationType,
    severity: ViolationSeverity,
    message: String,
    context: serde_json::Value,
) -> Violation {
    let context = match context {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    Violation {
        kind,
        severity,
        message,
        context,
    }
}

#[allow(clippy::too_many_arguments)]
pub fn check_user_portions(
    user_portions: &HashMap<i64, f64>,
    dishes: &[DishInput],
    constraints: &ResolvedConstraints,
    pool_ceilings: &HashMap<&'static str, f64>,
    guest_mix: GuestMix,
    ladies_multiplier: f64,
    big_eaters: bool,
    big_eaters_percentage: f64,
) -> CheckerOutput {
    let mut violations = Vec::new();
    let grams_for = |dish_id: i64| user_portions.get(&dish_id).copied().unwrap_or(0.0);

    // ── Pool ceiling checks ──
    let mut pool_totals: HashMap<&'static str, f64> = HashMap::new();
    for dish in dishes {
        if dish.pool == crate::models::Pool::Service {
            continue;
        }
        *pool_totals.entry(dish.pool.as_str()).or_insert(0.0) += grams_for(dish.id);
    }

    let mut pool_names: Vec<&str> = pool_totals.keys().copied().collect();
    pool_names.sort_unstable();
    for pool_name in pool_names {
        let total = pool_totals[pool_name];
        if let Some(&ceiling) = pool_ceilings.get(pool_name) {
            if total > ceiling {
                let title = {
                    let mut c = pool_name.chars();
                    match c.next() {
                        Some(f) => f.to_uppercase().collect::<String>() + c.as_str(),
                        None => String::new(),
                    }
                };
                violations.push(violation(
                    ViolationType::PoolCeiling,
                    ViolationSeverity::Error,
                    format!(
                        "{title} pool total is {total:.0}g per person, exceeds ceiling of {ceiling:.0}g"
                    ),
                    json!({
                        "pool": pool_name,
                        "total": round_to(total, 1),
                        "ceiling": ceiling,
                    }),
                ));
            }
        }
    }

    // ── Category constraint checks ──
    let mut by_category: HashMap<i64, Vec<&DishInput>> = HashMap::new();
    for dish in dishes {
        by_category.entry(dish.category_id).or_default().push(dish);
    }
    let mut cat_ids: Vec<&i64> = by_category.keys().collect();
    cat_ids.sort_unstable();

    for &cat_id in &cat_ids {
        let cat_dishes = &by_category[cat_id];
        let cat_name = &cat_dishes[0].category_name;
        let is_qty = cat_dishes[0].unit == crate::models::Unit::Qty;
        let unit_label = if is_qty { "pcs" } else { "g" };

        let has_cat_min_override = constraints.category_min_portions.contains_key(cat_id);
        let cat_min = if is_qty && !has_cat_min_override {
            None
        } else {
            Some(
                constraints
                    .category_min_portions
                    .get(cat_id)
                    .copied()
                    .unwrap_or(constraints.min_portion_per_dish_grams),
            )
        };

        if let Some(cat_min) = cat_min {
            for dish in cat_dishes {
                let user_g = grams_for(dish.id);
                if user_g < cat_min {
                    violations.push(violation(
                        ViolationType::BelowMinimum,
                        ViolationSeverity::Warning,
                        format!(
                            "{} is {user_g:.0}{unit_label}, below minimum of {cat_min:.0}{unit_label} for {cat_name}",
                            dish.name
                        ),
                        json!({
                            "dish_id": dish.id,
                            "dish_name": dish.name,
                            "user_grams": round_to(user_g, 1),
                            "minimum": cat_min,
                        }),
                    ));
                }
            }
        }

        if let Some(&max_portion) = constraints.category_max_portions.get(cat_id) {
            for dish in cat_dishes {
                let user_g = grams_for(dish.id);
                if user_g > max_portion {
                    violations.push(violation(
                        ViolationType::AboveMaximum,
                        ViolationSeverity::Error,
                        format!(
                            "{} is {user_g:.0}{unit_label}, exceeds max of {max_portion:.0}{unit_label} for {cat_name}",
                            dish.name
                        ),
                        json!({
                            "dish_id": dish.id,
                            "dish_name": dish.name,
                            "user_grams": round_to(user_g, 1),
                            "maximum": max_portion,
                        }),
                    ));
                }
            }
        }

        if let Some(&max_total) = constraints.category_max_totals.get(cat_id) {
            let cat_total: f64 = cat_dishes.iter().map(|d| grams_for(d.id)).sum();
            if cat_total > max_total {
                violations.push(violation(
                    ViolationType::CategoryTotal,
                    ViolationSeverity::Error,
                    format!(
                        "{cat_name} total is {cat_total:.0}{unit_label}, exceeds limit of {max_total:.0}{unit_label}"
                    ),
                    json!({
                        "category": cat_name,
                        "total": round_to(cat_total, 1),
                        "limit": max_total,
                    }),
                ));
            }
        }
    }

    // ── Global check (weight-based dishes only) ──
    let non_service_total: f64 = dishes
        .iter()
        .filter(|d| d.pool != crate::models::Pool::Service && d.unit != crate::models::Unit::Qty)
        .map(|d| grams_for(d.id))
        .sum();
    let max_food = constraints.max_total_food_per_person_grams;
    if non_service_total > max_food {
        violations.push(violation(
            ViolationType::MaxTotalFood,
            ViolationSeverity::Error,
            format!(
                "Total food is {non_service_total:.0}g per person, exceeds cap of {max_food:.0}g"
            ),
            json!({
                "total": round_to(non_service_total, 1),
                "cap": max_food,
            }),
        ));
    }

    // ── Expand through guest mix ──
    let big_eaters_mult = big_eaters_multiplier(big_eaters, big_eaters_percentage);
    let mut expanded = Vec::with_capacity(dishes.len());
    let mut total_food_per_gent = 0.0;
    let mut total_food_per_lady = 0.0;
    let mut total_food_weight = 0.0;

    for dish in dishes {
        let base_grams = grams_for(dish.id);
        let e = expand_dish(base_grams, guest_mix, ladies_multiplier, big_eaters_mult);

        expanded.push(ExpandedPortion {
            dish_id: dish.id,
            dish_name: dish.name.clone(),
            category: dish.category_name.clone(),
            pool: dish.pool,
            unit: dish.unit,
            grams_per_person: e.grams_per_person,
            grams_per_gent: e.grams_per_gent,
            grams_per_lady: e.grams_per_lady,
            total_grams: e.total_grams,
        });

        total_food_per_gent += e.grams_per_gent;
        total_food_per_lady += e.grams_per_lady;
        total_food_weight += e.total_grams;
    }

    let total_people = guest_mix.total();
    let food_per_person = if total_people > 0 {
        round_to(total_food_weight / total_people as f64, 1)
    } else {
        0.0
    };

    let totals = UserTotals {
        food_per_gent_grams: round_to(total_food_per_gent, 1),
        food_per_lady_grams: round_to(total_food_per_lady, 1),
        food_per_person_grams: food_per_person,
        total_food_weight_grams: round_to(total_food_weight, 1),
    };

    CheckerOutput {
        violations,
        user_portions_expanded: expanded,
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResolvedConstraints;
    use crate::sample_data::{bbq_dish, curry_dish};

    fn ceilings() -> HashMap<&'static str, f64> {
        [("protein", 440.0), ("accompaniment", 150.0), ("dessert", 150.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn pool_total_over_ceiling_is_an_error() {
        let dishes = vec![
            bbq_dish(1, "Beef Boti", 1.0),
            bbq_dish(2, "Chicken Tikka", 1.0),
            bbq_dish(3, "Reshmi Kabab", 1.0),
            curry_dish(4, "Chicken Karahi", 1.0),
        ];
        let mut user_portions = HashMap::new();
        user_portions.insert(1, 200.0);
        user_portions.insert(2, 200.0);
        user_portions.insert(3, 150.0);
        user_portions.insert(4, 150.0);

        let output = check_user_portions(
            &user_portions,
            &dishes,
            &ResolvedConstraints::default(),
            &ceilings(),
            GuestMix {
                gents: 50,
                ladies: 50,
            },
            1.0,
            false,
            20.0,
        );

        assert!(output
            .violations
            .iter()
            .any(|v| v.kind == ViolationType::PoolCeiling && v.severity == ViolationSeverity::Error));
    }

    #[test]
    fn portion_below_global_minimum_is_a_warning() {
        let dishes = vec![curry_dish(1, "Chicken Karahi", 1.0)];
        let mut user_portions = HashMap::new();
        user_portions.insert(1, 10.0);

        let output = check_user_portions(
            &user_portions,
            &dishes,
            &ResolvedConstraints::default(),
            &ceilings(),
            GuestMix {
                gents: 10,
                ladies: 10,
            },
            1.0,
            false,
            20.0,
        );

        assert!(output
            .violations
            .iter()
            .any(|v| v.kind == ViolationType::BelowMinimum && v.severity == ViolationSeverity::Warning));
    }
}
