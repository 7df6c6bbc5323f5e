// src/engine/baseline.rs - Category budgets, pool ceiling, popularity split
//
// Grounded line-for-line in calculator/engine/baseline.py. Operates on one
// budgeted pool (protein, accompaniment, or dessert) at a time — the
// service pool has no budgets and is handled directly in
// `engine::calculator`.

use std::collections::HashMap;

use crate::models::DishInput;

/// Step (a): establish a per-category budget for every category present in
/// the pool, then (b) redistribute a fraction of absent categories' pool
/// baseline onto the present ones.
///
/// `pool_baselines` must cover every category in the pool, present or not
/// (the catalogue adapter's `pool_baselines` contract — see
/// `catalogue::CatalogueAdapter`). `category_display_names` resolves absent
/// category ids to names for the redistribution message.
pub fn establish_category_budgets(
    dishes: &[&DishInput],
    pool_baselines: &HashMap<i64, f64>,
    growth_rate: f64,
    redistribution_fraction: f64,
    category_display_name: impl Fn(i64) -> String,
) -> (HashMap<i64, f64>, Vec<String>) {
    let mut adjustments = Vec::new();
    let mut by_category: HashMap<i64, Vec<&DishInput>> = HashMap::new();
    for &dish in dishes {
        by_category.entry(dish.category_id).or_default().push(dish);
    }

    let mut category_budgets: HashMap<i64, f64> = HashMap::new();
    for (&cat_id, cat_dishes) in &by_category {
        let reference = cat_dishes[0];
        let baseline = reference.baseline_budget_grams;
        let n = cat_dishes.len() as f64;
        let min_total = n * reference.min_per_dish_grams;
        let grown_budget = baseline * (1.0 + growth_rate * (n - 1.0));
        let budget = grown_budget.max(min_total);

        category_budgets.insert(cat_id, budget);
        let cat_name = &reference.category_name;

        if min_total > grown_budget {
            adjustments.push(format!(
                "{cat_name} budget increased: {} dishes need at least {:.0}g each, so budget grew from {:.0}g to {:.0}g",
                cat_dishes.len(),
                reference.min_per_dish_grams,
                grown_budget,
                min_total,
            ));
        } else if cat_dishes.len() > 1 && growth_rate > 0.0 {
            adjustments.push(format!(
                "{cat_name} budget grew: {} dishes expanded baseline from {:.0}g to {:.0}g",
                cat_dishes.len(),
                baseline,
                grown_budget,
            ));
        }
    }

    if !pool_baselines.is_empty() {
        let present_ids: std::collections::HashSet<i64> =
            category_budgets.keys().copied().collect();
        let absent_budget_raw: f64 = pool_baselines
            .iter()
            .filter(|(cat_id, _)| !present_ids.contains(cat_id))
            .map(|(_, baseline)| baseline)
            .sum();
        let absent_budget = absent_budget_raw * redistribution_fraction;

        if absent_budget > 0.0 {
            let sum_present: f64 = category_budgets.values().sum();
            if sum_present > 0.0 {
                for (_, budget) in category_budgets.iter_mut() {
                    let share = absent_budget * (*budget / sum_present);
                    *budget += share;
                }

                let mut absent_ids: Vec<i64> = pool_baselines
                    .keys()
                    .filter(|cat_id| !present_ids.contains(cat_id))
                    .copied()
                    .collect();
                absent_ids.sort_unstable();
                let absent_names: Vec<String> =
                    absent_ids.into_iter().map(category_display_name).collect();
                let absent_label = if absent_names.is_empty() {
                    "other categories".to_string()
                } else {
                    absent_names.join(", ")
                };
                let pct = (redistribution_fraction * 100.0).round();
                adjustments.push(format!(
                    "No {absent_label} on menu — {pct:.0}% of their {absent_budget_raw:.0}g budget ({absent_budget:.0}g) was spread across the categories that are present"
                ));
            }
        }
    }

    (category_budgets, adjustments)
}

/// Step (c): scale every category budget (and implicitly the per-dish
/// floor) down if the pool total exceeds its ceiling.
///
/// Returns `(reduced_budgets, scale_factor, adjustments)`.
pub fn apply_pool_ceiling(
    category_budgets: &HashMap<i64, f64>,
    ceiling: f64,
    dishes: &[&DishInput],
) -> (HashMap<i64, f64>, f64, Vec<String>) {
    let pool_total: f64 = category_budgets.values().sum();
    if pool_total <= ceiling {
        return (category_budgets.clone(), 1.0, Vec::new());
    }

    let scale = ceiling / pool_total;
    let reduced: HashMap<i64, f64> = category_budgets
        .iter()
        .map(|(&cat_id, &budget)| (cat_id, budget * scale))
        .collect();

    let mut by_category: HashMap<i64, &DishInput> = HashMap::new();
    for &dish in dishes {
        by_category.entry(dish.category_id).or_insert(dish);
    }

    let mut cat_ids: Vec<&i64> = category_budgets.keys().collect();
    cat_ids.sort_unstable();
    let detail_parts: Vec<String> = cat_ids
        .into_iter()
        .map(|cat_id| {
            let budget = category_budgets[cat_id];
            let cat_name = by_category
                .get(cat_id)
                .map(|d| d.category_name.clone())
                .unwrap_or_else(|| format!("cat_{cat_id}"));
            format!("{cat_name} {budget:.0}g → {:.0}g", reduced[cat_id])
        })
        .collect();

    let reduction_pct = ((1.0 - scale) * 100.0).round();
    let adjustments = vec![format!(
        "Total exceeded {ceiling:.0}g limit — all portions reduced by {reduction_pct:.0}% ({})",
        detail_parts.join(", ")
    )];

    (reduced, scale, adjustments)
}

/// Step (d): split each category's budget across its dishes, weighted by
/// popularity, with a floor pass that re-normalizes the non-floored dishes.
pub fn split_by_popularity(
    dishes: &[&DishInput],
    category_budgets: &HashMap<i64, f64>,
    popularity_strength: f64,
    scale_factor: f64,
) -> HashMap<i64, f64> {
    let mut portions = HashMap::new();
    let mut by_category: HashMap<i64, Vec<&DishInput>> = HashMap::new();
    for &dish in dishes {
        by_category.entry(dish.category_id).or_default().push(dish);
    }

    for (cat_id, cat_dishes) in &by_category {
        let budget = *category_budgets.get(cat_id).unwrap_or(&0.0);
        let n = cat_dishes.len();
        if n == 0 {
            continue;
        }

        let effective_min = cat_dishes[0].min_per_dish_grams * scale_factor;

        if popularity_strength <= 0.0 || n == 1 {
            let share = budget / n as f64;
            for dish in cat_dishes {
                portions.insert(dish.id, share.max(effective_min));
            }
            continue;
        }

        let total_popularity: f64 = cat_dishes.iter().map(|d| d.popularity).sum();
        let equal_share = budget / n as f64;

        for dish in cat_dishes {
            let raw_share = if total_popularity > 0.0 {
                budget * (dish.popularity / total_popularity)
            } else {
                equal_share
            };
            let portion = equal_share * (1.0 - popularity_strength) + raw_share * popularity_strength;
            portions.insert(dish.id, portion);
        }

        let mut floored_ids = std::collections::HashSet::new();
        let mut floored_total = 0.0;
        for dish in cat_dishes {
            if portions[&dish.id] < effective_min {
                portions.insert(dish.id, effective_min);
                floored_ids.insert(dish.id);
                floored_total += effective_min;
            }
        }

        let non_floored: Vec<&&DishInput> = cat_dishes
            .iter()
            .filter(|d| !floored_ids.contains(&d.id))
            .collect();

        if !non_floored.is_empty() && !floored_ids.is_empty() {
            let remaining_budget = budget - floored_total;
            if remaining_budget > 0.0 {
                let non_floored_total: f64 =
                    non_floored.iter().map(|d| portions[&d.id]).sum();
                if non_floored_total > 0.0 {
                    let rescale = remaining_budget / non_floored_total;
                    for dish in &non_floored {
                        *portions.get_mut(&dish.id).unwrap() *= rescale;
                    }
                }
            }
        }
    }

    portions
}
