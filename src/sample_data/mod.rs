// src/sample_data/mod.rs - Worked-example fixtures for tests and demos
//
// Grounded in the HR-Outdoor worked scenarios from spec.md §8 and the
// concrete values in dishes/management/commands/seed_surcharges.py and
// menus/management/commands/seed_menu_prices.py. These are plain in-memory
// builders, not a persistence seed script — the catalogue's storage format
// is explicitly out of scope.

use crate::models::{DishInput, Pool, ProteinType, Unit};

pub const CURRY_CATEGORY_ID: i64 = 1;
pub const BBQ_CATEGORY_ID: i64 = 2;
pub const RICE_CATEGORY_ID: i64 = 3;
pub const DESSERT_CATEGORY_ID: i64 = 4;

/// A single vegetarian curry dish, baseline 160g, min 90g per dish.
pub fn curry_dish(id: i64, name: &str, popularity: f64) -> DishInput {
    DishInput {
        id,
        name: name.to_string(),
        category_id: CURRY_CATEGORY_ID,
        category_name: "curry".to_string(),
        pool: Pool::Protein,
        unit: Unit::Kg,
        default_portion_grams: 160.0,
        baseline_budget_grams: 160.0,
        min_per_dish_grams: 90.0,
        fixed_portion_grams: None,
        popularity,
        cost_per_gram: 0.9,
        protein_type: ProteinType::Chicken,
        is_vegetarian: false,
        protein_is_additive: false,
    }
}

/// A dry-barbecue dish, baseline 180g, min 100g per dish.
pub fn bbq_dish(id: i64, name: &str, popularity: f64) -> DishInput {
    DishInput {
        id,
        name: name.to_string(),
        category_id: BBQ_CATEGORY_ID,
        category_name: "dry_barbecue".to_string(),
        pool: Pool::Protein,
        unit: Unit::Kg,
        default_portion_grams: 180.0,
        baseline_budget_grams: 180.0,
        min_per_dish_grams: 100.0,
        fixed_portion_grams: None,
        popularity,
        cost_per_gram: 1.4,
        protein_type: ProteinType::Mutton,
        is_vegetarian: false,
        protein_is_additive: false,
    }
}

/// A rice dish, baseline 100g, min 60g per dish.
pub fn rice_dish(id: i64, name: &str, popularity: f64) -> DishInput {
    DishInput {
        id,
        name: name.to_string(),
        category_id: RICE_CATEGORY_ID,
        category_name: "rice".to_string(),
        pool: Pool::Accompaniment,
        unit: Unit::Kg,
        default_portion_grams: 100.0,
        baseline_budget_grams: 100.0,
        min_per_dish_grams: 60.0,
        fixed_portion_grams: None,
        popularity,
        cost_per_gram: 0.3,
        protein_type: ProteinType::None,
        is_vegetarian: true,
        protein_is_additive: false,
    }
}

/// Category baselines for a pool with every category carried by the
/// fixtures above, including those absent from a given scenario.
pub fn protein_pool_baselines() -> std::collections::HashMap<i64, f64> {
    [(CURRY_CATEGORY_ID, 160.0), (BBQ_CATEGORY_ID, 180.0)]
        .into_iter()
        .collect()
}

pub fn accompaniment_pool_baselines() -> std::collections::HashMap<i64, f64> {
    [(RICE_CATEGORY_ID, 100.0)].into_iter().collect()
}

/// One menu's tiered pricing from the HR-Outdoor spreadsheet (§8 worked
/// example): 50 pax at 2750, 100 at 2450, 200 at 2350.
pub fn golden_elegance_tiers(menu_id: i64) -> Vec<crate::models::MenuTemplatePriceTier> {
    [(50, 2750.0), (100, 2450.0), (200, 2350.0)]
        .into_iter()
        .map(|(min_guests, price_per_head)| crate::models::MenuTemplatePriceTier {
            menu_id,
            min_guests,
            price_per_head,
        })
        .collect()
}
