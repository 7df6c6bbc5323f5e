// src/models/config.rs - Catalogue-resident configuration rows
//
// Grounded in rules/models.py. These are loaded by `engine::calculator`'s
// config resolver, never mutated by the engine, and never re-read mid
// calculation (see SPEC_FULL.md §9 "Shared mutable config vs arguments").

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Singleton — global portioning settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub popularity_enabled: bool,
    pub popularity_strength: f64,
    pub protein_pool_ceiling_grams: f64,
    pub accompaniment_pool_ceiling_grams: f64,
    pub dessert_pool_ceiling_grams: f64,
    pub dish_growth_rate: f64,
    pub absent_redistribution_fraction: f64,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            popularity_enabled: true,
            popularity_strength: 0.3,
            protein_pool_ceiling_grams: 440.0,
            accompaniment_pool_ceiling_grams: 150.0,
            dessert_pool_ceiling_grams: 150.0,
            dish_growth_rate: 0.20,
            absent_redistribution_fraction: 0.70,
        }
    }
}

/// Named budget profile — overrides pool ceilings for a tier of menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetProfile {
    pub id: i64,
    pub name: String,
    pub category_ids: Vec<i64>,
    pub is_default: bool,
    pub protein_pool_ceiling_grams: Option<f64>,
    pub accompaniment_pool_ceiling_grams: Option<f64>,
    pub dessert_pool_ceiling_grams: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuestProfile {
    pub name: String,
    pub portion_multiplier: f64,
}

/// Reserved — see SPEC_FULL.md §9. Carried at the boundary, unused by the
/// allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRule {
    pub category_ids: Vec<i64>,
    pub reduction_factor: f64,
    pub description: String,
    pub is_active: bool,
}

/// Singleton — hard caps and floors, overridable per request (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlobalConstraint {
    pub max_total_food_per_person_grams: f64,
    pub min_portion_per_dish_grams: f64,
}

impl Default for GlobalConstraint {
    fn default() -> Self {
        Self {
            max_total_food_per_person_grams: 1000.0,
            min_portion_per_dish_grams: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryConstraint {
    pub category_id: i64,
    pub min_portion_grams: Option<f64>,
    pub max_portion_grams: Option<f64>,
    pub max_total_category_grams: Option<f64>,
}

/// Constraints resolved for a single calculation: global defaults merged
/// with per-category overrides and caller overrides (§4.2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedConstraints {
    pub max_total_food_per_person_grams: f64,
    pub min_portion_per_dish_grams: f64,
    pub category_min_portions: HashMap<i64, f64>,
    pub category_max_portions: HashMap<i64, f64>,
    pub category_max_totals: HashMap<i64, f64>,
}

impl Default for ResolvedConstraints {
    fn default() -> Self {
        let gc = GlobalConstraint::default();
        Self {
            max_total_food_per_person_grams: gc.max_total_food_per_person_grams,
            min_portion_per_dish_grams: gc.min_portion_per_dish_grams,
            category_min_portions: HashMap::new(),
            category_max_portions: HashMap::new(),
            category_max_totals: HashMap::new(),
        }
    }
}

/// Caller-supplied overrides — only these two global fields are
/// overridable from a request (§4.2).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintOverrides {
    pub max_total_food_per_person_grams: Option<f64>,
    pub min_portion_per_dish_grams: Option<f64>,
}

impl ResolvedConstraints {
    pub fn build(
        global: GlobalConstraint,
        category_constraints: &[CategoryConstraint],
        overrides: ConstraintOverrides,
    ) -> Self {
        let mut resolved = ResolvedConstraints {
            max_total_food_per_person_grams: global.max_total_food_per_person_grams,
            min_portion_per_dish_grams: global.min_portion_per_dish_grams,
            category_min_portions: HashMap::new(),
            category_max_portions: HashMap::new(),
            category_max_totals: HashMap::new(),
        };

        for cc in category_constraints {
            if let Some(v) = cc.min_portion_grams {
                resolved.category_min_portions.insert(cc.category_id, v);
            }
            if let Some(v) = cc.max_portion_grams {
                resolved.category_max_portions.insert(cc.category_id, v);
            }
            if let Some(v) = cc.max_total_category_grams {
                resolved.category_max_totals.insert(cc.category_id, v);
            }
        }

        if let Some(v) = overrides.max_total_food_per_person_grams {
            resolved.max_total_food_per_person_grams = v;
        }
        if let Some(v) = overrides.min_portion_per_dish_grams {
            resolved.min_portion_per_dish_grams = v;
        }

        resolved
    }
}
