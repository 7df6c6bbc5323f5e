// src/engine/calculator.rs - The main allocator pipeline
//
// Grounded in calculator/engine/calculator.py::calculate_portions, including
// its config-and-profile resolution (`_load_config_and_ceilings`,
// `_select_budget_profile`, `_resolve_constraints`).

use std::collections::HashMap;

use crate::catalogue::CatalogueAdapter;
use crate::core::Result;
use crate::models::{
    CalculationResult, ConstraintOverrides, DishInput, GuestMix, Pool, PortionResult,
    ResolvedConstraints, Totals,
};

use super::baseline::{apply_pool_ceiling, establish_category_budgets, split_by_popularity};
use super::constraints::{enforce_category_constraints, enforce_global_constraints};
use super::expand::{big_eaters_multiplier, expand_dish};
use super::profile::select_budget_profile;
use super::util::round_to;

/// Pool ceilings resolved for this calculation, keyed by `Pool::as_str()`.
pub type PoolCeilings = HashMap<&'static str, f64>;

/// Everything a calculation needs beyond the dish set: config resolver
/// output plus the resolved safety caps (§4.2).
pub struct ResolvedConfig {
    pub popularity_enabled: bool,
    pub popularity_strength: f64,
    pub pool_ceilings: PoolCeilings,
    pub dish_growth_rate: f64,
    pub absent_redistribution_fraction: f64,
    pub ladies_multiplier: f64,
    pub constraints: ResolvedConstraints,
    pub adjustments: Vec<String>,
}

/// Resolve global config, select a budget profile for the present
/// categories, and fold everything into one effective config (§4.2).
pub async fn resolve_config(
    catalogue: &dyn CatalogueAdapter,
    present_category_ids: &[i64],
    constraint_overrides: ConstraintOverrides,
) -> Result<ResolvedConfig> {
    let global = catalogue.global_config().await?;
    let global_constraint = catalogue.global_constraint().await?;
    let category_constraints = catalogue.category_constraints().await?;
    let guest_profiles = catalogue.guest_profiles().await?;
    let profiles = catalogue.budget_profiles().await?;

    let mut pool_ceilings: PoolCeilings = HashMap::new();
    pool_ceilings.insert(Pool::Protein.as_str(), global.protein_pool_ceiling_grams);
    pool_ceilings.insert(
        Pool::Accompaniment.as_str(),
        global.accompaniment_pool_ceiling_grams,
    );
    pool_ceilings.insert(Pool::Dessert.as_str(), global.dessert_pool_ceiling_grams);

    let mut adjustments = Vec::new();

    if let Some(profile) = select_budget_profile(present_category_ids, &profiles) {
        for (pool, global_ceiling, override_ceiling) in [
            (
                Pool::Protein,
                global.protein_pool_ceiling_grams,
                profile.protein_pool_ceiling_grams,
            ),
            (
                Pool::Accompaniment,
                global.accompaniment_pool_ceiling_grams,
                profile.accompaniment_pool_ceiling_grams,
            ),
            (
                Pool::Dessert,
                global.dessert_pool_ceiling_grams,
                profile.dessert_pool_ceiling_grams,
            ),
        ] {
            if let Some(override_value) = override_ceiling {
                if (override_value - global_ceiling).abs() > f64::EPSILON {
                    pool_ceilings.insert(pool.as_str(), override_value);
                    let names = catalogue.pool_category_names_ordered(pool).await?;
                    let direction = if override_value > global_ceiling {
                        "raised"
                    } else {
                        "lowered"
                    };
                    let label = if names.is_empty() {
                        pool.as_str().to_string()
                    } else {
                        names.join(", ")
                    };
                    adjustments.push(format!(
                        "Profile '{}' {direction} the {label} ceiling from {global_ceiling:.0}g to {override_value:.0}g",
                        profile.name
                    ));
                }
            }
        }
    }

    let ladies_multiplier = guest_profiles
        .iter()
        .find(|p| p.name == "ladies")
        .map(|p| p.portion_multiplier)
        .unwrap_or(1.0);

    let constraints =
        ResolvedConstraints::build(global_constraint, &category_constraints, constraint_overrides);

    Ok(ResolvedConfig {
        popularity_enabled: global.popularity_enabled,
        popularity_strength: if global.popularity_enabled {
            global.popularity_strength
        } else {
            0.0
        },
        pool_ceilings,
        dish_growth_rate: global.dish_growth_rate,
        absent_redistribution_fraction: global.absent_redistribution_fraction,
        ladies_multiplier,
        constraints,
        adjustments,
    })
}

fn menu_composition_warnings(dishes: &[DishInput]) -> Vec<String> {
    let mut warnings = Vec::new();
    let has_curry = dishes
        .iter()
        .any(|d| d.category_name.to_lowercase().contains("curry"));
    if !has_curry {
        warnings.push("Menu has no curry — at least one curry dish is recommended.".to_string());
    }
    let has_rice = dishes
        .iter()
        .any(|d| d.category_name.to_lowercase().contains("rice"));
    if !has_rice {
        warnings.push("Menu has no rice — at least one rice dish is recommended.".to_string());
    }
    warnings
}

/// Run one budgeted pool through the three allocator steps (§4.3).
async fn process_pool(
    catalogue: &dyn CatalogueAdapter,
    pool: Pool,
    dishes: &[&DishInput],
    config: &ResolvedConfig,
    adjustments: &mut Vec<String>,
) -> Result<HashMap<i64, f64>> {
    if dishes.is_empty() {
        return Ok(HashMap::new());
    }

    let pool_baselines = catalogue.pool_baselines(pool).await?;
    let mut display_names = HashMap::new();
    for &cat_id in pool_baselines.keys() {
        display_names.insert(cat_id, catalogue.display_name(cat_id).await?);
    }

    let (category_budgets, establish_msgs) = establish_category_budgets(
        dishes,
        &pool_baselines,
        config.dish_growth_rate,
        config.absent_redistribution_fraction,
        |cat_id| {
            display_names
                .get(&cat_id)
                .cloned()
                .unwrap_or_else(|| format!("cat_{cat_id}"))
        },
    );
    adjustments.extend(establish_msgs);

    let ceiling = *config.pool_ceilings.get(pool.as_str()).unwrap_or(&f64::MAX);
    let (reduced_budgets, scale_factor, ceiling_msgs) =
        apply_pool_ceiling(&category_budgets, ceiling, dishes);
    adjustments.extend(ceiling_msgs);

    let strength = if config.popularity_enabled {
        config.popularity_strength
    } else {
        0.0
    };
    Ok(split_by_popularity(
        dishes,
        &reduced_budgets,
        strength,
        scale_factor,
    ))
}

#[allow(clippy::too_many_arguments)]
pub async fn calculate_portions(
    catalogue: &dyn CatalogueAdapter,
    dish_ids: &[i64],
    guest_mix: GuestMix,
    big_eaters: bool,
    big_eaters_percentage: f64,
    constraint_overrides: ConstraintOverrides,
) -> Result<CalculationResult> {
    let dishes = catalogue.load_dishes(dish_ids).await?;

    if dishes.is_empty() {
        return Ok(CalculationResult {
            portions: Vec::new(),
            totals: Totals::default(),
            warnings: vec!["No active dishes found".to_string()],
            adjustments_applied: Vec::new(),
            source: None,
        });
    }

    let present_category_ids: Vec<i64> = {
        let mut ids: Vec<i64> = dishes.iter().map(|d| d.category_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };

    let config = resolve_config(catalogue, &present_category_ids, constraint_overrides).await?;

    let mut adjustments = config.adjustments.clone();
    let mut warnings = menu_composition_warnings(&dishes);

    let mut portions: HashMap<i64, f64> = HashMap::new();

    for pool in [Pool::Protein, Pool::Accompaniment, Pool::Dessert] {
        let pool_dishes: Vec<&DishInput> = dishes.iter().filter(|d| d.pool == pool).collect();
        let pool_portions =
            process_pool(catalogue, pool, &pool_dishes, &config, &mut adjustments).await?;
        portions.extend(pool_portions);
    }

    for dish in dishes.iter().filter(|d| d.pool == Pool::Service) {
        let value = dish.fixed_portion_grams.unwrap_or(dish.default_portion_grams);
        portions.insert(dish.id, value);
    }

    let all_dishes: Vec<&DishInput> = dishes.iter().collect();
    let category_msgs =
        enforce_category_constraints(&mut portions, &all_dishes, &config.constraints);
    adjustments.extend(category_msgs);

    let non_service_dishes: Vec<&DishInput> =
        dishes.iter().filter(|d| d.pool != Pool::Service).collect();
    let mut non_service_portions: HashMap<i64, f64> = portions
        .iter()
        .filter(|(id, _)| non_service_dishes.iter().any(|d| d.id == **id))
        .map(|(&id, &grams)| (id, grams))
        .collect();
    let (global_warnings, global_adjustments) = enforce_global_constraints(
        &mut non_service_portions,
        &non_service_dishes,
        &config.constraints,
    );
    portions.extend(non_service_portions);
    warnings.extend(global_warnings);
    adjustments.extend(global_adjustments);

    if big_eaters {
        adjustments.push(format!(
            "Big eaters: all portions increased by {big_eaters_percentage:.0}%"
        ));
    }

    let big_eaters_mult = big_eaters_multiplier(big_eaters, big_eaters_percentage);
    let mut result_portions = Vec::with_capacity(dishes.len());
    let mut food_per_gent = 0.0;
    let mut food_per_lady = 0.0;
    let mut protein_per_person = 0.0;
    let mut total_food_weight = 0.0;
    let mut total_cost = 0.0;

    for dish in &dishes {
        let base = portions.get(&dish.id).copied().unwrap_or(0.0);
        let e = expand_dish(base, guest_mix, config.ladies_multiplier, big_eaters_mult);

        let cost_per_gent = round_to(e.grams_per_gent * dish.cost_per_gram, 2);
        let dish_total_cost = round_to(e.total_grams * dish.cost_per_gram, 2);

        result_portions.push(PortionResult {
            dish_id: dish.id,
            dish_name: dish.name.clone(),
            category: dish.category_name.clone(),
            protein_type: dish.protein_type,
            pool: dish.pool,
            unit: dish.unit,
            grams_per_person: e.grams_per_person,
            grams_per_gent: e.grams_per_gent,
            grams_per_lady: e.grams_per_lady,
            total_grams: e.total_grams,
            cost_per_gent,
            total_cost: dish_total_cost,
        });

        food_per_gent += e.grams_per_gent;
        food_per_lady += e.grams_per_lady;
        total_food_weight += e.total_grams;
        total_cost += dish_total_cost;
        if dish.pool == Pool::Protein {
            protein_per_person += e.grams_per_person;
        }
    }

    let total_people = guest_mix.total();
    let food_per_person = if total_people > 0 {
        round_to(total_food_weight / total_people as f64, 1)
    } else {
        0.0
    };

    let totals = Totals {
        food_per_gent_grams: round_to(food_per_gent, 1),
        food_per_lady_grams: round_to(food_per_lady, 1),
        food_per_person_grams: food_per_person,
        protein_per_person_grams: round_to(protein_per_person, 1),
        total_food_weight_grams: round_to(total_food_weight, 1),
        total_cost: round_to(total_cost, 2),
    };

    Ok(CalculationResult {
        portions: result_portions,
        totals,
        warnings,
        adjustments_applied: adjustments,
        source: None,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use crate::catalogue::DishSurcharge;
    use crate::models::{
        BudgetProfile, CategoryConstraint, CombinationRule, GlobalConfig, GlobalConstraint,
        GuestProfile, MenuDishPortion, MenuTemplate, MenuTemplatePriceTier,
    };
    use crate::sample_data::{
        accompaniment_pool_baselines, bbq_dish, curry_dish, protein_pool_baselines, rice_dish,
        BBQ_CATEGORY_ID, CURRY_CATEGORY_ID, RICE_CATEGORY_ID,
    };

    use super::*;

    struct FakeCatalogue {
        dishes: Vec<DishInput>,
    }

    #[async_trait]
    impl CatalogueAdapter for FakeCatalogue {
        async fn load_dishes(&self, ids: &[i64]) -> Result<Vec<DishInput>> {
            Ok(self
                .dishes
                .iter()
                .filter(|d| ids.contains(&d.id))
                .cloned()
                .collect())
        }

        async fn pool_baselines(&self, pool: Pool) -> Result<HashMap<i64, f64>> {
            Ok(match pool {
                Pool::Protein => protein_pool_baselines(),
                Pool::Accompaniment => accompaniment_pool_baselines(),
                _ => HashMap::new(),
            })
        }

        async fn display_name(&self, category_id: i64) -> Result<String> {
            Ok(match category_id {
                CURRY_CATEGORY_ID => "curry".to_string(),
                BBQ_CATEGORY_ID => "dry barbecue".to_string(),
                RICE_CATEGORY_ID => "rice".to_string(),
                other => format!("cat_{other}"),
            })
        }

        async fn global_config(&self) -> Result<GlobalConfig> {
            Ok(GlobalConfig::default())
        }

        async fn global_constraint(&self) -> Result<GlobalConstraint> {
            Ok(GlobalConstraint::default())
        }

        async fn category_constraints(&self) -> Result<Vec<CategoryConstraint>> {
            Ok(Vec::new())
        }

        async fn budget_profiles(&self) -> Result<Vec<BudgetProfile>> {
            Ok(Vec::new())
        }

        async fn guest_profiles(&self) -> Result<Vec<GuestProfile>> {
            Ok(Vec::new())
        }

        async fn combination_rules(&self) -> Result<Vec<CombinationRule>> {
            Ok(Vec::new())
        }

        async fn pool_category_names_ordered(&self, _pool: Pool) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn price_rounding_step(&self) -> Result<f64> {
            Ok(1.0)
        }

        async fn menu_template(&self, _id: i64) -> Result<Option<MenuTemplate>> {
            Ok(None)
        }

        async fn active_menu_templates(&self) -> Result<Vec<MenuTemplate>> {
            Ok(Vec::new())
        }

        async fn menu_portions(&self, _menu_id: i64) -> Result<Vec<MenuDishPortion>> {
            Ok(Vec::new())
        }

        async fn menu_price_tiers(&self, _menu_id: i64) -> Result<Vec<MenuTemplatePriceTier>> {
            Ok(Vec::new())
        }

        async fn dish_surcharge(&self, _dish_id: i64) -> Result<DishSurcharge> {
            Ok(DishSurcharge::default())
        }

        async fn category_surcharge(&self, _category_id: i64) -> Result<DishSurcharge> {
            Ok(DishSurcharge::default())
        }
    }

    fn guests(gents: u32, ladies: u32) -> GuestMix {
        GuestMix { gents, ladies }
    }

    #[tokio::test]
    async fn single_curry_absorbs_absent_bbq_share() {
        let catalogue = FakeCatalogue {
            dishes: vec![curry_dish(1, "Chicken Karahi", 1.0)],
        };

        let result = calculate_portions(
            &catalogue,
            &[1],
            guests(50, 50),
            false,
            20.0,
            ConstraintOverrides::default(),
        )
        .await
        .unwrap();

        // 160g own budget + 70% of bbq's absent 180g baseline = 286g.
        assert_eq!(result.portions.len(), 1);
        assert_eq!(result.portions[0].grams_per_person, 286.0);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("Menu has no rice")));
    }

    #[tokio::test]
    async fn curry_and_rice_split_their_own_pools() {
        let catalogue = FakeCatalogue {
            dishes: vec![curry_dish(1, "Chicken Karahi", 1.0), rice_dish(2, "Pulao", 1.0)],
        };

        let result = calculate_portions(
            &catalogue,
            &[1, 2],
            guests(50, 50),
            false,
            20.0,
            ConstraintOverrides::default(),
        )
        .await
        .unwrap();

        let curry = result.portions.iter().find(|p| p.dish_id == 1).unwrap();
        let rice = result.portions.iter().find(|p| p.dish_id == 2).unwrap();
        assert_eq!(curry.grams_per_person, 286.0);
        assert_eq!(rice.grams_per_person, 100.0);
        assert!(!result.warnings.iter().any(|w| w.contains("No rice")));
        assert!(!result.warnings.iter().any(|w| w.contains("No curry")));
    }

    #[tokio::test]
    async fn over_ceiling_protein_allocation_is_scaled_down() {
        let catalogue = FakeCatalogue {
            dishes: vec![
                bbq_dish(1, "Beef Boti", 2.0),
                bbq_dish(2, "Chicken Tikka", 1.0),
                bbq_dish(3, "Reshmi Kabab", 1.0),
                curry_dish(4, "Chicken Karahi", 1.0),
                curry_dish(5, "Mutton Curry", 1.0),
            ],
        };

        let result = calculate_portions(
            &catalogue,
            &[1, 2, 3, 4, 5],
            guests(50, 50),
            false,
            20.0,
            ConstraintOverrides::default(),
        )
        .await
        .unwrap();

        let protein_total: f64 = result
            .portions
            .iter()
            .filter(|p| p.pool == Pool::Protein)
            .map(|p| p.grams_per_person)
            .sum();
        assert!(protein_total <= 440.01);
        assert!(result
            .adjustments_applied
            .iter()
            .any(|a| a.contains("limit")));
    }

    #[tokio::test]
    async fn empty_dish_list_yields_no_active_dishes_warning() {
        let catalogue = FakeCatalogue { dishes: vec![] };

        let result = calculate_portions(
            &catalogue,
            &[99],
            guests(10, 10),
            false,
            20.0,
            ConstraintOverrides::default(),
        )
        .await
        .unwrap();

        assert!(result.portions.is_empty());
        assert_eq!(result.warnings, vec!["No active dishes found".to_string()]);
    }

    #[tokio::test]
    async fn big_eaters_scale_gent_portions_up() {
        let catalogue = FakeCatalogue {
            dishes: vec![curry_dish(1, "Chicken Karahi", 1.0)],
        };

        let result = calculate_portions(
            &catalogue,
            &[1],
            guests(10, 0),
            true,
            20.0,
            ConstraintOverrides::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.portions[0].grams_per_gent, 343.2);
    }
}
