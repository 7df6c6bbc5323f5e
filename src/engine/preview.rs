// src/engine/preview.rs - Reconstruct a result from stored template portions
//
// Grounded in menus/views.py::MenuTemplatePreviewView (§4.9). Unlike
// `calculator::calculate_portions`, this never runs the allocator — it
// expands the snapshot portions already stored against the template.

use crate::catalogue::CatalogueAdapter;
use crate::core::{EngineError, Result};
use crate::models::{CalculationResult, GuestMix, PortionResult, Totals};

use super::expand::expand_dish;
use super::util::round_to;

pub async fn preview_menu(
    catalogue: &dyn CatalogueAdapter,
    menu_id: i64,
) -> Result<CalculationResult> {
    let template = catalogue
        .menu_template(menu_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(|| EngineError::not_found(format!("menu template {menu_id} not found")))?;

    let stored_portions = catalogue.menu_portions(menu_id).await?;
    let dish_ids: Vec<i64> = stored_portions.iter().map(|p| p.dish_id).collect();
    let dishes = catalogue.load_dishes(&dish_ids).await?;

    let guests = GuestMix {
        gents: template.default_gents,
        ladies: template.default_ladies,
    };

    let guest_profiles = catalogue.guest_profiles().await?;
    let ladies_multiplier = guest_profiles
        .iter()
        .find(|p| p.name == "ladies")
        .map(|p| p.portion_multiplier)
        .unwrap_or(1.0);

    let mut portions = Vec::with_capacity(dishes.len());
    let mut food_per_gent = 0.0;
    let mut food_per_lady = 0.0;
    let mut protein_per_person = 0.0;
    let mut total_food_weight = 0.0;
    let mut total_cost = 0.0;

    for dish in &dishes {
        let stored = stored_portions
            .iter()
            .find(|p| p.dish_id == dish.id)
            .map(|p| p.portion_grams)
            .unwrap_or(0.0);
        let e = expand_dish(stored, guests, ladies_multiplier, 1.0);

        let cost_per_gent = round_to(e.grams_per_gent * dish.cost_per_gram, 2);
        let dish_total_cost = round_to(e.total_grams * dish.cost_per_gram, 2);

        portions.push(PortionResult {
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
        if dish.pool == crate::models::Pool::Protein {
            protein_per_person += e.grams_per_person;
        }
    }

    let total_people = guests.total();
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
        portions,
        totals,
        warnings: Vec::new(),
        adjustments_applied: vec!["showing stored template portions".to_string()],
        source: Some("template".to_string()),
    })
}
