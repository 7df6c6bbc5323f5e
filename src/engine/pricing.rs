// src/engine/pricing.rs - Menu price adjuster (tier + surcharge/discount)
//
// Grounded in menus/views.py::MenuPriceCheckView.

use std::collections::HashSet;

use crate::catalogue::{CatalogueAdapter, DishSurcharge};
use crate::core::{EngineError, Result};
use crate::models::{MenuTemplatePriceTier, PriceAdjustment, SurchargeLine};

use super::util::round_to;

fn select_tier(tiers: &[MenuTemplatePriceTier], guest_count: u32) -> Option<&MenuTemplatePriceTier> {
    tiers
        .iter()
        .filter(|t| t.min_guests <= guest_count)
        .max_by_key(|t| t.min_guests)
}

fn round_to_step(value: f64, step: f64) -> f64 {
    if step <= 1.0 {
        return round_to(value, 2);
    }
    (value / step).round() * step
}

pub async fn price_check(
    catalogue: &dyn CatalogueAdapter,
    menu_id: i64,
    guest_count: u32,
    modified_dish_ids: &[i64],
) -> Result<PriceAdjustment> {
    let template = catalogue
        .menu_template(menu_id)
        .await?
        .filter(|t| t.is_active)
        .ok_or_else(|| EngineError::not_found(format!("menu template {menu_id} not found")))?;

    let tiers = catalogue.menu_price_tiers(menu_id).await?;
    let tier = select_tier(&tiers, guest_count)
        .ok_or_else(|| EngineError::validation("no price tier applies to this guest count"))?;

    let original_portions = catalogue.menu_portions(menu_id).await?;
    let original: HashSet<i64> = original_portions.iter().map(|p| p.dish_id).collect();
    let modified: HashSet<i64> = modified_dish_ids.iter().copied().collect();

    let mut added: Vec<i64> = modified.difference(&original).copied().collect();
    added.sort_unstable();
    let mut removed: Vec<i64> = original.difference(&modified).copied().collect();
    removed.sort_unstable();

    let all_dishes = catalogue.load_dishes(&modified_dish_ids.iter().copied().chain(removed.iter().copied()).collect::<Vec<_>>()).await?;
    let dish_by_id = |id: i64| all_dishes.iter().find(|d| d.id == id);

    let mut breakdown = Vec::new();
    let mut total_adjustment = 0.0;

    for dish_id in &added {
        let Some(dish) = dish_by_id(*dish_id) else {
            continue;
        };
        let surcharge = surcharge_for(catalogue, dish.id, dish.category_id, true).await?;
        breakdown.push(SurchargeLine {
            dish: dish.name.clone(),
            category: dish.category_name.clone(),
            kind: "addition".to_string(),
            amount: surcharge,
        });
        total_adjustment += surcharge;
    }

    for dish_id in &removed {
        let Some(dish) = dish_by_id(*dish_id) else {
            continue;
        };
        let discount = surcharge_for(catalogue, dish.id, dish.category_id, false).await?;
        breakdown.push(SurchargeLine {
            dish: dish.name.clone(),
            category: dish.category_name.clone(),
            kind: "removal".to_string(),
            amount: discount,
        });
        total_adjustment -= discount;
    }

    let rounding_step = catalogue.price_rounding_step().await?;
    let adjusted_price = round_to_step(tier.price_per_head + total_adjustment, rounding_step);

    Ok(PriceAdjustment {
        tier_price: tier.price_per_head,
        tier_label: format!("{}+ pax", tier.min_guests),
        breakdown,
        total_adjustment: round_to(total_adjustment, 2),
        adjusted_price,
    })
}

/// Per-dish override wins when set and non-zero, else falls back to the
/// dish's category default (§4.8 step 3).
async fn surcharge_for(
    catalogue: &dyn CatalogueAdapter,
    dish_id: i64,
    category_id: i64,
    is_addition: bool,
) -> Result<f64> {
    let dish_level = catalogue.dish_surcharge(dish_id).await?;
    let dish_value = if is_addition {
        dish_level.addition_surcharge
    } else {
        dish_level.removal_discount
    };
    if let Some(value) = dish_value {
        if value != 0.0 {
            return Ok(value);
        }
    }

    let category_level = catalogue.category_surcharge(category_id).await?;
    let category_value = if is_addition {
        category_level.addition_surcharge
    } else {
        category_level.removal_discount
    };
    Ok(category_value.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(min_guests: u32, price: f64) -> MenuTemplatePriceTier {
        MenuTemplatePriceTier {
            menu_id: 1,
            min_guests,
            price_per_head: price,
        }
    }

    #[test]
    fn selects_highest_applicable_tier_without_resorting() {
        let tiers = vec![tier(50, 2750.0), tier(100, 2450.0), tier(200, 2350.0)];
        assert_eq!(select_tier(&tiers, 120).unwrap().price_per_head, 2450.0);
        assert_eq!(select_tier(&tiers, 49).is_none(), true);
        assert_eq!(select_tier(&tiers, 500).unwrap().price_per_head, 2350.0);
    }

    #[test]
    fn rounds_to_configured_step() {
        assert_eq!(round_to_step(2526.3, 5.0), 2525.0);
        assert_eq!(round_to_step(2526.3, 1.0), 2526.3);
    }
}
