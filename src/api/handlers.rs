// src/api/handlers.rs - axum handlers wiring DTOs to the engine
//
// Grounded in calculator/views.py (CalculateView, CheckPortionsView) and
// menus/views.py (MenuPriceCheckView, MenuTemplatePreviewView).

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use crate::core::Result;
use crate::engine;
use crate::models::{CheckResult, ComparisonRow};

use super::dto::{CalculateRequest, CheckPortionsRequest, MenuSummaryDto, PriceCheckRequest};
use super::AppState;

pub async fn calculate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CalculateRequest>,
) -> Result<Json<crate::models::CalculationResult>> {
    request.validate()?;
    info!(dish_count = request.dish_ids.len(), "running calculation");

    let result = engine::calculate_portions(
        state.catalogue.as_ref(),
        &request.dish_ids,
        request.guests,
        request.big_eaters,
        request.big_eaters_percentage,
        request.constraint_overrides,
    )
    .await?;

    Ok(Json(result))
}

pub async fn check_portions(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CheckPortionsRequest>,
) -> Result<Json<CheckResult>> {
    request.validate()?;
    let calc = &request.calculate;

    let dishes = state.catalogue.load_dishes(&calc.dish_ids).await?;
    let present_category_ids: Vec<i64> = {
        let mut ids: Vec<i64> = dishes.iter().map(|d| d.category_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let config = engine::resolve_config(
        state.catalogue.as_ref(),
        &present_category_ids,
        calc.constraint_overrides,
    )
    .await?;

    let checker_output = engine::check_user_portions(
        &request.user_portions_map(),
        &dishes,
        &config.constraints,
        &config.pool_ceilings,
        calc.guests,
        config.ladies_multiplier,
        calc.big_eaters,
        calc.big_eaters_percentage,
    );

    let engine_result = engine::calculate_portions(
        state.catalogue.as_ref(),
        &calc.dish_ids,
        calc.guests,
        calc.big_eaters,
        calc.big_eaters_percentage,
        calc.constraint_overrides,
    )
    .await?;

    let user_portions = request.user_portions_map();
    let comparison: Vec<ComparisonRow> = engine_result
        .portions
        .iter()
        .map(|engine_portion| {
            let user_grams = user_portions
                .get(&engine_portion.dish_id)
                .copied()
                .unwrap_or(0.0);
            let delta_grams = user_grams - engine_portion.grams_per_person;
            let delta_percent = if engine_portion.grams_per_person > 0.0 {
                (delta_grams / engine_portion.grams_per_person) * 100.0
            } else {
                0.0
            };
            ComparisonRow {
                dish_id: engine_portion.dish_id,
                dish_name: engine_portion.dish_name.clone(),
                category: engine_portion.category.clone(),
                pool: engine_portion.pool,
                unit: engine_portion.unit,
                user_grams,
                engine_grams: engine_portion.grams_per_person,
                delta_grams,
                delta_percent,
            }
        })
        .collect();

    Ok(Json(CheckResult {
        violations: checker_output.violations,
        user_portions_expanded: checker_output.user_portions_expanded,
        engine_portions: engine_result.portions,
        comparison,
        user_totals: checker_output.totals,
        engine_totals: engine_result.totals,
    }))
}

pub async fn price_check(
    State(state): State<Arc<AppState>>,
    Path(menu_id): Path<i64>,
    Json(request): Json<PriceCheckRequest>,
) -> Result<Json<crate::models::PriceAdjustment>> {
    request.validate()?;
    let adjustment = engine::price_check(
        state.catalogue.as_ref(),
        menu_id,
        request.guest_count,
        &request.dish_ids,
    )
    .await?;
    Ok(Json(adjustment))
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(menu_id): Path<i64>,
) -> Result<Json<crate::models::CalculationResult>> {
    let result = engine::preview_menu(state.catalogue.as_ref(), menu_id).await?;
    Ok(Json(result))
}

pub async fn list_menus(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MenuSummaryDto>>> {
    let templates = state.catalogue.active_menu_templates().await?;
    Ok(Json(
        templates
            .into_iter()
            .map(|t| MenuSummaryDto {
                id: t.id,
                name: t.name,
                menu_type: t.menu_type,
                default_gents: t.default_gents,
                default_ladies: t.default_ladies,
            })
            .collect(),
    ))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
