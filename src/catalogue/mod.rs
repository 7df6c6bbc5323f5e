// src/catalogue/mod.rs - Catalogue adapter contract
//
// The engine consumes catalogue data only through this trait (§4.1). The
// one concrete implementation shipped in this crate is `sqlite::SqliteCatalogue`
// — a thin, real CRUD collaborator, not the focus of this crate's design.

pub mod sqlite;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::core::Result;
use crate::models::{
    BudgetProfile, CategoryConstraint, CombinationRule, DishInput, GlobalConfig,
    GlobalConstraint, GuestProfile, MenuDishPortion, MenuTemplate, MenuTemplatePriceTier,
};

/// Per-dish override used only by the price adjuster (§4.8); not part of
/// `DishInput` since the portioning engine never consumes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DishSurcharge {
    pub addition_surcharge: Option<f64>,
    pub removal_discount: Option<f64>,
}

#[async_trait]
pub trait CatalogueAdapter: Send + Sync {
    /// Resolve dish ids to flattened `DishInput` snapshots. Unknown or
    /// inactive ids are skipped silently — an empty result is valid (§4.1).
    async fn load_dishes(&self, ids: &[i64]) -> Result<Vec<DishInput>>;

    /// Baseline grams for every category belonging to `pool`, present in a
    /// menu or not — used for absent-category redistribution (§4.3b).
    async fn pool_baselines(&self, pool: crate::models::Pool) -> Result<HashMap<i64, f64>>;

    /// Display name for a category id, used only in adjustment messages.
    async fn display_name(&self, category_id: i64) -> Result<String>;

    async fn global_config(&self) -> Result<GlobalConfig>;

    async fn global_constraint(&self) -> Result<GlobalConstraint>;

    async fn category_constraints(&self) -> Result<Vec<CategoryConstraint>>;

    async fn budget_profiles(&self) -> Result<Vec<BudgetProfile>>;

    async fn guest_profiles(&self) -> Result<Vec<GuestProfile>>;

    /// Reserved — loaded but never applied by the allocator (§9).
    async fn combination_rules(&self) -> Result<Vec<CombinationRule>>;

    /// Category display names ordered by display order, restricted to a
    /// pool — used to label a profile's pool-ceiling override (§4.2).
    async fn pool_category_names_ordered(&self, pool: crate::models::Pool) -> Result<Vec<String>>;

    async fn price_rounding_step(&self) -> Result<f64>;

    async fn menu_template(&self, id: i64) -> Result<Option<MenuTemplate>>;

    async fn active_menu_templates(&self) -> Result<Vec<MenuTemplate>>;

    async fn menu_portions(&self, menu_id: i64) -> Result<Vec<MenuDishPortion>>;

    async fn menu_price_tiers(&self, menu_id: i64) -> Result<Vec<MenuTemplatePriceTier>>;

    async fn dish_surcharge(&self, dish_id: i64) -> Result<DishSurcharge>;

    async fn category_surcharge(&self, category_id: i64) -> Result<DishSurcharge>;
}
