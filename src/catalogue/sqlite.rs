// src/catalogue/sqlite.rs - SQLite-backed CatalogueAdapter
//
// Grounded in backend/src/database.rs's DatabaseManager: a pool wrapper that
// creates its own schema on connect and exposes one method per query shape.
// The schema and its completeness are not this crate's subject — it exists
// to give the engine something real to read from.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{sqlite::SqlitePool, Row};
use tracing::info;

use crate::core::{EngineError, Result};
use crate::models::{
    BudgetProfile, CategoryConstraint, CombinationRule, DishInput, GlobalConfig,
    GlobalConstraint, GuestProfile, MenuDishPortion, MenuTemplate, MenuTemplatePriceTier, Pool,
    ProteinType, Unit,
};

use super::{CatalogueAdapter, DishSurcharge};

pub struct SqliteCatalogue {
    pool: SqlitePool,
}

fn parse_pool(value: &str) -> Pool {
    match value {
        "protein" => Pool::Protein,
        "accompaniment" => Pool::Accompaniment,
        "dessert" => Pool::Dessert,
        _ => Pool::Service,
    }
}

fn parse_unit(value: &str) -> Unit {
    match value {
        "qty" => Unit::Qty,
        _ => Unit::Kg,
    }
}

fn parse_protein_type(value: &str) -> ProteinType {
    match value {
        "chicken" => ProteinType::Chicken,
        "mutton" => ProteinType::Mutton,
        "lamb" => ProteinType::Lamb,
        "beef" => ProteinType::Beef,
        "veal" => ProteinType::Veal,
        "fish" => ProteinType::Fish,
        _ => ProteinType::None,
    }
}

impl SqliteCatalogue {
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("connecting to catalogue database: {}", database_url);
        let pool = SqlitePool::connect(database_url).await?;
        let catalogue = Self { pool };
        catalogue.create_tables().await?;
        catalogue.seed_defaults().await?;
        Ok(catalogue)
    }

    /// Exposed for test harnesses that need to seed rows directly; the
    /// engine itself only ever reaches the database through the trait
    /// methods below.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn create_tables(&self) -> Result<()> {
        info!("creating catalogue tables");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                pool TEXT NOT NULL,
                display_order INTEGER NOT NULL DEFAULT 0,
                baseline_budget_grams REAL NOT NULL DEFAULT 0,
                addition_surcharge REAL,
                removal_discount REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS dishes (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                category_id INTEGER NOT NULL REFERENCES categories(id),
                unit TEXT NOT NULL,
                default_portion_grams REAL NOT NULL,
                min_per_dish_grams REAL NOT NULL,
                fixed_portion_grams REAL,
                popularity REAL NOT NULL DEFAULT 1.0,
                cost_per_gram REAL NOT NULL DEFAULT 0,
                protein_type TEXT NOT NULL DEFAULT 'none',
                is_vegetarian BOOLEAN NOT NULL DEFAULT 0,
                protein_is_additive BOOLEAN NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                addition_surcharge REAL,
                removal_discount REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS global_config (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                popularity_enabled BOOLEAN NOT NULL,
                popularity_strength REAL NOT NULL,
                protein_pool_ceiling_grams REAL NOT NULL,
                accompaniment_pool_ceiling_grams REAL NOT NULL,
                dessert_pool_ceiling_grams REAL NOT NULL,
                dish_growth_rate REAL NOT NULL,
                absent_redistribution_fraction REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS global_constraint (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                max_total_food_per_person_grams REAL NOT NULL,
                min_portion_per_dish_grams REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS category_constraints (
                category_id INTEGER PRIMARY KEY REFERENCES categories(id),
                min_portion_grams REAL,
                max_portion_grams REAL,
                max_total_category_grams REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS budget_profiles (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                is_default BOOLEAN NOT NULL DEFAULT 0,
                protein_pool_ceiling_grams REAL,
                accompaniment_pool_ceiling_grams REAL,
                dessert_pool_ceiling_grams REAL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS budget_profile_categories (
                profile_id INTEGER NOT NULL REFERENCES budget_profiles(id),
                category_id INTEGER NOT NULL REFERENCES categories(id),
                PRIMARY KEY (profile_id, category_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guest_profiles (
                name TEXT PRIMARY KEY,
                portion_multiplier REAL NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS combination_rules (
                id INTEGER PRIMARY KEY,
                category_ids TEXT NOT NULL,
                reduction_factor REAL NOT NULL,
                description TEXT NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_templates (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                is_active BOOLEAN NOT NULL DEFAULT 1,
                menu_type TEXT NOT NULL DEFAULT '',
                default_gents INTEGER NOT NULL DEFAULT 0,
                default_ladies INTEGER NOT NULL DEFAULT 0,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_dish_portions (
                menu_id INTEGER NOT NULL REFERENCES menu_templates(id),
                dish_id INTEGER NOT NULL REFERENCES dishes(id),
                portion_grams REAL NOT NULL,
                PRIMARY KEY (menu_id, dish_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_price_tiers (
                menu_id INTEGER NOT NULL REFERENCES menu_templates(id),
                min_guests INTEGER NOT NULL,
                price_per_head REAL NOT NULL,
                PRIMARY KEY (menu_id, min_guests)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS site_settings (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                price_rounding_step REAL NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("catalogue schema ready");
        Ok(())
    }

    async fn seed_defaults(&self) -> Result<()> {
        let config_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM global_config")
            .fetch_one(&self.pool)
            .await?;
        if config_count == 0 {
            let gc = GlobalConfig::default();
            sqlx::query(
                r#"
                INSERT INTO global_config
                (id, popularity_enabled, popularity_strength, protein_pool_ceiling_grams,
                 accompaniment_pool_ceiling_grams, dessert_pool_ceiling_grams,
                 dish_growth_rate, absent_redistribution_fraction)
                VALUES (1, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(gc.popularity_enabled)
            .bind(gc.popularity_strength)
            .bind(gc.protein_pool_ceiling_grams)
            .bind(gc.accompaniment_pool_ceiling_grams)
            .bind(gc.dessert_pool_ceiling_grams)
            .bind(gc.dish_growth_rate)
            .bind(gc.absent_redistribution_fraction)
            .execute(&self.pool)
            .await?;
        }

        let constraint_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM global_constraint")
            .fetch_one(&self.pool)
            .await?;
        if constraint_count == 0 {
            let gc = GlobalConstraint::default();
            sqlx::query(
                "INSERT INTO global_constraint (id, max_total_food_per_person_grams, min_portion_per_dish_grams) VALUES (1, ?, ?)",
            )
            .bind(gc.max_total_food_per_person_grams)
            .bind(gc.min_portion_per_dish_grams)
            .execute(&self.pool)
            .await?;
        }

        let settings_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM site_settings")
            .fetch_one(&self.pool)
            .await?;
        if settings_count == 0 {
            sqlx::query("INSERT INTO site_settings (id, price_rounding_step) VALUES (1, 1)")
                .execute(&self.pool)
                .await?;
        }

        let guest_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guest_profiles")
            .fetch_one(&self.pool)
            .await?;
        if guest_count == 0 {
            sqlx::query("INSERT INTO guest_profiles (name, portion_multiplier) VALUES ('ladies', 1.0)")
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogueAdapter for SqliteCatalogue {
    async fn load_dishes(&self, ids: &[i64]) -> Result<Vec<DishInput>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
        let sql = format!(
            r#"
            SELECT d.id, d.name, d.category_id, c.name AS category_name, c.pool,
                   c.baseline_budget_grams, d.unit, d.default_portion_grams,
                   d.min_per_dish_grams, d.fixed_portion_grams, d.popularity,
                   d.cost_per_gram, d.protein_type, d.is_vegetarian, d.protein_is_additive
            FROM dishes d
            JOIN categories c ON c.id = d.category_id
            WHERE d.is_active = 1 AND d.id IN ({placeholders})
            "#
        );

        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        let mut dishes = Vec::with_capacity(rows.len());
        for row in rows {
            dishes.push(DishInput {
                id: row.get("id"),
                name: row.get("name"),
                category_id: row.get("category_id"),
                category_name: row.get("category_name"),
                pool: parse_pool(&row.get::<String, _>("pool")),
                unit: parse_unit(&row.get::<String, _>("unit")),
                default_portion_grams: row.get("default_portion_grams"),
                baseline_budget_grams: row.get("baseline_budget_grams"),
                min_per_dish_grams: row.get("min_per_dish_grams"),
                fixed_portion_grams: row.get("fixed_portion_grams"),
                popularity: row.get("popularity"),
                cost_per_gram: row.get("cost_per_gram"),
                protein_type: parse_protein_type(&row.get::<String, _>("protein_type")),
                is_vegetarian: row.get("is_vegetarian"),
                protein_is_additive: row.get("protein_is_additive"),
            });
        }
        Ok(dishes)
    }

    async fn pool_baselines(&self, pool: Pool) -> Result<HashMap<i64, f64>> {
        let rows = sqlx::query(
            "SELECT id, baseline_budget_grams FROM categories WHERE pool = ?",
        )
        .bind(pool.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("id"), row.get("baseline_budget_grams")))
            .collect())
    }

    async fn display_name(&self, category_id: i64) -> Result<String> {
        let name: Option<String> =
            sqlx::query_scalar("SELECT name FROM categories WHERE id = ?")
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(name.unwrap_or_else(|| format!("category {category_id}")))
    }

    async fn global_config(&self) -> Result<GlobalConfig> {
        let row = sqlx::query(
            r#"
            SELECT popularity_enabled, popularity_strength, protein_pool_ceiling_grams,
                   accompaniment_pool_ceiling_grams, dessert_pool_ceiling_grams,
                   dish_growth_rate, absent_redistribution_fraction
            FROM global_config WHERE id = 1
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(GlobalConfig {
            popularity_enabled: row.get("popularity_enabled"),
            popularity_strength: row.get("popularity_strength"),
            protein_pool_ceiling_grams: row.get("protein_pool_ceiling_grams"),
            accompaniment_pool_ceiling_grams: row.get("accompaniment_pool_ceiling_grams"),
            dessert_pool_ceiling_grams: row.get("dessert_pool_ceiling_grams"),
            dish_growth_rate: row.get("dish_growth_rate"),
            absent_redistribution_fraction: row.get("absent_redistribution_fraction"),
        })
    }

    async fn global_constraint(&self) -> Result<GlobalConstraint> {
        let row = sqlx::query(
            "SELECT max_total_food_per_person_grams, min_portion_per_dish_grams FROM global_constraint WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(GlobalConstraint {
            max_total_food_per_person_grams: row.get("max_total_food_per_person_grams"),
            min_portion_per_dish_grams: row.get("min_portion_per_dish_grams"),
        })
    }

    async fn category_constraints(&self) -> Result<Vec<CategoryConstraint>> {
        let rows = sqlx::query(
            "SELECT category_id, min_portion_grams, max_portion_grams, max_total_category_grams FROM category_constraints",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryConstraint {
                category_id: row.get("category_id"),
                min_portion_grams: row.get("min_portion_grams"),
                max_portion_grams: row.get("max_portion_grams"),
                max_total_category_grams: row.get("max_total_category_grams"),
            })
            .collect())
    }

    async fn budget_profiles(&self) -> Result<Vec<BudgetProfile>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, is_default, protein_pool_ceiling_grams,
                   accompaniment_pool_ceiling_grams, dessert_pool_ceiling_grams
            FROM budget_profiles ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut profiles = Vec::with_capacity(rows.len());
        for row in rows {
            let id: i64 = row.get("id");
            let category_ids: Vec<i64> = sqlx::query_scalar(
                "SELECT category_id FROM budget_profile_categories WHERE profile_id = ? ORDER BY category_id",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

            profiles.push(BudgetProfile {
                id,
                name: row.get("name"),
                category_ids,
                is_default: row.get("is_default"),
                protein_pool_ceiling_grams: row.get("protein_pool_ceiling_grams"),
                accompaniment_pool_ceiling_grams: row.get("accompaniment_pool_ceiling_grams"),
                dessert_pool_ceiling_grams: row.get("dessert_pool_ceiling_grams"),
            });
        }
        Ok(profiles)
    }

    async fn guest_profiles(&self) -> Result<Vec<GuestProfile>> {
        let rows = sqlx::query("SELECT name, portion_multiplier FROM guest_profiles")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| GuestProfile {
                name: row.get("name"),
                portion_multiplier: row.get("portion_multiplier"),
            })
            .collect())
    }

    async fn combination_rules(&self) -> Result<Vec<CombinationRule>> {
        let rows = sqlx::query(
            "SELECT category_ids, reduction_factor, description, is_active FROM combination_rules WHERE is_active = 1",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut rules = Vec::with_capacity(rows.len());
        for row in rows {
            let category_ids: String = row.get("category_ids");
            let category_ids: Vec<i64> = serde_json::from_str(&category_ids)
                .map_err(|e| EngineError::internal(format!("malformed combination rule: {e}")))?;
            rules.push(CombinationRule {
                category_ids,
                reduction_factor: row.get("reduction_factor"),
                description: row.get("description"),
                is_active: row.get("is_active"),
            });
        }
        Ok(rules)
    }

    async fn pool_category_names_ordered(&self, pool: Pool) -> Result<Vec<String>> {
        let names = sqlx::query_scalar(
            "SELECT name FROM categories WHERE pool = ? ORDER BY display_order, id",
        )
        .bind(pool.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn price_rounding_step(&self) -> Result<f64> {
        let step: Option<f64> =
            sqlx::query_scalar("SELECT price_rounding_step FROM site_settings WHERE id = 1")
                .fetch_optional(&self.pool)
                .await?;
        Ok(step.unwrap_or(1.0))
    }

    async fn menu_template(&self, id: i64) -> Result<Option<MenuTemplate>> {
        let row = sqlx::query(
            "SELECT id, name, description, is_active, menu_type, default_gents, default_ladies, created_at FROM menu_templates WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| MenuTemplate {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            is_active: row.get("is_active"),
            menu_type: row.get("menu_type"),
            default_gents: row.get::<i64, _>("default_gents") as u32,
            default_ladies: row.get::<i64, _>("default_ladies") as u32,
            created_at: row.get("created_at"),
        }))
    }

    async fn active_menu_templates(&self) -> Result<Vec<MenuTemplate>> {
        let rows = sqlx::query(
            "SELECT id, name, description, is_active, menu_type, default_gents, default_ladies, created_at FROM menu_templates WHERE is_active = 1 ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MenuTemplate {
                id: row.get("id"),
                name: row.get("name"),
                description: row.get("description"),
                is_active: row.get("is_active"),
                menu_type: row.get("menu_type"),
                default_gents: row.get::<i64, _>("default_gents") as u32,
                default_ladies: row.get::<i64, _>("default_ladies") as u32,
                created_at: row.get("created_at"),
            })
            .collect())
    }

    async fn menu_portions(&self, menu_id: i64) -> Result<Vec<MenuDishPortion>> {
        let rows = sqlx::query(
            "SELECT menu_id, dish_id, portion_grams FROM menu_dish_portions WHERE menu_id = ?",
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MenuDishPortion {
                menu_id: row.get("menu_id"),
                dish_id: row.get("dish_id"),
                portion_grams: row.get("portion_grams"),
            })
            .collect())
    }

    async fn menu_price_tiers(&self, menu_id: i64) -> Result<Vec<MenuTemplatePriceTier>> {
        let rows = sqlx::query(
            "SELECT menu_id, min_guests, price_per_head FROM menu_price_tiers WHERE menu_id = ?",
        )
        .bind(menu_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MenuTemplatePriceTier {
                menu_id: row.get("menu_id"),
                min_guests: row.get::<i64, _>("min_guests") as u32,
                price_per_head: row.get("price_per_head"),
            })
            .collect())
    }

    async fn dish_surcharge(&self, dish_id: i64) -> Result<DishSurcharge> {
        let row = sqlx::query("SELECT addition_surcharge, removal_discount FROM dishes WHERE id = ?")
            .bind(dish_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row
            .map(|row| DishSurcharge {
                addition_surcharge: row.get("addition_surcharge"),
                removal_discount: row.get("removal_discount"),
            })
            .unwrap_or_default())
    }

    async fn category_surcharge(&self, category_id: i64) -> Result<DishSurcharge> {
        let row = sqlx::query(
            "SELECT addition_surcharge, removal_discount FROM categories WHERE id = ?",
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row
            .map(|row| DishSurcharge {
                addition_surcharge: row.get("addition_surcharge"),
                removal_discount: row.get("removal_discount"),
            })
            .unwrap_or_default())
    }
}
