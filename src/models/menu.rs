// src/models/menu.rs - Menu template, stored portion snapshots, price tiers
//
// Grounded in menus/models.py (MenuTemplate, MenuDishPortion) plus the
// MenuTemplatePriceTier used by menus/views.py::MenuPriceCheckView, which
// the distilled dataclasses omitted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuTemplate {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub menu_type: String,
    pub default_gents: u32,
    pub default_ladies: u32,
    /// Set once at creation (`created_at = auto_now_add` in the original
    /// `menus/models.py`); the engine never reads this, it exists because a
    /// real catalogue row carries it.
    pub created_at: DateTime<Utc>,
}

/// Snapshot: pre-calculated portion for a dish inside a template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuDishPortion {
    pub menu_id: i64,
    pub dish_id: i64,
    pub portion_grams: f64,
}

/// `min_guests` is unique per template; the highest tier with
/// `min_guests <= guest_count` is selected (§4.8). Tiers are expected to be
/// non-increasing in `price_per_head` as `min_guests` grows — the selector
/// never re-sorts to enforce this, it simply picks by threshold (§8
/// property 8).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MenuTemplatePriceTier {
    pub menu_id: i64,
    pub min_guests: u32,
    pub price_per_head: f64,
}
