// src/models/dish.rs - Flattened dish snapshot and its closed-enum tags
//
// Grounded in calculator/engine/models.py::DishInput. The engine never
// reaches from a dish back into its category object — category attributes
// are copied onto the dish snapshot up front (see catalogue::sqlite).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Protein,
    Accompaniment,
    Dessert,
    Service,
}

impl Pool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pool::Protein => "protein",
            Pool::Accompaniment => "accompaniment",
            Pool::Dessert => "dessert",
            Pool::Service => "service",
        }
    }

    pub fn is_budgeted(&self) -> bool {
        !matches!(self, Pool::Service)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kg,
    Qty,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Qty => "qty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProteinType {
    Chicken,
    Mutton,
    Lamb,
    Beef,
    Veal,
    Fish,
    None,
}

impl ProteinType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProteinType::Chicken => "chicken",
            ProteinType::Mutton => "mutton",
            ProteinType::Lamb => "lamb",
            ProteinType::Beef => "beef",
            ProteinType::Veal => "veal",
            ProteinType::Fish => "fish",
            ProteinType::None => "none",
        }
    }
}

/// Immutable snapshot of a dish passed into the engine. Built once by the
/// catalogue adapter; the engine never re-reads the catalogue mid-calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishInput {
    pub id: i64,
    pub name: String,

    pub category_id: i64,
    pub category_name: String,
    pub pool: Pool,
    pub unit: Unit,

    pub default_portion_grams: f64,
    pub baseline_budget_grams: f64,
    pub min_per_dish_grams: f64,
    pub fixed_portion_grams: Option<f64>,

    pub popularity: f64,
    pub cost_per_gram: f64,

    pub protein_type: ProteinType,
    pub is_vegetarian: bool,
    pub protein_is_additive: bool,
}
