// src/models/result.rs - Output shapes for calculate / check-portions / price-check

use serde::{Deserialize, Serialize};

use super::dish::{Pool, ProteinType, Unit};

/// Per-dish row in a `/calculate` or `/menus/{id}/preview` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortionResult {
    pub dish_id: i64,
    pub dish_name: String,
    pub category: String,
    pub protein_type: ProteinType,
    pub pool: Pool,
    pub unit: Unit,
    pub grams_per_person: f64,
    pub grams_per_gent: f64,
    pub grams_per_lady: f64,
    pub total_grams: f64,
    pub cost_per_gent: f64,
    pub total_cost: f64,
}

/// Per-dish row in a `/check-portions` `user_portions_expanded` list — same
/// expansion as `PortionResult` minus cost fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedPortion {
    pub dish_id: i64,
    pub dish_name: String,
    pub category: String,
    pub pool: Pool,
    pub unit: Unit,
    pub grams_per_person: f64,
    pub grams_per_gent: f64,
    pub grams_per_lady: f64,
    pub total_grams: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub food_per_gent_grams: f64,
    pub food_per_lady_grams: f64,
    pub food_per_person_grams: f64,
    pub protein_per_person_grams: f64,
    pub total_food_weight_grams: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserTotals {
    pub food_per_gent_grams: f64,
    pub food_per_lady_grams: f64,
    pub food_per_person_grams: f64,
    pub total_food_weight_grams: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub portions: Vec<PortionResult>,
    pub totals: Totals,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub adjustments_applied: Vec<String>,
    /// Present and set to `"template"` only by the preview endpoint (§4.9).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    PoolCeiling,
    BelowMinimum,
    AboveMaximum,
    CategoryTotal,
    MaxTotalFood,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationSeverity {
    Warning,
    Error,
}

/// A single checker finding. The `context` map carries the type-specific
/// fields of spec.md §4.7/§6 (dish_id, pool, total, ceiling, ...) since they
/// vary per `ViolationType` and the wire shape is flat per-type rather than
/// a tagged union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationType,
    pub severity: ViolationSeverity,
    pub message: String,
    #[serde(flatten)]
    pub context: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub dish_id: i64,
    pub dish_name: String,
    pub category: String,
    pub pool: Pool,
    pub unit: Unit,
    pub user_grams: f64,
    pub engine_grams: f64,
    pub delta_grams: f64,
    pub delta_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub violations: Vec<Violation>,
    pub user_portions_expanded: Vec<ExpandedPortion>,
    pub engine_portions: Vec<PortionResult>,
    pub comparison: Vec<ComparisonRow>,
    pub user_totals: UserTotals,
    pub engine_totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeLine {
    pub dish: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String, // "addition" | "removal"
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub tier_price: f64,
    pub tier_label: String,
    pub breakdown: Vec<SurchargeLine>,
    pub total_adjustment: f64,
    pub adjusted_price: f64,
}
