// src/api/dto.rs - Wire shapes for the three engine-facing endpoints (§6)
//
// Grounded in calculator/serializers.py for field names and validation
// rules (non-empty dish_ids, user_portions dish-id-set match).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::core::{EngineError, Result};
use crate::models::{ConstraintOverrides, GuestMix};

fn default_big_eaters_percentage() -> f64 {
    20.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct CalculateRequest {
    pub dish_ids: Vec<i64>,
    pub guests: GuestMix,
    #[serde(default)]
    pub big_eaters: bool,
    #[serde(default = "default_big_eaters_percentage")]
    pub big_eaters_percentage: f64,
    #[serde(default)]
    pub constraint_overrides: ConstraintOverrides,
}

impl CalculateRequest {
    pub fn validate(&self) -> Result<()> {
        if self.dish_ids.is_empty() {
            return Err(EngineError::validation("dish_ids must contain at least one item"));
        }
        if !(0.0..=100.0).contains(&self.big_eaters_percentage) {
            return Err(EngineError::validation(
                "big_eaters_percentage must be between 0 and 100",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPortionDto {
    pub dish_id: i64,
    pub grams_per_person: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckPortionsRequest {
    #[serde(flatten)]
    pub calculate: CalculateRequest,
    pub user_portions: Vec<UserPortionDto>,
}

impl CheckPortionsRequest {
    pub fn validate(&self) -> Result<()> {
        self.calculate.validate()?;

        let dish_ids: std::collections::HashSet<i64> =
            self.calculate.dish_ids.iter().copied().collect();
        let portion_ids: std::collections::HashSet<i64> =
            self.user_portions.iter().map(|p| p.dish_id).collect();
        if dish_ids != portion_ids {
            return Err(EngineError::validation(
                "user_portions dish ids must exactly match dish_ids",
            ));
        }

        for portion in &self.user_portions {
            if portion.grams_per_person < 0.0 {
                return Err(EngineError::validation(
                    "user_portions grams_per_person must be non-negative",
                ));
            }
        }

        Ok(())
    }

    pub fn user_portions_map(&self) -> HashMap<i64, f64> {
        self.user_portions
            .iter()
            .map(|p| (p.dish_id, p.grams_per_person))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceCheckRequest {
    pub guest_count: u32,
    pub dish_ids: Vec<i64>,
}

impl PriceCheckRequest {
    pub fn validate(&self) -> Result<()> {
        if self.guest_count < 1 {
            return Err(EngineError::validation("guest_count must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MenuSummaryDto {
    pub id: i64,
    pub name: String,
    pub menu_type: String,
    pub default_gents: u32,
    pub default_ladies: u32,
}
