// src/engine/expand.rs - Guest-mix expansion shared by calculate/check/preview
//
// Grounded in the tail half of calculator/engine/calculator.py::calculate_portions
// and the mirrored block in calculator/engine/checker.py. Kept here once
// rather than duplicated in three callers, since §4.6/§4.7/§4.9 specify the
// identical expansion arithmetic.

use crate::models::GuestMix;

use super::util::round_to;

pub struct ExpandedDish {
    pub grams_per_gent: f64,
    pub grams_per_lady: f64,
    pub total_grams: f64,
    pub grams_per_person: f64,
}

/// `portion` is the baseline per-person grams before guest-mix and
/// big-eaters scaling are applied.
pub fn expand_dish(
    portion: f64,
    guests: GuestMix,
    ladies_mult: f64,
    big_eaters_mult: f64,
) -> ExpandedDish {
    let grams_per_gent = round_to(portion * big_eaters_mult, 1);
    let grams_per_lady = round_to(grams_per_gent * ladies_mult, 1);

    let total_people = guests.total();
    let total_grams = grams_per_gent * guests.gents as f64 + grams_per_lady * guests.ladies as f64;
    let grams_per_person = if total_people > 0 {
        round_to(total_grams / total_people as f64, 1)
    } else {
        0.0
    };

    ExpandedDish {
        grams_per_gent,
        grams_per_lady,
        total_grams: round_to(total_grams, 1),
        grams_per_person,
    }
}

pub fn big_eaters_multiplier(big_eaters: bool, percentage: f64) -> f64 {
    if big_eaters {
        1.0 + percentage / 100.0
    } else {
        1.0
    }
}
