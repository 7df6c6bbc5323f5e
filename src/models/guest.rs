// src/models/guest.rs - Guest mix counts

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GuestMix {
    #[serde(default)]
    pub gents: u32,
    #[serde(default)]
    pub ladies: u32,
}

impl GuestMix {
    pub fn total(&self) -> u32 {
        self.gents + self.ladies
    }
}
