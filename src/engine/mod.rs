// src/engine/mod.rs - Portioning engine: pure allocator, checker, price adjuster
//
// No module in this tree performs I/O; catalogue reads happen at the
// `api::handlers` boundary and are passed in as plain structs (§5).

pub mod baseline;
pub mod calculator;
pub mod checker;
pub mod constraints;
pub mod expand;
pub mod preview;
pub mod pricing;
pub mod profile;
pub mod util;

pub use calculator::{calculate_portions, resolve_config, PoolCeilings, ResolvedConfig};
pub use checker::{check_user_portions, CheckerOutput};
pub use preview::preview_menu;
pub use pricing::price_check;
