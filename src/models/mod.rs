// src/models/mod.rs - Domain model exports

pub mod config;
pub mod dish;
pub mod guest;
pub mod menu;
pub mod result;

pub use config::{
    BudgetProfile, CategoryConstraint, CombinationRule, ConstraintOverrides, GlobalConfig,
    GlobalConstraint, GuestProfile, ResolvedConstraints,
};
pub use dish::{DishInput, Pool, ProteinType, Unit};
pub use guest::GuestMix;
pub use menu::{MenuDishPortion, MenuTemplate, MenuTemplatePriceTier};
pub use result::{
    CalculationResult, CheckResult, ComparisonRow, ExpandedPortion, PortionResult,
    PriceAdjustment, SurchargeLine, Totals, UserTotals, Violation, ViolationSeverity,
    ViolationType,
};
