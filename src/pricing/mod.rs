pub mod calculator;
pub mod guidance;
pub mod models;

pub use calculator::{calculate_costs, CostCalculator};
pub use guidance::{PriceGuidance, ProfitStatus};
pub use models::{CostBreakdown, EnvironmentSettings, ModelInput};
