use serde::{Deserialize, Serialize};

/// Workshop-wide cost settings, reused across every job priced with them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    pub filament_price_per_kg: f64,
    pub electricity_price_per_kwh: f64,
    pub printer_power_watts: f64,
    pub labour_rate_per_hour: f64,
    pub prep_time_minutes: f64,
    pub cleanup_time_minutes: f64,
    pub plate_change_time_minutes: f64,
    pub remote_check_minutes_per_hour: f64,
    pub has_automation: bool,
    /// Plates the automation can run unattended per job (ignored without automation)
    pub automated_plate_capacity: u32,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            filament_price_per_kg: 25.0,
            electricity_price_per_kwh: 0.30,
            printer_power_watts: 250.0,
            labour_rate_per_hour: 30.0,
            prep_time_minutes: 10.0,
            cleanup_time_minutes: 10.0,
            plate_change_time_minutes: 5.0,
            remote_check_minutes_per_hour: 2.0,
            has_automation: false,
            automated_plate_capacity: 4,
        }
    }
}

/// A single print job to be priced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInput {
    pub model_name: Option<String>,
    pub reference_url: Option<String>,
    pub filament_grams: f64,
    pub print_time_hours: f64,
    pub plate_count: i64,
    pub sale_price: f64,
    /// Desired margin, 0-100
    pub target_margin_percent: Option<f64>,
}

impl ModelInput {
    /// Name for display, falling back to `default` when the job is unnamed
    pub fn label<'a>(&'a self, default: &'a str) -> &'a str {
        self.model_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(default)
    }
}

/// Every intermediate and final figure of a cost calculation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub filament_kg: f64,
    pub material_cost: f64,
    pub printer_power_kw: f64,
    pub energy_cost: f64,
    pub base_human_minutes: f64,
    pub plate_change_minutes: f64,
    pub remote_check_minutes: f64,
    pub total_human_minutes: f64,
    pub total_human_hours: f64,
    pub labour_cost: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub profit_margin_percent: Option<f64>,
    pub remote_friendly: bool,
    pub recommended_sale_price_for_target_margin: Option<f64>,
}

impl CostBreakdown {
    /// Margin formatted for display, "N/A" when the sale price is not positive
    pub fn margin_text(&self) -> String {
        match self.profit_margin_percent {
            Some(margin) => format!("{:.1}%", margin),
            None => "N/A".to_string(),
        }
    }
}
