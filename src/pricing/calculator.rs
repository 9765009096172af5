use crate::pricing::models::{CostBreakdown, EnvironmentSettings, ModelInput};

/// Calculator bound to one set of environment settings
///
/// Holds no state beyond the settings, so a single calculator can price any
/// number of jobs, from any number of threads.
#[derive(Debug, Clone, Default)]
pub struct CostCalculator {
    settings: EnvironmentSettings,
}

impl CostCalculator {
    /// Create a new cost calculator
    pub fn new(settings: EnvironmentSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EnvironmentSettings {
        &self.settings
    }

    /// Calculate the cost breakdown for one job
    pub fn calculate(&self, model: &ModelInput) -> CostBreakdown {
        calculate_costs(&self.settings, model)
    }
}

/// Calculate the full cost breakdown of a print job
///
/// Total over finite inputs: negative grams, hours and plate counts are
/// clamped to zero instead of rejected, and a non-positive sale price yields
/// no margin rather than a division by zero.
pub fn calculate_costs(env: &EnvironmentSettings, model: &ModelInput) -> CostBreakdown {
    let filament_grams = model.filament_grams.max(0.0);
    let print_time_hours = model.print_time_hours.max(0.0);
    let plate_count = model.plate_count.max(0);
    let sale_price = model.sale_price;
    let capacity = i64::from(env.automated_plate_capacity);

    // Material
    let filament_kg = filament_grams / 1000.0;
    let material_cost = filament_kg * env.filament_price_per_kg;

    // Energy
    let printer_power_kw = env.printer_power_watts / 1000.0;
    let energy_cost = print_time_hours * printer_power_kw * env.electricity_price_per_kwh;

    // Human time
    let base_human_minutes = env.prep_time_minutes + env.cleanup_time_minutes;
    let extra_plate_changes = if env.has_automation {
        (plate_count - capacity).max(0)
    } else {
        (plate_count - 1).max(0)
    };
    let plate_change_minutes = extra_plate_changes as f64 * env.plate_change_time_minutes;
    let remote_check_minutes = env.remote_check_minutes_per_hour * print_time_hours;

    let total_human_minutes = base_human_minutes + plate_change_minutes + remote_check_minutes;
    let total_human_hours = total_human_minutes / 60.0;
    let labour_cost = total_human_hours * env.labour_rate_per_hour;

    let total_cost = material_cost + energy_cost + labour_cost;
    let profit = sale_price - total_cost;

    let profit_margin_percent = if sale_price > 0.0 {
        Some(profit / sale_price * 100.0)
    } else {
        None
    };

    let remote_friendly = plate_count == 1 || (env.has_automation && plate_count <= capacity);

    let recommended_sale_price_for_target_margin = model
        .target_margin_percent
        .map(|percent| percent / 100.0)
        .filter(|margin| (0.0..1.0).contains(margin))
        .map(|margin| total_cost / (1.0 - margin));

    CostBreakdown {
        filament_kg,
        material_cost,
        printer_power_kw,
        energy_cost,
        base_human_minutes,
        plate_change_minutes,
        remote_check_minutes,
        total_human_minutes,
        total_human_hours,
        labour_cost,
        total_cost,
        profit,
        profit_margin_percent,
        remote_friendly,
        recommended_sale_price_for_target_margin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_env() -> EnvironmentSettings {
        EnvironmentSettings {
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

    fn job(filament_grams: f64, print_time_hours: f64, plate_count: i64, sale_price: f64) -> ModelInput {
        ModelInput {
            model_name: Some("MH-6 Little Bird Helicopter".to_string()),
            reference_url: None,
            filament_grams,
            print_time_hours,
            plate_count,
            sale_price,
            target_margin_percent: None,
        }
    }

    fn approx(actual: f64, expected: f64, tolerance: f64) -> bool {
        (actual - expected).abs() < tolerance
    }

    #[test]
    fn test_reference_scenario() {
        let breakdown = calculate_costs(&reference_env(), &job(83.0, 5.4, 1, 40.0));

        assert!(approx(breakdown.material_cost, 2.075, 1e-9));
        assert!(approx(breakdown.energy_cost, 0.405, 1e-9));
        assert!(approx(breakdown.total_human_minutes, 30.8, 1e-9));
        assert!(approx(breakdown.labour_cost, 15.4, 1e-9));
        assert!(approx(breakdown.total_cost, 17.88, 1e-9));
        assert!(approx(breakdown.profit, 22.12, 1e-9));
        assert!(approx(breakdown.profit_margin_percent.unwrap(), 55.3, 1e-9));
        assert!(breakdown.remote_friendly);
        assert!(breakdown.recommended_sale_price_for_target_margin.is_none());
    }

    #[test]
    fn test_negative_inputs_are_clamped() {
        let breakdown = calculate_costs(&reference_env(), &job(-50.0, -2.0, -3, 10.0));

        assert_eq!(breakdown.filament_kg, 0.0);
        assert_eq!(breakdown.material_cost, 0.0);
        assert_eq!(breakdown.energy_cost, 0.0);
        assert_eq!(breakdown.plate_change_minutes, 0.0);
        assert_eq!(breakdown.remote_check_minutes, 0.0);
        assert!(!breakdown.remote_friendly);
    }

    #[test]
    fn test_zero_job_costs_only_base_labour() {
        let env = reference_env();
        let breakdown = calculate_costs(&env, &job(0.0, 0.0, 0, 0.0));

        let base = env.prep_time_minutes + env.cleanup_time_minutes;
        assert_eq!(breakdown.material_cost, 0.0);
        assert_eq!(breakdown.energy_cost, 0.0);
        assert_eq!(breakdown.total_cost, base / 60.0 * env.labour_rate_per_hour);
    }

    #[test]
    fn test_manual_plate_changes_after_first_plate() {
        let breakdown = calculate_costs(&reference_env(), &job(100.0, 4.0, 3, 50.0));

        assert_eq!(breakdown.plate_change_minutes, 10.0);
        assert!(!breakdown.remote_friendly);
    }

    #[test]
    fn test_automation_absorbs_plates_up_to_capacity() {
        let env = EnvironmentSettings {
            has_automation: true,
            ..reference_env()
        };

        let within = calculate_costs(&env, &job(100.0, 4.0, 4, 50.0));
        assert_eq!(within.plate_change_minutes, 0.0);
        assert!(within.remote_friendly);

        let beyond = calculate_costs(&env, &job(100.0, 4.0, 6, 50.0));
        assert_eq!(beyond.plate_change_minutes, 10.0);
        assert!(!beyond.remote_friendly);
    }

    #[test]
    fn test_capacity_ignored_without_automation() {
        let env = EnvironmentSettings {
            automated_plate_capacity: 10,
            ..reference_env()
        };
        let breakdown = calculate_costs(&env, &job(100.0, 4.0, 2, 50.0));

        assert_eq!(breakdown.plate_change_minutes, 5.0);
        assert!(!breakdown.remote_friendly);
    }

    #[test]
    fn test_margin_absent_for_non_positive_sale_price() {
        let env = reference_env();
        assert!(calculate_costs(&env, &job(83.0, 5.4, 1, 0.0)).profit_margin_percent.is_none());
        assert!(calculate_costs(&env, &job(83.0, 5.4, 1, -5.0)).profit_margin_percent.is_none());
        assert!(calculate_costs(&env, &job(83.0, 5.4, 1, 0.01)).profit_margin_percent.is_some());
    }

    #[test]
    fn test_recommended_price_bounds() {
        let env = reference_env();
        let mut model = job(83.0, 5.4, 1, 40.0);

        model.target_margin_percent = Some(0.0);
        let breakdown = calculate_costs(&env, &model);
        assert_eq!(
            breakdown.recommended_sale_price_for_target_margin,
            Some(breakdown.total_cost)
        );

        model.target_margin_percent = Some(50.0);
        let breakdown = calculate_costs(&env, &model);
        assert!(approx(
            breakdown.recommended_sale_price_for_target_margin.unwrap(),
            breakdown.total_cost * 2.0,
            1e-9
        ));

        model.target_margin_percent = Some(100.0);
        assert!(calculate_costs(&env, &model)
            .recommended_sale_price_for_target_margin
            .is_none());

        model.target_margin_percent = Some(-10.0);
        assert!(calculate_costs(&env, &model)
            .recommended_sale_price_for_target_margin
            .is_none());
    }

    #[test]
    fn test_calculator_matches_free_function() {
        let env = reference_env();
        let model = job(120.0, 7.5, 2, 55.0);
        let calculator = CostCalculator::new(env.clone());

        assert_eq!(calculator.calculate(&model), calculate_costs(&env, &model));
        assert_eq!(calculator.settings(), &env);
    }
}
