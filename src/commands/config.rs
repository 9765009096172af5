use anyhow::Result;
use colored::Colorize;
use printcost::config::AppConfig;
use printcost::error::AppError;
use std::path::Path;
use tracing::info;

/// Execute the config show command
///
/// Displays the effective configuration (file + environment overrides)
pub fn show(cfg: &AppConfig) -> Result<()> {
    info!("Displaying effective configuration");

    println!("{}", "Current Configuration:".green().bold());
    println!();

    // Serialize to TOML format
    let toml_string = toml::to_string_pretty(cfg)?;
    println!("{}", toml_string);

    Ok(())
}

/// Execute the config validate command
///
/// Validates the configuration file
pub fn validate(path: &Path, loaded: Result<AppConfig, AppError>) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());
    info!("Validating configuration file {}", path.display());

    if !path.exists() {
        println!("  {} not found, using built-in defaults", path.display());
    }

    let cfg = loaded?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    for line in summary_lines(&cfg) {
        println!("  {}", line);
    }

    info!("Configuration validation successful");
    Ok(())
}

fn summary_lines(cfg: &AppConfig) -> Vec<String> {
    let env = &cfg.environment;
    let automation = if env.has_automation {
        format!("enabled ({} plates)", env.automated_plate_capacity)
    } else {
        "disabled".to_string()
    };

    vec![
        format!("Filament: ${}/kg", env.filament_price_per_kg),
        format!(
            "Energy: {}W @ ${}/kWh",
            env.printer_power_watts, env.electricity_price_per_kwh
        ),
        format!("Labour: ${}/h", env.labour_rate_per_hour),
        format!("Automation: {}", automation),
        format!(
            "Healthy margin floor: {}%",
            cfg.guidance.healthy_margin_floor_percent
        ),
    ]
}
