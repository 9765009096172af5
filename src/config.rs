use crate::error::AppError;
use crate::pricing::EnvironmentSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "printcost.toml";
pub const ENV_PREFIX: &str = "PRINTCOST";

/// Upper bound accepted for the healthy margin floor
pub const MAX_HEALTHY_MARGIN_FLOOR_PERCENT: f64 = 95.0;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub environment: EnvironmentSettings,
    pub guidance: GuidanceConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GuidanceConfig {
    /// Minimum margin considered healthy, 0-95
    pub healthy_margin_floor_percent: f64,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            healthy_margin_floor_percent: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Load configuration from an optional TOML file, overridden by
/// `PRINTCOST__SECTION__KEY` environment variables
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    let config = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: AppConfig = config.try_deserialize()?;
    validate_config(&cfg)?;

    Ok(cfg)
}

pub fn validate_config(cfg: &AppConfig) -> Result<(), AppError> {
    let env = &cfg.environment;
    let numeric = [
        ("filament_price_per_kg", env.filament_price_per_kg),
        ("electricity_price_per_kwh", env.electricity_price_per_kwh),
        ("printer_power_watts", env.printer_power_watts),
        ("labour_rate_per_hour", env.labour_rate_per_hour),
        ("prep_time_minutes", env.prep_time_minutes),
        ("cleanup_time_minutes", env.cleanup_time_minutes),
        ("plate_change_time_minutes", env.plate_change_time_minutes),
        ("remote_check_minutes_per_hour", env.remote_check_minutes_per_hour),
    ];

    for (name, value) in numeric {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::ConfigError(format!(
                "environment.{} must be a non-negative number, got {}",
                name, value
            )));
        }
    }

    if env.automated_plate_capacity < 1 {
        return Err(AppError::ConfigError(
            "environment.automated_plate_capacity must be at least 1".to_string(),
        ));
    }

    let floor = cfg.guidance.healthy_margin_floor_percent;
    if !(0.0..=MAX_HEALTHY_MARGIN_FLOOR_PERCENT).contains(&floor) {
        return Err(AppError::ConfigError(format!(
            "guidance.healthy_margin_floor_percent must be between 0 and {}, got {}",
            MAX_HEALTHY_MARGIN_FLOOR_PERCENT, floor
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.guidance.healthy_margin_floor_percent, 20.0);
        assert_eq!(cfg.logging.level, "warn");
    }

    #[test]
    fn test_validate_config_rejects_negative_rate() {
        let mut cfg = AppConfig::default();
        cfg.environment.labour_rate_per_hour = -1.0;

        let result = validate_config(&cfg);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("labour_rate_per_hour"));
    }

    #[test]
    fn test_validate_config_rejects_zero_capacity() {
        let mut cfg = AppConfig::default();
        cfg.environment.automated_plate_capacity = 0;

        let result = validate_config(&cfg);
        assert!(result.unwrap_err().to_string().contains("automated_plate_capacity"));
    }

    #[test]
    fn test_validate_config_rejects_floor_above_limit() {
        let mut cfg = AppConfig::default();
        cfg.guidance.healthy_margin_floor_percent = 96.0;

        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[environment]
filament_price_per_kg = 19.99
has_automation = true
automated_plate_capacity = 6

[guidance]
healthy_margin_floor_percent = 35.0
"#
        )
        .unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.environment.filament_price_per_kg, 19.99);
        assert!(cfg.environment.has_automation);
        assert_eq!(cfg.environment.automated_plate_capacity, 6);
        assert_eq!(cfg.environment.labour_rate_per_hour, 30.0);
        assert_eq!(cfg.guidance.healthy_margin_floor_percent, 35.0);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.environment, EnvironmentSettings::default());
    }

    #[test]
    fn test_load_config_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[guidance]\nhealthy_margin_floor_percent = 150.0").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
