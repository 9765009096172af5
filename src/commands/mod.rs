//! Command implementations for the CLI
//!
//! - quote: Price a single model
//! - portfolio: Analyze a CSV batch of models
//! - template: Write the portfolio CSV template
//! - config: Configuration display and validation

pub mod config;
pub mod portfolio;
pub mod quote;
pub mod template;

use colored::{ColoredString, Colorize};
use printcost::pricing::ProfitStatus;

/// Status label coloured by severity
pub(crate) fn status_badge(status: ProfitStatus) -> ColoredString {
    match status {
        ProfitStatus::LosingMoney => status.label().red().bold(),
        ProfitStatus::LowMargin => status.label().yellow().bold(),
        ProfitStatus::Healthy | ProfitStatus::Profitable => status.label().green().bold(),
    }
}

pub(crate) fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value)
    }
}

pub(crate) fn format_optional_money(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_else(|| "N/A".to_string())
}
