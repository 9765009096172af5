//! CSV exports and plain-text summaries of cost calculations.

use crate::error::AppError;
use crate::portfolio::analysis::serialize_yes_no;
use crate::portfolio::{PortfolioRow, UNNAMED_MODEL};
use crate::pricing::{CostBreakdown, ModelInput, PriceGuidance, ProfitStatus};
use serde::Serialize;
use std::io::Write;

/// Single-job cost report, one CSV row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteReport {
    #[serde(rename = "Model name")]
    pub model_name: String,
    #[serde(rename = "Model URL")]
    pub model_url: String,
    #[serde(rename = "Filament (g)")]
    pub filament_grams: f64,
    #[serde(rename = "Print time (h)")]
    pub print_time_hours: f64,
    #[serde(rename = "Plates")]
    pub plate_count: i64,
    #[serde(rename = "Material cost ($)")]
    pub material_cost: f64,
    #[serde(rename = "Energy cost ($)")]
    pub energy_cost: f64,
    #[serde(rename = "Labour cost ($)")]
    pub labour_cost: f64,
    #[serde(rename = "Total cost ($)")]
    pub total_cost: f64,
    #[serde(rename = "Sale price ($)")]
    pub sale_price: f64,
    #[serde(rename = "Profit ($)")]
    pub profit: f64,
    #[serde(rename = "Margin (%)")]
    pub profit_margin_percent: Option<f64>,
    #[serde(rename = "Break-even price ($)")]
    pub break_even_price: f64,
    #[serde(rename = "Healthy price ($)")]
    pub healthy_price: Option<f64>,
    #[serde(rename = "Status")]
    pub status: ProfitStatus,
    #[serde(rename = "Remote-friendly", serialize_with = "serialize_yes_no")]
    pub remote_friendly: bool,
}

impl QuoteReport {
    pub fn new(
        model: &ModelInput,
        breakdown: &CostBreakdown,
        guidance: &PriceGuidance,
        status: ProfitStatus,
    ) -> Self {
        Self {
            model_name: model.label(UNNAMED_MODEL).to_string(),
            model_url: model.reference_url.clone().unwrap_or_default(),
            filament_grams: model.filament_grams,
            print_time_hours: model.print_time_hours,
            plate_count: model.plate_count,
            material_cost: breakdown.material_cost,
            energy_cost: breakdown.energy_cost,
            labour_cost: breakdown.labour_cost,
            total_cost: breakdown.total_cost,
            sale_price: model.sale_price,
            profit: breakdown.profit,
            profit_margin_percent: breakdown.profit_margin_percent,
            break_even_price: guidance.break_even_price,
            healthy_price: guidance.healthy_price,
            status,
            remote_friendly: breakdown.remote_friendly,
        }
    }
}

/// Example rows handed out as a starting point for portfolio uploads
#[derive(Debug, Clone, Serialize)]
struct TemplateRow {
    model_name: &'static str,
    reference_url: &'static str,
    filament_grams: f64,
    print_time_hours: f64,
    plate_count: i64,
    sale_price: f64,
}

const TEMPLATE_ROWS: [TemplateRow; 3] = [
    TemplateRow {
        model_name: "Example Model A",
        reference_url: "https://makerworld.com/model-a",
        filament_grams: 83.0,
        print_time_hours: 5.4,
        plate_count: 1,
        sale_price: 40.0,
    },
    TemplateRow {
        model_name: "Example Model B",
        reference_url: "https://makerworld.com/model-b",
        filament_grams: 376.0,
        print_time_hours: 16.9,
        plate_count: 1,
        sale_price: 60.0,
    },
    TemplateRow {
        model_name: "Example Model C",
        reference_url: "",
        filament_grams: 150.0,
        print_time_hours: 8.2,
        plate_count: 2,
        sale_price: 45.0,
    },
];

fn write_records<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_quote_report<W: Write>(writer: W, report: &QuoteReport) -> Result<(), AppError> {
    write_records(writer, std::slice::from_ref(report))
}

pub fn write_portfolio_report<W: Write>(writer: W, rows: &[PortfolioRow]) -> Result<(), AppError> {
    if rows.is_empty() {
        // csv only emits a header alongside the first record
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record([
            "Model", "URL", "Filament (g)", "Time (h)", "Plates", "Sale ($)", "Cost ($)",
            "Profit ($)", "Margin (%)", "$/hour", "Remote", "Status",
        ])?;
        writer.flush()?;
        return Ok(());
    }
    write_records(writer, rows)
}

pub fn write_template<W: Write>(writer: W) -> Result<(), AppError> {
    write_records(writer, &TEMPLATE_ROWS[..])
}

/// `cost_report_<name>.csv`, spaces replaced by underscores
pub fn report_file_name(model: &ModelInput) -> String {
    format!("cost_report_{}.csv", model.label("model")).replace(' ', "_")
}

/// Plain-language summary of a quote, one sentence group per line
pub fn summary_lines(
    model: &ModelInput,
    breakdown: &CostBreakdown,
    guidance: &PriceGuidance,
    healthy_margin_floor_percent: f64,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);

    lines.push(format!(
        "{} requires {:.0}g of filament and {:.1} hours of print time across {} plate(s).",
        model.label("This model"),
        breakdown.filament_kg * 1000.0,
        model.print_time_hours,
        model.plate_count
    ));

    lines.push(format!(
        "At a sale price of ${:.2}, your total cost is ${:.2}, resulting in a profit of ${:.2} ({} margin).",
        model.sale_price,
        breakdown.total_cost,
        breakdown.profit,
        breakdown.margin_text()
    ));

    match guidance.healthy_price {
        _ if breakdown.profit < 0.0 => lines.push(format!(
            "You're losing ${:.2} on this print. Minimum price should be ${:.2} to break even.",
            breakdown.profit.abs(),
            guidance.break_even_price
        )),
        Some(healthy) if model.sale_price < healthy => lines.push(format!(
            "To achieve your target {:.0}% margin, consider pricing at ${:.2} or higher.",
            healthy_margin_floor_percent, healthy
        )),
        _ => lines.push("This pricing meets your profitability goals.".to_string()),
    }

    if breakdown.remote_friendly {
        lines.push("This job can run remotely with your current automation setup.".to_string());
    } else {
        lines.push(
            "This job requires manual plate changes and cannot run fully unattended.".to_string(),
        );
    }

    lines
}
