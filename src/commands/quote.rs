use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use printcost::config::AppConfig;
use printcost::pricing::{CostCalculator, ModelInput, PriceGuidance, ProfitStatus};
use printcost::report::{self, QuoteReport};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{format_money, format_optional_money, status_badge};
use crate::cli::QuoteArgs;

/// Execute the quote command
///
/// Prices one model against the configured environment and prints the
/// breakdown, pricing guidance and a short summary.
pub fn execute(cfg: &AppConfig, args: QuoteArgs) -> Result<()> {
    let model = ModelInput {
        model_name: args.name.filter(|name| !name.is_empty()),
        reference_url: args.url.filter(|url| !url.is_empty()),
        filament_grams: args.filament_grams,
        print_time_hours: args.print_time_hours,
        plate_count: args.plates,
        sale_price: args.sale_price,
        target_margin_percent: args.target_margin,
    };

    let calculator = CostCalculator::new(cfg.environment.clone());
    let breakdown = calculator.calculate(&model);
    info!(
        model = model.label("unnamed"),
        total_cost = breakdown.total_cost,
        "Calculated costs"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
        return Ok(());
    }

    let floor = cfg.guidance.healthy_margin_floor_percent;
    let guidance = PriceGuidance::from_total_cost(breakdown.total_cost, floor);
    let status = ProfitStatus::classify(model.sale_price, breakdown.total_cost, guidance.healthy_price);
    let env = calculator.settings();

    println!("{} {}", "Status:".bold(), status_badge(status));
    println!();

    println!("{}", "Cost Breakdown:".bold());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("CATEGORY").fg(Color::Cyan),
            Cell::new("COST").fg(Color::Cyan),
            Cell::new("DETAIL").fg(Color::Cyan),
        ]);
    table.add_row(vec![
        Cell::new("Material"),
        Cell::new(format_money(breakdown.material_cost)),
        Cell::new(format!(
            "{:.1}g @ ${}/kg",
            breakdown.filament_kg * 1000.0,
            env.filament_price_per_kg
        )),
    ]);
    table.add_row(vec![
        Cell::new("Energy"),
        Cell::new(format_money(breakdown.energy_cost)),
        Cell::new(format!(
            "{:.1}h x {:.2}kW @ ${}/kWh",
            model.print_time_hours.max(0.0),
            breakdown.printer_power_kw,
            env.electricity_price_per_kwh
        )),
    ]);
    table.add_row(vec![
        Cell::new("Labour"),
        Cell::new(format_money(breakdown.labour_cost)),
        Cell::new(format!(
            "{:.2}h @ ${}/h",
            breakdown.total_human_hours, env.labour_rate_per_hour
        )),
    ]);
    table.add_row(vec![
        Cell::new("Total").fg(Color::Yellow),
        Cell::new(format_money(breakdown.total_cost)).fg(Color::Yellow),
        Cell::new(""),
    ]);
    println!("{table}");
    println!();

    println!("{}", "Financial Summary:".bold());
    println!("  Sale price:        {}", format_money(model.sale_price));
    println!("  Profit:            {}", format_money(breakdown.profit));
    println!("  Margin:            {}", breakdown.margin_text());
    println!();

    println!("{}", "Pricing Guidance:".bold());
    println!("  Break-even price:  {}", format_money(guidance.break_even_price));
    match guidance.healthy_price {
        Some(price) => println!("  Healthy price:     {} ({:.0}% margin)", format_money(price), floor),
        None => println!("  Healthy price:     N/A (set guidance.healthy_margin_floor_percent)"),
    }
    if let Some(target) = model.target_margin_percent {
        println!(
            "  Target price:      {} ({:.0}% margin)",
            format_optional_money(breakdown.recommended_sale_price_for_target_margin),
            target
        );
    }
    println!(
        "  Remote-friendly:   {}",
        if breakdown.remote_friendly {
            "yes, can run unattended".green()
        } else {
            "no, requires manual intervention".yellow()
        }
    );
    println!();

    println!("{}", "Time Breakdown:".bold());
    println!("  Prep & cleanup:    {:.1} min", breakdown.base_human_minutes);
    println!("  Plate changes:     {:.1} min", breakdown.plate_change_minutes);
    println!("  Remote monitoring: {:.1} min", breakdown.remote_check_minutes);
    println!(
        "  Total human time:  {:.1} min ({:.2} h)",
        breakdown.total_human_minutes, breakdown.total_human_hours
    );
    println!();

    println!("{}", "Summary:".bold());
    for line in report::summary_lines(&model, &breakdown, &guidance, floor) {
        println!("  {}", line);
    }

    if let Some(export) = args.export {
        let path = resolve_export_path(&export, &model);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        report::write_quote_report(file, &QuoteReport::new(&model, &breakdown, &guidance, status))?;
        println!();
        println!("{} {}", "✓ Cost report written to".green(), path.display());
        info!("Exported cost report to {}", path.display());
    }

    Ok(())
}

fn resolve_export_path(export: &Path, model: &ModelInput) -> PathBuf {
    if export == Path::new("-") {
        PathBuf::from(report::report_file_name(model))
    } else {
        export.to_path_buf()
    }
}
