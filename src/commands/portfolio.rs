use anyhow::{Context, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use printcost::config::AppConfig;
use printcost::portfolio::{
    load_portfolio_file, yes_no, BatchPolicy, PortfolioAnalysis, PortfolioBatch, PortfolioSummary,
};
use printcost::pricing::{CostCalculator, ProfitStatus};
use printcost::report;
use std::fs::File;
use std::path::Path;
use tracing::info;

use super::{format_money, status_badge};

/// Execute the portfolio command
///
/// Loads a CSV batch, evaluates every model and prints the per-model table,
/// portfolio overview and insights.
pub fn execute(cfg: &AppConfig, input: &Path, output: Option<&Path>, halt_on_error: bool) -> Result<()> {
    let policy = if halt_on_error {
        BatchPolicy::Halt
    } else {
        BatchPolicy::Skip
    };

    let rows = load_portfolio_file(input)
        .with_context(|| format!("Could not read portfolio {}", input.display()))?;
    let batch = PortfolioBatch::from_rows(rows, policy)?;

    let calculator = CostCalculator::new(cfg.environment.clone());
    let analysis = PortfolioAnalysis::evaluate(
        &calculator,
        cfg.guidance.healthy_margin_floor_percent,
        &batch.jobs,
    );
    info!(
        models = analysis.summary.total_models,
        rejected = batch.rejected.len(),
        "Portfolio analyzed"
    );

    if !batch.rejected.is_empty() {
        println!("{}", format!("Skipped {} invalid row(s):", batch.rejected.len()).yellow().bold());
        for err in &batch.rejected {
            println!("  - {}", err);
        }
        println!();
    }

    display_results(&analysis);
    display_overview(&analysis.summary);
    display_insights(&analysis.summary);

    if let Some(path) = output {
        let file = File::create(path)
            .with_context(|| format!("Failed to create report file {}", path.display()))?;
        report::write_portfolio_report(file, &analysis.rows)?;
        println!();
        println!("{} {}", "✓ Portfolio report written to".green(), path.display());
        info!("Exported portfolio report to {}", path.display());
    }

    Ok(())
}

fn display_results(analysis: &PortfolioAnalysis) {
    println!("{}", "Detailed Results:".bold());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("MODEL").fg(Color::Cyan),
        Cell::new("FILAMENT (G)").fg(Color::Cyan),
        Cell::new("TIME (H)").fg(Color::Cyan),
        Cell::new("PLATES").fg(Color::Cyan),
        Cell::new("SALE").fg(Color::Cyan),
        Cell::new("COST").fg(Color::Cyan),
        Cell::new("PROFIT").fg(Color::Cyan),
        Cell::new("MARGIN").fg(Color::Cyan),
        Cell::new("$/HOUR").fg(Color::Cyan),
        Cell::new("REMOTE").fg(Color::Cyan),
        Cell::new("STATUS").fg(Color::Cyan),
    ]);

    for row in &analysis.rows {
        let status_color = match row.status {
            ProfitStatus::LosingMoney => Color::Red,
            ProfitStatus::LowMargin => Color::Yellow,
            ProfitStatus::Healthy | ProfitStatus::Profitable => Color::Green,
        };

        table.add_row(vec![
            Cell::new(&row.model),
            Cell::new(format!("{:.1}", row.filament_grams)),
            Cell::new(format!("{:.1}", row.print_time_hours)),
            Cell::new(row.plate_count),
            Cell::new(format_money(row.sale_price)),
            Cell::new(format_money(row.total_cost)),
            Cell::new(format_money(row.profit)),
            Cell::new(
                row.profit_margin_percent
                    .map(|margin| format!("{:.1}%", margin))
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            Cell::new(format!("{:.2}", row.profit_per_hour)),
            Cell::new(yes_no(row.remote_friendly)),
            Cell::new(row.status.label()).fg(status_color),
        ]);
    }

    println!("{}", table);
    println!();
}

fn display_overview(summary: &PortfolioSummary) {
    println!("{}", "Portfolio Overview:".bold());
    println!("  Total models:      {}", summary.total_models);
    println!(
        "  Healthy:           {} ({:.0}%)",
        summary.healthy,
        summary.share_percent(summary.healthy)
    );
    println!(
        "  Low margin:        {} ({:.0}%)",
        summary.low_margin,
        summary.share_percent(summary.low_margin)
    );
    println!(
        "  Losing money:      {} ({:.0}%)",
        summary.losing,
        summary.share_percent(summary.losing)
    );
    if summary.profitable > 0 {
        println!("  Profitable:        {}", summary.profitable);
    }
    println!(
        "  Average margin:    {}",
        summary
            .average_margin_percent
            .map(|margin| format!("{:.1}%", margin))
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("  Total profit:      {}", format_money(summary.total_profit));
    println!();
}

fn display_insights(summary: &PortfolioSummary) {
    if summary.total_models == 0 {
        return;
    }

    println!("{}", "Insights:".bold());
    if summary.losing > 0 {
        println!(
            "  {} {} model(s) losing money: {}",
            status_badge(ProfitStatus::LosingMoney),
            summary.losing,
            summary.losing_models.join(", ")
        );
    }
    if summary.low_margin > 0 {
        println!(
            "  {} {} model(s) have low margins, consider repricing",
            status_badge(ProfitStatus::LowMargin),
            summary.low_margin
        );
    }
    if let Some(best) = &summary.best_margin {
        println!("  Best margin:       {} at {:.1}%", best.model, best.value);
    }
    if let Some(best) = &summary.best_profit_per_hour {
        println!("  Best $/hour:       {} at ${:.2}/hour", best.model, best.value);
    }
    println!(
        "  Remote-friendly:   {}/{} models can run remotely",
        summary.remote_friendly, summary.total_models
    );
}
