use crate::pricing::{CostCalculator, ModelInput, PriceGuidance, ProfitStatus};
use serde::{Serialize, Serializer};
use tracing::debug;

/// Label used for jobs without a model name
pub const UNNAMED_MODEL: &str = "Unnamed model";

/// One evaluated job, laid out as a report row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioRow {
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Filament (g)")]
    pub filament_grams: f64,
    #[serde(rename = "Time (h)")]
    pub print_time_hours: f64,
    #[serde(rename = "Plates")]
    pub plate_count: i64,
    #[serde(rename = "Sale ($)")]
    pub sale_price: f64,
    #[serde(rename = "Cost ($)")]
    pub total_cost: f64,
    #[serde(rename = "Profit ($)")]
    pub profit: f64,
    #[serde(rename = "Margin (%)")]
    pub profit_margin_percent: Option<f64>,
    #[serde(rename = "$/hour")]
    pub profit_per_hour: f64,
    #[serde(rename = "Remote", serialize_with = "serialize_yes_no")]
    pub remote_friendly: bool,
    #[serde(rename = "Status")]
    pub status: ProfitStatus,
}

/// Flag rendering shared by reports and terminal tables
pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub(crate) fn serialize_yes_no<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(yes_no(*flag))
}

/// A named figure picked out of the portfolio
#[derive(Debug, Clone, PartialEq)]
pub struct Standout {
    pub model: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortfolioSummary {
    pub total_models: usize,
    pub healthy: usize,
    pub low_margin: usize,
    pub losing: usize,
    pub profitable: usize,
    /// Mean over rows that have a margin; None when no row does
    pub average_margin_percent: Option<f64>,
    pub total_profit: f64,
    pub best_margin: Option<Standout>,
    pub best_profit_per_hour: Option<Standout>,
    pub remote_friendly: usize,
    pub losing_models: Vec<String>,
}

impl PortfolioSummary {
    pub fn from_rows(rows: &[PortfolioRow]) -> Self {
        let count = |status: ProfitStatus| rows.iter().filter(|row| row.status == status).count();

        let margins: Vec<f64> = rows.iter().filter_map(|row| row.profit_margin_percent).collect();
        let average_margin_percent =
            (!margins.is_empty()).then(|| margins.iter().sum::<f64>() / margins.len() as f64);

        Self {
            total_models: rows.len(),
            healthy: count(ProfitStatus::Healthy),
            low_margin: count(ProfitStatus::LowMargin),
            losing: count(ProfitStatus::LosingMoney),
            profitable: count(ProfitStatus::Profitable),
            average_margin_percent,
            total_profit: rows.iter().map(|row| row.profit).sum(),
            best_margin: first_max(rows, |row| row.profit_margin_percent),
            best_profit_per_hour: first_max(rows, |row| Some(row.profit_per_hour)),
            remote_friendly: rows.iter().filter(|row| row.remote_friendly).count(),
            losing_models: rows
                .iter()
                .filter(|row| row.status == ProfitStatus::LosingMoney)
                .map(|row| row.model.clone())
                .collect(),
        }
    }

    /// Share of the portfolio, in percent, that `count` represents
    pub fn share_percent(&self, count: usize) -> f64 {
        if self.total_models == 0 {
            0.0
        } else {
            count as f64 / self.total_models as f64 * 100.0
        }
    }
}

/// First row holding the largest value; rows without a value are skipped
fn first_max<F>(rows: &[PortfolioRow], value: F) -> Option<Standout>
where
    F: Fn(&PortfolioRow) -> Option<f64>,
{
    let mut best: Option<Standout> = None;
    for row in rows {
        let Some(candidate) = value(row) else {
            continue;
        };
        if best.as_ref().map_or(true, |current| candidate > current.value) {
            best = Some(Standout {
                model: row.model.clone(),
                value: candidate,
            });
        }
    }
    best
}

#[derive(Debug, Clone, Default)]
pub struct PortfolioAnalysis {
    pub rows: Vec<PortfolioRow>,
    pub summary: PortfolioSummary,
}

impl PortfolioAnalysis {
    /// Evaluate every job independently and summarize the portfolio
    pub fn evaluate(
        calculator: &CostCalculator,
        healthy_margin_floor_percent: f64,
        jobs: &[ModelInput],
    ) -> Self {
        let rows: Vec<PortfolioRow> = jobs
            .iter()
            .map(|job| evaluate_job(calculator, healthy_margin_floor_percent, job))
            .collect();
        let summary = PortfolioSummary::from_rows(&rows);

        debug!(
            models = summary.total_models,
            losing = summary.losing,
            "Portfolio evaluated"
        );

        Self { rows, summary }
    }
}

fn evaluate_job(calculator: &CostCalculator, healthy_margin_floor_percent: f64, job: &ModelInput) -> PortfolioRow {
    let breakdown = calculator.calculate(job);
    let guidance = PriceGuidance::from_total_cost(breakdown.total_cost, healthy_margin_floor_percent);
    let status = ProfitStatus::classify(job.sale_price, breakdown.total_cost, guidance.healthy_price);
    let profit_per_hour = if job.print_time_hours > 0.0 {
        breakdown.profit / job.print_time_hours
    } else {
        0.0
    };

    PortfolioRow {
        model: job.label(UNNAMED_MODEL).to_string(),
        url: job.reference_url.clone().unwrap_or_default(),
        filament_grams: job.filament_grams,
        print_time_hours: job.print_time_hours,
        plate_count: job.plate_count,
        sale_price: job.sale_price,
        total_cost: breakdown.total_cost,
        profit: breakdown.profit,
        profit_margin_percent: breakdown.profit_margin_percent,
        profit_per_hour,
        remote_friendly: breakdown.remote_friendly,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::EnvironmentSettings;

    fn job(name: &str, filament_grams: f64, print_time_hours: f64, plate_count: i64, sale_price: f64) -> ModelInput {
        ModelInput {
            model_name: Some(name.to_string()),
            filament_grams,
            print_time_hours,
            plate_count,
            sale_price,
            ..Default::default()
        }
    }

    fn template_jobs() -> Vec<ModelInput> {
        vec![
            job("Example Model A", 83.0, 5.4, 1, 40.0),
            job("Example Model B", 376.0, 16.9, 1, 60.0),
            job("Example Model C", 150.0, 8.2, 2, 45.0),
        ]
    }

    #[test]
    fn test_evaluate_template_portfolio() {
        let calculator = CostCalculator::new(EnvironmentSettings::default());
        let analysis = PortfolioAnalysis::evaluate(&calculator, 20.0, &template_jobs());

        assert_eq!(analysis.rows.len(), 3);
        let summary = &analysis.summary;
        assert_eq!(summary.total_models, 3);
        assert_eq!(summary.healthy + summary.low_margin + summary.losing + summary.profitable, 3);

        let expected_profit: f64 = analysis.rows.iter().map(|row| row.profit).sum();
        assert!((summary.total_profit - expected_profit).abs() < 1e-9);

        // Model A: 17.88 cost, sells at 40 -> healthy at a 20% floor
        assert_eq!(analysis.rows[0].status, ProfitStatus::Healthy);
        assert!(analysis.rows[0].remote_friendly);
        // Model C needs a manual plate change
        assert!(!analysis.rows[2].remote_friendly);
        assert_eq!(summary.remote_friendly, 2);
    }

    #[test]
    fn test_profit_per_hour_zero_for_zero_time() {
        let calculator = CostCalculator::new(EnvironmentSettings::default());
        let analysis = PortfolioAnalysis::evaluate(&calculator, 20.0, &[job("Flat", 10.0, 0.0, 1, 20.0)]);
        assert_eq!(analysis.rows[0].profit_per_hour, 0.0);
    }

    #[test]
    fn test_losing_models_listed() {
        let calculator = CostCalculator::new(EnvironmentSettings::default());
        let jobs = vec![job("Cheap", 500.0, 20.0, 3, 5.0), job("Fine", 10.0, 1.0, 1, 50.0)];
        let analysis = PortfolioAnalysis::evaluate(&calculator, 20.0, &jobs);

        assert_eq!(analysis.summary.losing, 1);
        assert_eq!(analysis.summary.losing_models, vec!["Cheap".to_string()]);
        assert_eq!(analysis.summary.best_margin.as_ref().unwrap().model, "Fine");
    }

    #[test]
    fn test_average_margin_skips_free_items() {
        let calculator = CostCalculator::new(EnvironmentSettings::default());
        let jobs = vec![job("Giveaway", 10.0, 1.0, 1, 0.0)];
        let analysis = PortfolioAnalysis::evaluate(&calculator, 20.0, &jobs);

        assert!(analysis.summary.average_margin_percent.is_none());
        assert!(analysis.summary.best_margin.is_none());
        assert!(analysis.summary.best_profit_per_hour.is_some());
    }

    #[test]
    fn test_unnamed_model_label() {
        let calculator = CostCalculator::new(EnvironmentSettings::default());
        let mut unnamed = job("", 10.0, 1.0, 1, 20.0);
        unnamed.model_name = None;
        let analysis = PortfolioAnalysis::evaluate(&calculator, 20.0, &[unnamed]);
        assert_eq!(analysis.rows[0].model, UNNAMED_MODEL);
    }

    #[test]
    fn test_first_max_keeps_earliest_on_tie() {
        let calculator = CostCalculator::new(EnvironmentSettings::default());
        let jobs = vec![job("First", 83.0, 5.4, 1, 40.0), job("Second", 83.0, 5.4, 1, 40.0)];
        let analysis = PortfolioAnalysis::evaluate(&calculator, 20.0, &jobs);

        assert_eq!(analysis.summary.best_margin.unwrap().model, "First");
        assert_eq!(analysis.summary.best_profit_per_hour.unwrap().model, "First");
    }

    #[test]
    fn test_share_percent_of_empty_portfolio() {
        let summary = PortfolioSummary::default();
        assert_eq!(summary.share_percent(0), 0.0);
    }
}
