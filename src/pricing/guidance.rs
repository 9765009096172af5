use serde::{Deserialize, Serialize};
use std::fmt;

/// Price thresholds derived from a job's total cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceGuidance {
    pub break_even_price: f64,
    /// Price that yields exactly the healthy margin floor; None when the floor is 0 or >= 100
    pub healthy_price: Option<f64>,
}

impl PriceGuidance {
    pub fn from_total_cost(total_cost: f64, healthy_margin_floor_percent: f64) -> Self {
        let healthy_price = if healthy_margin_floor_percent > 0.0 && healthy_margin_floor_percent < 100.0 {
            Some(total_cost / (1.0 - healthy_margin_floor_percent / 100.0))
        } else {
            None
        };

        Self {
            break_even_price: total_cost,
            healthy_price,
        }
    }
}

/// Profitability verdict for a job at its sale price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfitStatus {
    #[serde(rename = "Losing money")]
    LosingMoney,
    #[serde(rename = "Low margin")]
    LowMargin,
    Healthy,
    /// Profitable, with no healthy floor configured to compare against
    Profitable,
}

impl ProfitStatus {
    pub fn classify(sale_price: f64, total_cost: f64, healthy_price: Option<f64>) -> Self {
        if sale_price < total_cost {
            return Self::LosingMoney;
        }
        match healthy_price {
            None => Self::Profitable,
            Some(healthy) if sale_price < healthy => Self::LowMargin,
            Some(_) => Self::Healthy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LosingMoney => "Losing money",
            Self::LowMargin => "Low margin",
            Self::Healthy => "Healthy",
            Self::Profitable => "Profitable",
        }
    }
}

impl fmt::Display for ProfitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
