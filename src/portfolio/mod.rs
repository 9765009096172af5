pub mod analysis;
pub mod loader;

pub use analysis::{yes_no, PortfolioAnalysis, PortfolioRow, PortfolioSummary, Standout, UNNAMED_MODEL};
pub use loader::{load_portfolio, load_portfolio_file, BatchPolicy, PortfolioBatch, REQUIRED_COLUMNS};
