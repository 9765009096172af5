use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "printcost", version, about = "3D Print Cost Evaluator")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = printcost::config::DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Price a single model
    Quote(QuoteArgs),

    /// Analyze a CSV portfolio of models
    Portfolio {
        /// Portfolio CSV file
        input: PathBuf,

        /// Write the full report as CSV to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort on the first invalid row instead of skipping it
        #[arg(long)]
        halt_on_error: bool,
    },

    /// Write a portfolio CSV template
    Template {
        /// Output path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct QuoteArgs {
    /// Filament weight from the slicer (g)
    #[arg(short, long)]
    pub filament_grams: f64,

    /// Print duration from the slicer (h)
    #[arg(short = 't', long)]
    pub print_time_hours: f64,

    /// Number of build plates
    #[arg(short, long, default_value = "1")]
    pub plates: i64,

    /// Intended selling price
    #[arg(short, long)]
    pub sale_price: f64,

    /// Model name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Link to the model source
    #[arg(short, long)]
    pub url: Option<String>,

    /// Target margin in percent, for a recommended price
    #[arg(short = 'm', long)]
    pub target_margin: Option<f64>,

    /// Print the raw cost breakdown as JSON
    #[arg(long)]
    pub json: bool,

    /// Export the cost report as CSV ("-" derives the name from the model)
    #[arg(short, long)]
    pub export: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}
