use anyhow::{Context, Result};
use colored::Colorize;
use printcost::report;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Execute the template command
///
/// Writes the example portfolio CSV to `output`, or to stdout
pub fn execute(output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create template {}", path.display()))?;
            report::write_template(file)?;
            eprintln!("{} {}", "✓ Portfolio template written to".green(), path.display());
            info!("Wrote portfolio template to {}", path.display());
        }
        None => report::write_template(std::io::stdout().lock())?,
    }
    Ok(())
}
