//! Check command implementation
//!
//! Builds every part of a scenario and runs the engine's pre-flight checks
//! without simulating.

use std::path::Path;

use tracing::info;

use crate::config::ScenarioConfig;
use crate::Result;

/// Run the check command
pub fn run(scenario_path: &Path) -> Result<()> {
    info!("Checking scenario {}", scenario_path.display());
    let scenario = ScenarioConfig::from_file(scenario_path)?;

    let models = scenario.build_models()?;
    info!(
        "  Factors: {}",
        models.names().collect::<Vec<_>>().join(", ")
    );
    info!(
        "  Dates: {} ({} paths)",
        models.dates().len(),
        models.n_paths()
    );

    scenario.validate_correlation(models.len())?;
    models.validate_dependencies()?;

    let trade = scenario.build_trade()?;
    if scenario.simulation.discounted {
        if let Some(key) = trade.numeraire_key() {
            models.numeraire(key)?;
            info!("  Numeraire: {}", key);
        }
    }
    info!("  Trade maturity: {}", trade.maturity());

    println!("Scenario OK");
    Ok(())
}
