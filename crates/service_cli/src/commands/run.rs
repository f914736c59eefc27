//! Run command implementation
//!
//! Simulates a scenario and prints its exposure profile.

use std::fmt::Write as _;
use std::path::Path;

use pricer_xva::{ExposureAggregator, ExposureEngine, ExposureMatrix, ExposureProfile};
use serde::Serialize;
use tracing::info;

use crate::config::ScenarioConfig;
use crate::{CliError, Result};

/// Options of the run command.
#[derive(Debug, Clone)]
pub struct RunOptions<'a> {
    pub format: &'a str,
    pub output: Option<&'a Path>,
    pub pfe_confidence: f64,
    pub horizon: f64,
}

/// One CSV line of the profile.
#[derive(Debug, Clone, Copy, Serialize)]
struct ProfileRow {
    t: f64,
    epe: f64,
    ene: f64,
    efv: f64,
    pfe: f64,
}

/// Exposure profile with its summary metrics.
#[derive(Debug, Clone, Serialize)]
pub struct ExposureReport {
    pub seed: u64,
    pub n_paths: usize,
    pub profile: ExposureProfile,
    pub pfe_confidence: f64,
    pub pfe: Vec<f64>,
    pub peak_epe: f64,
    pub time_weighted_epe: f64,
    pub effective_epe: f64,
}

impl ExposureReport {
    fn new(
        seed: u64,
        matrix: &ExposureMatrix,
        pfe_confidence: f64,
        horizon: f64,
    ) -> Self {
        let profile = ExposureAggregator::reduce(matrix);
        let pfe = ExposureAggregator::potential_future_exposure(matrix, pfe_confidence);
        let peak_epe = ExposureAggregator::peak(profile.epe());
        let time_weighted_epe =
            ExposureAggregator::time_weighted_epe(profile.epe(), profile.time_grid());
        let effective_epe =
            ExposureAggregator::effective_epe(profile.epe(), profile.time_grid(), horizon);
        Self {
            seed,
            n_paths: matrix.n_paths(),
            profile,
            pfe_confidence,
            pfe,
            peak_epe,
            time_weighted_epe,
            effective_epe,
        }
    }

    fn to_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "┌──────────┬──────────────┬──────────────┬──────────────┬──────────────┐"
        );
        let _ = writeln!(
            out,
            "│ {:>8} │ {:>12} │ {:>12} │ {:>12} │ {:>12} │",
            "t",
            "EPE",
            "ENE",
            "EFV",
            format!("PFE {:.0}%", self.pfe_confidence * 100.0)
        );
        let _ = writeln!(
            out,
            "├──────────┼──────────────┼──────────────┼──────────────┼──────────────┤"
        );
        for ((t, epe, ene, efv), pfe) in self.profile.rows().zip(&self.pfe) {
            let _ = writeln!(
                out,
                "│ {:>8.4} │ {:>12.4} │ {:>12.4} │ {:>12.4} │ {:>12.4} │",
                t, epe, ene, efv, pfe
            );
        }
        let _ = writeln!(
            out,
            "└──────────┴──────────────┴──────────────┴──────────────┴──────────────┘"
        );
        let _ = writeln!(out, "Paths:             {}", self.n_paths);
        let _ = writeln!(out, "Seed:              {}", self.seed);
        let _ = writeln!(out, "Peak EPE:          {:.4}", self.peak_epe);
        let _ = writeln!(out, "Time-weighted EPE: {:.4}", self.time_weighted_epe);
        let _ = writeln!(out, "Effective EPE:     {:.4}", self.effective_epe);
        out
    }

    fn to_csv(&self) -> Result<String> {
        let csv_error = |e: csv::Error| CliError::Output(format!("Failed to write CSV: {}", e));

        let mut writer = csv::Writer::from_writer(Vec::new());
        for ((t, epe, ene, efv), &pfe) in self.profile.rows().zip(&self.pfe) {
            writer
                .serialize(ProfileRow {
                    t,
                    epe,
                    ene,
                    efv,
                    pfe,
                })
                .map_err(csv_error)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| csv_error(e.into_error().into()))?;
        String::from_utf8(bytes).map_err(|e| CliError::Output(format!("Invalid CSV output: {}", e)))
    }

    /// Render the report in `format` (table, json or csv).
    pub fn render(&self, format: &str) -> Result<String> {
        match format {
            "table" => Ok(self.to_table()),
            "json" => serde_json::to_string_pretty(self)
                .map_err(|e| CliError::Output(format!("Failed to serialise report: {}", e))),
            "csv" => self.to_csv(),
            other => Err(CliError::InvalidArgument(format!(
                "Unknown format: {}. Supported: table, json, csv",
                other
            ))),
        }
    }
}

/// Simulate the scenario and build its report.
pub fn simulate(scenario: &ScenarioConfig, options: &RunOptions<'_>) -> Result<ExposureReport> {
    if !(0.0..=1.0).contains(&options.pfe_confidence) {
        return Err(CliError::InvalidArgument(format!(
            "PFE confidence must be in [0, 1], got {}",
            options.pfe_confidence
        )));
    }

    let mut models = scenario.build_models()?;
    let mut trade = scenario.build_trade()?;
    let correlation = scenario.correlation()?;
    let config = scenario.engine_config();

    let matrix =
        ExposureEngine::new(config).run(trade.as_mut(), &mut models, correlation.as_deref())?;
    Ok(ExposureReport::new(
        config.seed(),
        &matrix,
        options.pfe_confidence,
        options.horizon,
    ))
}

/// Run the run command
pub fn run(scenario_path: &Path, options: &RunOptions<'_>) -> Result<()> {
    info!("Running scenario {}", scenario_path.display());
    info!("  Output format: {}", options.format);

    let scenario = ScenarioConfig::from_file(scenario_path)?;
    let report = simulate(&scenario, options)?;
    let rendered = report.render(options.format)?;

    match options.output {
        Some(path) => {
            std::fs::write(path, rendered).map_err(|e| {
                CliError::Output(format!("Failed to write {}: {}", path.display(), e))
            })?;
            info!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    info!("Run complete");
    Ok(())
}
