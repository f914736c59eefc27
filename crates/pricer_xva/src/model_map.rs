//! Named, ordered collection of simulation factors.
//!
//! The [`ModelMap`] owns every factor of a run and the clock they share.
//! The ordinal of a factor is its shock column in the correlation matrix,
//! so insertion order matters: an FX spot is only accepted after both of
//! its rate factors.

use pricer_core::market_data::curves::{CurveEnum, YieldCurve};
use pricer_models::models::fx::SimulatedFxSpot;
use pricer_models::models::rates::{HullWhiteFactor, HullWhiteParams, SimulatedCurve};
use pricer_models::rng::ShockGenerator;
use pricer_models::schedules::SimulationDates;
use pricer_models::SimulationError;

use crate::error::ExposureError;

/// A simulation factor together with the inputs it evolves from.
#[derive(Clone, Debug)]
pub enum FactorModel {
    /// Hull-White short rate calibrated to a base curve
    Rate {
        /// Base curve the factor reprices
        curve: CurveEnum<f64>,
        /// Short rate factor
        factor: HullWhiteFactor,
    },
    /// FX spot driven by two rate factors of the same map
    FxSpot {
        /// Spot factor
        spot: SimulatedFxSpot,
        /// Ordinal of the domestic rate factor
        domestic: usize,
        /// Ordinal of the foreign rate factor
        foreign: usize,
    },
}

impl FactorModel {
    /// Slice the factor is currently on.
    #[inline]
    pub fn current_slice(&self) -> usize {
        match self {
            FactorModel::Rate { factor, .. } => factor.current_slice(),
            FactorModel::FxSpot { spot, .. } => spot.current_slice(),
        }
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        match self {
            FactorModel::Rate { factor, .. } => factor.n_paths(),
            FactorModel::FxSpot { spot, .. } => spot.n_paths(),
        }
    }

    /// `true` for a short rate factor.
    #[inline]
    pub fn is_rate(&self) -> bool {
        matches!(self, FactorModel::Rate { .. })
    }

    fn dates(&self) -> &SimulationDates {
        match self {
            FactorModel::Rate { factor, .. } => factor.dates(),
            FactorModel::FxSpot { spot, .. } => spot.dates(),
        }
    }

    fn move_to_next_slice(&mut self) {
        match self {
            FactorModel::Rate { factor, .. } => factor.move_to_next_slice(),
            FactorModel::FxSpot { spot, .. } => spot.move_to_next_slice(),
        }
    }
}

/// Ordered, named factors over one schedule and one path count.
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::curves::CurveEnum;
/// use pricer_models::models::rates::HullWhiteParams;
/// use pricer_models::schedules::SimulationDates;
/// use pricer_xva::model_map::ModelMap;
///
/// let dates = SimulationDates::uniform(0.0, 0.25, 9).unwrap();
/// let params = HullWhiteParams::new(0.1, 0.01).unwrap();
///
/// let models = ModelMap::new(dates, 1_000)
///     .unwrap()
///     .with_rate_factor("USD", CurveEnum::flat(0.035), params)
///     .unwrap()
///     .with_rate_factor("JPY", CurveEnum::flat(0.0175), params)
///     .unwrap()
///     .with_fx_spot("USDJPY", "JPY", "USD", 100.0, 0.1)
///     .unwrap();
///
/// assert_eq!(models.len(), 3);
/// assert_eq!(models.ordinal("USDJPY"), Some(2));
/// ```
#[derive(Clone, Debug)]
pub struct ModelMap {
    dates: SimulationDates,
    n_paths: usize,
    entries: Vec<(String, FactorModel)>,
    /// Set by the first `advance_slice`, even one that fails partway.
    started: bool,
}

impl ModelMap {
    /// Create an empty map.
    ///
    /// # Errors
    ///
    /// `InvalidPathCount` when `n_paths == 0`.
    pub fn new(dates: SimulationDates, n_paths: usize) -> Result<Self, ExposureError> {
        if n_paths == 0 {
            return Err(ExposureError::InvalidPathCount(n_paths));
        }
        Ok(Self {
            dates,
            n_paths,
            entries: Vec::new(),
            started: false,
        })
    }

    /// Register a Hull-White factor calibrated to `curve` and return its
    /// ordinal.
    ///
    /// # Errors
    ///
    /// `DuplicateFactor` when the name is taken; `Simulation` when the curve
    /// has no short end.
    pub fn add_rate_factor(
        &mut self,
        name: impl Into<String>,
        curve: impl Into<CurveEnum<f64>>,
        params: HullWhiteParams,
    ) -> Result<usize, ExposureError> {
        let name = name.into();
        self.ensure_unique(&name)?;
        let curve = curve.into();
        let factor = HullWhiteFactor::from_curve(params, self.dates.clone(), self.n_paths, &curve)?;
        self.entries.push((name, FactorModel::Rate { curve, factor }));
        Ok(self.entries.len() - 1)
    }

    /// Register an FX spot quoted as domestic units per foreign unit and
    /// return its ordinal.
    ///
    /// # Errors
    ///
    /// * `DuplicateFactor` - the name is taken
    /// * `MissingDependency` - a rate factor is not registered, or both
    ///   names are the same factor
    /// * `NotARateFactor` - a dependency names an FX factor
    pub fn add_fx_spot(
        &mut self,
        name: impl Into<String>,
        domestic: &str,
        foreign: &str,
        initial_spot: f64,
        volatility: f64,
    ) -> Result<usize, ExposureError> {
        let name = name.into();
        self.ensure_unique(&name)?;

        let missing = || ExposureError::MissingDependency {
            factor: name.clone(),
        };
        let dom = self.ordinal(domestic).ok_or_else(missing)?;
        let frn = self.ordinal(foreign).ok_or_else(missing)?;
        if dom == frn {
            return Err(missing());
        }
        for (ordinal, dep) in [(dom, domestic), (frn, foreign)] {
            if !self.entries[ordinal].1.is_rate() {
                return Err(ExposureError::NotARateFactor(dep.to_string()));
            }
        }

        let spot = SimulatedFxSpot::new(initial_spot, volatility, self.dates.clone(), self.n_paths)?;
        self.entries.push((
            name,
            FactorModel::FxSpot {
                spot,
                domestic: dom,
                foreign: frn,
            },
        ));
        Ok(self.entries.len() - 1)
    }

    /// Builder form of [`add_rate_factor`](Self::add_rate_factor).
    pub fn with_rate_factor(
        mut self,
        name: impl Into<String>,
        curve: impl Into<CurveEnum<f64>>,
        params: HullWhiteParams,
    ) -> Result<Self, ExposureError> {
        self.add_rate_factor(name, curve, params)?;
        Ok(self)
    }

    /// Builder form of [`add_fx_spot`](Self::add_fx_spot).
    pub fn with_fx_spot(
        mut self,
        name: impl Into<String>,
        domestic: &str,
        foreign: &str,
        initial_spot: f64,
        volatility: f64,
    ) -> Result<Self, ExposureError> {
        self.add_fx_spot(name, domestic, foreign, initial_spot, volatility)?;
        Ok(self)
    }

    /// Register a prebuilt factor without dependency checks.
    ///
    /// Dependencies of FX entries are checked by
    /// [`validate_dependencies`](Self::validate_dependencies) before a run.
    ///
    /// # Errors
    ///
    /// `DuplicateFactor` when the name is taken; `Simulation` when the
    /// factor's path count or schedule differ from the map's.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        model: FactorModel,
    ) -> Result<usize, ExposureError> {
        let name = name.into();
        self.ensure_unique(&name)?;
        if model.n_paths() != self.n_paths {
            return Err(SimulationError::PathCountMismatch {
                expected: self.n_paths,
                got: model.n_paths(),
            }
            .into());
        }
        if **model.dates() != *self.dates {
            return Err(SimulationError::InvalidSchedule(format!(
                "factor '{}' does not share the map schedule",
                name
            ))
            .into());
        }
        self.entries.push((name, model));
        Ok(self.entries.len() - 1)
    }

    fn ensure_unique(&self, name: &str) -> Result<(), ExposureError> {
        if self.ordinal(name).is_some() {
            return Err(ExposureError::DuplicateFactor(name.to_string()));
        }
        Ok(())
    }

    /// Number of factors.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when no factor is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Shared simulation schedule.
    #[inline]
    pub fn dates(&self) -> &SimulationDates {
        &self.dates
    }

    /// Number of simulated paths.
    #[inline]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Factor names in ordinal order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Factors with their names, in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FactorModel)> {
        self.entries.iter().map(|(name, model)| (name.as_str(), model))
    }

    /// Ordinal (shock column) of the named factor.
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    /// Factor registered under `name`.
    pub fn get(&self, name: &str) -> Option<&FactorModel> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, model)| model)
    }

    fn lookup(&self, name: &str) -> Result<&FactorModel, ExposureError> {
        self.get(name)
            .ok_or_else(|| ExposureError::UnknownFactor(name.to_string()))
    }

    /// Hull-White factor registered under `name`.
    ///
    /// # Errors
    ///
    /// `UnknownFactor` or `NotARateFactor`.
    pub fn rate_factor(&self, name: &str) -> Result<&HullWhiteFactor, ExposureError> {
        match self.lookup(name)? {
            FactorModel::Rate { factor, .. } => Ok(factor),
            FactorModel::FxSpot { .. } => Err(ExposureError::NotARateFactor(name.to_string())),
        }
    }

    /// Path-conditioned view of the named rate factor and its base curve.
    ///
    /// # Errors
    ///
    /// `UnknownFactor` or `NotARateFactor`.
    pub fn simulated_curve(
        &self,
        name: &str,
    ) -> Result<SimulatedCurve<'_, CurveEnum<f64>>, ExposureError> {
        match self.lookup(name)? {
            FactorModel::Rate { curve, factor } => Ok(SimulatedCurve::new(curve, factor)),
            FactorModel::FxSpot { .. } => Err(ExposureError::NotARateFactor(name.to_string())),
        }
    }

    /// Per-path spot of the named FX factor.
    ///
    /// # Errors
    ///
    /// `UnknownFactor` or `NotAnFxFactor`.
    pub fn fx_spots(&self, name: &str) -> Result<&[f64], ExposureError> {
        match self.lookup(name)? {
            FactorModel::FxSpot { spot, .. } => Ok(spot.spots()),
            FactorModel::Rate { .. } => Err(ExposureError::NotAnFxFactor(name.to_string())),
        }
    }

    /// Running numeraire of the named rate factor.
    ///
    /// # Errors
    ///
    /// `UnknownFactor` or `NotARateFactor`.
    pub fn numeraire(&self, name: &str) -> Result<&[f64], ExposureError> {
        Ok(self.rate_factor(name)?.numeraire())
    }

    /// Slice of the first factor; 0 for an empty map.
    pub fn current_slice(&self) -> usize {
        self.entries
            .first()
            .map_or(0, |(_, model)| model.current_slice())
    }

    /// Date of the current slice, `None` once the schedule is exhausted.
    pub fn current_date(&self) -> Option<f64> {
        self.dates.get(self.current_slice())
    }

    /// Check that no factor has been advanced yet.
    ///
    /// A map whose valuation slice was attempted is stale even if the
    /// attempt failed before any factor moved.
    ///
    /// # Errors
    ///
    /// `StaleModelMap` naming the first factor that has been touched.
    pub fn validate_fresh(&self) -> Result<(), ExposureError> {
        for (name, model) in &self.entries {
            let slice = model.current_slice();
            if slice != 0 || self.started {
                return Err(ExposureError::StaleModelMap {
                    factor: name.clone(),
                    slice,
                });
            }
        }
        Ok(())
    }

    /// Check that every FX factor depends on two distinct rate factors
    /// registered ahead of it.
    ///
    /// # Errors
    ///
    /// `MissingDependency` naming the first offending FX factor.
    pub fn validate_dependencies(&self) -> Result<(), ExposureError> {
        for (k, (name, model)) in self.entries.iter().enumerate() {
            let FactorModel::FxSpot {
                domestic, foreign, ..
            } = model
            else {
                continue;
            };
            let is_rate_before =
                |ordinal: usize| ordinal < k && self.entries[ordinal].1.is_rate();
            if domestic == foreign || !is_rate_before(*domestic) || !is_rate_before(*foreign) {
                return Err(ExposureError::MissingDependency {
                    factor: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Advance every factor, in ordinal order, to the current slice.
    ///
    /// Rate factors take the base curve's short rate at slice 0 and the base
    /// forward over the previous interval afterwards. FX factors read the
    /// already advanced rate factors ahead of them.
    ///
    /// # Errors
    ///
    /// * `Simulation(ShockLengthMismatch)` - the generator serves a different
    ///   number of factors or paths
    /// * `MissingDependency` - an FX dependency is not a rate factor ahead of it
    /// * `Simulation` - any factor error, e.g. `OutOfRange` past the last date
    pub fn advance_slice(&mut self, shocks: &ShockGenerator) -> Result<(), ExposureError> {
        let n_factors = self.entries.len();
        if shocks.n_factors() != n_factors || shocks.n_paths() != self.n_paths {
            return Err(SimulationError::ShockLengthMismatch {
                expected: n_factors * self.n_paths,
                got: shocks.n_factors() * shocks.n_paths(),
            }
            .into());
        }

        self.started = true;
        for k in 0..n_factors {
            let (ahead, rest) = self.entries.split_at_mut(k);
            let (name, model) = &mut rest[0];
            match model {
                FactorModel::Rate { curve, factor } => {
                    let forward = base_forward(curve, factor)?;
                    factor.advance(forward, shocks.column(k))?;
                }
                FactorModel::FxSpot {
                    spot,
                    domestic,
                    foreign,
                } => {
                    let dom = rate_factor_at(ahead, *domestic, name)?;
                    let frn = rate_factor_at(ahead, *foreign, name)?;
                    spot.advance(dom, frn, shocks.column(k))?;
                }
            }
        }
        Ok(())
    }

    /// Move every factor to the next slice.
    pub fn move_to_next_slice(&mut self) {
        for (_, model) in &mut self.entries {
            model.move_to_next_slice();
        }
    }
}

/// Base forward feeding a rate factor at its current slice.
fn base_forward(curve: &CurveEnum<f64>, factor: &HullWhiteFactor) -> Result<f64, SimulationError> {
    let slice = factor.current_slice();
    if slice == 0 {
        return Ok(curve.short_rate()?);
    }
    let t = factor.current_date().ok_or(SimulationError::OutOfRange {
        slice,
        len: factor.dates().len(),
    })?;
    Ok(curve.forward_rate(factor.previous_date(), t)?)
}

fn rate_factor_at<'a>(
    ahead: &'a [(String, FactorModel)],
    ordinal: usize,
    dependent: &str,
) -> Result<&'a HullWhiteFactor, ExposureError> {
    match ahead.get(ordinal) {
        Some((_, FactorModel::Rate { factor, .. })) => Ok(factor),
        _ => Err(ExposureError::MissingDependency {
            factor: dependent.to_string(),
        }),
    }
}
