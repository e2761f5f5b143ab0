//! Brute-force sweep optimizer
//!
//! Stateless sweeps over the compensation axis, one per instrument
//! combination. Three search shapes: a plain linear sweep, a combinatorial
//! sweep over the power set of the form's instruments, and a two-phase
//! coarse/fine sweep whenever the investment credit is active, since its
//! interaction with the compensation axis produces a narrow optimum a
//! plain sweep easily misses.
//!
//! Every sweep iteration is an independent pure computation, so the
//! combinations run in parallel; results are collected in combination
//! order and the best-scenario selection is identical to a sequential run.

use std::collections::BTreeMap;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::forms::{Instrument, LegalForm};
use crate::params::{ActivityType, FiscalParams};
use crate::scenario::{
    compute_scenario, FinancialInputs, FormCalculator, ScenarioRecord, ScenarioRequest,
};

/// Floor on the coarse-phase step of the two-phase sweep
const MIN_COARSE_STEP: f64 = 10_000.0;
/// Below this many fine-phase points the two-phase sweep falls back to
/// the union of both phases
const MIN_FINE_POINTS: usize = 10;

/// Sweep configuration. `None` ceilings fall back to the fiscal-year
/// defaults.
#[derive(Debug, Clone)]
pub struct SweepSettings {
    /// Compensation increment between two scenarios
    pub step: f64,
    pub min_compensation: f64,
    /// Defaults to the form-specific upper bound
    pub max_compensation: Option<f64>,
    pub per_max: Option<f64>,
    pub madelin_max: Option<f64>,
    pub girardin_max: Option<f64>,
    pub pee_max: Option<f64>,
    /// Also try every combination with the ACRE relief active
    pub use_acre: bool,
    /// Micro-enterprise activity regime
    pub activity: ActivityType,
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self {
            step: 5_000.0,
            min_compensation: 0.0,
            max_compensation: None,
            per_max: None,
            madelin_max: None,
            girardin_max: None,
            pee_max: None,
            use_acre: false,
            activity: ActivityType::default(),
        }
    }
}

impl SweepSettings {
    fn instrument_ceiling(&self, instrument: Instrument, params: &FiscalParams) -> f64 {
        let inst = &params.instruments;
        match instrument {
            Instrument::Per => self.per_max.unwrap_or(inst.per_ceiling),
            Instrument::Madelin => self.madelin_max.unwrap_or(inst.madelin_ceiling),
            Instrument::Girardin => self.girardin_max.unwrap_or(inst.girardin_default_ceiling),
            Instrument::Pee => self
                .pee_max
                .unwrap_or(inst.pee_match_ceiling / inst.pee_match_multiplier),
            Instrument::Acre => 0.0,
        }
    }
}

/// One point of the instrument power set: each supported instrument either
/// at its ceiling or absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstrumentCombination {
    pub per: f64,
    pub madelin: f64,
    pub girardin: f64,
    pub pee: f64,
    pub acre: bool,
}

impl InstrumentCombination {
    /// Human-readable strategy label for tables and logs
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.per > 0.0 {
            parts.push(format!("PER:{:.0}", self.per));
        }
        if self.madelin > 0.0 {
            parts.push(format!("Madelin:{:.0}", self.madelin));
        }
        if self.girardin > 0.0 {
            parts.push(format!("Girardin:{:.0}", self.girardin));
        }
        if self.pee > 0.0 {
            parts.push(format!("PEE:{:.0}", self.pee));
        }
        if self.acre {
            parts.push("ACRE".to_string());
        }
        if parts.is_empty() {
            "no instruments".to_string()
        } else {
            parts.join(" | ")
        }
    }
}

/// Sweep result for one instrument combination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyOutcome {
    pub combination: InstrumentCombination,
    /// Valid scenarios in sweep order (ascending compensation)
    pub scenarios: Vec<ScenarioRecord>,
    /// Best-by-metric scenario of this combination
    pub best: Option<ScenarioRecord>,
}

/// Full optimization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationOutcome {
    /// Best scenario across every combination, `None` when every swept
    /// point was economically invalid
    pub best: Option<ScenarioRecord>,
    /// Every valid scenario, concatenated in combination order
    pub scenarios: Vec<ScenarioRecord>,
    /// Per-combination grouping
    pub strategies: Vec<StrategyOutcome>,
}

/// Sweep driver for one legal form over one financial situation
pub struct Optimizer<'a> {
    calculator: &'a dyn FormCalculator,
    inputs: FinancialInputs,
    params: &'a FiscalParams,
}

impl<'a> Optimizer<'a> {
    pub fn new(
        calculator: &'a dyn FormCalculator,
        inputs: FinancialInputs,
        params: &'a FiscalParams,
    ) -> Self {
        Self {
            calculator,
            inputs,
            params,
        }
    }

    /// Run the combinatorial sweep and select the global best scenario.
    pub fn optimize(&self, settings: &SweepSettings) -> OptimizationOutcome {
        let combinations = self.combinations(settings);
        debug!(
            "sweeping {} instrument combinations for {}",
            combinations.len(),
            self.calculator.legal_form()
        );

        let strategies: Vec<StrategyOutcome> = combinations
            .into_par_iter()
            .map(|combination| {
                let scenarios = self.sweep_combination(&combination, settings);
                let best = best_scenario(&scenarios).cloned();
                StrategyOutcome {
                    combination,
                    scenarios,
                    best,
                }
            })
            .collect();

        let mut scenarios = Vec::new();
        for strategy in &strategies {
            scenarios.extend_from_slice(&strategy.scenarios);
        }
        let best = best_scenario(&scenarios).cloned();

        OptimizationOutcome {
            best,
            scenarios,
            strategies,
        }
    }

    /// Sweep one instrument combination over the compensation axis.
    pub fn sweep_combination(
        &self,
        combination: &InstrumentCombination,
        settings: &SweepSettings,
    ) -> Vec<ScenarioRecord> {
        // The micro revenue is fixed by the caller, nothing to sweep
        if self.calculator.legal_form() == LegalForm::Micro {
            let scenario =
                self.compute(self.inputs.result_before_compensation, combination, settings);
            return if self.calculator.is_scenario_valid(&scenario) {
                vec![scenario]
            } else {
                Vec::new()
            };
        }

        let min = settings.min_compensation.max(0.0);
        let max = settings
            .max_compensation
            .unwrap_or_else(|| self.calculator.compensation_upper_bound(&self.inputs, self.params));
        let step = settings.step.max(1.0);

        if combination.girardin > 0.0 {
            self.two_phase_sweep(combination, settings, min, max, step)
        } else {
            self.linear_sweep(combination, settings, min, max, step)
        }
    }

    fn linear_sweep(
        &self,
        combination: &InstrumentCombination,
        settings: &SweepSettings,
        min: f64,
        max: f64,
        step: f64,
    ) -> Vec<ScenarioRecord> {
        let mut scenarios = Vec::new();
        if max < min {
            return scenarios;
        }

        let points = ((max - min) / step).floor() as u64;
        for i in 0..=points {
            let compensation = min + i as f64 * step;
            let scenario = self.compute(compensation, combination, settings);
            if self.calculator.is_scenario_valid(&scenario) {
                scenarios.push(scenario);
            }
        }
        scenarios
    }

    /// Locate the investment-credit optimum with a coarse pass, then
    /// resolve it at the requested step inside one coarse-step window.
    fn two_phase_sweep(
        &self,
        combination: &InstrumentCombination,
        settings: &SweepSettings,
        min: f64,
        max: f64,
        step: f64,
    ) -> Vec<ScenarioRecord> {
        // The coarse step stays a multiple of the fine step so the coarse
        // optimum always lands on the fine grid
        let multiplier = (MIN_COARSE_STEP / step).ceil().max(4.0);
        let coarse_step = step * multiplier;

        let coarse = self.linear_sweep(combination, settings, min, max, coarse_step);
        let Some(approx) = best_scenario(&coarse).map(|s| s.gross_compensation) else {
            return Vec::new();
        };
        debug!("coarse optimum near {approx:.0}, refining at step {step:.0}");

        let zone_min = (approx - coarse_step).max(min);
        let zone_max = (approx + coarse_step).min(max);
        let fine = self.linear_sweep(combination, settings, zone_min, zone_max, step);

        if fine.len() >= MIN_FINE_POINTS {
            return fine;
        }

        // Window too narrow: keep the union of both phases, de-duplicated
        // by compensation, ascending
        let mut merged: BTreeMap<i64, ScenarioRecord> = BTreeMap::new();
        for scenario in coarse.into_iter().chain(fine) {
            merged.insert(scenario.gross_compensation.round() as i64, scenario);
        }
        merged.into_values().collect()
    }

    fn compute(
        &self,
        compensation: f64,
        combination: &InstrumentCombination,
        settings: &SweepSettings,
    ) -> ScenarioRecord {
        let request = ScenarioRequest {
            compensation,
            per: combination.per,
            madelin: combination.madelin,
            girardin: combination.girardin,
            pee: combination.pee,
            acre: combination.acre,
            activity: settings.activity,
        };
        compute_scenario(self.calculator, &self.inputs, &request, self.params)
    }

    /// Power set of the form's instruments, each active one at its
    /// ceiling, ordered by active-instrument count then precedence.
    fn combinations(&self, settings: &SweepSettings) -> Vec<InstrumentCombination> {
        let form = self.calculator.legal_form();
        let binary: Vec<Instrument> = form
            .available_instruments()
            .iter()
            .copied()
            .filter(|i| *i != Instrument::Acre)
            .collect();

        let mut masks: Vec<u32> = (0..1u32 << binary.len()).collect();
        masks.sort_by_key(|m| (m.count_ones(), *m));

        let mut combinations: Vec<InstrumentCombination> = masks
            .into_iter()
            .map(|mask| {
                let mut combination = InstrumentCombination::default();
                for (bit, &instrument) in binary.iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        let ceiling = settings.instrument_ceiling(instrument, self.params);
                        match instrument {
                            Instrument::Per => combination.per = ceiling,
                            Instrument::Madelin => combination.madelin = ceiling,
                            Instrument::Girardin => combination.girardin = ceiling,
                            Instrument::Pee => combination.pee = ceiling,
                            Instrument::Acre => {}
                        }
                    }
                }
                combination
            })
            .collect();

        if settings.use_acre && form.supports(Instrument::Acre) {
            let with_acre: Vec<InstrumentCombination> = combinations
                .iter()
                .cloned()
                .map(|mut c| {
                    c.acre = true;
                    c
                })
                .collect();
            combinations.extend(with_acre);
        }

        combinations
    }
}

/// First scenario holding the strict maximum of the ranking metric
fn best_scenario(scenarios: &[ScenarioRecord]) -> Option<&ScenarioRecord> {
    let mut best: Option<&ScenarioRecord> = None;
    for scenario in scenarios {
        if best.map_or(true, |b| scenario.ranking_metric() > b.ranking_metric()) {
            best = Some(scenario);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::create_calculator;

    fn params() -> FiscalParams {
        FiscalParams::year_2024()
    }

    #[test]
    fn test_holding_runs_eight_combinations() {
        let params = params();
        let calculator = create_calculator(LegalForm::SarlHolding);
        let inputs = FinancialInputs::new(300_000.0, 50_000.0, 1.0);
        let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);

        let outcome = optimizer.optimize(&SweepSettings::default());
        assert_eq!(outcome.strategies.len(), 8);

        // The global best metric equals the maximum of the per-combination
        // bests
        let best = outcome.best.as_ref().expect("a best scenario");
        let max_of_strategies = outcome
            .strategies
            .iter()
            .filter_map(|s| s.best.as_ref())
            .map(|s| s.total_net)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(best.total_net, max_of_strategies);

        // Every retained scenario passed the validity predicate
        assert!(outcome.scenarios.iter().all(|s| s.flat_tax >= 0.0));
    }

    #[test]
    fn test_scenarios_are_in_sweep_order() {
        let params = params();
        let calculator = create_calculator(LegalForm::Sas);
        let inputs = FinancialInputs::new(300_000.0, 50_000.0, 1.0);
        let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);

        let outcome = optimizer.optimize(&SweepSettings::default());
        for strategy in &outcome.strategies {
            for pair in strategy.scenarios.windows(2) {
                assert!(pair[0].gross_compensation < pair[1].gross_compensation);
            }
        }
    }

    #[test]
    fn test_fine_phase_never_worse_than_coarse() {
        let params = params();
        let calculator = create_calculator(LegalForm::Sarl);
        let inputs = FinancialInputs::new(300_000.0, 50_000.0, 1.0);
        let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);

        let settings = SweepSettings {
            step: 1_000.0,
            ..Default::default()
        };
        let combination = InstrumentCombination {
            girardin: 30_000.0,
            ..Default::default()
        };

        let coarse_step = settings.step * (MIN_COARSE_STEP / settings.step).ceil().max(4.0);
        let coarse = optimizer.linear_sweep(
            &combination,
            &settings,
            0.0,
            inputs.available_profit(),
            coarse_step,
        );
        let refined = optimizer.two_phase_sweep(
            &combination,
            &settings,
            0.0,
            inputs.available_profit(),
            settings.step,
        );

        let coarse_best = best_scenario(&coarse).expect("coarse best").total_net;
        let fine_best = best_scenario(&refined).expect("fine best").total_net;
        assert!(fine_best >= coarse_best);
    }

    #[test]
    fn test_sas_budget_bound_excludes_overrun() {
        // 100,000 result and 50,000 charges leave a 50,000 budget; a
        // 49,000 salary costs 69,580 and must never appear in the sweep
        let params = params();
        let calculator = create_calculator(LegalForm::Sas);
        let inputs = FinancialInputs::new(100_000.0, 50_000.0, 1.0);
        let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);

        let settings = SweepSettings {
            step: 2_500.0,
            ..Default::default()
        };
        let outcome = optimizer.optimize(&settings);

        let bound = 50_000.0 / 1.42;
        assert!(!outcome.scenarios.is_empty());
        for scenario in &outcome.scenarios {
            assert!(scenario.gross_compensation <= bound);
            assert!(scenario.employer_cost() <= 50_000.0 + 1e-6);
        }
    }

    #[test]
    fn test_empty_sweep_yields_no_best() {
        // Charges above the result leave nothing to sweep
        let params = params();
        let calculator = create_calculator(LegalForm::Sas);
        let inputs = FinancialInputs::new(40_000.0, 90_000.0, 1.0);
        let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);

        let outcome = optimizer.optimize(&SweepSettings::default());
        assert!(outcome.best.is_none());
        assert!(outcome.scenarios.is_empty());
        for strategy in &outcome.strategies {
            assert!(strategy.best.is_none());
        }
    }

    #[test]
    fn test_micro_combination_counts() {
        let params = params();
        let calculator = create_calculator(LegalForm::Micro);
        let inputs = FinancialInputs::new(60_000.0, 0.0, 1.0);
        let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);

        let without_acre = optimizer.optimize(&SweepSettings::default());
        assert_eq!(without_acre.strategies.len(), 4);
        assert!(without_acre
            .strategies
            .iter()
            .all(|s| s.scenarios.len() == 1));

        let with_acre = optimizer.optimize(&SweepSettings {
            use_acre: true,
            ..Default::default()
        });
        assert_eq!(with_acre.strategies.len(), 8);
        assert!(with_acre.strategies[4..].iter().all(|s| s.combination.acre));
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let params = params();
        let calculator = create_calculator(LegalForm::SarlHolding);
        let inputs = FinancialInputs::new(300_000.0, 50_000.0, 2.0);
        let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);

        let settings = SweepSettings {
            step: 10_000.0,
            ..Default::default()
        };
        let first = optimizer.optimize(&settings);
        let second = optimizer.optimize(&settings);

        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }
}
