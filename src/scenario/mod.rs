//! Per-legal-form scenario calculators
//!
//! One calculator per legal form, all implementing `FormCalculator`. The
//! calculators produce a base scenario for a compensation level; the
//! personal-optimization layering in [`optimizations`] then adds the
//! retirement-savings deduction and the investment credit on top.

mod holding;
mod micro;
pub mod optimizations;
mod record;
mod sarl;
mod sas;

pub use holding::SarlHoldingCalculator;
pub use micro::MicroCalculator;
pub use optimizations::apply_personal_optimizations;
pub use record::{AppliedInstruments, DividendTaxOption, FormBreakdown, ScenarioRecord};
pub use sarl::SarlCalculator;
pub use sas::SasCalculator;

use serde::{Deserialize, Serialize};

use crate::forms::LegalForm;
use crate::params::{ActivityType, FiscalParams};

/// Base financial situation of the company and its owner, immutable for
/// the whole optimization run.
///
/// For the micro-enterprise, `result_before_compensation` holds the annual
/// revenue and `existing_charges` the owner's real deductible expenses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FinancialInputs {
    /// Company result before any compensation and before existing charges
    pub result_before_compensation: f64,
    /// Pre-existing deductible charges
    pub existing_charges: f64,
    /// Household tax-part count
    pub fiscal_parts: f64,
}

impl FinancialInputs {
    pub fn new(result_before_compensation: f64, existing_charges: f64, fiscal_parts: f64) -> Self {
        Self {
            result_before_compensation,
            existing_charges,
            fiscal_parts,
        }
    }

    /// Profit left to split between compensation and dividends
    pub fn available_profit(&self) -> f64 {
        self.result_before_compensation - self.existing_charges
    }
}

/// One scenario request: a compensation level plus the requested amounts
/// of the optional instruments. Instruments a form does not support are
/// ignored by its calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRequest {
    /// Revenue (micro) or gross compensation (company forms)
    pub compensation: f64,
    /// Retirement-savings amount
    pub per: f64,
    /// Supplementary-pension charge
    pub madelin: f64,
    /// Investment-credit outlay
    pub girardin: f64,
    /// Savings-plan employee contribution
    pub pee: f64,
    /// First-year contribution relief (micro only)
    pub acre: bool,
    /// Micro-enterprise activity regime
    pub activity: ActivityType,
}

impl ScenarioRequest {
    pub fn new(compensation: f64) -> Self {
        Self {
            compensation,
            per: 0.0,
            madelin: 0.0,
            girardin: 0.0,
            pee: 0.0,
            acre: false,
            activity: ActivityType::default(),
        }
    }
}

/// Contract shared by the four legal-form calculators
pub trait FormCalculator: Sync {
    fn legal_form(&self) -> LegalForm;

    /// Compute the structure-level scenario for one compensation level,
    /// without the personal retirement-savings deduction and investment
    /// credit (those are layered on afterwards).
    fn compute_base_scenario(
        &self,
        inputs: &FinancialInputs,
        request: &ScenarioRequest,
        params: &FiscalParams,
    ) -> ScenarioRecord;

    /// Highest compensation worth sweeping for this form
    fn compensation_upper_bound(&self, inputs: &FinancialInputs, params: &FiscalParams) -> f64 {
        let _ = params;
        inputs.available_profit().max(0.0)
    }

    /// Economic validity predicate applied by the sweep. A failing
    /// scenario is silently dropped, never an error.
    fn is_scenario_valid(&self, scenario: &ScenarioRecord) -> bool {
        scenario.flat_tax >= 0.0
    }
}

/// Compute a complete scenario: base structure plus personal layering.
pub fn compute_scenario(
    calculator: &dyn FormCalculator,
    inputs: &FinancialInputs,
    request: &ScenarioRequest,
    params: &FiscalParams,
) -> ScenarioRecord {
    let base = calculator.compute_base_scenario(inputs, request, params);
    apply_personal_optimizations(&base, request.per, request.girardin, inputs, params)
}
