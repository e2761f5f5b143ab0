//! Personal-optimization layering
//!
//! Takes any base scenario and applies the owner-level instruments on top:
//! the retirement-savings deduction lowers taxable income, then the
//! investment credit lowers the tax due. The base record is never mutated,
//! an augmented copy is returned.

use crate::params::FiscalParams;
use crate::tax::income_tax;

use super::{FinancialInputs, ScenarioRecord};
use crate::forms::LegalForm;

/// Apply the retirement-savings deduction and the investment credit to a
/// base scenario.
///
/// - deduction = min(requested, 10% of taxable income, absolute ceiling)
/// - credit = min(amount x 1.10, tax due after deduction), the tax never
///   goes negative
/// - net cash subtracts the credit outlay and the personal placement
///   outlays; `total_net` adds placements back since they stay owned
pub fn apply_personal_optimizations(
    base: &ScenarioRecord,
    per_amount: f64,
    girardin_amount: f64,
    inputs: &FinancialInputs,
    params: &FiscalParams,
) -> ScenarioRecord {
    let mut scenario = base.clone();
    let per_amount = per_amount.max(0.0);
    let girardin_amount = girardin_amount.max(0.0);
    let instruments = &params.instruments;

    let available_ceiling = (scenario.taxable_income * instruments.per_income_fraction)
        .min(instruments.per_ceiling);
    let per_deduction = per_amount
        .min(available_ceiling)
        .min(scenario.taxable_income)
        .max(0.0);

    scenario.per_deduction = per_deduction;
    scenario.final_taxable_income = scenario.taxable_income - per_deduction;

    let (tax_before_credit, detail) = income_tax(
        scenario.final_taxable_income,
        inputs.fiscal_parts,
        &params.income_tax,
    );
    let credit = (girardin_amount * instruments.girardin_multiplier).min(tax_before_credit);

    scenario.income_tax_before_credit = tax_before_credit;
    scenario.income_tax_detail = detail;
    scenario.girardin_credit = credit;
    scenario.income_tax = tax_before_credit - credit;

    scenario.applied.per = per_amount;
    scenario.applied.girardin = girardin_amount;

    finalize_wealth(&mut scenario, inputs, params);
    scenario
}

/// Recompute the wealth figures of a record whose tax fields are settled.
///
/// Shared by the base calculators (zero personal instruments) and the
/// layering above.
pub(crate) fn finalize_wealth(
    scenario: &mut ScenarioRecord,
    inputs: &FinancialInputs,
    params: &FiscalParams,
) {
    scenario.net_after_tax = scenario.net_before_tax - scenario.income_tax;

    // Negative dividends cannot be distributed
    let distributable = scenario.net_dividends.max(0.0);

    let outlays = scenario.applied.girardin
        + scenario.applied.per
        + scenario.breakdown.personal_outlays();
    scenario.net_cash = scenario.net_after_tax + distributable - outlays;

    let placements = scenario.applied.per + scenario.breakdown.placement_value();
    scenario.total_net = scenario.net_cash + placements;

    let reference = match scenario.form {
        LegalForm::Micro => inputs.result_before_compensation,
        _ => inputs.available_profit(),
    };
    scenario.overall_levy_rate = if reference > 0.0 {
        1.0 - scenario.total_net / reference
    } else {
        0.0
    };

    let instruments = &params.instruments;
    let theoretical_credit = scenario.applied.girardin * instruments.girardin_multiplier;
    scenario.applied.girardin_net_gain = scenario.girardin_credit - scenario.applied.girardin;
    scenario.applied.girardin_efficiency = if theoretical_credit > 0.0 {
        scenario.girardin_credit / theoretical_credit
    } else {
        0.0
    };

    let pee_saving = scenario
        .breakdown
        .pee()
        .map(|p| p.corporate_tax_saving)
        .unwrap_or(0.0);
    scenario.applied.estimated_savings = scenario.per_deduction * instruments.per_saving_estimate
        + scenario.breakdown.madelin_charge() * instruments.madelin_saving_estimate
        + scenario.girardin_credit
        + scenario.breakdown.acre_relief()
        + pee_saving;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::create_calculator;
    use crate::scenario::{FormCalculator, ScenarioRequest};
    use approx::assert_relative_eq;

    fn base_sarl_scenario(compensation: f64) -> (ScenarioRecord, FinancialInputs, FiscalParams) {
        let params = FiscalParams::year_2024();
        let inputs = FinancialInputs::new(300_000.0, 50_000.0, 1.0);
        let calculator = create_calculator(LegalForm::Sarl);
        let base = calculator.compute_base_scenario(
            &inputs,
            &ScenarioRequest::new(compensation),
            &params,
        );
        (base, inputs, params)
    }

    #[test]
    fn test_base_is_not_mutated() {
        let (base, inputs, params) = base_sarl_scenario(80_000.0);
        let before = base.income_tax;
        let _ = apply_personal_optimizations(&base, 10_000.0, 5_000.0, &inputs, &params);
        assert_eq!(base.income_tax, before);
        assert_eq!(base.per_deduction, 0.0);
    }

    #[test]
    fn test_per_deduction_lowers_tax() {
        let (base, inputs, params) = base_sarl_scenario(80_000.0);
        let with_per = apply_personal_optimizations(&base, 7_000.0, 0.0, &inputs, &params);
        assert!(with_per.per_deduction > 0.0);
        assert!(with_per.income_tax < base.income_tax);
        assert_relative_eq!(
            with_per.final_taxable_income,
            base.taxable_income - with_per.per_deduction,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_per_deduction_respects_income_fraction() {
        let (base, inputs, params) = base_sarl_scenario(80_000.0);
        let with_per = apply_personal_optimizations(&base, 1_000_000.0, 0.0, &inputs, &params);
        let ceiling = (base.taxable_income * 0.10).min(params.instruments.per_ceiling);
        assert_relative_eq!(with_per.per_deduction, ceiling, epsilon = 1e-9);
    }

    #[test]
    fn test_credit_never_drives_tax_negative() {
        let (base, inputs, params) = base_sarl_scenario(40_000.0);
        // Nominal reduction far beyond the tax due
        let scenario = apply_personal_optimizations(&base, 0.0, 500_000.0, &inputs, &params);
        assert!(scenario.income_tax >= 0.0);
        assert_relative_eq!(scenario.income_tax, 0.0, epsilon = 1e-9);
        assert_relative_eq!(
            scenario.girardin_credit,
            scenario.income_tax_before_credit,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_patrimony_adds_placements_back() {
        let (base, inputs, params) = base_sarl_scenario(80_000.0);
        let scenario = apply_personal_optimizations(&base, 7_000.0, 0.0, &inputs, &params);
        // The PER outlay leaves net cash but stays in the patrimony metric
        assert_relative_eq!(
            scenario.total_net,
            scenario.net_cash + scenario.applied.per + scenario.breakdown.placement_value(),
            epsilon = 1e-9
        );
        assert!(scenario.net_cash < scenario.total_net);
    }

    #[test]
    fn test_girardin_outlay_reduces_wealth_when_unused() {
        // With no tax to absorb the credit, the outlay is a pure loss
        let (base, inputs, params) = base_sarl_scenario(0.0);
        let scenario = apply_personal_optimizations(&base, 0.0, 10_000.0, &inputs, &params);
        assert_eq!(scenario.girardin_credit, 0.0);
        assert_relative_eq!(scenario.total_net, base.total_net - 10_000.0, epsilon = 1e-9);
        assert_relative_eq!(scenario.applied.girardin_net_gain, -10_000.0, epsilon = 1e-9);
    }
}
