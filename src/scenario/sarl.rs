//! SARL scenario calculator (majority manager under TNS rules)
//!
//! The manager compensation carries TNS contributions, both paid by the
//! company. A deductible Madelin charge further lowers the pre-tax
//! profit. Dividend taxation elects, scenario by scenario, the cheaper of
//! the flat withholding and the progressive option (40% allowance plus
//! social levies on the full amount).

use crate::forms::LegalForm;
use crate::params::FiscalParams;
use crate::tax::{corporate_tax, income_tax, tns_contributions};

use super::optimizations::finalize_wealth;
use super::record::DividendTaxOption;
use super::{FinancialInputs, FormBreakdown, FormCalculator, ScenarioRecord, ScenarioRequest};

pub struct SarlCalculator;

impl FormCalculator for SarlCalculator {
    fn legal_form(&self) -> LegalForm {
        LegalForm::Sarl
    }

    fn compute_base_scenario(
        &self,
        inputs: &FinancialInputs,
        request: &ScenarioRequest,
        params: &FiscalParams,
    ) -> ScenarioRecord {
        let compensation = request.compensation;
        let contributions = tns_contributions(compensation, &params.tns);
        let contributions_total = contributions.total;

        let expense_allowance =
            (compensation * params.expense_allowance_rate).min(params.expense_allowance_cap);
        let taxable_income = compensation - expense_allowance;
        let (tax, tax_detail) = income_tax(taxable_income, inputs.fiscal_parts, &params.income_tax);

        let madelin_charge = request.madelin.max(0.0).min(params.instruments.madelin_ceiling);

        let corporate_profit =
            inputs.available_profit() - compensation - contributions_total - madelin_charge;
        let (company_tax, company_tax_detail) =
            corporate_tax(corporate_profit, &params.corporate_tax);

        let gross_dividends = corporate_profit - company_tax;

        // Election: compare the flat withholding against the progressive
        // option on this scenario's dividends and keep the cheaper one
        let flat_candidate = gross_dividends * params.dividend_flat_tax;
        let social_levies = gross_dividends * params.dividend_social_levies;
        let (dividend_income_tax, _) = income_tax(
            gross_dividends * (1.0 - params.dividend_allowance),
            inputs.fiscal_parts,
            &params.income_tax,
        );
        let progressive_candidate = social_levies + dividend_income_tax;

        let elect_progressive = progressive_candidate < flat_candidate && gross_dividends > 0.0;
        let (dividend_option, flat_tax, kept_levies, kept_income_tax, dividend_withholding) =
            if elect_progressive {
                (
                    DividendTaxOption::ProgressiveScale,
                    0.0,
                    social_levies,
                    dividend_income_tax,
                    progressive_candidate,
                )
            } else {
                (
                    DividendTaxOption::FlatTax,
                    flat_candidate,
                    0.0,
                    0.0,
                    flat_candidate,
                )
            };
        let net_dividends = gross_dividends - dividend_withholding;

        let mut scenario = ScenarioRecord::new(
            LegalForm::Sarl,
            FormBreakdown::Tns {
                contributions,
                madelin_charge,
                dividend_option,
                dividend_social_levies: kept_levies,
                dividend_income_tax: kept_income_tax,
            },
        );

        scenario.gross_compensation = compensation;
        scenario.social_contributions = contributions_total;
        scenario.net_before_tax = compensation;
        scenario.expense_allowance = expense_allowance;
        scenario.taxable_income = taxable_income;
        scenario.final_taxable_income = taxable_income;
        scenario.income_tax_before_credit = tax;
        scenario.income_tax = tax;
        scenario.income_tax_detail = tax_detail;

        scenario.corporate_profit = corporate_profit;
        scenario.corporate_tax = company_tax;
        scenario.corporate_tax_detail = company_tax_detail;
        scenario.gross_dividends = gross_dividends;
        scenario.flat_tax = flat_tax;
        scenario.net_dividends = net_dividends;
        scenario.dividend_levies = company_tax + dividend_withholding;
        scenario.dividend_levy_rate = if corporate_profit > 0.0 {
            scenario.dividend_levies / corporate_profit
        } else {
            0.0
        };

        scenario.applied.madelin = request.madelin;

        finalize_wealth(&mut scenario, inputs, params);
        scenario
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> FiscalParams {
        FiscalParams::year_2024()
    }

    fn scenario_for(result: f64, compensation: f64, parts: f64) -> ScenarioRecord {
        let inputs = FinancialInputs::new(result, 0.0, parts);
        SarlCalculator.compute_base_scenario(
            &inputs,
            &ScenarioRequest::new(compensation),
            &params(),
        )
    }

    #[test]
    fn test_contributions_are_company_paid() {
        let scenario = scenario_for(300_000.0, 80_000.0, 1.0);
        // The manager keeps the gross; contributions come out of profit
        assert_relative_eq!(scenario.net_before_tax, 80_000.0, epsilon = 1e-9);
        assert_relative_eq!(
            scenario.corporate_profit,
            300_000.0 - 80_000.0 - scenario.social_contributions,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_election_picks_the_cheaper_total() {
        for &result in &[120_000.0, 200_000.0, 300_000.0, 500_000.0] {
            for &compensation in &[0.0, 30_000.0, 80_000.0, 150_000.0] {
                let scenario = scenario_for(result, compensation, 1.0);
                if scenario.gross_dividends <= 0.0 {
                    continue;
                }

                let p = params();
                let flat = scenario.gross_dividends * p.dividend_flat_tax;
                let (dividend_ir, _) = income_tax(
                    scenario.gross_dividends * 0.60,
                    1.0,
                    &p.income_tax,
                );
                let progressive =
                    scenario.gross_dividends * p.dividend_social_levies + dividend_ir;

                let withholding = scenario.gross_dividends - scenario.net_dividends;
                assert_relative_eq!(withholding, flat.min(progressive), epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_election_flips_across_crossover() {
        // Small dividends at one part: 17.2% + IR on 60% stays under 30%
        let small = scenario_for(40_000.0, 0.0, 1.0);
        assert!(small.gross_dividends > 0.0);
        assert_eq!(
            small.dividend_option(),
            Some(DividendTaxOption::ProgressiveScale)
        );
        assert_eq!(small.flat_tax, 0.0);

        // Large dividends push the progressive option past the flat rate
        let large = scenario_for(400_000.0, 0.0, 1.0);
        assert_eq!(large.dividend_option(), Some(DividendTaxOption::FlatTax));
        assert!(large.flat_tax > 0.0);
    }

    #[test]
    fn test_madelin_charge_reduces_profit_and_is_capped() {
        let inputs = FinancialInputs::new(300_000.0, 0.0, 1.0);
        let mut request = ScenarioRequest::new(50_000.0);
        request.madelin = 100_000.0;
        let scenario = SarlCalculator.compute_base_scenario(&inputs, &request, &params());

        assert_relative_eq!(scenario.breakdown.madelin_charge(), 84_000.0, epsilon = 1e-9);
        let reference = SarlCalculator.compute_base_scenario(
            &inputs,
            &ScenarioRequest::new(50_000.0),
            &params(),
        );
        assert_relative_eq!(
            scenario.corporate_profit,
            reference.corporate_profit - 84_000.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_negative_dividends_fail_validity() {
        let scenario = scenario_for(60_000.0, 60_000.0, 1.0);
        assert!(scenario.gross_dividends < 0.0);
        assert!(!SarlCalculator.is_scenario_valid(&scenario));
    }
}
