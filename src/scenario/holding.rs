//! SARL + holding scenario calculator
//!
//! Same compensation and contribution layer as the plain SARL, but the
//! subsidiary dividends first climb into the holding under the
//! parent-subsidiary regime: 95% exempt, the remaining share taxed at the
//! standard corporate rate. The flat withholding applies at the holding
//! exit, there is no progressive election.

use crate::forms::LegalForm;
use crate::params::FiscalParams;
use crate::tax::{corporate_tax, income_tax, tns_contributions};

use super::optimizations::finalize_wealth;
use super::{FinancialInputs, FormBreakdown, FormCalculator, ScenarioRecord, ScenarioRequest};

pub struct SarlHoldingCalculator;

impl FormCalculator for SarlHoldingCalculator {
    fn legal_form(&self) -> LegalForm {
        LegalForm::SarlHolding
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

        // Subsidiary distribution, then the parent-subsidiary step
        let subsidiary_dividends = corporate_profit - company_tax;
        let taxable_share = subsidiary_dividends * (1.0 - params.parent_subsidiary_exemption);
        let holding_corporate_tax = taxable_share * params.standard_corporate_rate();
        let holding_dividends = subsidiary_dividends - holding_corporate_tax;

        let flat_tax = holding_dividends * params.dividend_flat_tax;
        let net_dividends = holding_dividends - flat_tax;

        let mut scenario = ScenarioRecord::new(
            LegalForm::SarlHolding,
            FormBreakdown::TnsHolding {
                contributions,
                madelin_charge,
                taxable_share,
                holding_corporate_tax,
                holding_dividends,
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
        scenario.gross_dividends = subsidiary_dividends;
        scenario.flat_tax = flat_tax;
        scenario.net_dividends = net_dividends;
        scenario.dividend_levies = company_tax + holding_corporate_tax + flat_tax;
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
