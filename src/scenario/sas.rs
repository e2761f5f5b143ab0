//! SAS scenario calculator (president as assimilated employee)
//!
//! The compensation is a gross salary carrying separate employee and
//! employer flat contributions. The employer cost, salary plus employer
//! share plus any savings-plan match cost, is what the company profit
//! pays for. Dividends always take the flat withholding.

use crate::forms::LegalForm;
use crate::params::FiscalParams;
use crate::tax::{corporate_tax, employee_savings_plan, income_tax};

use super::optimizations::finalize_wealth;
use super::{FinancialInputs, FormBreakdown, FormCalculator, ScenarioRecord, ScenarioRequest};

pub struct SasCalculator;

impl FormCalculator for SasCalculator {
    fn legal_form(&self) -> LegalForm {
        LegalForm::Sas
    }

    fn compute_base_scenario(
        &self,
        inputs: &FinancialInputs,
        request: &ScenarioRequest,
        params: &FiscalParams,
    ) -> ScenarioRecord {
        let gross_salary = request.compensation;

        let employee_contributions = gross_salary * params.salaried.employee;
        let employer_contributions = gross_salary * params.salaried.employer;
        let employer_cost = gross_salary + employer_contributions;
        let net_salary = gross_salary - employee_contributions;

        let expense_allowance =
            (net_salary * params.expense_allowance_rate).min(params.expense_allowance_cap);
        let taxable_income = net_salary - expense_allowance;
        let (tax, tax_detail) = income_tax(taxable_income, inputs.fiscal_parts, &params.income_tax);

        let pee = if request.pee > 0.0 {
            Some(employee_savings_plan(gross_salary, request.pee, params))
        } else {
            None
        };
        let pee_cost = pee.as_ref().map(|p| p.employer_cost).unwrap_or(0.0);

        let corporate_profit = inputs.available_profit() - employer_cost - pee_cost;
        let (company_tax, company_tax_detail) =
            corporate_tax(corporate_profit, &params.corporate_tax);

        let gross_dividends = corporate_profit - company_tax;
        let flat_tax = gross_dividends * params.dividend_flat_tax;
        let net_dividends = gross_dividends - flat_tax;

        let mut scenario = ScenarioRecord::new(
            LegalForm::Sas,
            FormBreakdown::Salaried {
                employee_contributions,
                employer_contributions,
                employer_cost,
                pee,
            },
        );

        scenario.gross_compensation = gross_salary;
        scenario.social_contributions = employee_contributions;
        scenario.net_before_tax = net_salary;
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
        scenario.dividend_levies = company_tax + flat_tax;
        scenario.dividend_levy_rate = if corporate_profit > 0.0 {
            scenario.dividend_levies / corporate_profit
        } else {
            0.0
        };

        scenario.applied.pee = request.pee;

        finalize_wealth(&mut scenario, inputs, params);
        scenario
    }

    /// Cap the gross salary so that salary plus employer contributions
    /// never exceeds the available profit
    fn compensation_upper_bound(&self, inputs: &FinancialInputs, params: &FiscalParams) -> f64 {
        (inputs.available_profit() / (1.0 + params.salaried.employer)).max(0.0)
    }
}
