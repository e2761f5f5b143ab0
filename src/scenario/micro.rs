//! Micro-enterprise scenario calculator
//!
//! No corporate layer: the revenue itself is the income unit. Social
//! contributions and the taxable base are flat-rate fractions of revenue
//! looked up in the activity regime, with an optional first-year ACRE
//! relief on the contribution rate.

use log::warn;

use crate::forms::LegalForm;
use crate::params::FiscalParams;
use crate::tax::income_tax;

use super::optimizations::finalize_wealth;
use super::{FinancialInputs, FormBreakdown, FormCalculator, ScenarioRecord, ScenarioRequest};

pub struct MicroCalculator;

impl FormCalculator for MicroCalculator {
    fn legal_form(&self) -> LegalForm {
        LegalForm::Micro
    }

    fn compute_base_scenario(
        &self,
        inputs: &FinancialInputs,
        request: &ScenarioRequest,
        params: &FiscalParams,
    ) -> ScenarioRecord {
        let revenue = request.compensation;
        let regime = params.micro.for_activity(request.activity);

        // Exceeding the ceiling is tolerated for two years, report only
        let revenue_warning = if revenue > regime.revenue_ceiling {
            let message = format!(
                "revenue {:.0} exceeds the {:.0} micro ceiling for {} (tolerated two years)",
                revenue,
                regime.revenue_ceiling,
                request.activity.label()
            );
            warn!("{message}");
            Some(message)
        } else {
            None
        };

        // ACRE halves the rate, not the base
        let (effective_rate, acre_relief) = if request.acre {
            let reduction = params.instruments.acre_reduction;
            (
                regime.contribution_rate * (1.0 - reduction),
                revenue * regime.contribution_rate * reduction,
            )
        } else {
            (regime.contribution_rate, 0.0)
        };
        let contributions = revenue * effective_rate;

        let micro_allowance = revenue * regime.allowance_rate;
        let taxable_income = revenue - micro_allowance;
        let (tax, tax_detail) = income_tax(taxable_income, inputs.fiscal_parts, &params.income_tax);

        let madelin_charge = request.madelin.max(0.0).min(params.instruments.madelin_ceiling);

        let mut scenario = ScenarioRecord::new(
            LegalForm::Micro,
            FormBreakdown::Micro {
                activity: request.activity,
                effective_contribution_rate: effective_rate,
                acre_relief,
                micro_allowance,
                madelin_charge,
                real_expenses: inputs.existing_charges,
                revenue_warning,
            },
        );

        scenario.gross_compensation = revenue;
        scenario.social_contributions = contributions;
        scenario.net_before_tax = revenue - contributions;
        scenario.taxable_income = taxable_income;
        scenario.final_taxable_income = taxable_income;
        scenario.income_tax_before_credit = tax;
        scenario.income_tax = tax;
        scenario.income_tax_detail = tax_detail;

        scenario.applied.madelin = request.madelin;
        scenario.applied.acre = request.acre;

        finalize_wealth(&mut scenario, inputs, params);
        scenario
    }

    /// The revenue is fixed by the caller, there is no axis to sweep
    fn compensation_upper_bound(&self, inputs: &FinancialInputs, _params: &FiscalParams) -> f64 {
        inputs.result_before_compensation
    }

    /// A ceiling breach stays a warning, never invalidity
    fn is_scenario_valid(&self, _scenario: &ScenarioRecord) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ActivityType;
    use approx::assert_relative_eq;

    fn params() -> FiscalParams {
        FiscalParams::year_2024()
    }

    fn request(revenue: f64) -> ScenarioRequest {
        ScenarioRequest::new(revenue)
    }

    #[test]
    fn test_services_regime_rates() {
        let inputs = FinancialInputs::new(60_000.0, 0.0, 1.0);
        let scenario =
            MicroCalculator.compute_base_scenario(&inputs, &request(60_000.0), &params());

        assert_relative_eq!(scenario.social_contributions, 60_000.0 * 0.212, epsilon = 1e-9);
        assert_relative_eq!(scenario.taxable_income, 60_000.0 * 0.50, epsilon = 1e-9);
        assert_eq!(scenario.corporate_tax, 0.0);
        assert_eq!(scenario.net_dividends, 0.0);
    }

    #[test]
    fn test_acre_halves_rate_not_base() {
        let inputs = FinancialInputs::new(60_000.0, 0.0, 1.0);
        let mut req = request(60_000.0);
        req.acre = true;
        let scenario = MicroCalculator.compute_base_scenario(&inputs, &req, &params());

        assert_relative_eq!(scenario.social_contributions, 60_000.0 * 0.106, epsilon = 1e-9);
        assert_relative_eq!(
            scenario.breakdown.acre_relief(),
            60_000.0 * 0.212 * 0.50,
            epsilon = 1e-9
        );
        // Taxable base unchanged by ACRE
        assert_relative_eq!(scenario.taxable_income, 30_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ceiling_breach_warns_but_stays_valid() {
        let inputs = FinancialInputs::new(90_000.0, 0.0, 1.0);
        let scenario =
            MicroCalculator.compute_base_scenario(&inputs, &request(90_000.0), &params());

        match &scenario.breakdown {
            FormBreakdown::Micro { revenue_warning, .. } => assert!(revenue_warning.is_some()),
            _ => panic!("expected a micro breakdown"),
        }
        assert!(MicroCalculator.is_scenario_valid(&scenario));
    }

    #[test]
    fn test_sales_regime_has_higher_ceiling() {
        let inputs = FinancialInputs::new(150_000.0, 0.0, 1.0);
        let mut req = request(150_000.0);
        req.activity = ActivityType::SalesBic;
        let scenario = MicroCalculator.compute_base_scenario(&inputs, &req, &params());

        match &scenario.breakdown {
            FormBreakdown::Micro { revenue_warning, .. } => assert!(revenue_warning.is_none()),
            _ => panic!("expected a micro breakdown"),
        }
        assert_relative_eq!(scenario.taxable_income, 150_000.0 * 0.29, epsilon = 1e-9);
    }

    #[test]
    fn test_real_expenses_reduce_wealth() {
        let with_charges = MicroCalculator.compute_base_scenario(
            &FinancialInputs::new(60_000.0, 5_000.0, 1.0),
            &request(60_000.0),
            &params(),
        );
        let without = MicroCalculator.compute_base_scenario(
            &FinancialInputs::new(60_000.0, 0.0, 1.0),
            &request(60_000.0),
            &params(),
        );
        assert_relative_eq!(
            with_charges.total_net,
            without.total_net - 5_000.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_zero_revenue_is_degenerate_but_total() {
        let inputs = FinancialInputs::new(0.0, 0.0, 1.0);
        let scenario = MicroCalculator.compute_base_scenario(&inputs, &request(0.0), &params());
        assert_eq!(scenario.income_tax, 0.0);
        assert!(scenario.income_tax_detail.is_empty());
        assert_eq!(scenario.overall_levy_rate, 0.0);
    }
}
