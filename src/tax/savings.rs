//! Employer-matched savings plan (PEE/PERCO)

use serde::{Deserialize, Serialize};

use crate::params::FiscalParams;

/// Outcome of the savings-plan computation for one compensation level
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeeOutcome {
    /// Employee contribution after both caps
    pub employee_contribution: f64,
    /// Employer match, 3x the contribution up to the match ceiling
    pub employer_match: f64,
    /// Match plus the forfait social due on it
    pub employer_cost: f64,
    /// Corporate-tax saving estimate on the employer cost, display only
    pub corporate_tax_saving: f64,
    /// Employee contribution plus employer match
    pub placement_total: f64,
}

/// Compute the savings-plan amounts for a requested employee contribution.
///
/// The contribution is capped at the lesser of the legal fraction of gross
/// compensation and the contribution whose match would reach the match
/// ceiling. The match itself is capped a second time, which matters only
/// at the rounding margin.
pub fn employee_savings_plan(
    gross_compensation: f64,
    requested_contribution: f64,
    params: &FiscalParams,
) -> PeeOutcome {
    let inst = &params.instruments;

    let legal_cap = gross_compensation * inst.pee_employee_fraction;
    let match_cap = inst.pee_match_ceiling / inst.pee_match_multiplier;
    let contribution = requested_contribution.max(0.0).min(legal_cap).min(match_cap);

    let employer_match =
        (contribution * inst.pee_match_multiplier).min(inst.pee_match_ceiling);
    let employer_cost = employer_match * (1.0 + inst.pee_employer_surtax);

    PeeOutcome {
        employee_contribution: contribution,
        employer_match,
        employer_cost,
        corporate_tax_saving: employer_cost * params.standard_corporate_rate(),
        placement_total: contribution + employer_match,
    }
}
