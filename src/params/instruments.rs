//! Ceilings and rates of the optional tax-advantaged instruments
//!
//! PER and Madelin are placements (the money stays owned), Girardin is a
//! real expenditure bought back through a tax credit, PEE/PERCO is an
//! employer-matched savings plan.

/// 2024 ceilings and multipliers for the optional instruments
#[derive(Debug, Clone)]
pub struct InstrumentParams {
    /// Absolute PER deduction ceiling (8 x PASS)
    pub per_ceiling: f64,
    /// PER deduction is also limited to this fraction of taxable income
    pub per_income_fraction: f64,
    /// Estimated marginal saving per deducted PER euro, display only
    pub per_saving_estimate: f64,

    /// Madelin deductible-charge ceiling
    pub madelin_ceiling: f64,
    /// Estimated corporate-tax saving per Madelin euro, display only
    pub madelin_saving_estimate: f64,

    /// Tax credit granted per invested Girardin euro (above 1.0)
    pub girardin_multiplier: f64,
    /// Default sweep ceiling when the caller gives none
    pub girardin_default_ceiling: f64,

    /// Employer match per employee euro on the savings plan
    pub pee_match_multiplier: f64,
    /// Absolute employer-match ceiling (16% of PASS)
    pub pee_match_ceiling: f64,
    /// Employee contribution cap as a fraction of gross compensation
    pub pee_employee_fraction: f64,
    /// Forfait social due on the employer match
    pub pee_employer_surtax: f64,

    /// First-year contribution relief for business creators
    pub acre_reduction: f64,
}

impl InstrumentParams {
    pub fn year_2024() -> Self {
        Self {
            per_ceiling: 32_419.0,
            per_income_fraction: 0.10,
            per_saving_estimate: 0.30,
            madelin_ceiling: 84_000.0,
            madelin_saving_estimate: 0.25,
            girardin_multiplier: 1.10,
            girardin_default_ceiling: 50_000.0,
            pee_match_multiplier: 3.0,
            pee_match_ceiling: 7_418.88,
            pee_employee_fraction: 0.25,
            pee_employer_surtax: 0.20,
            acre_reduction: 0.50,
        }
    }
}
