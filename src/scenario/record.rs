//! Scenario result structures
//!
//! A `ScenarioRecord` is the full downstream picture of one compensation
//! level under one legal form. Every field is derived from the request and
//! the fiscal-year constants; records are never mutated after creation,
//! the optimization layering clones and returns an augmented copy.

use serde::{Deserialize, Serialize};

use crate::forms::LegalForm;
use crate::params::ActivityType;
use crate::tax::{BracketDetail, PeeOutcome, TnsContributions};

/// How the dividends of a scenario are taxed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DividendTaxOption {
    /// Single flat withholding (IR plus social levies)
    FlatTax,
    /// Progressive scale after the 40% allowance, plus social levies
    ProgressiveScale,
}

/// Optional instruments applied to a scenario, with their display-level
/// saving estimates
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppliedInstruments {
    /// Retirement-savings amount placed
    pub per: f64,
    /// Supplementary-pension charge requested
    pub madelin: f64,
    /// Investment-credit outlay
    pub girardin: f64,
    /// Savings-plan employee contribution requested
    pub pee: f64,
    /// First-year contribution relief active
    pub acre: bool,
    /// Credit received minus amount invested, not clamped
    pub girardin_net_gain: f64,
    /// Credit actually used over the theoretical credit
    pub girardin_efficiency: f64,
    /// Approximate combined tax saving of all active instruments
    pub estimated_savings: f64,
}

/// Fields specific to one legal-form family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FormBreakdown {
    Micro {
        activity: ActivityType,
        /// Contribution rate after any ACRE relief
        effective_contribution_rate: f64,
        /// Contributions saved by ACRE
        acre_relief: f64,
        /// Flat-rate allowance on revenue
        micro_allowance: f64,
        /// Supplementary-pension charge, paid personally
        madelin_charge: f64,
        /// Pre-existing deductible real expenses of the caller
        real_expenses: f64,
        /// Set when revenue exceeds the regime ceiling (two-year tolerance)
        revenue_warning: Option<String>,
    },
    Salaried {
        employee_contributions: f64,
        employer_contributions: f64,
        /// Gross salary plus employer contributions
        employer_cost: f64,
        /// Savings plan, when a contribution was requested
        pee: Option<PeeOutcome>,
    },
    Tns {
        contributions: TnsContributions,
        /// Supplementary-pension charge, deducted from company profit
        madelin_charge: f64,
        dividend_option: DividendTaxOption,
        /// Social levies under the progressive option, zero otherwise
        dividend_social_levies: f64,
        /// Income tax on dividends under the progressive option
        dividend_income_tax: f64,
    },
    TnsHolding {
        contributions: TnsContributions,
        madelin_charge: f64,
        /// 5% share of subsidiary dividends taxed inside the holding
        taxable_share: f64,
        holding_corporate_tax: f64,
        /// Dividends available in the holding after its corporate tax
        holding_dividends: f64,
    },
}

impl FormBreakdown {
    /// Value of the placement instruments carried by the structure itself
    /// (the personal retirement savings are added by the layering step)
    pub fn placement_value(&self) -> f64 {
        match self {
            FormBreakdown::Micro { madelin_charge, .. } => *madelin_charge,
            FormBreakdown::Salaried { pee, .. } => {
                pee.as_ref().map(|p| p.placement_total).unwrap_or(0.0)
            }
            FormBreakdown::Tns { madelin_charge, .. } => *madelin_charge,
            FormBreakdown::TnsHolding { madelin_charge, .. } => *madelin_charge,
        }
    }

    /// Cash the owner pays out of pocket beyond retirement savings and the
    /// investment credit: the micro Madelin charge and real expenses, and
    /// the savings-plan employee contribution
    pub fn personal_outlays(&self) -> f64 {
        match self {
            FormBreakdown::Micro { madelin_charge, real_expenses, .. } => {
                madelin_charge + real_expenses
            }
            FormBreakdown::Salaried { pee, .. } => {
                pee.as_ref().map(|p| p.employee_contribution).unwrap_or(0.0)
            }
            _ => 0.0,
        }
    }

    pub fn madelin_charge(&self) -> f64 {
        match self {
            FormBreakdown::Micro { madelin_charge, .. }
            | FormBreakdown::Tns { madelin_charge, .. }
            | FormBreakdown::TnsHolding { madelin_charge, .. } => *madelin_charge,
            FormBreakdown::Salaried { .. } => 0.0,
        }
    }

    pub fn acre_relief(&self) -> f64 {
        match self {
            FormBreakdown::Micro { acre_relief, .. } => *acre_relief,
            _ => 0.0,
        }
    }

    pub fn pee(&self) -> Option<&PeeOutcome> {
        match self {
            FormBreakdown::Salaried { pee, .. } => pee.as_ref(),
            _ => None,
        }
    }
}

/// Full scenario result for one compensation level under one legal form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub form: LegalForm,

    // Compensation layer
    /// Revenue for the micro-enterprise, gross salary or manager
    /// compensation for the company forms
    pub gross_compensation: f64,
    /// Social contributions borne on the compensation (micro flat
    /// contributions, SAS employee share, TNS total)
    pub social_contributions: f64,
    /// Compensation in hand before income tax
    pub net_before_tax: f64,

    // Personal income tax
    /// Professional-expense allowance (10% capped), zero for the micro
    pub expense_allowance: f64,
    /// Taxable income before personal deductions
    pub taxable_income: f64,
    /// Retirement-savings deduction actually applied
    pub per_deduction: f64,
    pub final_taxable_income: f64,
    pub income_tax_before_credit: f64,
    /// Investment credit actually used
    pub girardin_credit: f64,
    pub income_tax: f64,
    pub income_tax_detail: Vec<BracketDetail>,
    pub net_after_tax: f64,

    // Corporate layer
    /// Taxable company profit after compensation and deductible charges,
    /// zero for the micro-enterprise
    pub corporate_profit: f64,
    pub corporate_tax: f64,
    pub corporate_tax_detail: Vec<BracketDetail>,

    // Dividends
    pub gross_dividends: f64,
    pub flat_tax: f64,
    pub net_dividends: f64,
    /// All levies between company profit and net dividends
    pub dividend_levies: f64,
    /// dividend_levies over corporate profit, zero on a non-positive base
    pub dividend_levy_rate: f64,

    // Wealth
    /// Disposable cash: compensation and dividends net of every outlay
    pub net_cash: f64,
    /// Ranking metric: net cash plus the value of placement instruments
    pub total_net: f64,
    /// 1 - total_net over the pre-compensation result
    pub overall_levy_rate: f64,

    pub applied: AppliedInstruments,
    pub breakdown: FormBreakdown,
}

impl ScenarioRecord {
    /// Create a zeroed record for a form, to be filled by its calculator
    pub fn new(form: LegalForm, breakdown: FormBreakdown) -> Self {
        Self {
            form,
            gross_compensation: 0.0,
            social_contributions: 0.0,
            net_before_tax: 0.0,
            expense_allowance: 0.0,
            taxable_income: 0.0,
            per_deduction: 0.0,
            final_taxable_income: 0.0,
            income_tax_before_credit: 0.0,
            girardin_credit: 0.0,
            income_tax: 0.0,
            income_tax_detail: Vec::new(),
            net_after_tax: 0.0,
            corporate_profit: 0.0,
            corporate_tax: 0.0,
            corporate_tax_detail: Vec::new(),
            gross_dividends: 0.0,
            flat_tax: 0.0,
            net_dividends: 0.0,
            dividend_levies: 0.0,
            dividend_levy_rate: 0.0,
            net_cash: 0.0,
            total_net: 0.0,
            overall_levy_rate: 0.0,
            applied: AppliedInstruments::default(),
            breakdown,
        }
    }

    /// The quantity the optimizer maximizes
    pub fn ranking_metric(&self) -> f64 {
        self.total_net
    }

    pub fn holding_corporate_tax(&self) -> f64 {
        match &self.breakdown {
            FormBreakdown::TnsHolding { holding_corporate_tax, .. } => *holding_corporate_tax,
            _ => 0.0,
        }
    }

    pub fn employer_cost(&self) -> f64 {
        match &self.breakdown {
            FormBreakdown::Salaried { employer_cost, .. } => *employer_cost,
            _ => 0.0,
        }
    }

    pub fn dividend_option(&self) -> Option<DividendTaxOption> {
        match &self.breakdown {
            FormBreakdown::Tns { dividend_option, .. } => Some(*dividend_option),
            FormBreakdown::Salaried { .. } | FormBreakdown::TnsHolding { .. } => {
                Some(DividendTaxOption::FlatTax)
            }
            FormBreakdown::Micro { .. } => None,
        }
    }

    /// Every mandatory levy of the scenario, across categories
    pub fn total_levies(&self) -> f64 {
        let dividend_side = match &self.breakdown {
            FormBreakdown::Micro { .. } => 0.0,
            FormBreakdown::Salaried { employer_contributions, .. } => {
                employer_contributions + self.flat_tax
            }
            FormBreakdown::Tns {
                dividend_social_levies,
                dividend_income_tax,
                ..
            } => self.flat_tax + dividend_social_levies + dividend_income_tax,
            FormBreakdown::TnsHolding { holding_corporate_tax, .. } => {
                self.flat_tax + holding_corporate_tax
            }
        };

        self.social_contributions + self.income_tax + self.corporate_tax + dividend_side
    }
}
