//! Social-contribution schedules for 2024
//!
//! Three contribution paths exist depending on the legal form:
//! - TNS (self-employed manager): seven named components on a 90% base,
//!   with a cap on basic retirement and a taper on family allowance
//! - Assimilated employee (SAS president): flat employee and employer rates
//! - Micro-enterprise: a single flat rate on revenue, per activity regime

use serde::{Deserialize, Serialize};

/// TNS component rates and their thresholds (URSSAF 2024 schedule)
#[derive(Debug, Clone)]
pub struct TnsRates {
    pub sickness: f64,
    pub family_allowance: f64,
    pub basic_retirement: f64,
    pub supplementary_retirement: f64,
    pub disability_death: f64,
    pub csg_crds: f64,
    pub training: f64,

    /// Fraction of gross compensation forming the contribution base
    pub base_fraction: f64,
    /// Basic retirement is computed on the base capped at 1 PASS
    pub basic_retirement_cap: f64,
    /// Family allowance is zero when gross compensation is at or below 1 PASS
    pub family_allowance_floor: f64,
    /// Full family-allowance rate applies above 1.4 PASS of gross compensation
    pub family_allowance_full: f64,
}

impl TnsRates {
    pub fn year_2024() -> Self {
        Self {
            sickness: 0.065,
            family_allowance: 0.031,
            basic_retirement: 0.1775,
            supplementary_retirement: 0.07,
            disability_death: 0.013,
            csg_crds: 0.097,
            training: 0.0025,
            base_fraction: 0.90,
            basic_retirement_cap: 46_368.0,
            family_allowance_floor: 46_368.0,
            family_allowance_full: 64_915.0,
        }
    }
}

/// Flat contribution rates for an assimilated-employee president
#[derive(Debug, Clone)]
pub struct SalariedRates {
    pub employee: f64,
    pub employer: f64,
}

impl SalariedRates {
    pub fn year_2024() -> Self {
        Self {
            employee: 0.22,
            employer: 0.42,
        }
    }
}

/// Micro-enterprise activity type, selecting the applicable regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    /// BIC, sale of goods
    SalesBic,
    /// BIC, provision of services
    ServicesBic,
    /// BNC, liberal professions
    Bnc,
}

impl ActivityType {
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::SalesBic => "BIC - sale of goods",
            ActivityType::ServicesBic => "BIC - services",
            ActivityType::Bnc => "BNC - liberal profession",
        }
    }
}

impl Default for ActivityType {
    fn default() -> Self {
        ActivityType::ServicesBic
    }
}

/// One micro-enterprise regime: revenue ceiling, flat-rate allowance and
/// flat social-contribution rate
#[derive(Debug, Clone)]
pub struct MicroRegime {
    pub revenue_ceiling: f64,
    pub allowance_rate: f64,
    pub contribution_rate: f64,
}

/// The three 2024 micro regimes
#[derive(Debug, Clone)]
pub struct MicroRegimes {
    pub sales: MicroRegime,
    pub services: MicroRegime,
    pub liberal: MicroRegime,
}

impl MicroRegimes {
    pub fn year_2024() -> Self {
        Self {
            sales: MicroRegime {
                revenue_ceiling: 188_700.0,
                allowance_rate: 0.71,
                contribution_rate: 0.126,
            },
            services: MicroRegime {
                revenue_ceiling: 77_700.0,
                allowance_rate: 0.50,
                contribution_rate: 0.212,
            },
            liberal: MicroRegime {
                revenue_ceiling: 77_700.0,
                allowance_rate: 0.34,
                contribution_rate: 0.246,
            },
        }
    }

    pub fn for_activity(&self, activity: ActivityType) -> &MicroRegime {
        match activity {
            ActivityType::SalesBic => &self.sales,
            ActivityType::ServicesBic => &self.services,
            ActivityType::Bnc => &self.liberal,
        }
    }
}
