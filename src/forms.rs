//! Legal forms, their capabilities and the calculator factory

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scenario::{
    FormCalculator, MicroCalculator, SarlCalculator, SarlHoldingCalculator, SasCalculator,
};

/// Errors of the engine surface
#[derive(Debug, Error)]
pub enum FiscalError {
    #[error("unknown legal form '{0}' (expected one of: Micro-entreprise, SAS, SARL, SARL + Holding)")]
    UnknownLegalForm(String),
}

/// The four supported legal forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegalForm {
    Micro,
    Sas,
    Sarl,
    SarlHolding,
}

/// Optional tax-advantaged instruments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instrument {
    /// Retirement savings plan, personal deduction
    Per,
    /// Supplementary pension, deductible charge
    Madelin,
    /// Industrial investment credit
    Girardin,
    /// Employer-matched savings plan
    Pee,
    /// First-year contribution relief
    Acre,
}

/// Which social-contribution computation a form uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionPath {
    /// Flat rate on revenue
    MicroFlat,
    /// Employee and employer flat rates on a gross salary
    AssimilatedEmployee,
    /// Self-employed component schedule
    Tns,
}

/// Native income unit of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeUnit {
    Revenue,
    SalaryAndDividends,
}

impl LegalForm {
    pub const ALL: [LegalForm; 4] = [
        LegalForm::Micro,
        LegalForm::Sas,
        LegalForm::Sarl,
        LegalForm::SarlHolding,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LegalForm::Micro => "Micro-entreprise",
            LegalForm::Sas => "SAS",
            LegalForm::Sarl => "SARL",
            LegalForm::SarlHolding => "SARL + Holding",
        }
    }

    /// Instruments the form supports in the optimizer
    pub fn available_instruments(&self) -> &'static [Instrument] {
        match self {
            LegalForm::Micro => &[Instrument::Per, Instrument::Madelin, Instrument::Acre],
            LegalForm::Sas => &[Instrument::Per, Instrument::Girardin, Instrument::Pee],
            LegalForm::Sarl | LegalForm::SarlHolding => {
                &[Instrument::Per, Instrument::Madelin, Instrument::Girardin]
            }
        }
    }

    pub fn supports(&self, instrument: Instrument) -> bool {
        self.available_instruments().contains(&instrument)
    }

    pub fn contribution_path(&self) -> ContributionPath {
        match self {
            LegalForm::Micro => ContributionPath::MicroFlat,
            LegalForm::Sas => ContributionPath::AssimilatedEmployee,
            LegalForm::Sarl | LegalForm::SarlHolding => ContributionPath::Tns,
        }
    }

    pub fn income_unit(&self) -> IncomeUnit {
        match self {
            LegalForm::Micro => IncomeUnit::Revenue,
            _ => IncomeUnit::SalaryAndDividends,
        }
    }
}

impl fmt::Display for LegalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LegalForm {
    type Err = FiscalError;

    /// Resolve a form from its display name or a short alias. Unknown
    /// names are rejected, never defaulted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "micro-entreprise" | "micro" => Ok(LegalForm::Micro),
            "sas" => Ok(LegalForm::Sas),
            "sarl" => Ok(LegalForm::Sarl),
            "sarl + holding" | "sarl-holding" | "holding" => Ok(LegalForm::SarlHolding),
            _ => Err(FiscalError::UnknownLegalForm(s.to_string())),
        }
    }
}

/// Instantiate the calculator matching a legal form
pub fn create_calculator(form: LegalForm) -> Box<dyn FormCalculator> {
    match form {
        LegalForm::Micro => Box::new(MicroCalculator),
        LegalForm::Sas => Box::new(SasCalculator),
        LegalForm::Sarl => Box::new(SarlCalculator),
        LegalForm::SarlHolding => Box::new(SarlHoldingCalculator),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_name_round_trips() {
        for form in LegalForm::ALL {
            assert_eq!(form.name().parse::<LegalForm>().unwrap(), form);
        }
    }

    #[test]
    fn test_unknown_form_fails_fast() {
        let err = "SASU".parse::<LegalForm>().unwrap_err();
        assert!(matches!(err, FiscalError::UnknownLegalForm(_)));
        assert!(err.to_string().contains("SASU"));
    }

    #[test]
    fn test_capability_map() {
        assert!(LegalForm::Micro.supports(Instrument::Acre));
        assert!(!LegalForm::Micro.supports(Instrument::Girardin));
        assert!(LegalForm::Sas.supports(Instrument::Pee));
        assert!(!LegalForm::Sas.supports(Instrument::Madelin));
        assert!(LegalForm::Sarl.supports(Instrument::Girardin));
        assert_eq!(
            LegalForm::Sarl.available_instruments(),
            LegalForm::SarlHolding.available_instruments()
        );
    }

    #[test]
    fn test_factory_matches_form() {
        for form in LegalForm::ALL {
            assert_eq!(create_calculator(form).legal_form(), form);
        }
    }

    #[test]
    fn test_income_units() {
        assert_eq!(LegalForm::Micro.income_unit(), IncomeUnit::Revenue);
        assert_eq!(LegalForm::Sas.income_unit(), IncomeUnit::SalaryAndDividends);
    }
}
