//! TNS social contributions (self-employed manager)

use serde::{Deserialize, Serialize};

use crate::params::TnsRates;

/// Itemized TNS contributions for one compensation level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TnsContributions {
    /// Contribution base, 90% of gross compensation
    pub base: f64,
    pub sickness: f64,
    pub family_allowance: f64,
    pub basic_retirement: f64,
    pub supplementary_retirement: f64,
    pub disability_death: f64,
    pub csg_crds: f64,
    pub training: f64,
    pub total: f64,
}

/// Compute the seven TNS contribution components on a gross compensation.
///
/// Every component is rate x base, with two exceptions:
/// - basic retirement is computed on the base capped at 1 PASS
/// - the family-allowance rate is tapered on gross compensation: zero at
///   or below 1 PASS, linear between 1 and 1.4 PASS, full rate above.
///   The taper condition reads the gross amount while the contribution
///   itself stays rate x base.
pub fn tns_contributions(gross_compensation: f64, rates: &TnsRates) -> TnsContributions {
    let base = gross_compensation * rates.base_fraction;

    let family_rate = if gross_compensation <= rates.family_allowance_floor {
        0.0
    } else if gross_compensation <= rates.family_allowance_full {
        rates.family_allowance * (gross_compensation - rates.family_allowance_floor)
            / (rates.family_allowance_full - rates.family_allowance_floor)
    } else {
        rates.family_allowance
    };

    let mut contributions = TnsContributions {
        base,
        sickness: base * rates.sickness,
        family_allowance: base * family_rate,
        basic_retirement: base.min(rates.basic_retirement_cap) * rates.basic_retirement,
        supplementary_retirement: base * rates.supplementary_retirement,
        disability_death: base * rates.disability_death,
        csg_crds: base * rates.csg_crds,
        training: base * rates.training,
        total: 0.0,
    };

    contributions.total = contributions.sickness
        + contributions.family_allowance
        + contributions.basic_retirement
        + contributions.supplementary_retirement
        + contributions.disability_death
        + contributions.csg_crds
        + contributions.training;

    contributions
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rates() -> TnsRates {
        TnsRates::year_2024()
    }

    #[test]
    fn test_zero_compensation() {
        let c = tns_contributions(0.0, &rates());
        assert_eq!(c.total, 0.0);
        assert_eq!(c.base, 0.0);
    }

    #[test]
    fn test_base_is_ninety_percent() {
        let c = tns_contributions(50_000.0, &rates());
        assert_relative_eq!(c.base, 45_000.0, epsilon = 1e-9);
        assert_relative_eq!(c.sickness, 45_000.0 * 0.065, epsilon = 1e-9);
    }

    #[test]
    fn test_basic_retirement_cap() {
        // Base of 90,000 exceeds the 46,368 cap
        let c = tns_contributions(100_000.0, &rates());
        assert_relative_eq!(c.basic_retirement, 46_368.0 * 0.1775, epsilon = 1e-9);
        // Uncapped components still use the full base
        assert_relative_eq!(c.csg_crds, 90_000.0 * 0.097, epsilon = 1e-9);
    }

    #[test]
    fn test_family_allowance_taper() {
        let r = rates();

        // Below 1 PASS of gross: exempt
        let low = tns_contributions(40_000.0, &r);
        assert_eq!(low.family_allowance, 0.0);

        // Midway through the taper: half rate
        let mid_gross = (r.family_allowance_floor + r.family_allowance_full) / 2.0;
        let mid = tns_contributions(mid_gross, &r);
        let expected = mid_gross * r.base_fraction * (r.family_allowance / 2.0);
        assert_relative_eq!(mid.family_allowance, expected, epsilon = 1e-6);

        // Above 1.4 PASS: full rate on the base
        let high = tns_contributions(100_000.0, &r);
        assert_relative_eq!(high.family_allowance, 90_000.0 * 0.031, epsilon = 1e-9);
    }

    #[test]
    fn test_total_matches_component_sum() {
        let c = tns_contributions(80_000.0, &rates());
        let sum = c.sickness
            + c.family_allowance
            + c.basic_retirement
            + c.supplementary_retirement
            + c.disability_death
            + c.csg_crds
            + c.training;
        assert_relative_eq!(c.total, sum, epsilon = 1e-9);
    }
}
