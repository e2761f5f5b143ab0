//! Progressive income tax with the family-quotient mechanism

use crate::params::BracketTable;
use super::BracketDetail;

/// Compute the personal income tax on `taxable` for a household with
/// `fiscal_parts` parts.
///
/// Income is divided by the part count before the bracket walk and the
/// per-part tax is multiplied back out, reproducing the family quotient.
/// Detail entries are per fiscal part, so the sum of their `base` fields
/// times `fiscal_parts` equals the input income.
///
/// A taxable income at or below zero yields zero tax and no detail.
pub fn income_tax(
    taxable: f64,
    fiscal_parts: f64,
    scale: &BracketTable,
) -> (f64, Vec<BracketDetail>) {
    if taxable <= 0.0 {
        return (0.0, Vec::new());
    }

    let per_part = taxable / fiscal_parts;

    let mut tax_per_part = 0.0;
    let mut remaining = per_part;
    let mut details = Vec::new();
    let mut previous_ceiling = 0.0;

    for bracket in scale.brackets() {
        if remaining <= 0.0 {
            break;
        }

        let width = bracket.ceiling - previous_ceiling;
        let in_bracket = remaining.min(width);

        if in_bracket > 0.0 {
            let tax = in_bracket * bracket.rate;
            tax_per_part += tax;

            details.push(BracketDetail {
                lower: previous_ceiling,
                upper: previous_ceiling + in_bracket,
                rate: bracket.rate,
                base: in_bracket,
                tax,
            });
        }

        remaining -= in_bracket;
        previous_ceiling = bracket.ceiling;

        if bracket.ceiling.is_infinite() {
            break;
        }
    }

    (tax_per_part * fiscal_parts, details)
}
