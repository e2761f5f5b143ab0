//! Progressive corporate tax

use crate::params::BracketTable;
use super::BracketDetail;

/// Compute the corporate tax on `taxable_profit`.
///
/// Same bracket walk as the income tax but applied directly to the
/// profit, with no fiscal-part scaling. A profit at or below zero yields
/// zero tax and no detail.
pub fn corporate_tax(taxable_profit: f64, scale: &BracketTable) -> (f64, Vec<BracketDetail>) {
    if taxable_profit <= 0.0 {
        return (0.0, Vec::new());
    }

    let mut total = 0.0;
    let mut remaining = taxable_profit;
    let mut details = Vec::new();
    let mut previous_ceiling = 0.0;

    for bracket in scale.brackets() {
        if remaining <= 0.0 {
            break;
        }

        let width = bracket.ceiling - previous_ceiling;
        let in_bracket = remaining.min(width);
        let tax = in_bracket * bracket.rate;
        total += tax;

        details.push(BracketDetail {
            lower: previous_ceiling,
            upper: previous_ceiling + in_bracket,
            rate: bracket.rate,
            base: in_bracket,
            tax,
        });

        remaining -= in_bracket;
        previous_ceiling = bracket.ceiling;
    }

    (total, details)
}
