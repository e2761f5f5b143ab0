//! Shared tax primitives
//!
//! Pure functions over primitive numeric inputs, reused by every legal
//! form: progressive income tax, progressive corporate tax, TNS social
//! contributions and the employer-matched savings plan.

mod corporate;
mod income;
mod savings;
mod social;

pub use corporate::corporate_tax;
pub use income::income_tax;
pub use savings::{employee_savings_plan, PeeOutcome};
pub use social::{tns_contributions, TnsContributions};

use serde::{Deserialize, Serialize};

/// One bracket of a progressive-tax breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketDetail {
    /// Lower bound of the bracket
    pub lower: f64,
    /// Upper bound actually reached inside the bracket
    pub upper: f64,
    /// Marginal rate of the bracket
    pub rate: f64,
    /// Amount taxed in the bracket
    pub base: f64,
    /// Tax due in the bracket
    pub tax: f64,
}
