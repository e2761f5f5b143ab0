//! Compare the four legal forms on the same financial situation
//!
//! Usage: cargo run --bin compare_forms [result] [charges] [parts]
//!
//! Runs the full combinatorial optimization for every form in parallel
//! and ranks them by the owner's total patrimony. For the
//! micro-enterprise the result is interpreted as annual revenue.

use rayon::prelude::*;

use fiscal_optimizer::{
    create_calculator, FinancialInputs, FiscalParams, LegalForm, OptimizationOutcome, Optimizer,
    SweepSettings,
};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let result: f64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(300_000.0);
    let charges: f64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(50_000.0);
    let parts: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(1.0);

    let params = FiscalParams::year_2024();
    let inputs = FinancialInputs::new(result, charges, parts);
    let settings = SweepSettings {
        step: 2_500.0,
        ..Default::default()
    };

    println!("Comparing legal forms");
    println!("  Result before compensation: {result:.0}");
    println!("  Existing charges: {charges:.0}");
    println!("  Fiscal parts: {parts}");
    println!();

    let outcomes: Vec<(LegalForm, OptimizationOutcome)> = LegalForm::ALL
        .par_iter()
        .map(|&form| {
            let calculator = create_calculator(form);
            let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);
            (form, optimizer.optimize(&settings))
        })
        .collect();

    let mut ranked: Vec<&(LegalForm, OptimizationOutcome)> = outcomes.iter().collect();
    ranked.sort_by(|a, b| {
        let net_a = a.1.best.as_ref().map(|s| s.total_net).unwrap_or(f64::NEG_INFINITY);
        let net_b = b.1.best.as_ref().map(|s| s.total_net).unwrap_or(f64::NEG_INFINITY);
        net_b.partial_cmp(&net_a).unwrap()
    });

    println!(
        "{:<18} {:>12} {:>14} {:>14} {:>12} {:>10}",
        "Form", "Total net", "Optimal comp", "Net dividends", "Strategy", "Levies %"
    );
    println!("{}", "-".repeat(86));

    for (form, outcome) in &ranked {
        match &outcome.best {
            Some(best) => {
                println!(
                    "{:<18} {:>12.0} {:>14.0} {:>14.0} {:>12} {:>9.1}%",
                    form.name(),
                    best.total_net,
                    best.gross_compensation,
                    best.net_dividends.max(0.0),
                    summary_label(best.applied.per, best.applied.madelin, best.applied.girardin),
                    best.overall_levy_rate * 100.0
                );
            }
            None => {
                println!("{:<18} {:>12}", form.name(), "(no valid scenario)");
            }
        }
    }

    println!();
    if let Some((form, outcome)) = ranked.first() {
        if let Some(best) = &outcome.best {
            println!(
                "Winner: {} with {:.0} total net over {} swept scenarios",
                form.name(),
                best.total_net,
                outcome.scenarios.len()
            );
        }
    }
}

/// Short instrument summary for the ranking table
fn summary_label(per: f64, madelin: f64, girardin: f64) -> String {
    let mut active = Vec::new();
    if per > 0.0 {
        active.push("PER");
    }
    if madelin > 0.0 {
        active.push("Mad");
    }
    if girardin > 0.0 {
        active.push("Gir");
    }
    if active.is_empty() {
        "-".to_string()
    } else {
        active.join("+")
    }
}
