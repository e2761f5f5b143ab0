//! Fiscal Optimizer CLI
//!
//! Runs the combinatorial optimization for a SARL + holding situation and
//! prints the winning scenario with the per-strategy synthesis

use fiscal_optimizer::{
    create_calculator, FinancialInputs, FiscalParams, LegalForm, Optimizer, SweepSettings,
};

fn main() {
    env_logger::init();

    println!("Fiscal Optimizer v0.1.0");
    println!("=======================\n");

    let params = FiscalParams::year_2024();
    let form = LegalForm::SarlHolding;
    let inputs = FinancialInputs::new(
        300_000.0, // result before compensation
        50_000.0,  // existing charges
        1.0,       // fiscal parts
    );

    println!("Legal form: {}", form);
    println!("  Result before compensation: {:.0}", inputs.result_before_compensation);
    println!("  Existing charges: {:.0}", inputs.existing_charges);
    println!("  Available profit: {:.0}", inputs.available_profit());
    println!("  Fiscal parts: {}", inputs.fiscal_parts);
    println!();

    let calculator = create_calculator(form);
    let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);
    let settings = SweepSettings {
        step: 2_500.0,
        ..Default::default()
    };

    let outcome = optimizer.optimize(&settings);

    let Some(best) = &outcome.best else {
        println!("No economically valid scenario in the swept range.");
        return;
    };

    println!("Optimal scenario ({} scenarios swept):", outcome.scenarios.len());
    println!("--- COMPENSATION ---");
    println!("  Gross compensation:      {:>12.0}", best.gross_compensation);
    println!("  Social contributions:    {:>12.0}", best.social_contributions);
    println!("  Expense allowance:       {:>12.0}", best.expense_allowance);
    println!("  Taxable income:          {:>12.0}", best.taxable_income);
    if best.per_deduction > 0.0 {
        println!("  PER deduction:           {:>12.0}", best.per_deduction);
    }
    if best.girardin_credit > 0.0 {
        println!("  Income tax before credit:{:>12.0}", best.income_tax_before_credit);
        println!("  Girardin credit:         {:>12.0}", best.girardin_credit);
    }
    println!("  Income tax:              {:>12.0}", best.income_tax);
    println!("  Net after tax:           {:>12.0}", best.net_after_tax);

    println!("--- COMPANY ---");
    println!("  Corporate profit:        {:>12.0}", best.corporate_profit);
    println!("  Corporate tax:           {:>12.0}", best.corporate_tax);
    for detail in &best.corporate_tax_detail {
        println!(
            "    {:>9.0} at {:>4.1}% = {:>9.0}",
            detail.base,
            detail.rate * 100.0,
            detail.tax
        );
    }

    println!("--- DIVIDENDS ---");
    println!("  Gross dividends:         {:>12.0}", best.gross_dividends);
    println!("  Holding corporate tax:   {:>12.0}", best.holding_corporate_tax());
    println!("  Flat tax:                {:>12.0}", best.flat_tax);
    println!("  Net dividends:           {:>12.0}", best.net_dividends);
    println!("  Dividend levy rate:      {:>11.1}%", best.dividend_levy_rate * 100.0);

    println!("--- TOTAL ---");
    println!("  Net cash:                {:>12.0}", best.net_cash);
    println!("  TOTAL NET (patrimony):   {:>12.0}", best.total_net);
    println!("  Overall levy rate:       {:>11.1}%", best.overall_levy_rate * 100.0);
    println!();

    // Synthesis of the eight instrument strategies
    println!("Strategy synthesis:");
    println!(
        "{:<50} {:>12} {:>12} {:>12}",
        "Strategy", "Best net", "Optimal comp", "Est. savings"
    );
    println!("{}", "-".repeat(90));
    for strategy in &outcome.strategies {
        let Some(strategy_best) = &strategy.best else {
            println!("{:<50} {:>12}", strategy.combination.label(), "(empty)");
            continue;
        };
        let marker = if strategy_best.total_net == best.total_net {
            "*"
        } else {
            " "
        };
        println!(
            "{marker}{:<49} {:>12.0} {:>12.0} {:>12.0}",
            strategy.combination.label(),
            strategy_best.total_net,
            strategy_best.gross_compensation,
            strategy_best.applied.estimated_savings
        );
    }

    let reference = outcome.strategies[0]
        .best
        .as_ref()
        .map(|s| s.total_net)
        .unwrap_or(0.0);
    println!("{}", "-".repeat(90));
    println!(
        "Gain over the no-instrument strategy: {:+.0}",
        best.total_net - reference
    );
}
