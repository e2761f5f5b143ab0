//! Export optimization sweeps as a table, CSV or JSON
//!
//! Runs the combinatorial optimization for one legal form and serializes
//! every valid scenario, for spreadsheet analysis or API integration.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};

use fiscal_optimizer::{
    create_calculator, FinancialInputs, FiscalParams, LegalForm, OptimizationOutcome, Optimizer,
    ScenarioRecord, SweepSettings,
};

#[derive(Parser)]
#[command(name = "export_scenarios", about = "Export salary/dividend optimization sweeps")]
struct Args {
    /// Legal form (Micro-entreprise, SAS, SARL, SARL + Holding)
    #[arg(long, default_value = "SARL + Holding")]
    form: String,

    /// Company result before compensation (micro: annual revenue)
    #[arg(long, default_value_t = 300_000.0)]
    result: f64,

    /// Pre-existing deductible charges
    #[arg(long, default_value_t = 50_000.0)]
    charges: f64,

    /// Household fiscal parts
    #[arg(long, default_value_t = 1.0)]
    parts: f64,

    /// Compensation sweep step
    #[arg(long, default_value_t = 5_000.0)]
    step: f64,

    #[arg(long)]
    per_max: Option<f64>,

    #[arg(long)]
    madelin_max: Option<f64>,

    #[arg(long)]
    girardin_max: Option<f64>,

    #[arg(long)]
    pee_max: Option<f64>,

    /// Also sweep every combination with ACRE active (micro only)
    #[arg(long)]
    acre: bool,

    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let form: LegalForm = args.form.parse()?;
    let params = FiscalParams::year_2024();
    let inputs = FinancialInputs::new(args.result, args.charges, args.parts);

    let calculator = create_calculator(form);
    let optimizer = Optimizer::new(calculator.as_ref(), inputs, &params);
    let settings = SweepSettings {
        step: args.step,
        per_max: args.per_max,
        madelin_max: args.madelin_max,
        girardin_max: args.girardin_max,
        pee_max: args.pee_max,
        use_acre: args.acre,
        ..Default::default()
    };

    let outcome = optimizer.optimize(&settings);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    match args.format {
        OutputFormat::Table => write_table(&mut writer, form, &outcome)?,
        OutputFormat::Csv => write_csv(writer, &outcome)?,
        OutputFormat::Json => serde_json::to_writer_pretty(writer, &outcome)?,
    }

    Ok(())
}

const HEADERS: [&str; 12] = [
    "gross_compensation",
    "total_net",
    "net_after_tax",
    "net_dividends",
    "social_contributions",
    "income_tax",
    "corporate_tax",
    "holding_tax",
    "flat_tax",
    "total_levies",
    "net_available",
    "levy_rate_pct",
];

fn row_values(scenario: &ScenarioRecord) -> [f64; 12] {
    [
        scenario.gross_compensation,
        scenario.total_net,
        scenario.net_after_tax,
        scenario.net_dividends,
        scenario.social_contributions,
        scenario.income_tax,
        scenario.corporate_tax,
        scenario.holding_corporate_tax(),
        scenario.flat_tax,
        scenario.total_levies(),
        scenario.net_after_tax + scenario.net_dividends,
        scenario.overall_levy_rate * 100.0,
    ]
}

fn write_csv(writer: Box<dyn Write>, outcome: &OptimizationOutcome) -> anyhow::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADERS)?;
    for scenario in &outcome.scenarios {
        let values = row_values(scenario);
        csv_writer.write_record(values.iter().map(|v| format!("{v:.2}")))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn write_table(
    writer: &mut dyn Write,
    form: LegalForm,
    outcome: &OptimizationOutcome,
) -> anyhow::Result<()> {
    const TABLE_HEADERS: [&str; 12] = [
        "Gross", "TotalNet", "NetComp", "NetDiv", "Social", "IR", "IS", "IS_Hold", "FlatTax",
        "Levies", "NetDispo", "Rate%",
    ];

    writeln!(writer, "{}", "=".repeat(156))?;
    writeln!(writer, "OPTIMIZATION SWEEP - {}", form)?;
    writeln!(writer, "{}", "=".repeat(156))?;

    for header in TABLE_HEADERS {
        write!(writer, "{header:>12} ")?;
    }
    writeln!(writer)?;
    writeln!(writer, "{}", "-".repeat(156))?;

    for scenario in &outcome.scenarios {
        for value in row_values(scenario) {
            write!(writer, "{value:>12.0} ")?;
        }
        writeln!(writer)?;
    }

    writeln!(writer, "{}", "-".repeat(156))?;
    match &outcome.best {
        Some(best) => writeln!(
            writer,
            "Best: {:.0} gross -> {:.0} total net ({:.1}% overall levies)",
            best.gross_compensation,
            best.total_net,
            best.overall_levy_rate * 100.0
        )?,
        None => writeln!(writer, "No valid scenario in the swept range")?,
    }

    Ok(())
}
