//! Process command - extract data from a single statement file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use pgdas_core::{ExtractionResult, PgdasConfig, SimplesParser, StatementParser};

use super::read_statement;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// List fields that could not be found
    #[arg(long)]
    show_missing: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config: &PgdasConfig) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let text = read_statement(&args.input, &config.pdf)?;
    let parser = SimplesParser::from_config(&config.extraction);
    let outcome = parser.parse(text.as_str());

    let output = format_result(&outcome.result, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_missing {
        eprintln!();
        if outcome.missing_fields.is_empty() {
            eprintln!("{} All fields found", style("ℹ").blue());
        } else {
            eprintln!("{}", style("Fields not found:").yellow());
            for field in &outcome.missing_fields {
                eprintln!("  - {}", field);
            }
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render a result in the requested format.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Json => Ok(serde_json::to_string(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

/// Column names for CSV output, tributos flattened.
pub fn csv_header() -> Vec<&'static str> {
    let mut header = vec![
        "apuracao_period",
        "matrix_tax_id",
        "company_name",
        "period_gross_revenue",
        "twelve_month_gross_revenue",
        "informed_gross_revenue",
        "tax_regime",
    ];
    header.extend(pgdas_core::Tributos::NAMES);
    header
}

/// One CSV row matching [`csv_header`].
pub fn csv_row(result: &ExtractionResult) -> Vec<String> {
    let mut row = vec![
        result.apuracao_period.to_string(),
        result.matrix_tax_id.to_string(),
        result.company_name.to_string(),
        result.period_gross_revenue.to_string(),
        result.twelve_month_gross_revenue.to_string(),
        result.informed_gross_revenue.to_string(),
        result.tax_regime.to_string(),
    ];
    row.extend(result.tributos.fields().iter().map(|(_, f)| f.to_string()));
    row
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(csv_header())?;
    wtr.write_record(csv_row(result))?;
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

pub fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Company: {}\n", result.company_name));
    output.push_str(&format!("CNPJ:    {}\n", result.matrix_tax_id));
    output.push_str(&format!("Period:  {}\n", result.apuracao_period));
    output.push_str(&format!("Regime:  {}\n", result.tax_regime));
    output.push('\n');

    output.push_str("Gross revenue:\n");
    output.push_str(&format!("  PA:        {}\n", result.period_gross_revenue));
    output.push_str(&format!("  RBT12:     {}\n", result.twelve_month_gross_revenue));
    output.push_str(&format!("  Informed:  {}\n", result.informed_gross_revenue));
    output.push('\n');

    output.push_str("Tributos:\n");
    for (name, value) in result.tributos.fields() {
        output.push_str(&format!("  {:<10} {}\n", name, value));
    }

    output
}
