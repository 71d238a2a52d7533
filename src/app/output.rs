use anyhow::Result;
use serde::Serialize;

use crate::OutputFormat;
use crate::models::{CarbonRecord, CarbonUnitRecord, MetricTable, ProformaOutput, final_output};
use crate::report::{carbon_table, proforma_table, summary_table, units_table};

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn emit_carbon(records: &[CarbonRecord], metrics: Option<&MetricTable>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "carbon": records, "metrics": metrics })),
        OutputFormat::Table => {
            println!("{}", carbon_table(records));
            match final_output(records) {
                Some((year, score)) => println!("Final carbon output ({}): {:.2} tons C/acre", year, score),
                None => println!("No carbon records produced."),
            }
            if let Some(metrics) = metrics {
                println!("Stand metrics: {}", metrics.metric_names().join(", "));
            }
            Ok(())
        }
    }
}

pub(crate) fn emit_units(records: &[CarbonUnitRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(records),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No carbon units to show.");
            } else {
                println!("{}", units_table(records));
            }
            Ok(())
        }
    }
}

pub(crate) fn emit_proforma(output: &ProformaOutput, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(output),
        OutputFormat::Table => {
            println!("{}", proforma_table(&output.proforma_rows));
            println!("{}", summary_table(&output.summaries));
            Ok(())
        }
    }
}
