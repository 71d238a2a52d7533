#![allow(clippy::type_complexity)]
#![allow(clippy::too_many_arguments)]

// Core modules
pub mod analysis;
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod models;
pub mod report;
pub mod utils;

// Re-export commonly used types outside of crate (for the binaries and tests)
pub use analysis::{CarbonSource, CoefficientTable, RegressionBundle, compute_proforma, convert_to_units, estimate_carbon};
pub use app::run_app;
pub use config::{PERSISTENCE, ProformaParams, ProtocolRules, Variant};
pub use domain::PlantingScenario;
pub use engine::{CarbonModelInput, Pipeline, PipelineOutput, PipelineRequest};
pub use error::{CarbonError, CarbonResult};

// CLI argument parsing
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Forest carbon: planting scenario -> carbon -> credits -> proforma", long_about = None)]
pub struct Cli {
    /// Output format for results written to stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Estimate cumulative and annual carbon for a planting scenario
    Carbon {
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Convert carbon records into carbon units (request file: {carbon_rows, protocols, protocol_rules?})
    Units {
        #[arg(long)]
        request: PathBuf,
    },
    /// Project revenue, costs and NPV (request file: {df_ert_ac, params})
    Proforma {
        #[arg(long)]
        request: PathBuf,
        /// Also export the proforma rows as CSV into this directory
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
    /// Run every stage: scenario -> carbon -> units -> proforma
    Run {
        #[command(flatten)]
        model: ModelArgs,
        /// Protocols to price, e.g. --protocols GS,ISO
        #[arg(long, value_delimiter = ',', default_value = "ACR/CAR/VERRA")]
        protocols: Vec<String>,
        /// Protocol rule overrides (JSON)
        #[arg(long)]
        rules: Option<PathBuf>,
        /// Proforma parameters (JSON); defaults are used when omitted
        #[arg(long)]
        params: Option<PathBuf>,
        #[arg(long)]
        csv_dir: Option<PathBuf>,
    },
}

/// Where the scenario and the carbon model come from.
#[derive(Args, Debug, Clone)]
pub struct ModelArgs {
    /// Scenario JSON (structured or flat tpa_* form). Omit to use the variant preset.
    #[arg(long)]
    pub scenario: Option<PathBuf>,

    /// FVS variant, e.g. PN or EC. Unknown names fall back to PN.
    #[arg(long)]
    pub variant: Option<String>,

    /// Linear coefficient table (JSON keyed by year)
    #[arg(long, conflicts_with = "loccode")]
    pub coefficients: Option<PathBuf>,

    /// Location code of a polynomial yield model bundle
    #[arg(long)]
    pub loccode: Option<String>,

    /// Directory holding yield model bundles
    #[arg(long)]
    pub models_dir: Option<PathBuf>,

    /// Prepend the zero-carbon row at the project start year
    #[arg(long, default_value_t = false)]
    pub prepend_start_year: bool,
}
