mod carbon;
mod carbon_unit;
mod metrics;
mod proforma;

pub use {
    carbon::{CarbonRecord, final_output, records_from_cumulative, with_start_year},
    carbon_unit::CarbonUnitRecord,
    metrics::MetricTable,
    proforma::{ProformaOutput, ProformaRow, ProformaSummary},
};
