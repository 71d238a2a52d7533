// Terminal tables and file export of pipeline results
mod csv_export;
mod tables;

pub use {
    csv_export::{PROFORMA_CSV_HEADER, ProformaCsv, timestamped_csv_path},
    tables::{carbon_table, format_money, proforma_table, summary_table, units_table},
};
