use {
    crate::models::ProformaRow,
    anyhow::{Context, Result},
    chrono::Local,
    std::fs,
    std::path::{Path, PathBuf},
};

pub const PROFORMA_CSV_HEADER: &str = "Year,Protocol,CU_ac,CU,CUs_Sold,CU_Credit_Price,Total_Revenue,\
Validation_and_Verification,Survey_Cost,Registry_Fees,Issuance_Fees,Planting_Cost,Seedling_Cost,\
Total_Costs,Net_Revenue";

/// Proforma table as CSV, one line per row.
pub struct ProformaCsv {
    buffer: Vec<String>,
}

impl Default for ProformaCsv {
    fn default() -> Self {
        Self::new()
    }
}

impl ProformaCsv {
    pub fn new() -> Self {
        Self {
            buffer: vec![PROFORMA_CSV_HEADER.to_string()],
        }
    }

    pub fn add_row(&mut self, row: &ProformaRow) {
        let line = format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            row.year,
            escape(&row.protocol_id),
            row.units_per_acre,
            row.units_available,
            row.units_sold,
            row.credit_price,
            row.revenue,
            row.validation_verification_cost,
            row.survey_cost,
            row.registry_fee,
            row.issuance_fee,
            row.planting_cost,
            row.seedling_cost,
            row.total_cost,
            row.net_revenue
        );
        self.buffer.push(line);
    }

    pub fn add_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a ProformaRow>) {
        for row in rows {
            self.add_row(row);
        }
    }

    pub fn as_string(&self) -> String {
        let mut out = self.buffer.join("\n");
        out.push('\n');
        out
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, self.as_string()).with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("[report] wrote {} proforma rows to {}", self.buffer.len() - 1, path.display());
        Ok(())
    }
}

/// `proforma_YYYYMMDD_HHMMSS.csv` inside `dir`.
pub fn timestamped_csv_path(dir: &Path) -> PathBuf {
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!("proforma_{}.csv", ts))
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, protocol: &str) -> ProformaRow {
        ProformaRow {
            year,
            protocol_id: protocol.to_string(),
            units_per_acre: 1.5,
            units_available: 1500.0,
            units_sold: 1500.0,
            credit_price: 20.0,
            revenue: 30000.0,
            validation_verification_cost: 25000.0,
            survey_cost: 0.0,
            registry_fee: 1000.0,
            issuance_fee: 300.0,
            planting_cost: 0.0,
            seedling_cost: 0.0,
            total_cost: 26300.0,
            net_revenue: 3700.0,
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut csv = ProformaCsv::new();
        csv.add_rows(&[row(2024, "ACR/CAR/VERRA"), row(2029, "odd,name")]);
        let text = csv.as_string();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], PROFORMA_CSV_HEADER);
        assert_eq!(lines[0].split(',').count(), 15);
        assert!(lines[1].starts_with("2024,ACR/CAR/VERRA,1.5,1500,"));
        assert!(lines[1].ends_with(",26300,3700"));
        assert!(lines[2].starts_with("2029,\"odd,name\","));
    }

    #[test]
    fn test_timestamped_path() {
        let path = timestamped_csv_path(Path::new("out"));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("proforma_") && name.ends_with(".csv"));
        assert_eq!(name.len(), "proforma_20260101_120000.csv".len());
    }
}
