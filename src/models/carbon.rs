use serde::{Deserialize, Serialize};

/// Carbon stored per acre at one year. JSON: `{Year, C_Score, Annual_C_Score}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarbonRecord {
    #[serde(rename = "Year")]
    pub year: i32,

    /// Tons C per acre accumulated since planting
    #[serde(rename = "C_Score")]
    pub cumulative_score: f64,

    /// Change since the previous record. Equals `cumulative_score` for the first record.
    #[serde(rename = "Annual_C_Score", default)]
    pub annual_score: f64,
}

impl CarbonRecord {
    /// Project-wide view of a per-acre record.
    pub fn per_project(&self, net_acres: f64) -> Self {
        Self {
            year: self.year,
            cumulative_score: self.cumulative_score * net_acres,
            annual_score: self.annual_score * net_acres,
        }
    }
}

/// Builds records from (year, cumulative) pairs already in year order,
/// deriving each annual score as the first difference.
pub fn records_from_cumulative(points: &[(i32, f64)], round: impl Fn(f64) -> f64) -> Vec<CarbonRecord> {
    let mut previous: Option<f64> = None;
    points
        .iter()
        .map(|&(year, cumulative)| {
            let annual = match previous {
                Some(prev) => cumulative - prev,
                None => cumulative,
            };
            previous = Some(cumulative);
            CarbonRecord {
                year,
                cumulative_score: round(cumulative),
                annual_score: round(annual),
            }
        })
        .collect()
}

/// Prepends the synthetic planting-year row (score 0). The first modelled
/// year's annual score already equals its cumulative score, so the first
/// difference stays consistent. No-op when records already start at or
/// before `start_year`.
pub fn with_start_year(records: Vec<CarbonRecord>, start_year: i32) -> Vec<CarbonRecord> {
    match records.first() {
        Some(first) if first.year <= start_year => records,
        _ => {
            let mut out = Vec::with_capacity(records.len() + 1);
            out.push(CarbonRecord {
                year: start_year,
                cumulative_score: 0.0,
                annual_score: 0.0,
            });
            out.extend(records);
            out
        }
    }
}

/// Last year and its cumulative score ("final carbon output").
pub fn final_output(records: &[CarbonRecord]) -> Option<(i32, f64)> {
    records
        .iter()
        .max_by_key(|r| r.year)
        .map(|r| (r.year, r.cumulative_score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annual_is_first_difference() {
        let records = records_from_cumulative(&[(2025, 5.0), (2030, 12.0), (2035, 20.0)], |v| v);
        let annual: Vec<f64> = records.iter().map(|r| r.annual_score).collect();
        assert_eq!(annual, vec![5.0, 7.0, 8.0]);
    }

    #[test]
    fn test_start_year_row_is_zero() {
        let records = records_from_cumulative(&[(2025, 5.0), (2030, 12.0)], |v| v);
        let records = with_start_year(records, 2024);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].year, 2024);
        assert_eq!(records[0].annual_score, 0.0);
        assert_eq!(records[1].annual_score, records[1].cumulative_score);

        // Idempotent
        let again = with_start_year(records.clone(), 2024);
        assert_eq!(again, records);
    }

    #[test]
    fn test_per_project_and_final_output() {
        let records = records_from_cumulative(&[(2025, 5.0), (2030, 12.0)], |v| v);
        assert_eq!(records[1].per_project(100.0).cumulative_score, 1200.0);
        assert_eq!(final_output(&records), Some((2030, 12.0)));
        assert_eq!(final_output(&[]), None);
    }

    #[test]
    fn test_json_field_names() {
        let r: CarbonRecord = serde_json::from_str(r#"{"Year": 2030, "C_Score": 3.5}"#).unwrap();
        assert_eq!(r.year, 2030);
        assert_eq!(r.annual_score, 0.0);
        let json = serde_json::to_value(r).unwrap();
        assert!(json.get("Annual_C_Score").is_some());
    }
}
