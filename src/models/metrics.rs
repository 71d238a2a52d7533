use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-year stand metrics from the yield models, e.g. `ABLD_C`, `BA`, `QMD`, `SDI`.
/// Only aboveground carbon feeds the credit pipeline; the rest is carried for display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricTable(BTreeMap<i32, BTreeMap<String, f64>>);

impl MetricTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, year: i32, metric: impl Into<String>, value: f64) {
        self.0.entry(year).or_default().insert(metric.into(), value);
    }

    pub fn get(&self, year: i32, metric: &str) -> Option<f64> {
        self.0.get(&year)?.get(metric).copied()
    }

    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.keys().copied()
    }

    /// (year, value) for one metric in year order. Years without it are skipped.
    pub fn column(&self, metric: &str) -> Vec<(i32, f64)> {
        self.0
            .iter()
            .filter_map(|(year, row)| row.get(metric).map(|v| (*year, *v)))
            .collect()
    }

    /// All metric names present in any year.
    pub fn metric_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .0
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_skips_missing_years() {
        let mut t = MetricTable::new();
        t.insert(2030, "ABLD_C", 10.0);
        t.insert(2025, "ABLD_C", 4.0);
        t.insert(2035, "BA", 80.0);
        assert_eq!(t.column("ABLD_C"), vec![(2025, 4.0), (2030, 10.0)]);
        assert_eq!(t.metric_names(), vec!["ABLD_C".to_string(), "BA".to_string()]);
        assert_eq!(t.get(2035, "BA"), Some(80.0));
        assert_eq!(t.get(2035, "ABLD_C"), None);
    }
}
