//! Debugging feature flags.

pub struct LogFlags {
    /// Which interpolant was chosen for each carbon series.
    pub log_interpolation: bool,

    /// Per-protocol totals as units are converted.
    pub log_converter: bool,

    /// Per-protocol revenue / cost totals.
    pub log_proforma: bool,

    /// Stage timings and row counts in the pipeline.
    pub log_pipeline: bool,

    /// Each (year, metric) prediction of the polynomial yield models. Very noisy.
    pub log_yield_predictions: bool,
}

pub const DF: LogFlags = LogFlags {
    log_interpolation: false,
    log_converter: false,
    log_proforma: false,
    log_pipeline: true,
    log_yield_predictions: false,
};
