// Top Level Constants

/// Molecular-weight ratio CO2 / C (44.01 / 12.01).
pub const CO2_PER_CARBON: f64 = 3.667;

/// First project year. Growth models are calibrated to this planting year.
pub const DEFAULT_START_YEAR: i32 = 2024;

/// Years of proforma projection after the start year.
pub const DEFAULT_HORIZON_YEARS: i32 = 35;

/// NPV is reported at start year + this many years.
pub const DEFAULT_NPV_YEARS: i32 = 20;

/// Credits accumulate and are issued in a lump every N years.
pub const ISSUANCE_PERIOD_YEARS: i32 = 5;

pub mod rounding {
    /// Decimals kept on carbon scores (tons C / acre).
    pub const CARBON_SCORE_DP: u32 = 4;
    /// Decimals kept on carbon unit columns.
    pub const CARBON_UNIT_DP: u32 = 2;
}

pub mod planting {
    /// Nominal total trees-per-acre ceiling. Exceeding it only warns.
    pub const TPA_CAP: f64 = 435.0;
    pub const DEFAULT_SURVIVAL: f64 = 70.0;
    pub const DEFAULT_SITE_INDEX: f64 = 120.0;

    // Advisory input ranges (from the planting design sliders)
    pub const SURVIVAL_RANGE: (f64, f64) = (40.0, 90.0);
    pub const SITE_INDEX_RANGE: (f64, f64) = (96.0, 137.0);

    /// Species slots the polynomial yield models are trained on.
    pub const MODEL_SPECIES_SLOTS: usize = 4;
    /// Degree of the polynomial feature expansion fed to the yield models.
    pub const POLY_DEGREE: usize = 3;
}

pub mod metrics {
    /// Aboveground live biomass carbon: the only metric the unit converter consumes.
    pub const ABOVEGROUND_CARBON: &str = "ABLD_C";
}
