// Domain types and value objects
mod scenario;
mod year_series;

// Re-export commonly used types to the world
pub use scenario::PlantingScenario;
pub use year_series::YearSeries;
