mod commands;
mod output;

pub use commands::run_app;
