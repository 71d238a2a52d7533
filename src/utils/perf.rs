#[macro_export]
macro_rules! trace_time {
    // $threshold_micros: 0 logs every run, 1000 only runs slower than 1ms, etc.
    ($name:expr, $threshold_micros:expr, $block:block) => {{
        if $crate::config::DF.log_pipeline {
            let start = ::std::time::Instant::now();
            let result = $block;
            let micros = start.elapsed().as_micros();
            if micros >= $threshold_micros {
                let mode = if cfg!(debug_assertions) {
                    "DEBUG"
                } else {
                    "RELEASE"
                };
                log::info!(
                    "[timing {}] '{}' took {:.3}ms",
                    mode,
                    $name,
                    micros as f64 / 1000.0
                );
            }
            result
        } else {
            $block
        }
    }};
}
