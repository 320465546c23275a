#[macro_export]
macro_rules! log_time {
    ($fmt:literal, $expr:expr) => {{
        let start = std::time::Instant::now();
        let ret = $expr;
        let duration = start.elapsed();
        tracing::debug!(target: "drill::timing", duration = ?duration, $fmt);
        ret
    }};
}
