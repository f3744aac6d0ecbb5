use chrono::Utc;

/// Seconds between the client-reported `start_time` and now.
///
/// `start_time` is untrusted telemetry: a non-positive value yields 0 and a
/// value in the future is clamped to 0 rather than reported.
pub fn elapsed(start_time: f64) -> f64 {
    elapsed_at(start_time, now_seconds())
}

pub fn elapsed_at(start_time: f64, now: f64) -> f64 {
    if !start_time.is_finite() || start_time <= 0.0 {
        return 0.0;
    }
    (now - start_time).max(0.0)
}

/// Current wall-clock time as fractional Unix seconds.
pub fn now_seconds() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

pub fn format_elapsed(secs: f64) -> String {
    format!("{:.2}", secs.max(0.0))
}
