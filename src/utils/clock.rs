use chrono::Utc;

/// Current wall-clock time in whole seconds since the epoch
pub fn unix_now() -> i64 {
    Utc::now().timestamp()
}

/// Current wall-clock time in milliseconds since the epoch
pub fn unix_now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
