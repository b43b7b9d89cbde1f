//! Wall-clock helpers producing seconds since the Unix epoch as `f64`.

use std::time::{SystemTime, UNIX_EPOCH};

/// Convert a `SystemTime` to fractional seconds since the epoch.
/// Times before the epoch become negative.
pub fn system_time_secs(time: SystemTime) -> f64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// Current wall-clock time in seconds since the epoch.
pub fn now_secs() -> f64 {
    system_time_secs(SystemTime::now())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn epoch_is_zero() {
        assert_eq!(system_time_secs(UNIX_EPOCH), 0.0);
    }

    #[test]
    fn keeps_sub_second_precision() {
        let t = UNIX_EPOCH + Duration::from_millis(1_500);
        assert!((system_time_secs(t) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn pre_epoch_is_negative() {
        let t = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(system_time_secs(t), -10.0);
    }
}
