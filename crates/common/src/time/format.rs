//! Human-readable period formatting
//!
//! Renders durations the way build reports phrase them ("1 hour, 2 minutes
//! and 5 seconds"), normalised into days, hours, minutes and seconds.

use std::time::Duration;

const UNITS: [(u64, &str, &str); 4] =
    [(86_400, "day", "days"), (3_600, "hour", "hours"), (60, "minute", "minutes"), (1, "second", "seconds")];

/// Format a duration as a spoken-style period.
///
/// Sub-second precision is dropped; zero-valued units are omitted; a zero
/// duration renders as `"0 seconds"`.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "runtime")]
/// # {
/// use std::time::Duration;
///
/// use buildhound_common::time::format::format_period;
///
/// assert_eq!(format_period(Duration::from_secs(120)), "2 minutes");
/// assert_eq!(format_period(Duration::from_secs(3_665)), "1 hour, 1 minute and 5 seconds");
/// # }
/// ```
pub fn format_period(duration: Duration) -> String {
    let mut remaining = duration.as_secs();
    let mut parts = Vec::new();

    for (unit_secs, singular, plural) in UNITS {
        let value = remaining / unit_secs;
        remaining %= unit_secs;
        if value > 0 {
            parts.push(format!("{value} {}", if value == 1 { singular } else { plural }));
        }
    }

    match parts.len() {
        0 => "0 seconds".to_string(),
        1 => parts.remove(0),
        _ => {
            let last = parts.pop().unwrap_or_default();
            format!("{} and {last}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_period_zero() {
        assert_eq!(format_period(Duration::ZERO), "0 seconds");
        assert_eq!(format_period(Duration::from_millis(900)), "0 seconds");
    }

    #[test]
    fn test_format_period_single_unit() {
        assert_eq!(format_period(Duration::from_secs(1)), "1 second");
        assert_eq!(format_period(Duration::from_secs(45)), "45 seconds");
        assert_eq!(format_period(Duration::from_secs(120)), "2 minutes");
        assert_eq!(format_period(Duration::from_secs(7_200)), "2 hours");
        assert_eq!(format_period(Duration::from_secs(86_400)), "1 day");
    }

    #[test]
    fn test_format_period_two_units() {
        assert_eq!(format_period(Duration::from_secs(125)), "2 minutes and 5 seconds");
        assert_eq!(format_period(Duration::from_secs(3_660)), "1 hour and 1 minute");
    }

    #[test]
    fn test_format_period_many_units() {
        assert_eq!(format_period(Duration::from_secs(3_665)), "1 hour, 1 minute and 5 seconds");
        assert_eq!(
            format_period(Duration::from_secs(90_061)),
            "1 day, 1 hour, 1 minute and 1 second"
        );
    }

    #[test]
    fn test_format_period_skips_zero_units() {
        assert_eq!(format_period(Duration::from_secs(86_405)), "1 day and 5 seconds");
    }
}
