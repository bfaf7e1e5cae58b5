use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// What the event filter does when no suffix patterns are configured.
///
/// - `Nothing`: no file ever qualifies (default).
/// - `Everything`: every created file qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPatternPolicy {
    #[default]
    Nothing,
    Everything,
}

impl FromStr for EmptyPatternPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nothing" => Ok(EmptyPatternPolicy::Nothing),
            "everything" => Ok(EmptyPatternPolicy::Everything),
            other => Err(format!(
                "invalid empty_patterns: {other} (expected \"nothing\" or \"everything\")"
            )),
        }
    }
}

/// Which descriptors count as "holding the file open".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Any open descriptor on the file keeps it pending.
    #[default]
    AnyHandle,
    /// Only descriptors opened for writing keep it pending.
    WritersOnly,
}

/// Path convention handed to the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// Pick based on the host platform.
    #[default]
    Auto,
    /// Pass paths through unchanged.
    Posix,
    /// `C:\a\b` becomes `/c/a/b/`.
    Windows,
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{s}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_duration_units() {
        assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration(" 2m "), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Ok(Duration::from_secs(3600)));
    }

    #[test]
    fn rejects_malformed_durations() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("10").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("3d").is_err());
    }

    #[test]
    fn huge_durations_are_errors_not_overflows() {
        let err = parse_duration("999999999999999999h").unwrap_err();
        assert!(err.contains("too large"), "{err}");
        assert!(parse_duration("999999999999999999m").is_err());
        assert_eq!(
            parse_duration("18446744073709551615s"),
            Ok(Duration::from_secs(u64::MAX))
        );
    }

    #[test]
    fn empty_pattern_policy_from_str() {
        assert_eq!(
            "Everything".parse::<EmptyPatternPolicy>(),
            Ok(EmptyPatternPolicy::Everything)
        );
        assert!("some".parse::<EmptyPatternPolicy>().is_err());
    }
}
