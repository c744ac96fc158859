use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Time window requested from the chart aggregation endpoint.
///
/// The string forms are the exact values the backend expects in the
/// `range` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "Today")]
    Today,
    #[default]
    #[serde(rename = "24 Hour")]
    TwentyFourHour,
    #[serde(rename = "1 Week")]
    OneWeek,
    #[serde(rename = "1 Month")]
    OneMonth,
    #[serde(rename = "3 Month")]
    ThreeMonth,
    #[serde(rename = "1 Year")]
    OneYear,
}

impl TimeRange {
    /// All ranges in display order.
    pub const ALL: [TimeRange; 6] = [
        TimeRange::Today,
        TimeRange::TwentyFourHour,
        TimeRange::OneWeek,
        TimeRange::OneMonth,
        TimeRange::ThreeMonth,
        TimeRange::OneYear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Today => "Today",
            TimeRange::TwentyFourHour => "24 Hour",
            TimeRange::OneWeek => "1 Week",
            TimeRange::OneMonth => "1 Month",
            TimeRange::ThreeMonth => "3 Month",
            TimeRange::OneYear => "1 Year",
        }
    }

    /// How long a cached chart series for this range stays valid.
    ///
    /// Coarser aggregates change less often, so they are kept longer.
    pub fn cache_ttl(&self) -> Duration {
        let secs = match self {
            TimeRange::Today | TimeRange::TwentyFourHour => 60,
            TimeRange::OneWeek => 120,
            TimeRange::OneMonth => 180,
            TimeRange::ThreeMonth | TimeRange::OneYear => 300,
        };
        Duration::from_secs(secs)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown range: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_wire_string() {
        for range in TimeRange::ALL {
            assert_eq!(range.as_str().parse::<TimeRange>().unwrap(), range);
        }
    }

    #[test]
    fn rejects_unknown_range() {
        assert!("2 Week".parse::<TimeRange>().is_err());
        assert!("24 hour".parse::<TimeRange>().is_err(), "matching is exact");
    }

    #[test]
    fn ttl_grows_with_range() {
        assert_eq!(TimeRange::TwentyFourHour.cache_ttl(), Duration::from_secs(60));
        assert_eq!(TimeRange::Today.cache_ttl(), Duration::from_secs(60));
        assert_eq!(TimeRange::OneWeek.cache_ttl(), Duration::from_secs(120));
        assert_eq!(TimeRange::OneMonth.cache_ttl(), Duration::from_secs(180));
        assert_eq!(TimeRange::ThreeMonth.cache_ttl(), Duration::from_secs(300));
        assert_eq!(TimeRange::OneYear.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn default_is_twenty_four_hours() {
        assert_eq!(TimeRange::default(), TimeRange::TwentyFourHour);
    }
}
