use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measured quantity being charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[default]
    Pm25,
    Pm10,
    Aqi,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Pm25, Metric::Pm10, Metric::Aqi];

    /// Wire form used in query strings (`pm25`, `pm10`, `aqi`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Pm25 => "pm25",
            Metric::Pm10 => "pm10",
            Metric::Aqi => "aqi",
        }
    }

    /// Human label for toggles and chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Pm25 => "PM2.5",
            Metric::Pm10 => "PM10",
            Metric::Aqi => "AQI",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Pm25 | Metric::Pm10 => "µg/m³",
            Metric::Aqi => "US AQI",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pm25" => Ok(Metric::Pm25),
            "pm10" => Ok(Metric::Pm10),
            "aqi" => Ok(Metric::Aqi),
            other => anyhow::bail!("unknown metric: {other}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_names() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        assert!("PM25".parse::<Metric>().is_err());
    }
}
