//! Market identifiers and candle intervals

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Market identifier in `QUOTE-BASE` form, e.g. `KRW-BTC`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Instrument(String);

impl Instrument {
    /// Parse a `QUOTE-BASE` market code
    pub fn new(code: impl Into<String>) -> Result<Self, ConfigError> {
        let code = code.into().trim().to_uppercase();
        match code.split_once('-') {
            Some((quote, base)) if !quote.is_empty() && !base.is_empty() => Ok(Self(code)),
            _ => Err(ConfigError::InvalidInstrument(code)),
        }
    }

    /// Market code as sent to the exchange
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Quote currency (`KRW` in `KRW-BTC`)
    pub fn quote(&self) -> &str {
        self.0.split_once('-').map(|(q, _)| q).unwrap_or(&self.0)
    }

    /// Base currency (`BTC` in `KRW-BTC`)
    pub fn base(&self) -> &str {
        self.0.split_once('-').map(|(_, b)| b).unwrap_or(&self.0)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Instrument {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Instrument {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Instrument> for String {
    fn from(value: Instrument) -> Self {
        value.0
    }
}

/// Candle interval supported by the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Interval {
    /// Minute candles; unit is one of 1, 3, 5, 10, 15, 30, 60, 240
    Minutes(u32),
    Day,
    Week,
}

impl Interval {
    const MINUTE_UNITS: [u32; 8] = [1, 3, 5, 10, 15, 30, 60, 240];

    /// Minute interval, if the unit is supported
    pub fn minutes(unit: u32) -> Option<Self> {
        Self::MINUTE_UNITS
            .contains(&unit)
            .then_some(Self::Minutes(unit))
    }

    /// Path segment of the candle endpoint
    pub fn endpoint(&self) -> String {
        match self {
            Self::Minutes(unit) => format!("minutes/{}", unit),
            Self::Day => "days".to_string(),
            Self::Week => "weeks".to_string(),
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::Minutes(5)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minutes(unit) => write!(f, "minute{}", unit),
            Self::Day => f.write_str("day"),
            Self::Week => f.write_str("week"),
        }
    }
}

impl FromStr for Interval {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_lowercase();
        let parsed = match raw.as_str() {
            "day" | "days" | "1d" => Some(Self::Day),
            "week" | "weeks" | "1w" => Some(Self::Week),
            other => other
                .strip_prefix("minute")
                .or_else(|| other.strip_suffix('m'))
                .and_then(|unit| unit.parse::<u32>().ok())
                .and_then(Self::minutes),
        };
        parsed.ok_or(ConfigError::InvalidInterval(raw))
    }
}

impl TryFrom<String> for Interval {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Interval> for String {
    fn from(value: Interval) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_parts() {
        let inst = Instrument::new("krw-btc").unwrap();
        assert_eq!(inst.as_str(), "KRW-BTC");
        assert_eq!(inst.quote(), "KRW");
        assert_eq!(inst.base(), "BTC");
    }

    #[test]
    fn test_instrument_rejects_bad_codes() {
        assert!(Instrument::new("BTC").is_err());
        assert!(Instrument::new("KRW-").is_err());
        assert!(Instrument::new("-BTC").is_err());
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!("minute5".parse::<Interval>().unwrap(), Interval::Minutes(5));
        assert_eq!("15m".parse::<Interval>().unwrap(), Interval::Minutes(15));
        assert_eq!("1d".parse::<Interval>().unwrap(), Interval::Day);
        assert!("minute7".parse::<Interval>().is_err());
        assert!("hourly".parse::<Interval>().is_err());
        assert_eq!(Interval::Minutes(240).endpoint(), "minutes/240");
        assert_eq!(Interval::Minutes(5).to_string(), "minute5");
    }
}
