use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub profile: String,
    pub action: Action,
    pub confidence: Confidence,
    pub explanation: String,
    pub price_range: PriceRange,
    pub average_price: i64,
    pub trend: Trend,
    pub historical_series: Vec<PricePoint>,
    pub markets: Vec<Market>,
    pub user_location: Coordinates,
}

impl Recommendation {
    pub fn is_generic(&self) -> bool {
        self.profile == GENERIC_PROFILE
    }
}

pub const GENERIC_PROFILE: &str = "generic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    pub fn contains(&self, price: i64) -> bool {
        (self.min..=self.max).contains(&price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub name: String,
    pub distance_km: f64,
    pub price: i64,
    pub comparison_label: String,
    pub demand: Demand,
    pub coordinates: Coordinates,
    pub trades_crop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Demand {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Rising,
    Falling,
    Stable,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Rising => "Rising",
            Trend::Falling => "Falling",
            Trend::Stable => "Stable",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Demand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Demand::Low => "Low",
            Demand::Medium => "Medium",
            Demand::High => "High",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selling advice. On the wire this is the human-readable string
/// ("Sell Now", "Wait 2-4 weeks", "Sell within 1-2 weeks").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Action {
    SellNow,
    Wait { min_weeks: u32, max_weeks: u32 },
    SellWithin { min_weeks: u32, max_weeks: u32 },
}

impl Action {
    pub fn is_wait(&self) -> bool {
        matches!(self, Action::Wait { .. })
    }
}

pub(crate) fn weeks_label(min_weeks: u32, max_weeks: u32) -> String {
    if min_weeks == max_weeks {
        min_weeks.to_string()
    } else {
        format!("{min_weeks}-{max_weeks}")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Action::SellNow => f.write_str("Sell Now"),
            Action::Wait {
                min_weeks,
                max_weeks,
            } => write!(f, "Wait {} weeks", weeks_label(min_weeks, max_weeks)),
            Action::SellWithin {
                min_weeks,
                max_weeks,
            } => write!(f, "Sell within {} weeks", weeks_label(min_weeks, max_weeks)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseActionError(String);

impl fmt::Display for ParseActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized action: {:?}", self.0)
    }
}

impl std::error::Error for ParseActionError {}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("sell now") {
            return Ok(Action::SellNow);
        }

        let err = || ParseActionError(s.to_string());
        let (prefix_len, is_wait) = if trimmed.starts_with("Wait ") {
            ("Wait ".len(), true)
        } else if trimmed.starts_with("Sell within ") {
            ("Sell within ".len(), false)
        } else {
            return Err(err());
        };

        let span = trimmed[prefix_len..]
            .strip_suffix(" weeks")
            .or_else(|| trimmed[prefix_len..].strip_suffix(" week"))
            .ok_or_else(err)?;
        let (min_weeks, max_weeks) = match span.split_once('-') {
            Some((lo, hi)) => (
                lo.trim().parse::<u32>().map_err(|_| err())?,
                hi.trim().parse::<u32>().map_err(|_| err())?,
            ),
            None => {
                let n = span.trim().parse::<u32>().map_err(|_| err())?;
                (n, n)
            }
        };
        if min_weeks > max_weeks {
            return Err(err());
        }

        Ok(if is_wait {
            Action::Wait {
                min_weeks,
                max_weeks,
            }
        } else {
            Action::SellWithin {
                min_weeks,
                max_weeks,
            }
        })
    }
}

impl TryFrom<String> for Action {
    type Error = ParseActionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Action> for String {
    fn from(value: Action) -> Self {
        value.to_string()
    }
}
