use crate::recommend::market::MarketSite;
use anyhow::{ensure, Context};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_STATE: &str = "maharashtra";
const DEFAULT_WINDOW_DAYS: i64 = 90;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub state: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_queries: u64,
    pub top_crops: Vec<CropQueries>,
    pub price_comparison: BTreeMap<String, Vec<MandiPrice>>,
    pub recommendation_stats: RecommendationStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropQueries {
    pub crop: String,
    pub queries: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MandiPrice {
    pub mandi: String,
    pub price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationStats {
    pub sell_now: u32,
    pub wait: u32,
    pub sell_soon: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsWindow {
    pub state: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl AnalyticsWindow {
    pub fn resolve(
        state: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> anyhow::Result<Self> {
        let state = state
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATE)
            .to_string();
        let end = match end {
            Some(s) => parse_date(s, "end")?,
            None => today,
        };
        let start = match start {
            Some(s) => parse_date(s, "start")?,
            None => end - Duration::days(DEFAULT_WINDOW_DAYS),
        };
        ensure!(start <= end, "start ({start}) must not be after end ({end})");

        Ok(Self { state, start, end })
    }
}

fn parse_date(s: &str, which: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("{which} must be a YYYY-MM-DD date (got {s:?})"))
}

pub fn summary(window: AnalyticsWindow, markets: &[MarketSite]) -> AnalyticsSummary {
    let cotton = markets
        .iter()
        .map(|site| MandiPrice {
            mandi: short_name(&site.name).to_string(),
            price: site.price,
        })
        .collect();

    let mut price_comparison = BTreeMap::new();
    price_comparison.insert("cotton".to_string(), cotton);

    AnalyticsSummary {
        state: window.state,
        start: window.start,
        end: window.end,
        total_queries: 1247,
        top_crops: vec![
            crop_queries("Cotton", 456),
            crop_queries("Soybean", 342),
            crop_queries("Wheat", 289),
            crop_queries("Onion", 160),
        ],
        price_comparison,
        recommendation_stats: RecommendationStats {
            sell_now: 45,
            wait: 30,
            sell_soon: 25,
        },
    }
}

fn crop_queries(crop: &str, queries: u64) -> CropQueries {
    CropQueries {
        crop: crop.to_string(),
        queries,
    }
}

// "Akola APMC" -> "Akola"
fn short_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or(name)
}
