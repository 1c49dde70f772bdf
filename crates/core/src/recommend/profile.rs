use crate::domain::recommendation::{Action, Confidence, PriceRange, Trend, GENERIC_PROFILE};
use crate::recommend::history::SeriesParams;
use crate::recommend::rules;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropProfile {
    pub crop: String,
    pub display_name: String,
    pub action: Action,
    pub confidence: Confidence,
    pub trend: Trend,
    pub average_price: i64,
    pub price_range: PriceRange,
    pub current_price: i64,
    pub reference_average: i64,
    pub reference_window: String,
    #[serde(default)]
    pub recent_change_pct: Option<i64>,
    pub series: SeriesParams,
}

impl CropProfile {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.crop.trim().is_empty(), "profile crop id must be non-empty");
        ensure!(
            self.crop != GENERIC_PROFILE,
            "profile crop id {GENERIC_PROFILE:?} is reserved"
        );
        ensure!(
            !self.display_name.trim().is_empty(),
            "profile {} must have a display name",
            self.crop
        );
        ensure!(
            self.price_range.min <= self.price_range.max,
            "profile {}: priceRange.min ({}) exceeds priceRange.max ({})",
            self.crop,
            self.price_range.min,
            self.price_range.max
        );
        ensure!(
            self.average_price > 0,
            "profile {}: averagePrice must be positive (got {})",
            self.crop,
            self.average_price
        );
        ensure!(
            self.reference_average > 0,
            "profile {}: referenceAverage must be positive (got {})",
            self.crop,
            self.reference_average
        );
        ensure!(
            self.current_price > 0,
            "profile {}: currentPrice must be positive (got {})",
            self.crop,
            self.current_price
        );
        ensure!(
            self.series.base_price.is_finite() && self.series.daily_drift.is_finite(),
            "profile {}: series basePrice and dailyDrift must be finite numbers",
            self.crop
        );

        let (action, confidence) =
            rules::advise(self.trend, self.current_price, self.reference_average);
        ensure!(
            (self.action, self.confidence) == (action, confidence),
            "profile {}: {} trend at ₹{} against ₹{} calls for \"{action}\" ({confidence}), \
             not \"{}\" ({})",
            self.crop,
            self.trend,
            self.current_price,
            self.reference_average,
            self.action,
            self.confidence
        );

        if !self.price_range.contains(self.average_price) {
            tracing::warn!(
                crop = %self.crop,
                average_price = self.average_price,
                min = self.price_range.min,
                max = self.price_range.max,
                "averagePrice lies outside priceRange"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    pub profile: &'a CropProfile,
    pub tag: &'a str,
}

impl Selection<'_> {
    pub fn is_generic(&self) -> bool {
        self.tag == GENERIC_PROFILE
    }
}

#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: BTreeMap<String, CropProfile>,
    fallback: CropProfile,
}

impl ProfileTable {
    pub fn builtin() -> Self {
        let cotton = cotton();
        let mut profiles = BTreeMap::new();
        for p in [wheat(), rice(), cotton.clone()] {
            profiles.insert(p.crop.clone(), p);
        }
        Self {
            profiles,
            fallback: cotton,
        }
    }

    pub fn select(&self, crop: &str) -> Selection<'_> {
        match self.profiles.get(crop) {
            Some(profile) => Selection {
                profile,
                tag: profile.crop.as_str(),
            },
            None => Selection {
                profile: &self.fallback,
                tag: GENERIC_PROFILE,
            },
        }
    }

    pub fn crops(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    /// Adds or replaces profiles from a JSON array. Nothing is applied if any entry is invalid.
    pub fn extend_from_json_str(&mut self, json: &str) -> anyhow::Result<usize> {
        let parsed = serde_json::from_str::<Vec<CropProfile>>(json)
            .context("crop profiles must be a JSON array of profile objects")?;
        for profile in &parsed {
            profile.validate()?;
        }

        let n = parsed.len();
        for profile in parsed {
            self.profiles.insert(profile.crop.clone(), profile);
        }
        Ok(n)
    }

    pub fn extend_from_file(&mut self, path: &str) -> anyhow::Result<usize> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read crop profiles file {path}"))?;
        self.extend_from_json_str(&text)
            .with_context(|| format!("invalid crop profiles file {path}"))
    }
}

fn wheat() -> CropProfile {
    CropProfile {
        crop: "wheat".to_string(),
        display_name: "Wheat".to_string(),
        action: Action::Wait {
            min_weeks: 2,
            max_weeks: 4,
        },
        confidence: Confidence::Medium,
        trend: Trend::Rising,
        average_price: 2200,
        price_range: PriceRange {
            min: 2100,
            max: 2400,
        },
        current_price: 2200,
        reference_average: 2350,
        reference_window: "3-month average".to_string(),
        recent_change_pct: None,
        series: SeriesParams {
            base_price: 2200.0,
            daily_drift: 1.5,
        },
    }
}

fn rice() -> CropProfile {
    CropProfile {
        crop: "rice".to_string(),
        display_name: "Rice".to_string(),
        action: Action::SellWithin {
            min_weeks: 1,
            max_weeks: 2,
        },
        confidence: Confidence::Medium,
        trend: Trend::Stable,
        average_price: 2800,
        price_range: PriceRange {
            min: 2700,
            max: 2900,
        },
        current_price: 2800,
        reference_average: 2750,
        reference_window: "average".to_string(),
        recent_change_pct: None,
        series: SeriesParams {
            base_price: 2800.0,
            daily_drift: 0.0,
        },
    }
}

fn cotton() -> CropProfile {
    CropProfile {
        crop: "cotton".to_string(),
        display_name: "Cotton".to_string(),
        action: Action::SellNow,
        confidence: Confidence::High,
        trend: Trend::Falling,
        average_price: 6000,
        price_range: PriceRange {
            min: 5800,
            max: 6200,
        },
        current_price: 6000,
        reference_average: 5700,
        reference_window: "yearly average".to_string(),
        recent_change_pct: Some(-8),
        series: SeriesParams {
            base_price: 6000.0,
            daily_drift: -1.5,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_crops_match_exactly() {
        let table = ProfileTable::builtin();

        let wheat = table.select("wheat");
        assert_eq!(wheat.tag, "wheat");
        assert!(wheat.profile.action.is_wait());
        assert_eq!(wheat.profile.trend, Trend::Rising);
        assert_eq!(wheat.profile.average_price, 2200);
        assert_eq!(wheat.profile.price_range, PriceRange { min: 2100, max: 2400 });

        let rice = table.select("rice");
        assert_eq!(rice.profile.trend, Trend::Stable);
        assert_eq!(rice.profile.action.to_string(), "Sell within 1-2 weeks");

        let cotton = table.select("cotton");
        assert_eq!(cotton.tag, "cotton");
        assert!(!cotton.is_generic());
        assert_eq!(cotton.profile.action, Action::SellNow);
    }

    #[test]
    fn unknown_or_empty_crop_falls_back_to_generic() {
        let table = ProfileTable::builtin();
        for crop in ["barley", "", "Wheat", " wheat"] {
            let sel = table.select(crop);
            assert!(sel.is_generic(), "{crop:?} should not match");
            assert_eq!(sel.profile.action, Action::SellNow);
            assert_eq!(sel.profile.trend, Trend::Falling);
            assert_eq!(sel.profile.average_price, 6000);
        }
    }

    #[test]
    fn builtin_profiles_are_valid() {
        let table = ProfileTable::builtin();
        for crop in table.crops() {
            table.select(crop).profile.validate().unwrap();
        }
    }

    #[test]
    fn json_profiles_extend_and_override() {
        let mut table = ProfileTable::builtin();
        let json = json!([
            {
                "crop": "onion",
                "displayName": "Onion",
                "action": "Wait 2-4 weeks",
                "confidence": "Medium",
                "trend": "Rising",
                "averagePrice": 1500,
                "priceRange": {"min": 1400, "max": 1700},
                "currentPrice": 1450,
                "referenceAverage": 1600,
                "referenceWindow": "4-week average",
                "series": {"basePrice": 1500.0, "dailyDrift": 2.0}
            },
            {
                "crop": "wheat",
                "displayName": "Wheat",
                "action": "Sell Now",
                "confidence": "High",
                "trend": "Falling",
                "averagePrice": 2300,
                "priceRange": {"min": 2200, "max": 2500},
                "currentPrice": 2300,
                "referenceAverage": 2100,
                "referenceWindow": "yearly average",
                "recentChangePct": -4,
                "series": {"basePrice": 2300.0, "dailyDrift": -1.0}
            }
        ])
        .to_string();

        assert_eq!(table.extend_from_json_str(&json).unwrap(), 2);
        assert_eq!(table.select("onion").tag, "onion");
        assert_eq!(table.select("onion").profile.confidence, Confidence::Medium);
        assert_eq!(table.select("wheat").profile.action, Action::SellNow);
        assert_eq!(table.select("rice").profile.average_price, 2800);
    }

    #[test]
    fn invalid_profile_rejects_whole_file() {
        let mut table = ProfileTable::builtin();
        let json = json!([
            {
                "crop": "maize",
                "displayName": "Maize",
                "action": "Sell Now",
                "confidence": "High",
                "trend": "Stable",
                "averagePrice": 2000,
                "priceRange": {"min": 2500, "max": 1800},
                "currentPrice": 2000,
                "referenceAverage": 2000,
                "referenceWindow": "average",
                "series": {"basePrice": 2000.0, "dailyDrift": 0.0}
            }
        ])
        .to_string();

        assert!(table.extend_from_json_str(&json).is_err());
        assert!(table.select("maize").is_generic());
    }

    #[test]
    fn builtin_profiles_follow_advice_rules() {
        let table = ProfileTable::builtin();
        for crop in table.crops() {
            let p = table.select(crop).profile;
            assert_eq!(
                rules::advise(p.trend, p.current_price, p.reference_average),
                (p.action, p.confidence),
                "{crop}"
            );
        }
    }

    #[test]
    fn contradictory_advice_is_rejected() {
        let mut table = ProfileTable::builtin();
        let json = json!([
            {
                "crop": "soybean",
                "displayName": "Soybean",
                "action": "Sell Now",
                "confidence": "High",
                "trend": "Rising",
                "averagePrice": 4500,
                "priceRange": {"min": 4300, "max": 4700},
                "currentPrice": 4000,
                "referenceAverage": 4500,
                "referenceWindow": "3-month average",
                "series": {"basePrice": 4500.0, "dailyDrift": 2.0}
            }
        ])
        .to_string();

        let err = table.extend_from_json_str(&json).unwrap_err();
        assert!(format!("{err:#}").contains("Wait 2-4 weeks"));
        assert!(table.select("soybean").is_generic());
    }

    #[test]
    fn rejects_non_positive_current_price() {
        let mut p = wheat();
        p.current_price = i64::MIN;
        assert!(p.validate().is_err());
        p.current_price = 0;
        assert!(p.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_series_params() {
        let mut p = rice();
        p.series.base_price = f64::NAN;
        assert!(p.validate().is_err());

        let mut p = rice();
        p.series.daily_drift = f64::INFINITY;
        assert!(p.validate().is_err());
    }

    #[test]
    fn generic_id_is_reserved() {
        let mut p = wheat();
        p.crop = GENERIC_PROFILE.to_string();
        assert!(p.validate().is_err());
    }
}
