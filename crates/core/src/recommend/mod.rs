pub mod explain;
pub mod history;
pub mod market;
pub mod profile;
pub mod rules;

use crate::domain::contract::RecommendationQuery;
use crate::domain::recommendation::Recommendation;
use chrono::NaiveDate;
use market::MarketSite;
use profile::ProfileTable;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Recommender {
    profiles: ProfileTable,
    markets: Vec<MarketSite>,
}

impl Default for Recommender {
    fn default() -> Self {
        Self::new(ProfileTable::builtin(), market::registry())
    }
}

impl Recommender {
    pub fn new(profiles: ProfileTable, markets: Vec<MarketSite>) -> Self {
        Self { profiles, markets }
    }

    pub fn profiles(&self) -> &ProfileTable {
        &self.profiles
    }

    pub fn markets(&self) -> &[MarketSite] {
        &self.markets
    }

    pub fn recommend<R: Rng + ?Sized>(
        &self,
        query: &RecommendationQuery,
        today: NaiveDate,
        rng: &mut R,
    ) -> Recommendation {
        let selection = self.profiles.select(&query.crop);
        let profile = selection.profile;

        Recommendation {
            profile: selection.tag.to_string(),
            action: profile.action,
            confidence: profile.confidence,
            explanation: explain::explain(profile),
            price_range: profile.price_range,
            average_price: profile.average_price,
            trend: profile.trend,
            historical_series: history::synthesize(&profile.series, today, rng),
            markets: market::compare(&self.markets, &query.crop, profile.average_price),
            user_location: market::USER_LOCATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::{Confidence, PriceRange, Trend};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn query(crop: &str) -> RecommendationQuery {
        RecommendationQuery {
            state: "maharashtra".to_string(),
            crop: crop.to_string(),
            location: "Akola".to_string(),
            quantity: Some(50.0),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn wheat_query_waits_on_rising_prices() {
        let r = Recommender::default().recommend(
            &query("wheat"),
            today(),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(r.action.to_string().contains("Wait"));
        assert_eq!(r.trend, Trend::Rising);
        assert_eq!(r.average_price, 2200);
        assert_eq!(r.price_range, PriceRange { min: 2100, max: 2400 });
        assert_eq!(r.profile, "wheat");
    }

    #[test]
    fn cotton_query_sells_now() {
        let r = Recommender::default().recommend(
            &query("cotton"),
            today(),
            &mut StdRng::seed_from_u64(1),
        );
        assert_eq!(r.action.to_string(), "Sell Now");
        assert_eq!(r.trend, Trend::Falling);
        assert_eq!(r.average_price, 6000);
        assert_eq!(r.confidence, Confidence::High);
    }

    #[test]
    fn unknown_crop_uses_default_profile_with_generic_tag() {
        let rec = Recommender::default();
        let mut rng = StdRng::seed_from_u64(3);
        let barley = rec.recommend(&query("barley"), today(), &mut rng);
        let cotton = rec.recommend(&query("cotton"), today(), &mut rng);

        assert!(barley.is_generic());
        assert!(!cotton.is_generic());
        assert_eq!(barley.action, cotton.action);
        assert_eq!(barley.trend, cotton.trend);
        assert_eq!(barley.average_price, cotton.average_price);
        assert_eq!(barley.explanation, cotton.explanation);
    }

    #[test]
    fn repeated_calls_only_vary_the_series() {
        let rec = Recommender::default();
        let mut rng = StdRng::seed_from_u64(11);
        for crop in ["wheat", "rice", "cotton", ""] {
            let a = rec.recommend(&query(crop), today(), &mut rng);
            let b = rec.recommend(&query(crop), today(), &mut rng);
            assert_eq!(a.action, b.action);
            assert_eq!(a.confidence, b.confidence);
            assert_eq!(a.trend, b.trend);
            assert_eq!(a.explanation, b.explanation);
            assert_eq!(a.average_price, b.average_price);
            assert_eq!(a.price_range, b.price_range);
            assert_eq!(a.markets, b.markets);
            assert_ne!(a.historical_series, b.historical_series);
        }
    }

    #[test]
    fn record_shape_holds_for_every_profile() {
        let rec = Recommender::default();
        let mut rng = StdRng::seed_from_u64(5);
        for crop in ["wheat", "rice", "cotton", "barley"] {
            let r = rec.recommend(&query(crop), today(), &mut rng);
            assert!(r.price_range.min <= r.price_range.max);
            assert_eq!(r.historical_series.len(), 91);
            assert_eq!(r.historical_series.last().unwrap().date, today());
            assert_eq!(r.markets.len(), rec.markets().len());
        }
    }

    #[test]
    fn market_labels_follow_crop_average() {
        let rec = Recommender::default();
        let mut rng = StdRng::seed_from_u64(8);
        let cotton = rec.recommend(&query("cotton"), today(), &mut rng);
        assert_eq!(cotton.markets[1].comparison_label, "→ 0% at average");

        let rice = rec.recommend(&query("rice"), today(), &mut rng);
        assert_eq!(rice.markets[1].comparison_label, "↑ 114% above average");
    }

    #[test]
    fn markets_flag_trading_sites_for_the_requested_crop() {
        let rec = Recommender::default();
        let mut rng = StdRng::seed_from_u64(6);

        let wheat = rec.recommend(&query("wheat"), today(), &mut rng);
        let names: Vec<_> = wheat.markets.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Akola APMC", "Nagpur Market", "Amravati APMC"]);
        assert!(wheat.markets[0].trades_crop);
        assert!(wheat.markets[1].trades_crop);
        assert!(!wheat.markets[2].trades_crop);

        let barley = rec.recommend(&query("barley"), today(), &mut rng);
        assert_eq!(barley.markets.len(), rec.markets().len());
    }

    #[test]
    fn serializes_camel_case_wire_record() {
        let r = Recommender::default().recommend(
            &query("rice"),
            today(),
            &mut StdRng::seed_from_u64(2),
        );
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["action"], "Sell within 1-2 weeks");
        assert_eq!(v["confidence"], "Medium");
        assert_eq!(v["trend"], "Stable");
        assert_eq!(v["averagePrice"], 2800);
        assert_eq!(v["priceRange"]["min"], 2700);
        assert_eq!(v["historicalSeries"].as_array().unwrap().len(), 91);
        assert_eq!(v["markets"][0]["distanceKm"], 5.2);
        assert_eq!(v["markets"][0]["demand"], "High");
        assert!(v["markets"][0]["comparisonLabel"].is_string());
        assert_eq!(v["markets"][0]["tradesCrop"], false);
        assert_eq!(v["userLocation"]["lat"], 20.7002);
        assert_eq!(v["profile"], "rice");
    }
}
