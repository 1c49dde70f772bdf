use crate::domain::recommendation::{Coordinates, Demand, Market};
use std::cmp::Ordering;

pub const USER_LOCATION: Coordinates = Coordinates {
    lat: 20.7002,
    lng: 77.0082,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MarketSite {
    pub name: String,
    pub distance_km: f64,
    pub price: i64,
    pub demand: Demand,
    pub coordinates: Coordinates,
    pub crops: Vec<String>,
}

impl MarketSite {
    pub fn trades(&self, crop: &str) -> bool {
        self.crops.iter().any(|c| c == crop)
    }
}

fn crops(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

// Nearest first; also the map marker order.
pub fn registry() -> Vec<MarketSite> {
    vec![
        MarketSite {
            name: "Akola APMC".to_string(),
            distance_km: 5.2,
            price: 6100,
            demand: Demand::High,
            coordinates: Coordinates {
                lat: 20.7002,
                lng: 77.0082,
            },
            crops: crops(&["cotton", "soybean", "wheat"]),
        },
        MarketSite {
            name: "Nagpur Market".to_string(),
            distance_km: 45.8,
            price: 6000,
            demand: Demand::Medium,
            coordinates: Coordinates {
                lat: 21.1458,
                lng: 79.0882,
            },
            crops: crops(&["cotton", "wheat", "onion"]),
        },
        MarketSite {
            name: "Amravati APMC".to_string(),
            distance_km: 78.3,
            price: 5900,
            demand: Demand::Low,
            coordinates: Coordinates {
                lat: 20.9374,
                lng: 77.7796,
            },
            crops: crops(&["cotton", "soybean"]),
        },
    ]
}

pub fn deviation_pct(price: i64, average: i64) -> Option<i64> {
    if average <= 0 {
        return None;
    }
    let pct = (price - average) as f64 / average as f64 * 100.0;
    Some(pct.round().abs() as i64)
}

pub fn comparison_label(price: i64, average: i64) -> String {
    let (arrow, relation) = match price.cmp(&average) {
        Ordering::Greater => ("↑", "above average"),
        Ordering::Equal => ("→", "at average"),
        Ordering::Less => ("↓", "below average"),
    };
    match deviation_pct(price, average) {
        Some(pct) => format!("{arrow} {pct}% {relation}"),
        None => format!("{arrow} {relation}"),
    }
}

/// Every site is kept, in registry order, whether or not it trades `crop`.
pub fn compare(sites: &[MarketSite], crop: &str, average_price: i64) -> Vec<Market> {
    sites
        .iter()
        .map(|site| Market {
            name: site.name.clone(),
            distance_km: site.distance_km,
            price: site.price,
            comparison_label: comparison_label(site.price, average_price),
            demand: site.demand,
            coordinates: site.coordinates,
            trades_crop: site.trades(crop),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_direction_and_magnitude() {
        assert_eq!(comparison_label(6300, 6000), "↑ 5% above average");
        assert_eq!(comparison_label(6000, 6000), "→ 0% at average");
        assert_eq!(comparison_label(5820, 6000), "↓ 3% below average");
    }

    #[test]
    fn direction_follows_exact_comparison_even_when_rounded_to_zero() {
        assert_eq!(comparison_label(6010, 6000), "↑ 0% above average");
    }

    #[test]
    fn non_positive_average_drops_percentage() {
        assert_eq!(deviation_pct(100, 0), None);
        assert_eq!(comparison_label(100, 0), "↑ above average");
    }

    #[test]
    fn compare_keeps_registry_order_and_tracks_average() {
        let sites = registry();
        let cotton = compare(&sites, "cotton", 6000);
        let names: Vec<_> = cotton.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Akola APMC", "Nagpur Market", "Amravati APMC"]);
        assert_eq!(cotton[0].comparison_label, "↑ 2% above average");
        assert_eq!(cotton[1].comparison_label, "→ 0% at average");
        assert_eq!(cotton[2].comparison_label, "↓ 2% below average");

        let rice = compare(&sites, "rice", 2800);
        assert!(rice.iter().all(|m| m.comparison_label.contains("above average")));
    }

    #[test]
    fn flags_sites_that_trade_the_crop_without_dropping_others() {
        let sites = registry();

        let wheat = compare(&sites, "wheat", 2200);
        assert_eq!(wheat.len(), 3);
        let traded: Vec<_> = wheat.iter().map(|m| m.trades_crop).collect();
        assert_eq!(traded, [true, true, false]);

        let soybean = compare(&sites, "soybean", 4500);
        let traded: Vec<_> = soybean.iter().map(|m| m.trades_crop).collect();
        assert_eq!(traded, [true, false, true]);

        assert!(compare(&sites, "cotton", 6000).iter().all(|m| m.trades_crop));
        assert!(compare(&sites, "barley", 6000).iter().all(|m| !m.trades_crop));
    }

    #[test]
    fn registry_distances_are_non_negative_and_prices_positive() {
        for site in registry() {
            assert!(site.distance_km >= 0.0);
            assert!(site.price > 0);
        }
    }
}
