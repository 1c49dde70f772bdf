use crate::domain::recommendation::PricePoint;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Days before today covered by the series; the series holds `WINDOW_DAYS + 1` points.
pub const WINDOW_DAYS: i64 = 90;

pub const NOISE_AMPLITUDE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesParams {
    pub base_price: f64,
    pub daily_drift: f64,
}

/// Prices are not clamped; a small base with a steep drift can go negative.
pub fn synthesize<R: Rng + ?Sized>(
    params: &SeriesParams,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<PricePoint> {
    let mut out = Vec::with_capacity((WINDOW_DAYS + 1) as usize);
    for offset in (0..=WINDOW_DAYS).rev() {
        let noise = rng.gen_range(-NOISE_AMPLITUDE..NOISE_AMPLITUDE);
        let price = params.base_price + params.daily_drift * -(offset as f64) + noise;
        out.push(PricePoint {
            date: today - Duration::days(offset),
            price: price.round() as i64,
        });
    }
    out
}
