use crate::domain::recommendation::{weeks_label, Action, Trend};
use crate::recommend::profile::CropProfile;

// Current price within this band of the reference average reads as "close to".
const CLOSE_BAND_PCT: i64 = 5;

pub fn explain(profile: &CropProfile) -> String {
    format!(
        "{} {} {}",
        opener(profile),
        comparison(profile),
        closing(profile)
    )
}

fn opener(profile: &CropProfile) -> String {
    let name = &profile.display_name;
    match (profile.trend, profile.recent_change_pct) {
        (Trend::Falling, Some(pct)) => {
            format!("{name} prices have dropped {}% in the last month.", pct.abs())
        }
        (Trend::Rising, Some(pct)) => {
            format!("{name} prices have risen {}% in the last month.", pct.abs())
        }
        (Trend::Falling, None) => format!("{name} prices are falling."),
        (Trend::Rising, None) => format!("{name} prices are rising steadily."),
        (Trend::Stable, _) => format!("{name} market is stable."),
    }
}

fn comparison(profile: &CropProfile) -> String {
    let current = profile.current_price;
    let reference = profile.reference_average;
    let window = &profile.reference_window;

    let diff = i128::from(current) - i128::from(reference);
    let relation = if diff.abs() * 100 <= i128::from(CLOSE_BAND_PCT) * i128::from(reference) {
        "close to"
    } else if diff > 0 {
        "still above"
    } else {
        "below"
    };
    format!("Current price of ₹{current} is {relation} the {window} of ₹{reference}.")
}

fn closing(profile: &CropProfile) -> String {
    match profile.action {
        Action::SellNow if profile.trend == Trend::Falling => {
            "Selling now is recommended before prices fall further.".to_string()
        }
        Action::SellNow => "Selling now is recommended to secure good returns.".to_string(),
        Action::Wait { .. } => "Waiting a few weeks may get you better prices.".to_string(),
        Action::SellWithin {
            min_weeks,
            max_weeks,
        } => format!(
            "Selling within {} weeks is a balanced choice.",
            weeks_label(min_weeks, max_weeks)
        ),
    }
}
