use crate::domain::recommendation::{Action, Confidence, Trend};

// Band around the reference average, in percent.
const BAND_PCT: i128 = 5;

const WAIT: Action = Action::Wait {
    min_weeks: 2,
    max_weeks: 4,
};
const SELL_SOON: Action = Action::SellWithin {
    min_weeks: 1,
    max_weeks: 2,
};

pub fn advise(trend: Trend, current_price: i64, reference_average: i64) -> (Action, Confidence) {
    let current = i128::from(current_price) * 100;
    let upper = i128::from(reference_average) * (100 + BAND_PCT);
    let lower = i128::from(reference_average) * (100 - BAND_PCT);

    match trend {
        Trend::Falling if current > upper => (Action::SellNow, Confidence::High),
        Trend::Rising if current < lower => (WAIT, Confidence::Medium),
        Trend::Stable if current > lower && current < upper => (SELL_SOON, Confidence::Medium),
        _ => (SELL_SOON, Confidence::Low),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falling_above_band_sells_now() {
        assert_eq!(
            advise(Trend::Falling, 6000, 5700),
            (Action::SellNow, Confidence::High)
        );
        // 5985 is exactly the upper edge.
        assert_eq!(
            advise(Trend::Falling, 5985, 5700),
            (SELL_SOON, Confidence::Low)
        );
    }

    #[test]
    fn rising_below_band_waits() {
        assert_eq!(advise(Trend::Rising, 2200, 2350), (WAIT, Confidence::Medium));
        assert_eq!(advise(Trend::Rising, 2400, 2350), (SELL_SOON, Confidence::Low));
    }

    #[test]
    fn stable_inside_band_sells_soon() {
        assert_eq!(
            advise(Trend::Stable, 2800, 2750),
            (SELL_SOON, Confidence::Medium)
        );
        assert_eq!(advise(Trend::Stable, 3000, 2750), (SELL_SOON, Confidence::Low));
    }

    #[test]
    fn extreme_prices_do_not_overflow() {
        assert_eq!(
            advise(Trend::Falling, i64::MAX, i64::MAX - 1),
            (SELL_SOON, Confidence::Low)
        );
    }
}
