use mandi_core::analytics::AnalyticsSummary;
use mandi_core::domain::recommendation::{PricePoint, Recommendation};
use std::io::{self, Write};

pub fn recommendation<W: Write>(out: &mut W, rec: &Recommendation) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Recommendation: {}", rec.action)?;
    writeln!(out, "Confidence:     {}", rec.confidence)?;
    writeln!(out, "Trend:          {}", rec.trend)?;
    if rec.is_generic() {
        writeln!(
            out,
            "(No specific data for this crop; showing general market guidance.)"
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{}", rec.explanation)?;
    writeln!(out)?;
    writeln!(
        out,
        "Price range: ₹{} - ₹{} per quintal (average ₹{})",
        rec.price_range.min, rec.price_range.max, rec.average_price
    )?;

    if let Some(summary) = SeriesSummary::of(&rec.historical_series) {
        writeln!(
            out,
            "Last {} days: ₹{} on {} -> ₹{} on {} (low ₹{}, high ₹{})",
            rec.historical_series.len(),
            summary.first.price,
            summary.first.date,
            summary.last.price,
            summary.last.date,
            summary.low,
            summary.high
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Nearby mandis:")?;
    for (idx, m) in rec.markets.iter().enumerate() {
        let note = if m.trades_crop { "" } else { "  (does not trade this crop)" };
        writeln!(
            out,
            "  {}. {:<16} {:>6.1} km  ₹{:<6} {:<22} demand: {}{}",
            idx + 1,
            m.name,
            m.distance_km,
            m.price,
            m.comparison_label,
            m.demand,
            note
        )?;
    }
    Ok(())
}

pub fn analytics<W: Write>(out: &mut W, summary: &AnalyticsSummary) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} queries between {} and {}",
        summary.state, summary.total_queries, summary.start, summary.end
    )?;
    writeln!(out, "Top crops:")?;
    for c in &summary.top_crops {
        writeln!(out, "  {:<10} {}", c.crop, c.queries)?;
    }
    for (crop, prices) in &summary.price_comparison {
        writeln!(out, "{crop} prices:")?;
        for p in prices {
            writeln!(out, "  {:<10} ₹{}", p.mandi, p.price)?;
        }
    }
    let stats = &summary.recommendation_stats;
    writeln!(
        out,
        "Advice given: sell now {}%, wait {}%, sell soon {}%",
        stats.sell_now, stats.wait, stats.sell_soon
    )?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct SeriesSummary {
    first: PricePoint,
    last: PricePoint,
    low: i64,
    high: i64,
}

impl SeriesSummary {
    fn of(series: &[PricePoint]) -> Option<Self> {
        let first = *series.first()?;
        let last = *series.last()?;
        let low = series.iter().map(|p| p.price).min()?;
        let high = series.iter().map(|p| p.price).max()?;
        Some(Self {
            first,
            last,
            low,
            high,
        })
    }
}
