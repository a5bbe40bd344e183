use crate::model::{PricingParameters, ProductQuote, SuggestionResult};

/// Suggests a price: the lowest quoted competitor price less the undercut,
/// never below `floor_percent` of `your_price`.
///
/// Competitor prices that are zero or negative count as "not quoted". With no
/// quoted price at all, the suggestion is 0 to signal missing data.
/// `floor_percent` is expected to be clamped by the caller.
pub fn compute(
    your_price: f64,
    competitor_prices: &[f64],
    undercut_amount: f64,
    floor_percent: u32,
) -> SuggestionResult {
    let floor_value = round_cents(your_price * (floor_percent as f64 / 100.0));

    let lowest = competitor_prices
        .iter()
        .copied()
        .filter(|&price| price > 0.0)
        .reduce(f64::min);

    let lowest = match lowest {
        Some(v) => v,
        None => return SuggestionResult::no_data(floor_value),
    };

    let candidate = round_cents(lowest - undercut_amount);
    let suggested_price = candidate.max(floor_value);

    // A zero suggestion on a zero floor is not a floor hit
    let hit_floor = suggested_price == floor_value && suggested_price > 0.0;

    SuggestionResult {
        lowest_competitor: lowest,
        floor_value,
        suggested_price,
        hit_floor,
    }
}

pub fn compute_for(quote: &ProductQuote, params: &PricingParameters) -> SuggestionResult {
    compute(
        quote.your_price,
        &quote.competitor_prices,
        params.undercut_amount,
        params.floor_percent,
    )
}

/// Rounds to 2 decimal places, half away from zero. Values too large to scale
/// are returned as they are.
pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / 100.0
}
