use serde::{Deserialize, Serialize};

pub const MIN_COMPETITORS: usize = 1;
pub const MAX_COMPETITORS: usize = 5;

pub const MIN_FLOOR_PERCENT: u32 = 50;
pub const MAX_FLOOR_PERCENT: u32 = 100;

/// Upper bound for prices typed into the form.
pub const MAX_PRICE: f64 = 1_000_000_000.0;

pub const DEFAULT_UNDERCUT: f64 = 1.00;
pub const DEFAULT_FLOOR_PERCENT: u32 = 90;

/// One product's price inputs, as entered in the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductQuote {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub your_price: f64,
    #[serde(default)]
    pub competitor_prices: Vec<f64>,
}

impl ProductQuote {
    pub fn new(name: &str, emoji: &str, your_price: f64, competitor_prices: Vec<f64>) -> Self {
        ProductQuote {
            name: name.to_string(),
            emoji: emoji.to_string(),
            your_price,
            competitor_prices,
        }
    }

    pub fn blank(num_competitors: usize) -> Self {
        ProductQuote {
            name: String::new(),
            emoji: String::new(),
            your_price: 0.0,
            competitor_prices: vec![0.0; num_competitors],
        }
    }

    /// Name used in tables and exports. Blank names fall back to `Product N` (1-based).
    pub fn display_name(&self, index: usize) -> String {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            format!("Product {}", index + 1)
        } else {
            trimmed.to_string()
        }
    }

    /// Display name with the emoji prefix, for headings only.
    pub fn label(&self, index: usize) -> String {
        let emoji = self.emoji.trim();
        if emoji.is_empty() {
            self.display_name(index)
        } else {
            format!("{} {}", emoji, self.display_name(index))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingParameters {
    pub undercut_amount: f64,
    pub floor_percent: u32,
}

impl Default for PricingParameters {
    fn default() -> Self {
        PricingParameters {
            undercut_amount: DEFAULT_UNDERCUT,
            floor_percent: DEFAULT_FLOOR_PERCENT,
        }
    }
}

impl PricingParameters {
    /// Builds parameters from raw input, clamping the way the form widgets do.
    pub fn clamped(undercut_amount: f64, floor_percent: u32) -> Self {
        PricingParameters {
            undercut_amount: sanitize_price(undercut_amount),
            floor_percent: floor_percent.clamp(MIN_FLOOR_PERCENT, MAX_FLOOR_PERCENT),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionResult {
    pub lowest_competitor: f64,
    pub floor_value: f64,
    pub suggested_price: f64,
    pub hit_floor: bool,
}

impl SuggestionResult {
    /// No competitor quoted a positive price.
    pub fn no_data(floor_value: f64) -> Self {
        SuggestionResult {
            lowest_competitor: 0.0,
            floor_value,
            suggested_price: 0.0,
            hit_floor: false,
        }
    }

    pub fn has_competitor_data(&self) -> bool {
        self.lowest_competitor > 0.0
    }
}

/// Negative and non-finite input is treated as zero.
pub fn sanitize_price(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
