//! Form state for one repricing session, with JSON save/load.

use crate::model::{
    sanitize_price, PricingParameters, ProductQuote, DEFAULT_FLOOR_PERCENT, DEFAULT_UNDERCUT,
    MAX_COMPETITORS, MAX_FLOOR_PERCENT, MIN_COMPETITORS, MIN_FLOOR_PERCENT,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub const MIN_PRODUCTS: usize = 1;
pub const MAX_PRODUCTS: usize = 50;

pub const DEFAULT_SESSION_FILE: &str = "repricer_session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("malformed session JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default = "default_undercut")]
    pub undercut_amount: f64,
    #[serde(default = "default_floor_percent")]
    pub floor_percent: u32,
    #[serde(default)]
    pub num_competitors: usize,
    #[serde(default)]
    pub competitor_names: Vec<String>,
    #[serde(default)]
    pub num_products: usize,
    #[serde(default)]
    pub products: Vec<ProductQuote>,
}

fn default_undercut() -> f64 {
    DEFAULT_UNDERCUT
}

fn default_floor_percent() -> u32 {
    DEFAULT_FLOOR_PERCENT
}

impl Default for Session {
    fn default() -> Self {
        let products = vec![
            ProductQuote::new("Wireless Mouse", "🖱️", 24.99, vec![30.00, 40.00, 40.00]),
            ProductQuote::new("Bluetooth Speaker", "🔊", 49.99, vec![54.99, 51.00, 52.49]),
            ProductQuote::new("USB-C Hub", "🧲", 34.99, vec![32.00, 32.00, 32.00]),
            ProductQuote::new("Laptop Stand", "💻", 29.99, vec![33.00, 31.49, 34.89]),
            ProductQuote::new(
                "Noise Cancelling Headphones",
                "🎧",
                119.99,
                vec![124.99, 122.00, 129.99],
            ),
        ];

        Session {
            undercut_amount: DEFAULT_UNDERCUT,
            floor_percent: DEFAULT_FLOOR_PERCENT,
            num_competitors: 3,
            competitor_names: (0..3).map(default_competitor_name).collect(),
            num_products: products.len(),
            products,
        }
    }
}

impl Session {
    pub fn parameters(&self) -> PricingParameters {
        PricingParameters::clamped(self.undercut_amount, self.floor_percent)
    }

    /// Brings counts, names and price vectors back into a consistent shape.
    ///
    /// Zero counts (e.g. absent from a hand-written file) are derived from the
    /// arrays before clamping.
    pub fn normalise(&mut self) {
        let params = PricingParameters::clamped(self.undercut_amount, self.floor_percent);
        self.undercut_amount = params.undercut_amount;
        self.floor_percent = params.floor_percent;

        if self.num_competitors == 0 {
            let widest = self
                .products
                .iter()
                .map(|p| p.competitor_prices.len())
                .max()
                .unwrap_or(0);
            self.num_competitors = self.competitor_names.len().max(widest);
        }
        self.num_competitors = self.num_competitors.clamp(MIN_COMPETITORS, MAX_COMPETITORS);

        if self.num_products == 0 {
            self.num_products = self.products.len();
        }
        self.num_products = self.num_products.clamp(MIN_PRODUCTS, MAX_PRODUCTS);

        let num_competitors = self.num_competitors;
        self.competitor_names
            .resize_with(num_competitors, String::new);
        for (index, name) in self.competitor_names.iter_mut().enumerate() {
            if name.trim().is_empty() {
                *name = default_competitor_name(index);
            }
        }

        self.products
            .resize_with(self.num_products, || ProductQuote::blank(num_competitors));
        for product in &mut self.products {
            product.your_price = sanitize_price(product.your_price);
            product.competitor_prices.resize(num_competitors, 0.0);
            for price in &mut product.competitor_prices {
                *price = sanitize_price(*price);
            }
        }
    }

    pub fn set_num_competitors(&mut self, count: usize) {
        self.num_competitors = count.clamp(MIN_COMPETITORS, MAX_COMPETITORS);
        self.normalise();
    }

    pub fn set_num_products(&mut self, count: usize) {
        self.num_products = count.clamp(MIN_PRODUCTS, MAX_PRODUCTS);
        self.normalise();
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Session, SessionError> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut session: Session = serde_json::from_reader(file)?;
        session.normalise();
        debug!(
            "loaded session from {}: {} products, {} competitors",
            path.display(),
            session.num_products,
            session.num_competitors
        );
        Ok(session)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Name shown for a competitor column; blank names fall back to the default.
pub fn competitor_label(name: &str, index: usize) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        default_competitor_name(index)
    } else {
        trimmed.to_string()
    }
}

/// `Competitor A`, `Competitor B`, ...
pub fn default_competitor_name(index: usize) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    format!("Competitor {letter}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_session_is_normalised() {
        let session = Session::default();
        let mut normalised = session.clone();
        normalised.normalise();
        assert_eq!(session, normalised);
        assert_eq!(
            vec!["Competitor A", "Competitor B", "Competitor C"],
            session.competitor_names
        );
        assert_eq!(5, session.products.len());
    }

    #[test]
    fn grow_and_shrink_competitors() {
        let mut session = Session::default();
        session.set_num_competitors(5);
        assert_eq!(5, session.competitor_names.len());
        assert_eq!("Competitor E", session.competitor_names[4]);
        assert!(session.products.iter().all(|p| p.competitor_prices.len() == 5));
        assert_eq!(vec![30.00, 40.00, 40.00, 0.0, 0.0], session.products[0].competitor_prices);

        session.set_num_competitors(9);
        assert_eq!(MAX_COMPETITORS, session.num_competitors);

        session.set_num_competitors(0);
        assert_eq!(1, session.num_competitors);
        assert_eq!(vec![30.00], session.products[0].competitor_prices);
    }

    #[test]
    fn grow_and_shrink_products() {
        let mut session = Session::default();
        session.set_num_products(7);
        assert_eq!(7, session.products.len());
        assert_eq!(ProductQuote::blank(3), session.products[6]);
        assert_eq!("Product 7", session.products[6].display_name(6));

        session.set_num_products(2);
        assert_eq!(2, session.products.len());
        assert_eq!("Bluetooth Speaker", session.products[1].name);
    }

    #[test]
    fn normalise_clamps_bad_values() {
        let mut session = Session {
            undercut_amount: -3.0,
            floor_percent: 10,
            num_competitors: 2,
            competitor_names: vec!["Acme".into(), "  ".into()],
            num_products: 1,
            products: vec![ProductQuote::new("Mouse", "", f64::NAN, vec![-1.0, 12.0])],
        };
        session.normalise();
        assert_eq!(0.0, session.undercut_amount);
        assert_eq!(MIN_FLOOR_PERCENT, session.floor_percent);
        assert_eq!(vec!["Acme", "Competitor B"], session.competitor_names);
        assert_eq!(0.0, session.products[0].your_price);
        assert_eq!(vec![0.0, 12.0], session.products[0].competitor_prices);

        session.floor_percent = 300;
        session.normalise();
        assert_eq!(MAX_FLOOR_PERCENT, session.floor_percent);
    }

    #[test]
    fn parameters_follow_session() {
        let mut session = Session::default();
        session.undercut_amount = 2.5;
        session.floor_percent = 80;
        assert_eq!(
            PricingParameters { undercut_amount: 2.5, floor_percent: 80 },
            session.parameters()
        );
    }

    #[test]
    fn save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_SESSION_FILE);

        let mut session = Session::default();
        session.undercut_amount = 0.75;
        session.floor_percent = 85;
        session.products[2].name = "Hub, 7-port".into();
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(session, loaded);
    }

    #[test]
    fn load_fills_missing_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.json");
        fs::write(
            &path,
            r#"{
                "floor_percent": 95,
                "competitor_names": ["Shop X", "Shop Y"],
                "products": [
                    {"name": "Cable", "your_price": 9.99, "competitor_prices": [10.49]}
                ]
            }"#,
        )
        .unwrap();

        let session = Session::load(&path).unwrap();
        assert_eq!(DEFAULT_UNDERCUT, session.undercut_amount);
        assert_eq!(95, session.floor_percent);
        assert_eq!(2, session.num_competitors);
        assert_eq!(1, session.num_products);
        assert_eq!("", session.products[0].emoji);
        assert_eq!(vec![10.49, 0.0], session.products[0].competitor_prices);
    }

    #[test]
    fn load_reports_errors() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        assert!(matches!(Session::load(&missing), Err(SessionError::Io(_))));

        let garbage = temp_dir.path().join("garbage.json");
        fs::write(&garbage, "{ not json").unwrap();
        assert!(matches!(Session::load(&garbage), Err(SessionError::Json(_))));
    }

    #[test]
    fn competitor_names() {
        assert_eq!("Competitor A", default_competitor_name(0));
        assert_eq!("Competitor E", default_competitor_name(4));
        assert_eq!("Competitor C", competitor_label(" ", 2));
        assert_eq!("Acme", competitor_label(" Acme ", 0));
    }
}
