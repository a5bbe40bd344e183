use crate::rules::compute_for;
use crate::session::{competitor_label, Session};
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

/// One flat result row, as shown in the final table and written to CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub product: String,
    pub your_price: f64,
    pub competitor_prices: Vec<f64>,
    pub lowest_competitor: f64,
    pub suggested_price: f64,
    pub floor_percent: u32,
    pub floor_value: f64,
    pub hit_floor: bool,
}

impl ReportRow {
    pub fn to_record(&self) -> Vec<String> {
        let mut record = Vec::with_capacity(7 + self.competitor_prices.len());
        record.push(self.product.clone());
        record.push(self.your_price.to_string());
        for price in &self.competitor_prices {
            record.push(price.to_string());
        }
        record.push(format!("{:.2}", self.lowest_competitor));
        record.push(format!("{:.2}", self.suggested_price));
        record.push(format!("{}%", self.floor_percent));
        record.push(format!("{:.2}", self.floor_value));
        record.push(if self.hit_floor { "True" } else { "False" }.to_string());
        record
    }
}

pub fn headers(competitor_names: &[String]) -> Vec<String> {
    let mut headers = vec!["Product".to_string(), "Your Price".to_string()];
    headers.extend(
        competitor_names
            .iter()
            .enumerate()
            .map(|(index, name)| competitor_label(name, index)),
    );
    headers.extend(
        [
            "Lowest Competitor",
            "Suggested Price",
            "Price Floor (%)",
            "Price Floor Value",
            "Hit Floor",
        ]
        .map(String::from),
    );
    headers
}

pub fn build_rows(session: &Session) -> Vec<ReportRow> {
    let params = session.parameters();

    session
        .products
        .iter()
        .enumerate()
        .map(|(index, quote)| {
            let result = compute_for(quote, &params);
            ReportRow {
                product: quote.display_name(index),
                your_price: quote.your_price,
                competitor_prices: quote.competitor_prices.clone(),
                lowest_competitor: result.lowest_competitor,
                suggested_price: result.suggested_price,
                floor_percent: params.floor_percent,
                floor_value: result.floor_value,
                hit_floor: result.hit_floor,
            }
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub products: usize,
    pub floor_hits: usize,
    pub without_data: usize,
}

impl Summary {
    pub fn of(rows: &[ReportRow]) -> Self {
        Summary {
            products: rows.len(),
            floor_hits: rows.iter().filter(|r| r.hit_floor).count(),
            without_data: rows.iter().filter(|r| r.lowest_competitor <= 0.0).count(),
        }
    }
}

pub fn tabulate(headers: &[String], rows: &[ReportRow]) -> Table {
    let mut table = Table::default()
        .with_cols({
            let mut cols = vec![Col::new(
                Styles::default().with(MinWidth(20)).with(HAlign::Left),
            )];
            for _ in 1..headers.len() {
                cols.push(Col::new(
                    Styles::default().with(MinWidth(10)).with(HAlign::Right),
                ));
            }
            cols
        })
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            headers.iter().map(|h| h.clone().into()).collect(),
        ));

    for row in rows {
        table.push_row(Row::new(
            Styles::default(),
            row.to_record().into_iter().map(Into::into).collect(),
        ));
    }

    table
}
