use crate::export::{write_csv, DEFAULT_CSV_FILE};
use crate::model::{
    SuggestionResult, MAX_COMPETITORS, MAX_FLOOR_PERCENT, MAX_PRICE, MIN_COMPETITORS,
    MIN_FLOOR_PERCENT,
};
use crate::report::{build_rows, headers, Summary};
use crate::rules::compute_for;
use crate::session::{
    competitor_label, default_competitor_name, Session, DEFAULT_SESSION_FILE, MAX_PRODUCTS,
    MIN_PRODUCTS,
};
use eframe::egui;
use egui::{Color32, Context, FontFamily, FontId, Margin, RichText, Stroke, Visuals};
use egui_extras::{Column, TableBuilder};
use std::path::PathBuf;
use tracing::{info, warn};

const ACCENT: Color32 = Color32::from_rgb(120, 220, 160);
const LABEL: Color32 = Color32::from_rgb(170, 190, 180);
const LIME: Color32 = Color32::from_rgb(50, 205, 50);
const FLOOR_RED: Color32 = Color32::from_rgb(255, 90, 90);
const NO_DATA: Color32 = Color32::from_rgb(230, 190, 90);
const CARD_FILL: Color32 = Color32::from_rgb(24, 32, 30);
const CARD_STROKE: Color32 = Color32::from_rgb(50, 80, 68);

pub fn set_custom_style(ctx: &Context) {
    // Dark green price board theme
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(14, 20, 18);          // Near-black green panels
    visuals.extreme_bg_color = Color32::from_rgb(30, 42, 38);    // Text and drag value fields
    visuals.faint_bg_color = Color32::from_rgb(22, 31, 28);      // Striped table rows

    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, Color32::from_rgb(100, 200, 150));
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, ACCENT);

    // Slider fill and text selection
    visuals.selection.bg_fill = Color32::from_rgb(50, 100, 80);
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );

    ctx.set_style(style);
}

struct Status {
    message: String,
    error: bool,
}

pub struct RepricerApp {
    session: Session,
    session_path: String,
    csv_path: String,
    status: Option<Status>,
}

impl RepricerApp {
    pub fn new(session: Session, session_path: Option<PathBuf>) -> Self {
        let session_path = session_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.to_string());
        Self {
            session,
            session_path,
            csv_path: DEFAULT_CSV_FILE.to_string(),
            status: None,
        }
    }

    fn set_status(&mut self, message: String, error: bool) {
        if error {
            warn!("{message}");
        } else {
            info!("{message}");
        }
        self.status = Some(Status { message, error });
    }

    fn save_session(&mut self) {
        self.session.normalise();
        let path = self.session_path.trim().to_string();
        match self.session.save(&path) {
            Ok(()) => self.set_status(format!("Saved session to {path}"), false),
            Err(err) => self.set_status(format!("Could not save {path}: {err}"), true),
        }
    }

    fn load_session(&mut self) {
        let path = self.session_path.trim().to_string();
        match Session::load(&path) {
            Ok(session) => {
                self.session = session;
                self.set_status(format!("Loaded session from {path}"), false);
            }
            Err(err) => self.set_status(format!("Could not load {path}: {err}"), true),
        }
    }

    fn export_csv(&mut self) {
        self.session.normalise();
        let path = PathBuf::from(self.csv_path.trim());
        let rows = build_rows(&self.session);
        match write_csv(&path, &headers(&self.session.competitor_names), &rows) {
            Ok(()) => self.set_status(
                format!("Exported {} rows to {}", rows.len(), path.display()),
                false,
            ),
            Err(err) => self.set_status(format!("Export failed: {err:#}"), true),
        }
    }
}

fn price_input(ui: &mut egui::Ui, value: &mut f64) -> egui::Response {
    ui.add(
        egui::DragValue::new(value)
            .range(0.0..=MAX_PRICE)
            .speed(0.01)
            .fixed_decimals(2)
            .prefix("$"),
    )
}

fn suggestion_label(ui: &mut egui::Ui, result: &SuggestionResult, undercut_amount: f64) {
    ui.vertical(|ui| {
        if result.has_competitor_data() {
            let (icon, color) = if result.hit_floor {
                ("🔒", FLOOR_RED)
            } else {
                ("💡", LIME)
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new(icon).size(18.0));
                ui.label(RichText::new("Suggested:").strong().size(18.0));
                ui.label(
                    RichText::new(format!("${:.2}", result.suggested_price))
                        .color(color)
                        .strong()
                        .size(18.0),
                );
            });
        } else {
            ui.label(
                RichText::new("⚠ No competitor data: suggested $0.00")
                    .color(NO_DATA)
                    .size(16.0),
            );
        }
        ui.label(
            RichText::new(format!(
                "Floor: ${:.2}, Undercut: ${:.2}",
                result.floor_value, undercut_amount
            ))
            .italics()
            .small()
            .color(LABEL),
        );
    });
}

impl eframe::App for RepricerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.heading(
                RichText::new("💰 Smart Repricing Tool")
                    .color(ACCENT)
                    .strong()
                    .size(24.0),
            );
            ui.label(RichText::new("Fine-tune your pricing logic below:").color(LABEL));
            ui.add_space(4.0);
            ui.separator();

            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new("💸 Undercut Amount").color(LABEL));
                ui.add(
                    egui::DragValue::new(&mut self.session.undercut_amount)
                        .range(0.0..=MAX_PRICE)
                        .speed(0.1)
                        .fixed_decimals(2)
                        .prefix("$"),
                );

                ui.separator();

                ui.label(RichText::new("🛡 Price Floor (% of your price)").color(LABEL));
                ui.add(
                    egui::Slider::new(
                        &mut self.session.floor_percent,
                        MIN_FLOOR_PERCENT..=MAX_FLOOR_PERCENT,
                    )
                    .suffix("%"),
                );

                ui.separator();

                ui.label(RichText::new("Competitors").color(LABEL));
                let mut competitors = self.session.num_competitors;
                if ui
                    .add(egui::DragValue::new(&mut competitors).range(MIN_COMPETITORS..=MAX_COMPETITORS))
                    .changed()
                {
                    self.session.set_num_competitors(competitors);
                }

                ui.label(RichText::new("Products").color(LABEL));
                let mut products = self.session.num_products;
                if ui
                    .add(egui::DragValue::new(&mut products).range(MIN_PRODUCTS..=MAX_PRODUCTS))
                    .changed()
                {
                    self.session.set_num_products(products);
                }
            });

            ui.add_space(2.0);
        });

        egui::SidePanel::right("settings")
            .min_width(250.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("⚙ Competitors").color(ACCENT));
                ui.separator();

                for (index, name) in self.session.competitor_names.iter_mut().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(format!("#{}", index + 1)).color(LABEL));
                        ui.add(
                            egui::TextEdit::singleline(name)
                                .hint_text(default_competitor_name(index)),
                        );
                    });
                }

                ui.add_space(10.0);
                ui.separator();

                ui.label(RichText::new("💾 Session").strong());
                ui.text_edit_singleline(&mut self.session_path);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.save_session();
                    }
                    if ui.button("Load").clicked() {
                        self.load_session();
                    }
                });

                ui.add_space(10.0);

                ui.label(RichText::new("📥 CSV Export").strong());
                ui.text_edit_singleline(&mut self.csv_path);
                if ui.button("Export CSV").clicked() {
                    self.export_csv();
                }

                if let Some(status) = &self.status {
                    ui.add_space(10.0);
                    ui.separator();
                    let color = if status.error { FLOOR_RED } else { LABEL };
                    ui.label(RichText::new(&status.message).color(color).small());
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                let params = self.session.parameters();
                let Session {
                    products,
                    competitor_names,
                    ..
                } = &mut self.session;

                for (index, product) in products.iter_mut().enumerate() {
                    ui.push_id(index, |ui| {
                        egui::Frame::new()
                            .fill(CARD_FILL)
                            .stroke(Stroke::new(1.0, CARD_STROKE))
                            .inner_margin(Margin::same(10))
                            .show(ui, |ui| {
                                ui.label(RichText::new(product.label(index)).strong().size(18.0));

                                let placeholder = format!("Product {}", index + 1);
                                ui.horizontal_wrapped(|ui| {
                                    ui.label(RichText::new("Name").color(LABEL));
                                    ui.add(
                                        egui::TextEdit::singleline(&mut product.name)
                                            .hint_text(placeholder)
                                            .desired_width(180.0),
                                    );
                                    ui.label(RichText::new("Emoji").color(LABEL));
                                    ui.add(
                                        egui::TextEdit::singleline(&mut product.emoji)
                                            .desired_width(32.0),
                                    );

                                    ui.separator();

                                    ui.label(RichText::new("Your Price").color(LABEL));
                                    price_input(ui, &mut product.your_price);

                                    for (column, (name, price)) in competitor_names
                                        .iter()
                                        .zip(product.competitor_prices.iter_mut())
                                        .enumerate()
                                    {
                                        ui.label(
                                            RichText::new(competitor_label(name, column))
                                                .color(LABEL),
                                        );
                                        price_input(ui, price);
                                    }
                                });

                                let result = compute_for(product, &params);
                                suggestion_label(ui, &result, params.undercut_amount);
                            });
                    });
                    ui.add_space(6.0);
                }

                ui.add_space(10.0);
                ui.separator();

                let rows = build_rows(&self.session);
                let header = headers(&self.session.competitor_names);
                let summary = Summary::of(&rows);

                ui.heading(RichText::new("📋 Final Suggested Prices").color(ACCENT));
                ui.label(
                    RichText::new(format!(
                        "{} products, {} at floor, {} without competitor data",
                        summary.products, summary.floor_hits, summary.without_data
                    ))
                    .color(LABEL),
                );
                ui.add_space(4.0);

                TableBuilder::new(ui)
                    .striped(true)
                    .vscroll(false)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::auto().at_least(180.0).clip(true))
                    .columns(Column::auto().at_least(80.0), header.len() - 1)
                    .header(28.0, |mut header_row| {
                        for title in &header {
                            header_row.col(|ui| {
                                ui.label(RichText::new(title).color(LABEL).strong());
                            });
                        }
                    })
                    .body(|body| {
                        body.rows(26.0, rows.len(), |mut table_row| {
                            let r = &rows[table_row.index()];
                            let record = r.to_record();
                            let last = record.len() - 1;
                            for (column, cell) in record.into_iter().enumerate() {
                                table_row.col(|ui| {
                                    if column == last && r.hit_floor {
                                        ui.label(RichText::new(cell).color(FLOOR_RED).strong());
                                    } else {
                                        ui.label(cell);
                                    }
                                });
                            }
                        });
                    });
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_app_uses_default_paths() {
        let app = RepricerApp::new(Session::default(), None);
        assert_eq!(DEFAULT_SESSION_FILE, app.session_path);
        assert_eq!(DEFAULT_CSV_FILE, app.csv_path);
        assert!(app.status.is_none());
    }

    #[test]
    fn save_load_and_export_update_status() {
        let temp_dir = TempDir::new().unwrap();
        let session_path = temp_dir.path().join("session.json");
        let mut app = RepricerApp::new(Session::default(), Some(session_path.clone()));
        app.csv_path = temp_dir.path().join("out.csv").display().to_string();

        app.session.floor_percent = 75;
        app.save_session();
        assert!(!app.status.as_ref().unwrap().error);

        app.session = Session::default();
        app.load_session();
        assert!(!app.status.as_ref().unwrap().error);
        assert_eq!(75, app.session.floor_percent);

        app.export_csv();
        assert!(!app.status.as_ref().unwrap().error);
        assert!(temp_dir.path().join("out.csv").exists());
    }

    #[test]
    fn failed_load_keeps_session() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = RepricerApp::new(
            Session::default(),
            Some(temp_dir.path().join("missing.json")),
        );
        app.session.undercut_amount = 2.0;
        app.load_session();
        let status = app.status.as_ref().unwrap();
        assert!(status.error);
        assert!(status.message.starts_with("Could not load"));
        assert_eq!(2.0, app.session.undercut_amount);
    }
}
