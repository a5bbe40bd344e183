mod export;
mod model;
mod report;
mod rules;
mod session;
mod ui;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use eframe::egui;
use model::{MAX_FLOOR_PERCENT, MIN_FLOOR_PERCENT};
use session::Session;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use std::env;
use std::path::PathBuf;
use tracing::{debug, info};
use ui::RepricerApp;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// session JSON to load at startup
    #[clap(short, long)]
    session: Option<PathBuf>,

    /// write the suggestions to this CSV file and exit
    #[clap(short, long)]
    export: Option<PathBuf>,

    /// print the suggestions table and exit
    #[clap(short, long)]
    print: bool,

    /// undercut amount, overriding the session
    #[clap(long)]
    undercut: Option<f64>,

    /// price floor as a percentage of your price, overriding the session
    #[clap(long)]
    floor: Option<u32>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if let Some(undercut) = self.undercut {
            if !undercut.is_finite() || undercut < 0.0 {
                bail!("undercut must be a non-negative amount, got {undercut}");
            }
        }
        if let Some(floor) = self.floor {
            if !(MIN_FLOOR_PERCENT..=MAX_FLOOR_PERCENT).contains(&floor) {
                bail!("floor must be between {MIN_FLOOR_PERCENT} and {MAX_FLOOR_PERCENT}, got {floor}");
            }
        }
        Ok(())
    }

    fn load_session(&self) -> anyhow::Result<Session> {
        match &self.session {
            Some(path) => Session::load(path)
                .with_context(|| format!("loading session from {}", path.display())),
            None => Ok(Session::default()),
        }
    }

    /// Applies the command-line overrides on top of the loaded session.
    fn apply(&self, session: &mut Session) {
        if let Some(undercut) = self.undercut {
            session.undercut_amount = undercut;
        }
        if let Some(floor) = self.floor {
            session.floor_percent = floor;
        }
        session.normalise();
    }

    fn headless(&self) -> bool {
        self.export.is_some() || self.print
    }
}

fn main() -> anyhow::Result<()> {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let mut session = args.load_session()?;
    args.apply(&mut session);

    if args.headless() {
        run_headless(&args, &session)
    } else {
        run_ui(session, args.session)
    }
}

fn run_headless(args: &Args, session: &Session) -> anyhow::Result<()> {
    let rows = report::build_rows(session);
    let headers = report::headers(&session.competitor_names);

    if args.print {
        let table = report::tabulate(&headers, &rows);
        info!("\n{}", Console::default().render(&table));
    }

    if let Some(path) = &args.export {
        export::write_csv(path, &headers, &rows)?;
        info!("wrote {} rows to {}", rows.len(), path.display());
    }

    let summary = report::Summary::of(&rows);
    info!(
        "{} products, {} at floor, {} without competitor data (undercut ${:.2}, floor {}%)",
        summary.products,
        summary.floor_hits,
        summary.without_data,
        session.undercut_amount,
        session.floor_percent
    );
    Ok(())
}

fn run_ui(session: Session, session_path: Option<PathBuf>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Smart Repricing Tool",
        options,
        Box::new(move |cc| {
            ui::set_custom_style(&cc.egui_ctx);
            Ok(Box::new(RepricerApp::new(session, session_path)))
        }),
    )
    .map_err(|err| anyhow!("failed to start the UI: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PricingParameters;
    use tempfile::TempDir;

    #[test]
    fn parse_headless_args() {
        let args = Args::parse_from(["repricer", "--print", "-e", "out.csv", "--floor", "80"]);
        assert!(args.headless());
        assert_eq!(Some(PathBuf::from("out.csv")), args.export);
        assert_eq!(Some(80), args.floor);
        args.validate().unwrap();
    }

    #[test]
    fn windowed_by_default() {
        let args = Args::parse_from(["repricer"]);
        assert!(!args.headless());
        args.validate().unwrap();
    }

    #[test]
    fn reject_out_of_range_overrides() {
        let args = Args::parse_from(["repricer", "--floor", "40"]);
        assert!(args.validate().is_err());

        let args = Args::parse_from(["repricer", "--undercut=-1"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn overrides_replace_loaded_parameters() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        let mut saved = Session::default();
        saved.floor_percent = 85;
        saved.undercut_amount = 0.25;
        saved.save(&path).unwrap();

        let path_arg = path.display().to_string();
        let args = Args::parse_from(["repricer", "-s", path_arg.as_str(), "--floor", "70"]);
        args.validate().unwrap();
        let mut session = args.load_session().unwrap();
        assert_eq!(85, session.parameters().floor_percent);

        args.apply(&mut session);
        assert_eq!(70, session.parameters().floor_percent);
        assert_eq!(0.25, session.parameters().undercut_amount);

        let args = Args::parse_from(["repricer", "--undercut", "2.5"]);
        args.apply(&mut session);
        assert_eq!(
            PricingParameters { undercut_amount: 2.5, floor_percent: 70 },
            session.parameters()
        );
    }

    #[test]
    fn missing_session_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path_arg = temp_dir.path().join("missing.json").display().to_string();
        let args = Args::parse_from(["repricer", "--session", path_arg.as_str()]);
        let err = args.load_session().unwrap_err();
        assert!(err.to_string().starts_with("loading session from"));
    }

    #[test]
    fn headless_export_writes_every_product() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("out.csv");
        let csv_arg = csv_path.display().to_string();
        let args = Args::parse_from(["repricer", "--print", "--export", csv_arg.as_str()]);
        assert!(args.headless());

        let mut session = args.load_session().unwrap();
        args.apply(&mut session);
        run_headless(&args, &session).unwrap();

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(session.products.len() + 1, lines.len());
        assert_eq!(
            report::headers(&session.competitor_names).join(","),
            lines[0]
        );
        assert!(lines[3].starts_with("USB-C Hub,"));
        assert!(lines[3].ends_with(",31.49,True"));
    }
}
